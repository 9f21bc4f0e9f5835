//! The expression tree.
//!
//! An [`Operand`] is a persistent value: rewriting an expression never mutates a node in place,
//! it builds new nodes instead. Groupings are reference counted, so subtrees can be shared freely
//! between the input tree, intermediate rewrites, and cache entries.
//!
//! # Structural equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Operand`] implement **structural
//! equality**: two operands are equal if they have the same tag, bit-for-bit equal numeric values,
//! equal variable names, and equal operations with recursively equal children. Two trees that are
//! mathematically equal but written differently (`x + 1` and `1 + x`) are not structurally equal.
//! Shared nodes are never compared by identity.

mod convert;
mod fmt;
mod substitute;

pub use fmt::{Display, Pretty};

use crate::registry::OpId;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A numeric constant.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// A 64-bit signed integer.
    Integer(i64),

    /// A 64-bit floating-point number.
    Real(f64),
}

impl Number {
    /// Converts the number to a floating-point value.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Real(r) => r,
        }
    }

    /// Returns true if the number is zero.
    pub fn is_zero(self) -> bool {
        match self {
            Number::Integer(n) => n == 0,
            Number::Real(r) => r == 0.0,
        }
    }

    /// Returns true if the number is negative.
    pub fn is_negative(self) -> bool {
        match self {
            Number::Integer(n) => n < 0,
            Number::Real(r) => r < 0.0,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Real(a), Number::Real(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl From<Number> for Operand {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(n) => Operand::Integer(n),
            Number::Real(r) => Operand::Real(r),
        }
    }
}

/// A node in the expression tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operand {
    /// The absence of a value.
    Blank,

    /// An integer constant, such as `2` or `-144`.
    Integer(i64),

    /// A real constant, such as `3.14`.
    Real(f64),

    /// A variable, such as `x` or `y`.
    Variable(Rc<str>),

    /// Two operands combined by an operation, or a single operand wrapped in parentheses.
    Grouping(Rc<BinaryGrouping>),
}

/// A node combining two operands with one operation.
///
/// A grouping without an operation is *degenerate*: it wraps a single operand without any
/// semantic meaning, and is produced for parenthesized input. The simplifier looks straight
/// through degenerate groupings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryGrouping {
    /// `left op right`.
    Binary {
        op: OpId,
        left: Operand,
        right: Operand,
    },

    /// A pass-through wrapper around a single operand.
    Degenerate(Operand),
}

impl BinaryGrouping {
    /// Returns the left (or only) operand of the grouping.
    pub fn left(&self) -> &Operand {
        match self {
            BinaryGrouping::Binary { left, .. } => left,
            BinaryGrouping::Degenerate(inner) => inner,
        }
    }

    /// Returns the right operand of the grouping, if it is not degenerate.
    pub fn right(&self) -> Option<&Operand> {
        match self {
            BinaryGrouping::Binary { right, .. } => Some(right),
            BinaryGrouping::Degenerate(_) => None,
        }
    }

    /// Returns the operation of the grouping, if it is not degenerate.
    pub fn op(&self) -> Option<OpId> {
        match self {
            BinaryGrouping::Binary { op, .. } => Some(*op),
            BinaryGrouping::Degenerate(_) => None,
        }
    }

    /// Returns true if the grouping wraps a single operand.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, BinaryGrouping::Degenerate(_))
    }
}

impl Operand {
    /// Creates an integer constant.
    pub fn integer(n: i64) -> Self {
        Operand::Integer(n)
    }

    /// Creates a real constant.
    pub fn real(r: f64) -> Self {
        Operand::Real(r)
    }

    /// Creates a variable with the given name.
    pub fn variable(name: impl Into<Rc<str>>) -> Self {
        Operand::Variable(name.into())
    }

    /// Creates the grouping `left op right`.
    pub fn binary(op: OpId, left: Operand, right: Operand) -> Self {
        Operand::Grouping(Rc::new(BinaryGrouping::Binary { op, left, right }))
    }

    /// Wraps the operand in a degenerate grouping.
    pub fn degenerate(inner: Operand) -> Self {
        Operand::Grouping(Rc::new(BinaryGrouping::Degenerate(inner)))
    }

    /// Returns true if the operand is an integer or real constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Integer(_) | Operand::Real(_))
    }

    /// Returns true if the operand is [`Operand::Blank`].
    pub fn is_blank(&self) -> bool {
        matches!(self, Operand::Blank)
    }

    /// Returns true if the operand is an integer constant.
    pub fn is_integer(&self) -> bool {
        matches!(self, Operand::Integer(_))
    }

    /// Returns true if the operand is the constant zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    /// Returns true if the operand is the constant one.
    pub fn is_one(&self) -> bool {
        match self {
            Operand::Integer(n) => *n == 1,
            Operand::Real(r) => *r == 1.0,
            _ => false,
        }
    }

    /// Returns true if the operand is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Operand::Variable(_))
    }

    /// Returns true if the operand is a grouping, degenerate or not.
    pub fn is_binary_grouping(&self) -> bool {
        matches!(self, Operand::Grouping(_))
    }

    /// Returns true if the operand is a degenerate grouping.
    pub fn is_degenerate(&self) -> bool {
        self.as_grouping().is_some_and(BinaryGrouping::is_degenerate)
    }

    /// Returns the value of the operand if it is a constant.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Operand::Integer(n) => Some(Number::Integer(*n)),
            Operand::Real(r) => Some(Number::Real(*r)),
            _ => None,
        }
    }

    /// Returns the grouping if the operand is one.
    pub fn as_grouping(&self) -> Option<&BinaryGrouping> {
        match self {
            Operand::Grouping(grouping) => Some(grouping),
            _ => None,
        }
    }

    /// Returns the operation and both children if the operand is a non-degenerate grouping.
    pub fn as_binary(&self) -> Option<(OpId, &Operand, &Operand)> {
        match self.as_grouping()? {
            BinaryGrouping::Binary { op, left, right } => Some((*op, left, right)),
            BinaryGrouping::Degenerate(_) => None,
        }
    }

    /// Returns true if the operand is a non-degenerate grouping using the given operation.
    pub fn is_grouping_of(&self, op: OpId) -> bool {
        self.as_binary().is_some_and(|(grouping_op, _, _)| grouping_op == op)
    }
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::Blank, Operand::Blank) => true,
            (Operand::Integer(a), Operand::Integer(b)) => a == b,
            (Operand::Real(a), Operand::Real(b)) => a.to_bits() == b.to_bits(),
            (Operand::Variable(a), Operand::Variable(b)) => a == b,
            (Operand::Grouping(a), Operand::Grouping(b)) => Rc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl Eq for Operand {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn queries() {
        assert!(Operand::integer(0).is_zero());
        assert!(Operand::real(-0.0).is_zero());
        assert!(Operand::real(1.0).is_one());
        assert!(!Operand::variable("x").is_constant());
        assert!(Operand::Blank.is_blank());
        assert!(!Operand::Blank.is_constant());
        assert!(Operand::degenerate(Operand::integer(2)).is_binary_grouping());
        assert!(Operand::degenerate(Operand::integer(2)).is_degenerate());
        assert!(!Operand::degenerate(Operand::integer(2)).is_constant());
    }

    #[test]
    fn structural_equality_is_by_value() {
        let op = OpId(1);
        let a = Operand::binary(op, Operand::variable("x"), Operand::integer(2));
        let b = Operand::binary(op, Operand::variable("x"), Operand::integer(2));
        let c = Operand::binary(op, Operand::integer(2), Operand::variable("x"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn reals_compare_bitwise() {
        assert_ne!(Operand::real(0.0), Operand::real(-0.0));
        assert_eq!(Operand::real(f64::NAN), Operand::real(f64::NAN));
        assert_ne!(Operand::real(2.0), Operand::integer(2));
    }

    #[test]
    fn degenerate_is_not_its_inner_operand() {
        let x = Operand::variable("x");
        assert_ne!(Operand::degenerate(x.clone()), x);
    }
}
