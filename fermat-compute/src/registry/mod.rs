//! The operation registry.
//!
//! Operations are described by plain [`Operation`] records; the registry assigns each one an
//! [`OpId`] and additionally records the relationships the simplifier relies on:
//!
//! - **Inverses**: subtraction is the inverse of addition, with the transform `b -> -b`, so that
//!   `a - b` can be unfolded into the terms `a` and `-b`. Division is the inverse of
//!   multiplication with the transform `b -> b^-1`.
//! - **Promotions**: repeated addition is multiplication, and repeated multiplication is
//!   exponentiation. This chain decides how gathered terms are combined (`x + x = x*2`,
//!   `x * x = x^2`).
//! - **Identities**: `0` for addition and `1` for multiplication.
//!
//! Missing relationships are not errors: lookups that find nothing log a warning and the
//! simplifier falls back to less aggressive behavior.

pub mod eval;

use crate::{
    error::{Error, InvariantViolation, UnknownOperation},
    operand::{Number, Operand},
};
use log::warn;
use std::{collections::HashMap, fmt, rc::Rc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies an operation within a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpId(pub(crate) u32);

impl OpId {
    /// Returns the token this operation contributes to an expression hash.
    pub fn token(self) -> i64 {
        i64::from(self.0)
    }
}

/// The precedence tier of an operation, in order from lowest precedence (evaluated last) to
/// highest precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Addition and subtraction.
    Additive,

    /// Multiplication and division.
    Multiplicative,

    /// Exponentiation.
    Exponential,
}

/// The associativity of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a op b op c` is `(a op b) op c`.
    Left,

    /// `a op b op c` is `a op (b op c)`.
    Right,
}

/// The algebraic meaning of an operation, used by rules that only apply to specific operations
/// (such as `a + 0 = a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Sum,
    Difference,
    Product,
    Quotient,
    Power,
}

/// Numeric evaluator for an operation applied to two constants.
pub type EvalFn = fn(Number, Number) -> Result<Number, Error>;

/// A value transform attached to an inverse operation.
pub type Transform = Rc<dyn Fn(&Operand) -> Operand>;

/// Descriptor of a binary operation.
#[derive(Debug, Clone)]
pub struct Operation {
    /// The identifier assigned by the registry.
    pub id: OpId,

    /// The symbol used to write the operation, such as `+`.
    pub symbol: &'static str,

    /// The precedence tier of the operation.
    pub precedence: Precedence,

    /// The associativity of the operation.
    pub associativity: Associativity,

    /// Whether `a op b = b op a`. Only commutative operations can be flattened.
    pub commutative: bool,

    /// The algebraic meaning of the operation, if any.
    pub role: Option<Role>,

    /// Evaluates the operation on two constants.
    pub eval: EvalFn,
}

/// Builder for an [`Operation`]. The id is assigned when the operation is registered.
#[derive(Debug, Clone)]
pub struct OperationBuilder(Operation);

impl OperationBuilder {
    /// Create a new builder for a left-associative, non-commutative, additive-tier operation.
    pub fn new(symbol: &'static str, eval: EvalFn) -> Self {
        Self(Operation {
            id: OpId(0),
            symbol,
            precedence: Precedence::Additive,
            associativity: Associativity::Left,
            commutative: false,
            role: None,
            eval,
        })
    }

    /// Set the precedence tier.
    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.0.precedence = precedence;
        self
    }

    /// Set the associativity.
    pub fn associativity(mut self, associativity: Associativity) -> Self {
        self.0.associativity = associativity;
        self
    }

    /// Set whether the operation is commutative.
    pub fn commutative(mut self, commutative: bool) -> Self {
        self.0.commutative = commutative;
        self
    }

    /// Set the algebraic role.
    pub fn role(mut self, role: Role) -> Self {
        self.0.role = Some(role);
        self
    }
}

/// The inverse registered for a base operation.
#[derive(Clone)]
pub struct Inverse {
    /// The inverse operation.
    pub op: OpId,

    /// Rewrites the right operand of `a inverse b` so that `a base transform(b)` is equivalent.
    pub transform: Transform,
}

impl fmt::Debug for Inverse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Inverse")
            .field("op", &self.op)
            .finish_non_exhaustive()
    }
}

/// The set of operations known to the simplifier.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    operations: Vec<Operation>,
    inverses: HashMap<OpId, Inverse>,
    promotions: HashMap<OpId, OpId>,
    identities: HashMap<OpId, Operand>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the five arithmetic operations `+`, `-`, `*`, `/`, and `^`, and
    /// their inverses, promotions, and identities.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        let add = registry.register(
            OperationBuilder::new("+", eval::add)
                .commutative(true)
                .role(Role::Sum),
        );
        let sub = registry.register(
            OperationBuilder::new("-", eval::sub)
                .role(Role::Difference),
        );
        let mul = registry.register(
            OperationBuilder::new("*", eval::mul)
                .precedence(Precedence::Multiplicative)
                .commutative(true)
                .role(Role::Product),
        );
        let div = registry.register(
            OperationBuilder::new("/", eval::div)
                .precedence(Precedence::Multiplicative)
                .role(Role::Quotient),
        );
        let exp = registry.register(
            OperationBuilder::new("^", eval::pow)
                .precedence(Precedence::Exponential)
                .associativity(Associativity::Right)
                .role(Role::Power),
        );

        registry.register_inverse(add, sub, move |operand| negate(mul, operand));
        registry.register_inverse(mul, div, move |operand| {
            Operand::binary(exp, operand.clone(), Operand::integer(-1))
        });
        registry.register_promotion(add, mul);
        registry.register_promotion(mul, exp);
        registry.register_identity(add, Operand::integer(0));
        registry.register_identity(mul, Operand::integer(1));

        registry
    }

    /// Registers an operation, returning its id.
    pub fn register(&mut self, builder: OperationBuilder) -> OpId {
        let mut operation = builder.0;
        // ids start at 1 so that no operation shares a hash token with the constant zero
        let id = OpId(self.operations.len() as u32 + 1);
        operation.id = id;
        self.operations.push(operation);
        id
    }

    /// Registers `inverse` as the inverse of `base`.
    pub fn register_inverse(
        &mut self,
        base: OpId,
        inverse: OpId,
        transform: impl Fn(&Operand) -> Operand + 'static,
    ) {
        self.inverses.insert(base, Inverse { op: inverse, transform: Rc::new(transform) });
    }

    /// Registers `to` as the promotion of `from`.
    pub fn register_promotion(&mut self, from: OpId, to: OpId) {
        self.promotions.insert(from, to);
    }

    /// Registers the identity element of an operation.
    pub fn register_identity(&mut self, op: OpId, identity: Operand) {
        self.identities.insert(op, identity);
    }

    /// Returns the operation with the given id.
    pub fn get(&self, id: OpId) -> Option<&Operation> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.operations.get(index)
    }

    /// Returns the operation with the given id, or an error if it is not registered.
    pub fn operation(&self, id: OpId) -> Result<&Operation, Error> {
        self.get(id).ok_or_else(|| Error::spanless(UnknownOperation { symbol: format!("#{}", id.0) }))
    }

    /// Returns the operation written with the given symbol.
    pub fn by_symbol(&self, symbol: &str) -> Option<&Operation> {
        self.operations.iter().find(|operation| operation.symbol == symbol)
    }

    /// Returns the first operation with the given role.
    pub fn by_role(&self, role: Role) -> Option<&Operation> {
        self.operations.iter().find(|operation| operation.role == Some(role))
    }

    /// Returns the role of the given operation, if it has one.
    pub fn role(&self, id: OpId) -> Option<Role> {
        self.get(id).and_then(|operation| operation.role)
    }

    /// Returns true if the operation is registered and commutative.
    pub fn is_commutative(&self, id: OpId) -> bool {
        self.get(id).is_some_and(|operation| operation.commutative)
    }

    /// Returns the inverse registered for `base`.
    pub fn inverse_of(&self, base: OpId) -> Option<&Inverse> {
        self.inverses.get(&base)
    }

    /// Returns the base operation that `op` is registered as the inverse of.
    pub fn base_of_inverse(&self, op: OpId) -> Option<OpId> {
        self.inverses
            .iter()
            .find(|(_, inverse)| inverse.op == op)
            .map(|(base, _)| *base)
    }

    /// Returns the operation whose flattening axis `op` belongs to: if `op` is registered as the
    /// inverse of some base operation, that base operation, otherwise `op` itself.
    pub fn focus(&self, op: OpId) -> OpId {
        self.base_of_inverse(op).unwrap_or(op)
    }

    /// Returns the promotion of `op`, logging a warning if there is none.
    pub fn promote(&self, op: OpId) -> Option<OpId> {
        let promoted = self.promotions.get(&op).copied();
        if promoted.is_none() {
            warn!("no promotion registered for `{}`", self.symbol(op));
        }
        promoted
    }

    /// Returns the identity element of `op`, logging a warning if there is none.
    pub fn identity(&self, op: OpId) -> Option<Operand> {
        let identity = self.identities.get(&op).cloned();
        if identity.is_none() {
            warn!("no identity registered for `{}`", self.symbol(op));
        }
        identity
    }

    /// Returns the symbol of the operation, or a placeholder if it is not registered.
    pub fn symbol(&self, op: OpId) -> &'static str {
        self.get(op).map_or("?", |operation| operation.symbol)
    }

    /// Evaluates `op` on two constants.
    pub fn evaluate(&self, op: OpId, a: &Operand, b: &Operand) -> Result<Operand, Error> {
        let operation = self.operation(op)?;
        match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => (operation.eval)(a, b).map(Operand::from),
            _ => Err(Error::spanless(InvariantViolation {
                reason: format!("cannot evaluate `{}` on non-constant operands", operation.symbol),
            })),
        }
    }

    /// Negates the operand using the transform registered for the inverse of the operation with
    /// the [`Role::Sum`] role.
    pub fn negate(&self, operand: &Operand) -> Result<Operand, Error> {
        let inverse = self.by_role(Role::Sum)
            .and_then(|sum| self.inverse_of(sum.id))
            .ok_or_else(|| Error::spanless(UnknownOperation { symbol: "-".to_string() }))?;
        Ok((inverse.transform)(operand))
    }
}

/// Negates a constant directly, or multiplies anything else by `-1`.
fn negate(mul: OpId, operand: &Operand) -> Operand {
    match operand {
        Operand::Integer(n) => n.checked_neg()
            .map_or(Operand::Real(-(*n as f64)), Operand::Integer),
        Operand::Real(r) => Operand::Real(-r),
        _ => Operand::binary(mul, Operand::integer(-1), operand.clone()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn standard_relationships() {
        let registry = Registry::standard();
        let add = registry.by_symbol("+").unwrap().id;
        let sub = registry.by_symbol("-").unwrap().id;
        let mul = registry.by_symbol("*").unwrap().id;
        let div = registry.by_symbol("/").unwrap().id;
        let exp = registry.by_symbol("^").unwrap().id;

        assert_eq!(registry.focus(sub), add);
        assert_eq!(registry.focus(div), mul);
        assert_eq!(registry.focus(exp), exp);
        assert_eq!(registry.base_of_inverse(div), Some(mul));
        assert_eq!(registry.base_of_inverse(add), None);
        assert_eq!(registry.promote(add), Some(mul));
        assert_eq!(registry.promote(mul), Some(exp));
        assert_eq!(registry.promote(exp), None);
        assert_eq!(registry.identity(add), Some(Operand::integer(0)));
        assert_eq!(registry.identity(exp), None);
        assert!(registry.is_commutative(mul));
        assert!(!registry.is_commutative(div));
    }

    #[test]
    fn negate_transform() {
        let registry = Registry::standard();
        let mul = registry.by_role(Role::Product).unwrap().id;

        assert_eq!(registry.negate(&Operand::integer(12)).unwrap(), Operand::integer(-12));
        assert_eq!(registry.negate(&Operand::integer(i64::MIN)).unwrap(), Operand::real(9223372036854775808.0));
        assert_eq!(
            registry.negate(&Operand::variable("x")).unwrap(),
            Operand::binary(mul, Operand::integer(-1), Operand::variable("x")),
        );
    }

    #[test]
    fn reciprocal_transform() {
        let registry = Registry::standard();
        let mul = registry.by_role(Role::Product).unwrap().id;
        let exp = registry.by_role(Role::Power).unwrap().id;
        let inverse = registry.inverse_of(mul).unwrap();

        assert_eq!(
            (inverse.transform)(&Operand::integer(2)),
            Operand::binary(exp, Operand::integer(2), Operand::integer(-1)),
        );
    }

    #[test]
    fn evaluate_rejects_variables() {
        let registry = Registry::standard();
        let add = registry.by_role(Role::Sum).unwrap().id;
        let err = registry.evaluate(add, &Operand::integer(1), &Operand::variable("x")).unwrap_err();
        assert!(err.is::<InvariantViolation>());
    }

    #[test]
    fn unknown_operation() {
        let registry = Registry::new();
        assert!(registry.operation(OpId(3)).unwrap_err().is::<UnknownOperation>());
        assert!(registry.negate(&Operand::variable("x")).unwrap_err().is::<UnknownOperation>());
        assert_eq!(registry.focus(OpId(3)), OpId(3));
    }
}
