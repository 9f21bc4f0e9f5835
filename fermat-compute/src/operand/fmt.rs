use crate::registry::{Associativity, Operation, Precedence, Registry};
use std::fmt::{self, Write};
use super::{BinaryGrouping, Operand};

/// Which side of its parent an operand is printed on.
#[derive(Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

/// Returns true if `child`, printed on `side` of a grouping using `parent`, needs parentheses.
fn needs_parens(registry: &Registry, parent: &Operation, child: &Operand, side: Side) -> bool {
    match child {
        Operand::Integer(n) => *n < 0 && (side == Side::Right || parent.associativity == Associativity::Right),
        Operand::Real(r) => r.is_sign_negative() && (side == Side::Right || parent.associativity == Associativity::Right),
        Operand::Grouping(grouping) => match &**grouping {
            BinaryGrouping::Degenerate(inner) => needs_parens(registry, parent, inner, side),
            BinaryGrouping::Binary { op, .. } => {
                let Some(child_op) = registry.get(*op) else {
                    return true;
                };

                if child_op.precedence != parent.precedence {
                    return child_op.precedence < parent.precedence;
                }

                // equal precedence only needs grouping on the side the operation does not
                // associate towards; commutative operations associate both ways
                match (parent.associativity, side) {
                    (Associativity::Left, Side::Right) => !(parent.commutative && child_op.id == parent.id),
                    (Associativity::Right, Side::Left) => true,
                    _ => false,
                }
            },
        },
        Operand::Blank | Operand::Variable(_) => false,
    }
}

/// Writes a constant so that it reads back as the same kind of number.
fn fmt_real(f: &mut fmt::Formatter, r: f64) -> fmt::Result {
    if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e16 {
        write!(f, "{:.1}", r)
    } else {
        write!(f, "{}", r)
    }
}

/// Displays an [`Operand`] as infix text with the minimum number of parentheses, using the
/// symbols and precedences of a [`Registry`].
///
/// Created by [`Operand::display`].
pub struct Display<'a> {
    operand: &'a Operand,
    registry: &'a Registry,
}

impl Display<'_> {
    fn fmt_child(&self, f: &mut fmt::Formatter, parent: &Operation, child: &Operand, side: Side) -> fmt::Result {
        let inner = Display { operand: child, registry: self.registry };
        if needs_parens(self.registry, parent, child, side) {
            write!(f, "({})", inner)
        } else {
            write!(f, "{}", inner)
        }
    }
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.operand {
            Operand::Blank => f.write_str("_"),
            Operand::Integer(n) => write!(f, "{}", n),
            Operand::Real(r) => fmt_real(f, *r),
            Operand::Variable(name) => f.write_str(name),
            Operand::Grouping(grouping) => match &**grouping {
                BinaryGrouping::Degenerate(inner) => {
                    write!(f, "{}", Display { operand: inner, registry: self.registry })
                },
                BinaryGrouping::Binary { op, left, right } => {
                    let Some(operation) = self.registry.get(*op) else {
                        return write!(
                            f,
                            "({} #{} {})",
                            Display { operand: left, registry: self.registry },
                            op.0,
                            Display { operand: right, registry: self.registry },
                        );
                    };

                    self.fmt_child(f, operation, left, Side::Left)?;
                    if operation.precedence == Precedence::Additive {
                        write!(f, " {} ", operation.symbol)?;
                    } else {
                        f.write_str(operation.symbol)?;
                    }
                    self.fmt_child(f, operation, right, Side::Right)
                },
            },
        }
    }
}

/// Displays an [`Operand`] as an indented tree, one node per line.
///
/// Created by [`Operand::pretty`].
pub struct Pretty<'a> {
    operand: &'a Operand,
    registry: &'a Registry,
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack = vec![(self.operand, 0usize)];
        let mut first = true;

        while let Some((operand, depth)) = stack.pop() {
            if !first {
                f.write_char('\n')?;
            }
            first = false;

            write!(f, "{:indent$}", "", indent = depth * 2)?;
            match operand {
                Operand::Blank => f.write_str("blank")?,
                Operand::Integer(n) => write!(f, "integer {}", n)?,
                Operand::Real(r) => write!(f, "real {}", r)?,
                Operand::Variable(name) => write!(f, "variable {}", name)?,
                Operand::Grouping(grouping) => match &**grouping {
                    BinaryGrouping::Degenerate(inner) => {
                        f.write_str("( )")?;
                        stack.push((inner, depth + 1));
                    },
                    BinaryGrouping::Binary { op, left, right } => {
                        write!(f, "[{}]", self.registry.symbol(*op))?;
                        stack.push((right, depth + 1));
                        stack.push((left, depth + 1));
                    },
                },
            }
        }

        Ok(())
    }
}

impl Operand {
    /// Returns a value that displays this operand as infix text.
    pub fn display<'a>(&'a self, registry: &'a Registry) -> Display<'a> {
        Display { operand: self, registry }
    }

    /// Returns a value that displays this operand as an indented tree.
    pub fn pretty<'a>(&'a self, registry: &'a Registry) -> Pretty<'a> {
        Pretty { operand: self, registry }
    }
}
