use fermat_parser::parser::ast::{Expr, Literal};
use std::ops::Range;
use crate::{
    error::{Error, InvariantViolation, UnknownOperation},
    registry::{OpId, Registry},
};
use super::Operand;

/// Work left to do while converting an expression.
enum Task<'e> {
    /// Convert the expression, pushing its operand.
    Convert(&'e Expr),

    /// Wrap the last operand in a degenerate grouping.
    Degenerate,

    /// Negate the last operand; the span is that of the negation.
    Negate(&'e Range<usize>),

    /// Combine the last two operands.
    Binary(OpId),
}

/// Pops the operand produced by an earlier task.
fn pop(operands: &mut Vec<Operand>) -> Result<Operand, Error> {
    operands.pop().ok_or_else(|| Error::spanless(InvariantViolation {
        reason: "expression conversion ran out of operands".to_string(),
    }))
}

impl Operand {
    /// Converts a parsed expression into an operand, resolving operators through the registry.
    ///
    /// Parenthesized expressions become degenerate groupings, and negation is expressed with the
    /// negation transform of the registry (so `-3` becomes the constant `-3`, and `-x` becomes
    /// `-1*x` in the standard registry). Errors raised here carry the span of the offending
    /// expression.
    ///
    /// The expression is walked with an explicit stack, so arbitrarily long chains convert
    /// without exhausting the call stack.
    pub fn from_ast(expr: &Expr, registry: &Registry) -> Result<Self, Error> {
        let mut tasks = vec![Task::Convert(expr)];
        let mut operands = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Convert(Expr::Literal(Literal::Integer(int))) => operands.push(Operand::Integer(int.value)),
                Task::Convert(Expr::Literal(Literal::Float(float))) => operands.push(Operand::Real(float.value)),
                Task::Convert(Expr::Literal(Literal::Symbol(sym))) => operands.push(Operand::variable(sym.name.as_str())),
                Task::Convert(Expr::Paren(paren)) => {
                    tasks.push(Task::Degenerate);
                    tasks.push(Task::Convert(&paren.expr));
                },
                Task::Convert(Expr::Unary(unary)) => {
                    tasks.push(Task::Negate(&unary.span));
                    tasks.push(Task::Convert(&unary.operand));
                },
                Task::Convert(Expr::Binary(binary)) => {
                    let symbol = binary.op.kind.symbol();
                    let op = registry.by_symbol(symbol)
                        .ok_or_else(|| Error::new(
                            vec![binary.op.span.clone()],
                            UnknownOperation { symbol: symbol.to_string() },
                        ))?
                        .id;
                    tasks.push(Task::Binary(op));
                    tasks.push(Task::Convert(&binary.rhs));
                    tasks.push(Task::Convert(&binary.lhs));
                },
                Task::Degenerate => {
                    let inner = pop(&mut operands)?;
                    operands.push(Operand::degenerate(inner));
                },
                Task::Negate(span) => {
                    let operand = pop(&mut operands)?;
                    let negated = registry.negate(&operand).map_err(|mut err| {
                        err.spans = vec![span.clone()];
                        err
                    })?;
                    operands.push(negated);
                },
                Task::Binary(op) => {
                    let right = pop(&mut operands)?;
                    let left = pop(&mut operands)?;
                    operands.push(Operand::binary(op, left, right));
                },
            }
        }

        pop(&mut operands)
    }
}

#[cfg(test)]
mod tests {
    use fermat_parser::parser::Parser;
    use crate::{
        registry::{OperationBuilder, Precedence, eval},
        test_util::{int, parse, var, Ops},
    };
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn literals_and_operators() {
        let registry = Registry::standard();
        let Ops { add, mul, exp, .. } = Ops::of(&registry);

        assert_eq!(parse("2.5", &registry), Operand::real(2.5));
        assert_eq!(
            parse("2x^2 + 1", &registry),
            Operand::binary(
                add,
                Operand::binary(mul, int(2), Operand::binary(exp, var("x"), int(2))),
                int(1),
            ),
        );
    }

    #[test]
    fn parentheses_become_degenerate() {
        let registry = Registry::standard();
        let Ops { mul, .. } = Ops::of(&registry);

        assert_eq!(
            parse("(x)*2", &registry),
            Operand::binary(mul, Operand::degenerate(var("x")), int(2)),
        );
    }

    #[test]
    fn negation() {
        let registry = Registry::standard();
        let Ops { mul, exp, .. } = Ops::of(&registry);

        assert_eq!(parse("-3", &registry), int(-3));
        assert_eq!(
            parse("-x^2", &registry),
            Operand::binary(mul, int(-1), Operand::binary(exp, var("x"), int(2))),
        );
    }

    #[test]
    fn unknown_operator() {
        let mut registry = Registry::new();
        registry.register(
            OperationBuilder::new("+", eval::add)
                .precedence(Precedence::Additive)
                .commutative(true),
        );

        let ast = Parser::new("x + y*z").try_parse_full::<Expr>().unwrap();
        let err = Operand::from_ast(&ast, &registry).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnknownOperation>(),
            Some(&UnknownOperation { symbol: "*".to_string() }),
        );
        assert_eq!(err.spans, vec![5..6]);
    }

    #[test]
    fn long_chains() {
        let registry = Registry::standard();
        let Ops { add, .. } = Ops::of(&registry);
        let input = vec!["x"; 3000].join(" + ");
        let mut operand = parse(&input, &registry);

        let mut terms = 1;
        while let Some((op, left, right)) = operand.as_binary() {
            assert_eq!(op, add);
            assert_eq!(*right, var("x"));
            let left = left.clone();
            operand = left;
            terms += 1;
        }
        assert_eq!(operand, var("x"));
        assert_eq!(terms, 3000);
    }

    #[test]
    fn negation_without_inverse() {
        let registry = Registry::new();
        let ast = Parser::new("-x").try_parse_full::<Expr>().unwrap();
        let err = Operand::from_ast(&ast, &registry).unwrap_err();
        assert!(err.is::<UnknownOperation>());
        assert_eq!(err.spans, vec![0..2]);
    }
}
