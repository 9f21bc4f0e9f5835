//! Conversion between binary trees and flat lists of terms.

use crate::{
    error::{EmptyFold, Error, InvariantViolation},
    operand::{BinaryGrouping, Operand},
    registry::{OpId, Registry},
};
use log::{debug, warn};

/// Flattens a tree along the `focus` operation into the list of its terms, in left-to-right
/// order.
///
/// Groupings using `focus` are split into their children. Groupings using the inverse of `focus`
/// are split too, with the right-hand side rewritten by the inverse's transform, so that with
/// the standard registry `a - b` unfolds along `+` into `[a, -1*b]`, and `a / b` unfolds along `*`
/// into `[a, b^(-1)]`. Degenerate groupings are looked through, and anything else is a term.
///
/// Each pending node carries a sign parity that flips every time the node is reached through the
/// right-hand side of an inverse grouping; an inverse grouping reached with odd parity has its
/// children swapped before splitting. Only one level of this is meaningful, since the transform
/// usually wraps the right-hand side in a grouping that is no longer split: with the standard
/// registry, `a - (b - c)` unfolds into `[a, -1*(b - c)]`.
///
/// If `focus` has no registered inverse, a warning is logged and only groupings using `focus`
/// are split. Returns an error if `focus` is not commutative.
pub fn unfold(registry: &Registry, focus: OpId, root: &Operand) -> Result<Vec<Operand>, Error> {
    if !registry.is_commutative(focus) {
        return Err(Error::spanless(InvariantViolation {
            reason: format!("cannot unfold along non-commutative operation `{}`", registry.symbol(focus)),
        }));
    }

    let inverse = registry.inverse_of(focus);
    if inverse.is_none() {
        warn!("no inverse registered for `{}`, unfolding without it", registry.symbol(focus));
    }

    let mut terms = Vec::new();
    let mut stack = vec![(root.clone(), true)];

    while let Some((operand, parity)) = stack.pop() {
        let Some(grouping) = operand.as_grouping() else {
            terms.push(operand);
            continue;
        };

        match grouping {
            BinaryGrouping::Degenerate(inner) => stack.push((inner.clone(), parity)),
            BinaryGrouping::Binary { op, left, right } if *op == focus => {
                stack.push((right.clone(), parity));
                stack.push((left.clone(), parity));
            },
            BinaryGrouping::Binary { op, left, right } => match inverse {
                Some(inverse) if inverse.op == *op => {
                    let (left, right) = if parity { (left, right) } else { (right, left) };
                    stack.push(((inverse.transform)(right), !parity));
                    stack.push((left.clone(), parity));
                },
                _ => terms.push(operand.clone()),
            },
        }
    }

    debug!("unfolded along `{}` into {} terms", registry.symbol(focus), terms.len());
    Ok(terms)
}

/// Combines two terms with `op`, evaluating the result if both are constants.
fn combine(registry: &Registry, op: OpId, a: Operand, b: Operand) -> Result<Operand, Error> {
    if a.is_constant() && b.is_constant() {
        registry.evaluate(op, &a, &b)
    } else {
        Ok(Operand::binary(op, a, b))
    }
}

/// Folds a list of terms back into a single tree using `op`.
///
/// Adjacent terms are paired up and combined, repeatedly, until a single tree remains; a term
/// left over at the end of a round is carried into the next round unchanged. Pairs of constants
/// are evaluated instead of grouped. Returns an error if `terms` is empty.
pub fn fold(registry: &Registry, op: OpId, terms: Vec<Operand>) -> Result<Operand, Error> {
    let mut terms = terms;
    while terms.len() > 1 {
        let mut next = Vec::with_capacity(terms.len().div_ceil(2));
        let mut iter = terms.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(combine(registry, op, a, b)?),
                None => next.push(a),
            }
        }
        terms = next;
    }

    terms.pop().ok_or_else(|| Error::spanless(EmptyFold))
}

#[cfg(test)]
mod tests {
    use crate::{
        registry::{eval, OperationBuilder, Role},
        test_util::{int, parse, var, Ops},
    };
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn unfold_inverse() {
        let registry = Registry::standard();
        let Ops { add, mul, exp, .. } = Ops::of(&registry);

        assert_eq!(
            unfold(&registry, add, &parse("x + (y - x)", &registry)).unwrap(),
            vec![var("x"), var("y"), Operand::binary(mul, int(-1), var("x"))],
        );
        assert_eq!(
            unfold(&registry, mul, &parse("6/y*y", &registry)).unwrap(),
            vec![int(6), Operand::binary(exp, var("y"), int(-1)), var("y")],
        );
    }

    #[test]
    fn unfold_golden() {
        let registry = Registry::standard();
        let Ops { add, .. } = Ops::of(&registry);
        let terms = unfold(&registry, add, &parse("2 + 6 + 5*(x-x) + 6/y*y + 5^(z*z) - 12", &registry))
            .unwrap();

        assert_eq!(terms.len(), 6);
        assert_eq!(terms[0], int(2));
        assert_eq!(terms[1], int(6));
        assert_eq!(terms[2], parse("5*(x-x)", &registry));
        assert_eq!(terms[5], int(-12));
    }

    #[test]
    fn unfold_stops_at_other_operations() {
        let registry = Registry::standard();
        let Ops { add, .. } = Ops::of(&registry);
        let operand = parse("x*y", &registry);
        assert_eq!(unfold(&registry, add, &operand).unwrap(), vec![operand]);
    }

    #[test]
    fn unfold_sign_parity_is_one_level() {
        let registry = Registry::standard();
        let Ops { add, mul, .. } = Ops::of(&registry);
        let terms = unfold(&registry, add, &parse("a - (b - (c - d))", &registry)).unwrap();

        assert_eq!(
            terms,
            vec![
                var("a"),
                Operand::binary(mul, int(-1), parse("(b - (c - d))", &registry)),
            ],
        );
    }

    #[test]
    fn unfold_sign_parity_swaps_children() {
        // with a transform that does not wrap its operand, every level of nesting is split,
        // and odd parity swaps the children of each inverse grouping
        let mut registry = Registry::new();
        let add = registry.register(OperationBuilder::new("+", eval::add).commutative(true).role(Role::Sum));
        let sub = registry.register(OperationBuilder::new("-", eval::sub).role(Role::Difference));
        registry.register_inverse(add, sub, Operand::clone);

        let terms = unfold(&registry, add, &parse("a - (b - (c - d))", &registry)).unwrap();
        assert_eq!(terms, vec![var("a"), var("d"), var("c"), var("b")]);
    }

    #[test]
    fn unfold_without_inverse() {
        let mut registry = Registry::new();
        let add = registry.register(OperationBuilder::new("+", eval::add).commutative(true));
        registry.register(OperationBuilder::new("-", eval::sub));

        let operand = parse("x - y + z", &registry);
        let terms = unfold(&registry, add, &operand).unwrap();
        assert_eq!(terms, vec![parse("x - y", &registry), var("z")]);
    }

    #[test]
    fn unfold_non_commutative() {
        let registry = Registry::standard();
        let Ops { exp, .. } = Ops::of(&registry);
        let err = unfold(&registry, exp, &var("x")).unwrap_err();
        assert!(err.is::<InvariantViolation>());
    }

    #[test]
    fn fold_pairs() {
        let registry = Registry::standard();
        let Ops { add, .. } = Ops::of(&registry);

        assert_eq!(
            fold(&registry, add, vec![var("a"), var("b"), var("c")]).unwrap(),
            Operand::binary(add, Operand::binary(add, var("a"), var("b")), var("c")),
        );
        assert_eq!(
            fold(&registry, add, vec![int(2), int(3), var("x")]).unwrap(),
            Operand::binary(add, int(5), var("x")),
        );
        assert_eq!(fold(&registry, add, vec![int(2), int(6), int(-12)]).unwrap(), int(-4));
        assert_eq!(fold(&registry, add, vec![var("x")]).unwrap(), var("x"));
    }

    #[test]
    fn fold_empty() {
        let registry = Registry::standard();
        let Ops { add, .. } = Ops::of(&registry);
        assert!(fold(&registry, add, Vec::new()).unwrap_err().is::<EmptyFold>());
    }
}
