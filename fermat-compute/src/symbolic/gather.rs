//! Combining like terms.

use crate::{
    error::{Error, InvariantViolation},
    operand::Operand,
    registry::{OpId, Registry, Role},
    symbolic::{factor::factor_of, hash::hash},
};
use log::{debug, warn};

/// Adds `factor` to the coefficient accumulated so far, evaluating the sum if possible.
fn accumulate(registry: &Registry, add: OpId, coefficient: Operand, factor: Operand) -> Result<Operand, Error> {
    if coefficient.is_constant() && factor.is_constant() {
        registry.evaluate(add, &coefficient, &factor)
    } else {
        Ok(Operand::binary(add, coefficient, factor))
    }
}

/// Gathers the terms of a flat list (produced by [`unfold`](super::fold::unfold) along `focus`)
/// that are multiples of one another into a single term, using the promotion of `focus`.
///
/// With the standard registry, gathering along `+` turns `[x, 2*x, y]` into `[x*3, y]`, and
/// gathering along `*` turns `[x, x^2]` into `[x^3]`.
///
/// The terms are first sorted (stably) by the length of their [hash](hash), so that simpler terms
/// come first and serve as the base that later terms are matched against. Then, in one sweep,
/// every term not yet consumed becomes a base, and consumes every later term that the [factor
/// matcher](factor_of) finds to be a multiple of it, summing their coefficients (the base
/// itself counts for `1`). A base is emitted as:
///
/// - nothing, if its coefficient is `0` (`x - x`),
/// - the bare base, if its coefficient is `1`,
/// - `base promoted coefficient` otherwise.
///
/// If every term cancels, the result is the identity element of `focus`, or an empty list if it
/// has none. If `focus` has no promotion, or there is no operation with the [`Role::Sum`] role to
/// sum coefficients with, the terms are returned unchanged. Returns an error if `terms` is empty.
pub fn gather(registry: &Registry, focus: OpId, terms: Vec<Operand>) -> Result<Vec<Operand>, Error> {
    if terms.is_empty() {
        return Err(Error::spanless(InvariantViolation {
            reason: "cannot gather an empty list of terms".to_string(),
        }));
    }

    let Some(promoted) = registry.promote(focus) else {
        return Ok(terms);
    };
    let Some(add) = registry.by_role(Role::Sum).map(|operation| operation.id) else {
        warn!("no operation to sum coefficients with, leaving terms of `{}` as-is", registry.symbol(focus));
        return Ok(terms);
    };

    let mut terms = terms;
    terms.sort_by_cached_key(|term| hash(term).len());

    let mut consumed = vec![false; terms.len()];
    let mut gathered = Vec::new();
    for i in 0..terms.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;

        let base = &terms[i];
        let mut coefficient = Operand::integer(1);
        for j in i + 1..terms.len() {
            if consumed[j] {
                continue;
            }

            if let Some(factor) = factor_of(registry, promoted, base, &terms[j])? {
                consumed[j] = true;
                coefficient = accumulate(registry, add, coefficient, factor)?;
            }
        }

        if coefficient.is_zero() {
            continue;
        } else if coefficient.is_one() {
            gathered.push(base.clone());
        } else {
            gathered.push(Operand::binary(promoted, base.clone(), coefficient));
        }
    }

    if gathered.is_empty() {
        gathered.extend(registry.identity(focus));
    }

    debug!(
        "gathered {} terms of `{}` into {}",
        terms.len(),
        registry.symbol(focus),
        gathered.len(),
    );
    Ok(gathered)
}
