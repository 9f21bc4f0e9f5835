//! Matching a shared factor between two terms.

use crate::{
    error::Error,
    operand::Operand,
    registry::{OpId, Registry, Role},
    symbolic::{fold::{fold, unfold}, hash::structural_equal},
};
use log::warn;

/// Splits `operand` into its base and exponent, if it is a power; otherwise, the operand is its
/// own base with an exponent of `1`.
fn decompose(power: OpId, operand: &Operand) -> (&Operand, Operand) {
    match operand.as_binary() {
        Some((op, base, exponent)) if op == power => (base, exponent.clone()),
        _ => (operand, Operand::integer(1)),
    }
}

/// Finds the coefficient that `target` is a multiple of `base` by, in terms of `promoted` (the
/// operation that repeated application of the focus operation promotes to).
///
/// - If `promoted` multiplies (`x + x = 2*x`), `target` is unfolded into its factors, and the
///   first factor structurally equal to `base` is removed. The remaining factors are the
///   coefficient: `1` if none remain, otherwise their product. `3*x*y` is `3*y` of `x`.
/// - If `promoted` exponentiates (`x*x = x^2`), `base` and `target` must be powers of the same
///   base. If `base` has an exponent of `1`, the coefficient is the exponent of `target`. If both
///   exponents are integers and the exponent of `base` divides the exponent of `target`, the
///   coefficient is the quotient. `x^6` is `3` of `x^2`, but nothing of `x^4`.
///
/// Returns `None` if `target` is not a multiple of `base`, and for any other kind of operation
/// (after logging a warning).
pub fn factor_of(
    registry: &Registry,
    promoted: OpId,
    base: &Operand,
    target: &Operand,
) -> Result<Option<Operand>, Error> {
    match registry.role(promoted) {
        Some(Role::Product) => {
            let mut factors = unfold(registry, promoted, target)?;
            let Some(index) = factors.iter().position(|factor| structural_equal(factor, base)) else {
                return Ok(None);
            };
            factors.remove(index);

            match factors.len() {
                0 => Ok(Some(Operand::integer(1))),
                1 => Ok(factors.pop()),
                _ => fold(registry, promoted, factors).map(Some),
            }
        },
        Some(Role::Power) => {
            let (base_base, base_exponent) = decompose(promoted, base);
            let (target_base, target_exponent) = decompose(promoted, target);
            if !structural_equal(base_base, target_base) {
                return Ok(None);
            }

            if base_exponent.is_one() {
                return Ok(Some(target_exponent));
            }

            match (base_exponent, target_exponent) {
                (Operand::Integer(b), Operand::Integer(t)) if b != 0 && t.checked_rem(b) == Some(0) => {
                    Ok(t.checked_div(b).map(Operand::Integer))
                },
                _ => Ok(None),
            }
        },
        _ => {
            warn!("cannot match factors of `{}`", registry.symbol(promoted));
            Ok(None)
        },
    }
}
