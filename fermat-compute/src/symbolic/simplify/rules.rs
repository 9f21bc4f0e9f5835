//! Identity rules applied to a grouping after its children are simplified.
//!
//! Each rule is a function that takes the grouping to simplify, and returns `Some(operand)` with
//! the rewritten operand if the rule applies, or `None` if it does not. Rules look at a single
//! grouping only, and recognize operations by their [`Role`].

use crate::{
    operand::Operand,
    registry::{Registry, Role},
    symbolic::{step::Step, step_collector::StepCollector},
};

/// If the operand is a grouping whose operation has the given role, calls the given
/// transformation function with the left and right-hand side of the grouping.
///
/// Returns `Some(operand)` with the transformed operand if a transformation was applied.
fn do_role(
    registry: &Registry,
    operand: &Operand,
    role: Role,
    f: impl FnOnce(&Operand, &Operand) -> Option<(Operand, Step)>,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Operand> {
    let (op, left, right) = operand.as_binary()?;
    if registry.role(op) != Some(role) {
        return None;
    }

    let (result, step) = f(left, right)?;
    step_collector.push(step);
    Some(result)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(registry: &Registry, operand: &Operand, step_collector: &mut dyn StepCollector<Step>) -> Option<Operand> {
    do_role(registry, operand, Role::Sum, |left, right| {
        if left.is_zero() {
            Some((right.clone(), Step::AddZero))
        } else if right.is_zero() {
            Some((left.clone(), Step::AddZero))
        } else {
            None
        }
    }, step_collector)
}

/// `1*a = a`
/// `0*a = 0`
/// `a*1 = a`
/// `a*0 = 0`
pub fn multiply(registry: &Registry, operand: &Operand, step_collector: &mut dyn StepCollector<Step>) -> Option<Operand> {
    do_role(registry, operand, Role::Product, |left, right| {
        if left.is_one() {
            Some((right.clone(), Step::MultiplyOne))
        } else if left.is_zero() {
            Some((Operand::integer(0), Step::MultiplyZero))
        } else if right.is_one() {
            Some((left.clone(), Step::MultiplyOne))
        } else if right.is_zero() {
            Some((Operand::integer(0), Step::MultiplyZero))
        } else {
            None
        }
    }, step_collector)
}

/// `a^0 = 1`
/// `0^a = 0`
/// `1^a = 1`
/// `a^1 = a`
pub fn power(registry: &Registry, operand: &Operand, step_collector: &mut dyn StepCollector<Step>) -> Option<Operand> {
    do_role(registry, operand, Role::Power, |left, right| {
        if right.is_zero() {
            Some((Operand::integer(1), Step::PowerZero))
        } else if left.is_zero() {
            Some((Operand::integer(0), Step::PowerZeroLeft))
        } else if left.is_one() {
            Some((Operand::integer(1), Step::PowerOneLeft))
        } else if right.is_one() {
            Some((left.clone(), Step::PowerOne))
        } else {
            None
        }
    }, step_collector)
}

/// `a^(-n) = 1/a^n`, for a constant `n`
pub fn negative_exponent(
    registry: &Registry,
    operand: &Operand,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Operand> {
    let (exp, ..) = operand.as_binary()?;
    let div = registry.by_role(Role::Quotient)?.id;
    do_role(registry, operand, Role::Power, |left, right| {
        let n = match right {
            Operand::Integer(n) if *n < 0 => n.checked_neg().map_or(Operand::Real(-(*n as f64)), Operand::Integer),
            Operand::Real(r) if *r < 0.0 => Operand::Real(-r),
            _ => return None,
        };

        Some((
            Operand::binary(div, Operand::integer(1), Operand::binary(exp, left.clone(), n)),
            Step::NegativeExponent,
        ))
    }, step_collector)
}

/// Applies the first rule that matches.
pub fn all(registry: &Registry, operand: &Operand, step_collector: &mut dyn StepCollector<Step>) -> Option<Operand> {
    add_zero(registry, operand, step_collector)
        .or_else(|| multiply(registry, operand, step_collector))
        .or_else(|| power(registry, operand, step_collector))
        .or_else(|| negative_exponent(registry, operand, step_collector))
}
