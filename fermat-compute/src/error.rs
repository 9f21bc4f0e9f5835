//! Error kinds raised while converting, evaluating, or simplifying expressions.
//!
//! None of these errors carry source spans unless they are raised during conversion from the
//! AST; rewritten trees no longer correspond to the input text.

use ariadne::Fmt;
use fermat_attrs::ErrorKind;
use fermat_error::EXPR;

pub use fermat_error::Error;

/// The operation is not registered in the registry that was supplied.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown operation: `{}`", symbol),
    labels = ["this operator"],
    help = "the registry in use does not define this operation",
)]
pub struct UnknownOperation {
    /// The symbol (or numeric id, if no symbol is known) of the operation.
    pub symbol: String,
}

/// Division by zero, including raising zero to a negative power.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this expression"],
    help = format!("the divisor of `{}` evaluated to zero", symbol.fg(EXPR)),
)]
pub struct DivisionByZero {
    /// The symbol of the operation being evaluated.
    pub symbol: &'static str,
}

/// The evaluator produced infinity or NaN.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` produced a non-finite result", symbol),
    labels = ["this expression"],
    help = "the result is too large, or is not a real number",
)]
pub struct NonFiniteResult {
    /// The symbol of the operation being evaluated.
    pub symbol: &'static str,
}

/// `fold` was given nothing to fold.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "cannot fold an empty list of terms")]
pub struct EmptyFold;

/// An internal assumption of the simplifier did not hold.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("internal invariant violated: {}", reason),
    help = "this is a bug in the simplifier",
)]
pub struct InvariantViolation {
    /// What went wrong.
    pub reason: String,
}

/// The simplifier kept rewriting the expression without reaching a fixed point.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("simplification did not converge after {} {}", limit, if *depth { "levels of nesting" } else { "rewrites" }),
    help = format!("raise {} in the simplifier options, or simplify a smaller expression", (if *depth { "max_depth" } else { "max_iterations" }).fg(EXPR)),
)]
pub struct DidNotConverge {
    /// The limit that was exceeded.
    pub limit: usize,

    /// Whether the recursion depth limit was exceeded. Otherwise, the rewrite limit was exceeded.
    pub depth: bool,
}
