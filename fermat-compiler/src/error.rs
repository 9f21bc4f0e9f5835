use ariadne::Fmt;
use fermat_attrs::ErrorKind;
use fermat_error::EXPR;

pub use fermat_error::Error;

/// The variable is not one of the parameters of the function being compiled.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown variable: `{}`", self.name),
    help = if self.suggestions.is_empty() {
        "list the variable as a parameter of the function".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` variable?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these variables? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UnknownVariable {
    /// The name of the variable.
    pub name: String,

    /// A list of similarly named parameters, if any.
    pub suggestions: Vec<String>,
}

/// The expression contains a blank operand, which has no value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "cannot compile a blank operand")]
pub struct BlankOperand;

/// The function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "wrong number of arguments",
    help = format!("the function takes {} argument(s), but {} were given", self.expected.fg(EXPR), self.found.fg(EXPR)),
)]
pub struct ArityMismatch {
    /// The number of parameters of the function.
    pub expected: usize,

    /// The number of arguments given.
    pub found: usize,
}

/// An instruction needed more values than the stack held, or the stack did not end with exactly
/// one value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "malformed bytecode: the value stack was not balanced",
    help = "this is a bug in the compiler",
)]
pub struct StackUnderflow;
