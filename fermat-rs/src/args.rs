use ariadne::Fmt;
use fermat_attrs::ErrorKind;
use fermat_compute::symbolic::simplify::{SimplifyOptions, SimplifyOptionsBuilder};
use fermat_error::{Error, EXPR};
use simplelog::LevelFilter;

/// The flag is not recognized.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown flag: `{}`", flag),
    help = format!("supported flags are {}", "-v, -vv, --steps, --max-iterations, --max-depth, --eval".fg(EXPR)),
)]
pub struct UnknownFlag {
    pub flag: String,
}

/// The flag needs a value, but none was given.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("missing value for `{}`", flag))]
pub struct MissingValue {
    pub flag: String,
}

/// The value given to a flag could not be parsed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid value for `{}`: `{}`", flag, value),
    help = format!("expected {}", expected),
)]
pub struct InvalidValue {
    pub flag: String,
    pub value: String,
    pub expected: &'static str,
}

/// Command-line arguments.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Args {
    /// How many times `-v` was given.
    pub verbosity: u8,

    /// Whether to print the simplification steps.
    pub steps: bool,

    /// Overrides [`SimplifyOptions::max_iterations`].
    pub max_iterations: Option<usize>,

    /// Overrides [`SimplifyOptions::max_depth`].
    pub max_depth: Option<usize>,

    /// Variable values to evaluate the simplified expression with, in the order given.
    pub eval: Vec<(String, f64)>,

    /// The file to read expressions from.
    pub file: Option<String>,
}

/// Parses a `name=value,name=value` list.
fn parse_bindings(flag: &str, list: &str) -> Result<Vec<(String, f64)>, Error> {
    list.split(',')
        .map(|binding| {
            let invalid = || Error::spanless(InvalidValue {
                flag: flag.to_string(),
                value: binding.to_string(),
                expected: "a list like `x=1,y=2.5`",
            });
            let (name, value) = binding.split_once('=').ok_or_else(invalid)?;
            let value = value.trim().parse::<f64>().map_err(|_| invalid())?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}

impl Args {
    /// Parses the arguments, not including the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, Error> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value_of = |flag: &str| args.next().ok_or_else(|| Error::spanless(MissingValue {
                flag: flag.to_string(),
            }));

            match arg.as_str() {
                "-v" => parsed.verbosity += 1,
                "-vv" => parsed.verbosity += 2,
                "--steps" => parsed.steps = true,
                "--max-iterations" | "--max-depth" => {
                    let value = value_of(&arg)?;
                    let limit = value.parse::<usize>().map_err(|_| Error::spanless(InvalidValue {
                        flag: arg.clone(),
                        value: value.clone(),
                        expected: "a non-negative integer",
                    }))?;
                    if arg == "--max-iterations" {
                        parsed.max_iterations = Some(limit);
                    } else {
                        parsed.max_depth = Some(limit);
                    }
                },
                "--eval" => {
                    let list = value_of(&arg)?;
                    parsed.eval.extend(parse_bindings(&arg, &list)?);
                },
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(Error::spanless(UnknownFlag { flag: flag.to_string() }));
                },
                _ => parsed.file = Some(arg),
            }
        }

        Ok(parsed)
    }

    /// Returns the log level selected by the `-v` flags.
    pub fn level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Returns the simplifier options, with the limits given on the command line.
    pub fn simplify_options(&self) -> SimplifyOptions {
        let defaults = SimplifyOptions::default();
        SimplifyOptionsBuilder::new()
            .max_iterations(self.max_iterations.unwrap_or(defaults.max_iterations))
            .max_depth(self.max_depth.unwrap_or(defaults.max_depth))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, Error> {
        Args::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn flags() {
        let args = parse(&["-v", "--steps", "--max-iterations", "8", "--eval", "x=1,y=2.5", "input.txt"]).unwrap();
        assert_eq!(args, Args {
            verbosity: 1,
            steps: true,
            max_iterations: Some(8),
            max_depth: None,
            eval: vec![("x".to_string(), 1.0), ("y".to_string(), 2.5)],
            file: Some("input.txt".to_string()),
        });
        assert_eq!(args.level(), LevelFilter::Debug);
        assert_eq!(args.simplify_options().max_iterations, 8);
        assert_eq!(args.simplify_options().max_depth, SimplifyOptions::default().max_depth);
    }

    #[test]
    fn errors() {
        assert!(parse(&["--frobnicate"]).unwrap_err().is::<UnknownFlag>());
        assert!(parse(&["--max-depth"]).unwrap_err().is::<MissingValue>());
        assert!(parse(&["--max-depth", "-1"]).unwrap_err().is::<InvalidValue>());
        assert!(parse(&["--eval", "x"]).unwrap_err().is::<InvalidValue>());
    }
}
