use fermat_compute::error::DidNotConverge;
use fermat_error::Error;
use std::io;

/// Utility enum to package errors that can occur while processing one line of input.
#[derive(Debug)]
pub enum ReplError {
    /// The input could not be parsed.
    Parse(Error),

    /// The parsed input could not be converted or simplified.
    Compute(Error),

    /// The simplified expression could not be compiled or evaluated.
    Eval(Error),
}

impl ReplError {
    /// Returns the wrapped error.
    pub fn error(&self) -> &Error {
        match self {
            Self::Parse(err) | Self::Compute(err) | Self::Eval(err) => err,
        }
    }

    /// Returns a hint naming the command-line flag that relaxes the limit behind the error, if
    /// there is one.
    pub fn flag_hint(&self) -> Option<String> {
        let limit = self.error().downcast_ref::<DidNotConverge>()?;
        let flag = if limit.depth { "--max-depth" } else { "--max-iterations" };
        Some(format!("hint: pass {} with a value above {}", flag, limit.limit))
    }

    /// Writes a report for the error against the input it came from.
    pub fn write_report(&self, input: &str, mut writer: impl io::Write) -> io::Result<()> {
        self.error().write_report("input", input, &mut writer)?;
        if let Some(hint) = self.flag_hint() {
            writeln!(writer, "{}", hint)?;
        }
        Ok(())
    }

    /// Reports the error to stderr.
    pub fn report_to_stderr(&self, input: &str) -> io::Result<()> {
        self.error().report_to_stderr("input", input)?;
        if let Some(hint) = self.flag_hint() {
            eprintln!("{}", hint);
        }
        Ok(())
    }
}
