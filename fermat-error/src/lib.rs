//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Every crate in the workspace reports failures through the same [`Error`] type, which pairs an
//! error kind with the regions of source code it originated from (if any). Errors produced deep
//! inside the simplifier usually have no spans at all, since rewritten trees no longer map back
//! to the input text; such errors render as a plain message without labels.

#[cfg(test)]
extern crate self as fermat_error;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::Debug, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Returns the error as a [`&dyn Any`](Any), so that callers can recover the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error that is not associated with any region of the source code.
    pub fn spanless(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// Returns the error kind as the concrete type `K`, if it is of that type.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the error kind is of type `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<K>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the rendered report for this error into the given writer.
    pub fn write_report(&self, src_id: &str, input: &str, writer: impl io::Write) -> io::Result<()> {
        self.build_report(src_id)
            .write((src_id, Source::from(input)), writer)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id)
            .eprint((src_id, Source::from(input)))
    }
}

#[cfg(test)]
mod tests {
    use fermat_attrs::ErrorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("cannot use `{}` here", name),
        labels = ["this name"],
        help = "try a different name",
    )]
    struct BadName {
        name: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "something went wrong inside", labels = ["here"])]
    struct Internal;

    fn render(err: &Error, input: &str) -> String {
        let mut buf = Vec::new();
        err.write_report("input", input, &mut buf).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new(vec![0..1], BadName { name: "q".to_string() });
        assert!(err.is::<BadName>());
        assert!(!err.is::<Internal>());
        assert_eq!(err.downcast_ref::<BadName>(), Some(&BadName { name: "q".to_string() }));
    }

    #[test]
    fn report_with_span() {
        let err = Error::new(vec![4..5], BadName { name: "q".to_string() });
        let out = render(&err, "1 + q");
        assert!(out.contains("cannot use `q` here"));
        assert!(out.contains("this name"));
        assert!(out.contains("try a different name"));
    }

    #[test]
    fn report_without_span() {
        let err = Error::spanless(Internal);
        let out = render(&err, "x + x");
        assert!(out.contains("something went wrong inside"));
        assert!(!out.contains("here"));
    }
}
