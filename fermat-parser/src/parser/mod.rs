pub mod ast;
pub mod error;
pub mod token;

use error::{kind::{self, ErrorKind}, Error};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for arithmetic expressions. This is the type to use to parse an arbitrary
/// piece of text into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the next non-whitespace token, or the end of the source code if there
    /// are no more tokens.
    pub fn span(&self) -> Range<usize> {
        self.peek_token()
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the next non-whitespace token without advancing the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns the kind of the next non-whitespace token without advancing the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_token().map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        if self.peek_kind() == Some(TokenKind::CloseParen) {
            return Err(self.error(kind::UnclosedParenthesis { opening: false }));
        }

        let value = T::parse(self)?;
        match self.peek_kind() {
            None => Ok(value),
            Some(TokenKind::CloseParen) => Err(self.error(kind::UnclosedParenthesis { opening: false })),
            Some(_) => Err(self.error(kind::ExpectedEof)),
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{Binary, Expr, LitFloat, LitInt, LitSym, Literal, Paren, Unary};
    use token::op::{BinOp, BinOpKind};

    fn int(value: i64, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value, span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn bin(lhs: Expr, kind: BinOpKind, implicit: bool, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, implicit, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, int(16, 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat {
            value: 3.14,
            span: 0..4,
        })));
    }

    #[test]
    fn precedence_climbing() {
        let mut parser = Parser::new("1 + 2 * x");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            int(1, 0..1),
            BinOpKind::Add,
            false,
            2..3,
            bin(int(2, 4..5), BinOpKind::Mul, false, 6..7, sym("x", 8..9)),
        ));
    }

    #[test]
    fn left_associative_sub() {
        let mut parser = Parser::new("a-b-c");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            bin(sym("a", 0..1), BinOpKind::Sub, false, 1..2, sym("b", 2..3)),
            BinOpKind::Sub,
            false,
            3..4,
            sym("c", 4..5),
        ));
    }

    #[test]
    fn right_associative_exp() {
        let mut parser = Parser::new("2^3^z");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            int(2, 0..1),
            BinOpKind::Exp,
            false,
            1..2,
            bin(int(3, 2..3), BinOpKind::Exp, false, 3..4, sym("z", 4..5)),
        ));
    }

    #[test]
    fn implicit_multiplication() {
        let mut parser = Parser::new("2x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            int(2, 0..1),
            BinOpKind::Mul,
            true,
            1..1,
            bin(sym("x", 1..2), BinOpKind::Exp, false, 2..3, int(2, 3..4)),
        ));
    }

    #[test]
    fn negation_binds_looser_than_exp() {
        let mut parser = Parser::new("-x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(bin(sym("x", 1..2), BinOpKind::Exp, false, 2..3, int(2, 3..4))),
            span: 0..4,
        }));
    }

    #[test]
    fn parenthesized() {
        let mut parser = Parser::new("5*(x - x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            int(5, 0..1),
            BinOpKind::Mul,
            false,
            1..2,
            Expr::Paren(Paren {
                expr: Box::new(bin(sym("x", 3..4), BinOpKind::Sub, false, 5..6, sym("x", 7..8))),
                span: 2..9,
            }),
        ));
    }

    #[test]
    fn golden_input_parses() {
        let mut parser = Parser::new("2 + 6 + 5 * (x - x) + 6/y * y + 5^(z * z) - 12");
        assert!(parser.try_parse_full::<Expr>().is_ok());
    }

    #[test]
    fn unexpected_eof() {
        let mut parser = Parser::new("1 +");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::UnexpectedEof>());
        assert_eq!(err.spans, vec![3..3]);
    }

    #[test]
    fn unclosed_parenthesis() {
        let mut parser = Parser::new("2(x + 1");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(
            err.downcast_ref::<kind::UnclosedParenthesis>(),
            Some(&kind::UnclosedParenthesis { opening: true }),
        );
        assert_eq!(err.spans, vec![1..2]);

        let mut parser = Parser::new("x + 1)");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(
            err.downcast_ref::<kind::UnclosedParenthesis>(),
            Some(&kind::UnclosedParenthesis { opening: false }),
        );
    }

    #[test]
    fn empty_parenthesis() {
        let mut parser = Parser::new("3 * ()");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::EmptyParenthesis>());
    }

    #[test]
    fn stray_symbol() {
        let mut parser = Parser::new("x $ y");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::ExpectedEof>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn integer_too_large() {
        let mut parser = Parser::new("99999999999999999999");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::InvalidNumber>());
    }
}
