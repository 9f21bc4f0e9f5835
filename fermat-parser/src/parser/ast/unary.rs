use std::ops::Range;
use crate::parser::{
    ast::{binary::Binary, expr::{Expr, Primary}},
    error::Error,
    token::Sub,
    Parse,
    Parser,
    Precedence,
};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A negation, such as `-x`. Negation is the only unary operation; it binds tighter than
/// multiplication and looser than exponentiation, so `-x^2` is `-(x^2)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand being negated.
    pub operand: Box<Expr>,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if input.peek_kind() == Some(TokenKind::Sub) {
            Self::parse(input).map(Expr::Unary)
        } else {
            Primary::parse(input).map(Into::into)
        }
    }
}

impl Parse for Unary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let op = input.try_parse::<Sub>()?;
        let operand = {
            let lhs = Unary::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, Precedence::Neg)?
        };
        let span = op.span.start..operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            span,
        })
    }
}
