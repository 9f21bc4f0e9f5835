use std::ops::Range;
use crate::{
    parser::{
        ast::{expr::Expr, unary::Unary},
        error::Error,
        token::op::{BinOp, BinOpKind},
        Associativity,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the kind of the operator that follows the cursor, without consuming it.
    /// Implicit multiplication is reported when the next token starts a primary expression.
    fn peek_op(input: &Parser) -> Option<(BinOpKind, bool)> {
        let kind = match input.peek_kind()? {
            TokenKind::Add => BinOpKind::Add,
            TokenKind::Sub => BinOpKind::Sub,
            TokenKind::Mul => BinOpKind::Mul,
            TokenKind::Div => BinOpKind::Div,
            TokenKind::Exp => BinOpKind::Exp,
            kind if kind.starts_primary() => return Some((BinOpKind::Mul, true)),
            _ => return None,
        };
        Some((kind, false))
    }

    /// Builds the `lhs op rhs` node.
    fn join(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        let op = if op.implicit {
            BinOp { span: lhs.span().end..rhs.span().start, ..op }
        } else {
            op
        };

        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        })
    }

    /// After parsing the operator and the right-hand-side of a potential binary expression, parse
    /// ahead to see if the right-hand-side is incomplete.
    fn complete_rhs(input: &mut Parser, op: BinOpKind, mut rhs: Expr) -> Result<Expr, Error> {
        let precedence = op.precedence();

        // before creating the `lhs op rhs` node, check the precedence of the following operator;
        // `3 + 4 * 5` must not become `(3 + 4) * 5`
        while let Some((next, _)) = Self::peek_op(input) {
            if next.precedence() > precedence
                || (next.precedence() == precedence && next.associativity() == Associativity::Right)
            {
                rhs = Self::parse_expr(input, rhs, next.precedence())?;
            } else {
                break;
            }
        }

        Ok(rhs)
    }

    /// Parses operators and operands following `lhs`, consuming every operator whose precedence
    /// is at least `precedence`.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        while let Some((kind, implicit)) = Self::peek_op(input) {
            if kind.precedence() < precedence {
                break;
            }

            let op = if implicit {
                BinOp { kind, implicit, span: input.span() }
            } else {
                let token = input.next_token()?;
                BinOp { kind, implicit, span: token.span }
            };

            let rhs = Unary::parse_or_lower(input)?;
            let rhs = Self::complete_rhs(input, kind, rhs)?;
            lhs = Self::join(lhs, op, rhs);
        }

        Ok(lhs)
    }
}
