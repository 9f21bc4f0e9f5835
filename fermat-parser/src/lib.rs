//! Tokenizer and parser for the arithmetic expressions accepted by the fermat simplifier.
//!
//! The grammar is small: integer and decimal numbers, variable names, the binary operators `+`,
//! `-`, `*`, `/`, and `^`, unary negation, parentheses, and implicit multiplication (`2x`,
//! `3(x + 1)`). Parsing produces an [`ast::Expr`](parser::ast::Expr) tree where every node
//! remembers the region of source code it came from, so that errors can be reported with
//! [`ariadne`].

pub mod parser;
pub mod tokenizer;
