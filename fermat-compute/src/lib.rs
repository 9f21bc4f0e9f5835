//! Expression trees, the operation registry, and the heuristic simplification engine.
//!
//! The [`operand`] module defines the persistent expression tree ([`Operand`]). Operations are
//! not hard-coded into the tree; every binary grouping refers to an [`OpId`] looked up in a
//! [`Registry`], which supplies the operation's precedence, classification, numeric evaluator,
//! and algebraic relationships (inverses, promotions, identity elements). The registry is always
//! passed in explicitly, so the engine can be exercised against small fabricated registries.
//!
//! The [`symbolic`] module contains the simplifier itself.
//!
//! ```
//! use fermat_compute::{operand::Operand, registry::Registry, symbolic::simplify::Simplifier};
//! use fermat_parser::parser::{ast::Expr, Parser};
//!
//! let registry = Registry::standard();
//! let ast = Parser::new("x + x").try_parse_full::<Expr>().unwrap();
//! let operand = Operand::from_ast(&ast, &registry).unwrap();
//!
//! let simplified = Simplifier::new(&registry).simplify(&operand).unwrap();
//! assert_eq!(simplified.display(&registry).to_string(), "2*x");
//! ```

pub mod error;
pub mod operand;
pub mod registry;
pub mod symbolic;

pub use operand::{BinaryGrouping, Number, Operand};
pub use registry::{OpId, Registry};
