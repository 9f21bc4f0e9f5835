//! Heuristic simplification of expression trees.
//!
//! # Flattening
//!
//! A tree of binary groupings hides the structure that matters for simplification: `x + (y - x)`
//! is three terms, but no single grouping in the tree sees more than two of them. Before
//! simplifying a grouping, the engine [unfolds](fold::unfold) it along its *focus* operation
//! (the commutative operation it belongs to, so `-` unfolds along `+`) into a flat list, with the
//! inverse operation rewritten into the focus (`a - b` becomes `a + -1*b`). After working on the
//! flat list, the list is [folded](fold::fold) back into a tree.
//!
//! # Gathering
//!
//! Terms of a flat list that share a factor are [gathered](gather::gather) into one term with a
//! coefficient, using the *promotion* of the focus operation: repeated addition promotes to
//! multiplication (`x + x = 2*x`), and repeated multiplication promotes to exponentiation
//! (`x*x = x^2`). Whether two terms share a factor is decided by the [factor
//! matcher](factor::factor_of).
//!
//! # Hashing
//!
//! Every tree has a [structural hash](hash::hash), a flat sequence of integers. Hashes key the
//! simplification cache and rank candidate rewrites by how far they moved from their input, but
//! two different trees can share a hash; the cache confirms hits with [structural
//! equality](hash::structural_equal) unless configured otherwise.
//!
//! # Simplification
//!
//! [`Simplifier`](simplify::Simplifier) drives all of the above, together with a small set of
//! [identity rules](simplify::rules), to a fixed point. See the [`mod@simplify`] module.

pub mod factor;
pub mod fold;
pub mod gather;
pub mod hash;
pub mod simplify;
pub mod step;
pub mod step_collector;
