//! The structural hash of an expression tree.

use crate::operand::{BinaryGrouping, Operand};

/// A flat, ordered sequence of integer tokens describing the shape and contents of a tree.
///
/// Constants contribute their value (reals contribute their bit pattern), variables contribute
/// one token per character, and a binary grouping contributes the token of its operation
/// followed by the hashes of its children. Degenerate groupings and [`Operand::Blank`] contribute
/// nothing of their own.
///
/// Hashes are not collision free: `x*121` and `120*y` both hash to `[*, 120, 121]`, since `x` and
/// `y` hash to the character codes `120` and `121`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpressionHash(pub Vec<i64>);

impl ExpressionHash {
    /// Returns the number of tokens in the hash.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the hash has no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Computes the structural hash of a tree.
pub fn hash(operand: &Operand) -> ExpressionHash {
    let mut tokens = Vec::new();
    let mut stack = vec![operand];

    while let Some(operand) = stack.pop() {
        match operand {
            Operand::Blank => {},
            Operand::Integer(n) => tokens.push(*n),
            Operand::Real(r) => tokens.push(r.to_bits() as i64),
            Operand::Variable(name) => tokens.extend(name.chars().map(|c| c as i64)),
            Operand::Grouping(grouping) => match &**grouping {
                BinaryGrouping::Binary { op, left, right } => {
                    tokens.push(op.token());
                    stack.push(right);
                    stack.push(left);
                },
                BinaryGrouping::Degenerate(inner) => stack.push(inner),
            },
        }
    }

    ExpressionHash(tokens)
}

/// Returns how far apart two hashes are: the sum of the absolute differences of the tokens the
/// hashes share positions for, plus the absolute values of the tokens only the longer hash has.
///
/// A distance of zero means the hashes are equal, which suggests (but does not prove) that the
/// trees are equal.
pub fn distance(a: &ExpressionHash, b: &ExpressionHash) -> u64 {
    let shared = a.0.iter()
        .zip(&b.0)
        .fold(0u64, |sum, (x, y)| sum.saturating_add(x.abs_diff(*y)));

    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    longer.0[shorter.len()..]
        .iter()
        .fold(shared, |sum, token| sum.saturating_add(token.unsigned_abs()))
}

/// Returns true if the two trees are structurally equal.
///
/// This is the check that confirms a hash match. See the [`operand`](crate::operand) module for
/// the definition of structural equality.
pub fn structural_equal(a: &Operand, b: &Operand) -> bool {
    a == b
}
