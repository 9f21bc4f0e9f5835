use fermat_compute::{operand::Number, registry::{EvalFn, OpId}};
use std::fmt;

/// Bytecode instructions emitted by the compiler.
///
/// Instructions run on a stack of numbers: loads push one value, and a binary instruction pops
/// two values and pushes the result of applying the operation to them.
#[derive(Clone, Copy)]
pub enum Instruction {
    /// Load a constant value onto the stack.
    LoadConst(Number),

    /// Load the argument at the given position onto the stack.
    LoadVar(usize),

    /// Apply the operation to the second-to-top and top stack values.
    Binary {
        /// The operation, kept for display.
        op: OpId,

        /// The evaluator of the operation.
        eval: EvalFn,
    },
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::LoadConst(n) => f.debug_tuple("LoadConst").field(n).finish(),
            Instruction::LoadVar(i) => f.debug_tuple("LoadVar").field(i).finish(),
            Instruction::Binary { op, .. } => f.debug_struct("Binary").field("op", op).finish_non_exhaustive(),
        }
    }
}

/// Instructions compare equal if they load the same value, or apply the same operation.
impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Instruction::LoadConst(a), Instruction::LoadConst(b)) => a == b,
            (Instruction::LoadVar(a), Instruction::LoadVar(b)) => a == b,
            (Instruction::Binary { op: a, .. }, Instruction::Binary { op: b, .. }) => a == b,
            _ => false,
        }
    }
}
