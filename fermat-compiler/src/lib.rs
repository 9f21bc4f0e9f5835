//! Compiles expression trees into bytecode for fast repeated evaluation.
//!
//! A simplified [`Operand`] is compiled against an ordered list of parameter names into a
//! [`Function`], a flat sequence of [`Instruction`]s for a stack machine. Calling the function
//! with one argument per parameter evaluates the expression using the evaluators of the
//! [`Registry`] it was compiled with.
//!
//! ```
//! use fermat_compiler::compile;
//! use fermat_compute::{operand::Operand, registry::Registry};
//! use fermat_parser::parser::{ast::Expr, Parser};
//!
//! let registry = Registry::standard();
//! let ast = Parser::new("x*y + 1").try_parse_full::<Expr>().unwrap();
//! let operand = Operand::from_ast(&ast, &registry).unwrap();
//!
//! let function = compile(&operand, &operand.variables(), &registry).unwrap();
//! assert_eq!(function.call(&[2.0, 3.0]).unwrap(), 7.0);
//! ```

pub mod error;
pub mod instruction;

use error::{ArityMismatch, BlankOperand, Error, StackUnderflow, UnknownVariable};
use fermat_compute::{
    operand::{BinaryGrouping, Number, Operand},
    registry::Registry,
};
pub use instruction::Instruction;
use levenshtein::levenshtein;
use log::debug;

/// Any node that can be compiled to bytecode.
pub trait Compile {
    /// Compiles the node, appending its instructions to the compiler.
    fn compile(&self, compiler: &mut Compiler) -> Result<(), Error>;
}

/// The state of the compiler.
#[derive(Debug)]
pub struct Compiler<'a> {
    /// The registry that operations are looked up in.
    registry: &'a Registry,

    /// The parameters of the function, in the order arguments are passed.
    variables: &'a [String],

    /// The instructions emitted so far.
    instructions: Vec<Instruction>,
}

impl<'a> Compiler<'a> {
    /// Creates a compiler for a function with the given parameters.
    pub fn new(registry: &'a Registry, variables: &'a [String]) -> Self {
        Self { registry, variables, instructions: Vec::new() }
    }

    /// Appends an instruction.
    pub fn add_instr(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Returns the position of the parameter with the given name.
    pub fn resolve_variable(&self, name: &str) -> Result<usize, Error> {
        self.variables
            .iter()
            .position(|variable| variable == name)
            .ok_or_else(|| Error::spanless(UnknownVariable {
                name: name.to_string(),
                suggestions: self.variables
                    .iter()
                    .filter(|variable| levenshtein(variable, name) < 2)
                    .cloned()
                    .collect(),
            }))
    }

    /// Finishes compilation, returning the compiled function.
    pub fn finish(self) -> Function {
        Function {
            variables: self.variables.to_vec(),
            instructions: self.instructions,
        }
    }
}

/// Work left to do while compiling a tree.
enum Task<'o> {
    Operand(&'o Operand),
    Grouping(&'o BinaryGrouping),
    Emit(Instruction),
}

/// Compiles the tree rooted at the given task, using an explicit stack so that long chains
/// compile without exhausting the call stack.
fn compile_tree(root: Task, compiler: &mut Compiler) -> Result<(), Error> {
    let mut tasks = vec![root];

    while let Some(task) = tasks.pop() {
        match task {
            Task::Operand(Operand::Blank) => return Err(Error::spanless(BlankOperand)),
            Task::Operand(Operand::Integer(n)) => compiler.add_instr(Instruction::LoadConst(Number::Integer(*n))),
            Task::Operand(Operand::Real(r)) => compiler.add_instr(Instruction::LoadConst(Number::Real(*r))),
            Task::Operand(Operand::Variable(name)) => {
                let index = compiler.resolve_variable(name)?;
                compiler.add_instr(Instruction::LoadVar(index));
            },
            Task::Operand(Operand::Grouping(grouping)) => tasks.push(Task::Grouping(grouping)),
            Task::Grouping(BinaryGrouping::Degenerate(inner)) => tasks.push(Task::Operand(inner)),
            Task::Grouping(BinaryGrouping::Binary { op, left, right }) => {
                let eval = compiler.registry.operation(*op)?.eval;
                tasks.push(Task::Emit(Instruction::Binary { op: *op, eval }));
                tasks.push(Task::Operand(right));
                tasks.push(Task::Operand(left));
            },
            Task::Emit(instruction) => compiler.add_instr(instruction),
        }
    }

    Ok(())
}

impl Compile for Operand {
    fn compile(&self, compiler: &mut Compiler) -> Result<(), Error> {
        compile_tree(Task::Operand(self), compiler)
    }
}

impl Compile for BinaryGrouping {
    fn compile(&self, compiler: &mut Compiler) -> Result<(), Error> {
        compile_tree(Task::Grouping(self), compiler)
    }
}

/// Compiles the operand into a function of the given parameters.
pub fn compile(operand: &Operand, variables: &[String], registry: &Registry) -> Result<Function, Error> {
    let mut compiler = Compiler::new(registry, variables);
    operand.compile(&mut compiler)?;

    let function = compiler.finish();
    debug!(
        "compiled {} instructions over {} parameters",
        function.instructions.len(),
        function.variables.len(),
    );
    Ok(function)
}

/// A compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    variables: Vec<String>,
    instructions: Vec<Instruction>,
}

impl Function {
    /// Returns the number of arguments the function takes.
    pub fn arity(&self) -> usize {
        self.variables.len()
    }

    /// Returns the names of the parameters, in the order arguments are passed.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns the compiled instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Calls the function with one argument per parameter.
    pub fn call(&self, args: &[f64]) -> Result<f64, Error> {
        if args.len() != self.arity() {
            return Err(Error::spanless(ArityMismatch { expected: self.arity(), found: args.len() }));
        }

        let mut stack = Vec::with_capacity(self.instructions.len());
        for instruction in &self.instructions {
            match instruction {
                Instruction::LoadConst(n) => stack.push(*n),
                Instruction::LoadVar(index) => {
                    let value = args.get(*index)
                        .ok_or_else(|| Error::spanless(ArityMismatch { expected: index + 1, found: args.len() }))?;
                    stack.push(Number::Real(*value));
                },
                Instruction::Binary { eval, .. } => {
                    let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                        return Err(Error::spanless(StackUnderflow));
                    };
                    stack.push(eval(lhs, rhs)?);
                },
            }
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(result), true) => Ok(result.to_f64()),
            _ => Err(Error::spanless(StackUnderflow)),
        }
    }
}
