pub mod config;
pub mod decoder;
pub mod errors;
pub mod exec;
pub mod instruction;
pub mod interpreter;
pub mod list;
pub mod memory;
pub mod registers;

pub use config::IsaConfig;
pub use errors::{InterpError, ScriptError};
pub use instruction::{Instruction, InstructionKind};
pub use interpreter::Interpreter;
pub use memory::{Bus, SparseMemory};
pub use registers::Registers;
