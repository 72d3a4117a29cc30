//! Single-step interpreter for a small RV32I subset driven by instruction
//! text, backed by a sparse hashed byte memory.

pub mod riscv;

pub use riscv::{Instruction, InterpError, Interpreter, IsaConfig, Registers};
