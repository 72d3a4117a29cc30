// src/riscv/interpreter/mod.rs
use crate::riscv::config::IsaConfig;
use crate::riscv::decoder::decode;
use crate::riscv::errors::{InterpError, ScriptError};
use crate::riscv::exec::execute;
use crate::riscv::instruction::Instruction;
use crate::riscv::memory::{Bus, SparseMemory};
use crate::riscv::registers::Registers;
use tracing::debug;

/// One interpretation session: a register file plus sparse memory.
///
/// Not thread-safe; every method takes `&mut self` and concurrent sessions
/// need their own `Interpreter`.
pub struct Interpreter {
    regs: Registers,
    mem: SparseMemory,
    config: IsaConfig,
}

impl Interpreter {
    /// Binds `registers` and allocates memory with `config.bucket_count`
    /// buckets. Zero buckets is a [`InterpError::Config`] error.
    pub fn new(registers: Registers, config: IsaConfig) -> Result<Self, InterpError> {
        let mem = SparseMemory::new(config.bucket_count)?;
        Ok(Self { regs: registers, mem, config })
    }

    /// Binds `registers` with the default configuration.
    pub fn initialize(registers: Registers) -> Result<Self, InterpError> {
        Self::new(registers, IsaConfig::default())
    }

    /// Decodes and executes one instruction line.
    ///
    /// Returns the executed instruction, or `None` when the mnemonic is not
    /// supported and the line was skipped. On error nothing is modified.
    /// `x0` reads as zero afterwards in every case.
    pub fn step(&mut self, line: &str) -> Result<Option<Instruction>, InterpError> {
        let decoded = decode(line, &self.config);
        match &decoded {
            Ok(Some(inst)) => {
                debug!(%inst, "step");
                execute(*inst, &mut self.regs, &mut self.mem);
            }
            Ok(None) => debug!(line, "skipping unsupported instruction"),
            Err(e) => debug!(line, error = %e, "decode failed"),
        }
        self.regs.clear_zero();
        decoded
    }

    /// Runs a listing line by line, no control flow. `#` and `;` start
    /// comments. Stops at the first failing line.
    ///
    /// Returns how many lines executed an instruction; skipped mnemonics
    /// are not counted.
    pub fn run_script(&mut self, text: &str) -> Result<usize, ScriptError> {
        self.run_script_with(text, |_, _, _| {})
    }

    /// Like [`run_script`](Self::run_script), calling `on_step` after every
    /// non-empty line with its index, the decoded instruction (`None` when
    /// skipped) and the resulting registers.
    pub fn run_script_with<F>(&mut self, text: &str, mut on_step: F) -> Result<usize, ScriptError>
    where
        F: FnMut(usize, Option<Instruction>, &Registers),
    {
        let mut steps = 0;
        for (line, src) in preprocess(text) {
            let inst = self.step(src).map_err(|source| ScriptError { line, source })?;
            on_step(line, inst, &self.regs);
            if inst.is_some() {
                steps += 1;
            }
        }
        Ok(steps)
    }

    pub fn memory_get(&self, addr: i32) -> i32 {
        self.mem.get(addr)
    }

    /// Word view of memory, little-endian from `addr`.
    pub fn memory_word(&self, addr: i32) -> i32 {
        self.mem.load32(addr) as i32
    }

    pub fn memory_len(&self) -> usize {
        self.mem.len()
    }

    pub fn memory(&self) -> &SparseMemory {
        &self.mem
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn into_registers(self) -> Registers {
        self.regs
    }

    pub fn config(&self) -> &IsaConfig {
        &self.config
    }
}

/// Drops a trailing `#` or `;` comment.
pub fn strip_comment(line: &str) -> &str {
    let line = line.split(';').next().unwrap_or(line);
    line.split('#').next().unwrap_or(line).trim()
}

/// Non-empty lines with their zero-based index, comments removed.
pub fn preprocess(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i, strip_comment(l)))
        .filter(|(_, l)| !l.is_empty())
}
