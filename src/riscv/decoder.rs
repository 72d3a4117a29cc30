// riscv/decoder.rs
//! Text decoder: one instruction line -> [`Instruction`].
//!
//! Decoding never touches interpreter state, so a rejected line leaves
//! registers and memory exactly as they were.

use super::config::IsaConfig;
use super::errors::InterpError;
use super::instruction::{Instruction, InstructionKind};
use super::registers::REGISTER_COUNT;

const R_TYPE: &[&str] = &["add", "sub", "and", "or", "xor", "slt", "sll", "sra"];
const R_TYPE_EXT: &[&str] = &["nor", "sla"];
const I_TYPE: &[&str] = &["addi", "andi", "ori", "xori", "slti"];
const MEM_TYPE: &[&str] = &["lw", "lb", "sw", "sb"];
const U_TYPE: &[&str] = &["lui"];

const OPERAND_DELIMS: &[char] = &[',', ' ', '\t'];
const MEM_OPERAND_DELIMS: &[char] = &[',', ' ', '\t', '(', ')'];

const ABI_NAMES: [&str; REGISTER_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2",
    "s0", "s1", "a0", "a1", "a2", "a3", "a4", "a5",
    "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

pub fn classify(mnemonic: &str, config: &IsaConfig) -> InstructionKind {
    let is = |set: &[&str]| set.contains(&mnemonic);
    if is(R_TYPE) || (config.extended && is(R_TYPE_EXT)) {
        InstructionKind::Register
    } else if is(I_TYPE) {
        InstructionKind::Immediate
    } else if is(MEM_TYPE) {
        InstructionKind::Memory
    } else if is(U_TYPE) {
        InstructionKind::Upper
    } else {
        InstructionKind::Unknown
    }
}

/// Splits a line at its first space into the mnemonic and the operand tail.
/// The mnemonic is taken verbatim: no trimming, no case folding.
pub fn split_mnemonic(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

/// Operand tokens of `tail`, skipping the empty pieces left by runs of
/// delimiters.
pub fn operands<'a>(tail: &'a str, kind: InstructionKind) -> impl Iterator<Item = &'a str> {
    let delims = match kind {
        InstructionKind::Memory => MEM_OPERAND_DELIMS,
        _ => OPERAND_DELIMS,
    };
    tail.split(delims).filter(|t| !t.is_empty())
}

fn take_operands<'a, I: Iterator<Item = &'a str>, const N: usize>(
    mut ops: I,
    mnemonic: &str,
) -> Result<[&'a str; N], InterpError> {
    let mut out = [""; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ops.next().ok_or_else(|| {
            InterpError::decode(format!("{mnemonic}: expected {N} operands, got {i}"))
        })?;
    }
    if ops.next().is_some() {
        return Err(InterpError::decode(format!("{mnemonic}: expected {N} operands, got more")));
    }
    Ok(out)
}

/// Parses `x<N>` or an ABI alias (`sp`, `a0`, ...).
pub fn parse_reg(tok: &str) -> Result<u8, InterpError> {
    let s = tok.trim().to_ascii_lowercase();
    if let Some(digits) = s.strip_prefix('x') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let idx: u32 = digits
                .parse()
                .map_err(|_| InterpError::RegisterIndex(u32::MAX))?;
            if idx as usize >= REGISTER_COUNT {
                return Err(InterpError::RegisterIndex(idx));
            }
            return Ok(idx as u8);
        }
    }
    if s == "fp" {
        return Ok(8);
    }
    ABI_NAMES
        .iter()
        .position(|&name| name == s)
        .map(|idx| idx as u8)
        .ok_or_else(|| InterpError::decode(format!("invalid register: {tok}")))
}

/// Integer literal with C-style base detection: `0x` hex, leading `0`
/// octal, decimal otherwise. Truncated to 32 bits.
pub fn parse_imm(tok: &str) -> Result<i32, InterpError> {
    let s = tok.trim();
    let (neg, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, hex)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };
    // from_str_radix would accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(InterpError::decode(format!("invalid immediate: {tok}")));
    }
    let magnitude = i64::from_str_radix(digits, radix)
        .map_err(|_| InterpError::decode(format!("invalid immediate: {tok}")))?;
    let value = if neg { magnitude.wrapping_neg() } else { magnitude };
    Ok(value as i32)
}

/// Sign-extends the low 12 bits of `v`.
#[inline]
pub fn sext12(v: i32) -> i32 {
    (v << 20) >> 20
}

/// Decodes one line. `Ok(None)` means the mnemonic is not supported and the
/// line should be skipped.
pub fn decode(line: &str, config: &IsaConfig) -> Result<Option<Instruction>, InterpError> {
    let (m, tail) = split_mnemonic(line);
    let kind = classify(m, config);
    let ops = operands(tail, kind);

    use Instruction::*;

    let inst = match kind {
        InstructionKind::Unknown => return Ok(None),

        InstructionKind::Register => {
            let [rd, rs1, rs2] = take_operands::<_, 3>(ops, m)?;
            let (rd, rs1, rs2) = (parse_reg(rd)?, parse_reg(rs1)?, parse_reg(rs2)?);
            match m {
                "add" => Add { rd, rs1, rs2 },
                "sub" => Sub { rd, rs1, rs2 },
                "and" => And { rd, rs1, rs2 },
                "or" => Or { rd, rs1, rs2 },
                "xor" => Xor { rd, rs1, rs2 },
                "slt" => Slt { rd, rs1, rs2 },
                "sll" => Sll { rd, rs1, rs2 },
                "sra" => Sra { rd, rs1, rs2 },
                "nor" => Nor { rd, rs1, rs2 },
                "sla" => Sla { rd, rs1, rs2 },
                _ => unreachable!(),
            }
        }

        InstructionKind::Immediate => {
            let [rd, rs1, imm] = take_operands::<_, 3>(ops, m)?;
            let (rd, rs1) = (parse_reg(rd)?, parse_reg(rs1)?);
            let imm = sext12(parse_imm(imm)?);
            match m {
                "addi" => Addi { rd, rs1, imm },
                "andi" => Andi { rd, rs1, imm },
                "ori" => Ori { rd, rs1, imm },
                "xori" => Xori { rd, rs1, imm },
                "slti" => Slti { rd, rs1, imm },
                _ => unreachable!(),
            }
        }

        // lw rd, imm(rs1)  |  sw rs2, imm(rs1)
        InstructionKind::Memory => {
            let [reg, imm, base] = take_operands::<_, 3>(ops, m)?;
            let reg = parse_reg(reg)?;
            let imm = sext12(parse_imm(imm)?);
            let rs1 = parse_reg(base)?;
            match m {
                "lw" => Lw { rd: reg, rs1, imm },
                "lb" => Lb { rd: reg, rs1, imm },
                "sw" => Sw { rs2: reg, rs1, imm },
                "sb" => Sb { rs2: reg, rs1, imm },
                _ => unreachable!(),
            }
        }

        InstructionKind::Upper => {
            let [rd, imm] = take_operands::<_, 2>(ops, m)?;
            Lui { rd: parse_reg(rd)?, imm: parse_imm(imm)? << 12 }
        }
    };
    Ok(Some(inst))
}
