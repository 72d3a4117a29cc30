// riscv/instruction.rs
use std::fmt;

/// Operand shape of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Register,
    Immediate,
    Memory,
    Upper,
    Unknown,
}

/// A fully decoded instruction. Immediates are already sign-extended
/// (`Lui` carries the value after the 12-bit shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // R-type
    Add{ rd:u8, rs1:u8, rs2:u8 }, Sub{ rd:u8, rs1:u8, rs2:u8 },
    And{ rd:u8, rs1:u8, rs2:u8 }, Or{ rd:u8, rs1:u8, rs2:u8 },
    Xor{ rd:u8, rs1:u8, rs2:u8 }, Slt{ rd:u8, rs1:u8, rs2:u8 },
    Sll{ rd:u8, rs1:u8, rs2:u8 }, Sra{ rd:u8, rs1:u8, rs2:u8 },
    // extended set
    Nor{ rd:u8, rs1:u8, rs2:u8 }, Sla{ rd:u8, rs1:u8, rs2:u8 },

    // I-type
    Addi{ rd:u8, rs1:u8, imm:i32 }, Andi{ rd:u8, rs1:u8, imm:i32 },
    Ori{ rd:u8, rs1:u8, imm:i32 }, Xori{ rd:u8, rs1:u8, imm:i32 },
    Slti{ rd:u8, rs1:u8, imm:i32 },

    // loads / stores, imm(rs1)
    Lw{ rd:u8, rs1:u8, imm:i32 }, Lb{ rd:u8, rs1:u8, imm:i32 },
    Sw{ rs2:u8, rs1:u8, imm:i32 }, Sb{ rs2:u8, rs1:u8, imm:i32 },

    // U-type
    Lui{ rd:u8, imm:i32 },
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        use Instruction::*;
        match self {
            Add{..} => "add", Sub{..} => "sub", And{..} => "and", Or{..} => "or",
            Xor{..} => "xor", Slt{..} => "slt", Sll{..} => "sll", Sra{..} => "sra",
            Nor{..} => "nor", Sla{..} => "sla",
            Addi{..} => "addi", Andi{..} => "andi", Ori{..} => "ori",
            Xori{..} => "xori", Slti{..} => "slti",
            Lw{..} => "lw", Lb{..} => "lb", Sw{..} => "sw", Sb{..} => "sb",
            Lui{..} => "lui",
        }
    }

    pub fn kind(&self) -> InstructionKind {
        use Instruction::*;
        match self {
            Add{..} | Sub{..} | And{..} | Or{..} | Xor{..} | Slt{..} | Sll{..} | Sra{..}
            | Nor{..} | Sla{..} => InstructionKind::Register,
            Addi{..} | Andi{..} | Ori{..} | Xori{..} | Slti{..} => InstructionKind::Immediate,
            Lw{..} | Lb{..} | Sw{..} | Sb{..} => InstructionKind::Memory,
            Lui{..} => InstructionKind::Upper,
        }
    }

    /// Register written by this instruction, if any.
    pub fn dest(&self) -> Option<u8> {
        use Instruction::*;
        match *self {
            Sw{..} | Sb{..} => None,
            Add{rd,..} | Sub{rd,..} | And{rd,..} | Or{rd,..} | Xor{rd,..} | Slt{rd,..}
            | Sll{rd,..} | Sra{rd,..} | Nor{rd,..} | Sla{rd,..}
            | Addi{rd,..} | Andi{rd,..} | Ori{rd,..} | Xori{rd,..} | Slti{rd,..}
            | Lw{rd,..} | Lb{rd,..} | Lui{rd,..} => Some(rd),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        let m = self.mnemonic();
        match *self {
            Add{rd,rs1,rs2} | Sub{rd,rs1,rs2} | And{rd,rs1,rs2} | Or{rd,rs1,rs2}
            | Xor{rd,rs1,rs2} | Slt{rd,rs1,rs2} | Sll{rd,rs1,rs2} | Sra{rd,rs1,rs2}
            | Nor{rd,rs1,rs2} | Sla{rd,rs1,rs2} => write!(f, "{m:<4} x{rd}, x{rs1}, x{rs2}"),
            Addi{rd,rs1,imm} | Andi{rd,rs1,imm} | Ori{rd,rs1,imm} | Xori{rd,rs1,imm}
            | Slti{rd,rs1,imm} => write!(f, "{m:<4} x{rd}, x{rs1}, {imm}"),
            Lw{rd,rs1,imm} | Lb{rd,rs1,imm} => write!(f, "{m:<4} x{rd}, {imm}(x{rs1})"),
            Sw{rs2,rs1,imm} | Sb{rs2,rs1,imm} => write!(f, "{m:<4} x{rs2}, {imm}(x{rs1})"),
            Lui{rd,imm} => write!(f, "{m:<4} x{rd}, 0x{:x}", (imm as u32) >> 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_source_syntax() {
        assert_eq!(Instruction::Add { rd: 3, rs1: 1, rs2: 2 }.to_string(), "add  x3, x1, x2");
        assert_eq!(Instruction::Sw { rs2: 3, rs1: 1, imm: -4 }.to_string(), "sw   x3, -4(x1)");
        assert_eq!(Instruction::Lui { rd: 2, imm: 0x1000 }.to_string(), "lui  x2, 0x1");
    }

    #[test]
    fn stores_have_no_dest() {
        assert_eq!(Instruction::Sb { rs2: 5, rs1: 1, imm: 0 }.dest(), None);
        assert_eq!(Instruction::Lb { rd: 5, rs1: 1, imm: 0 }.dest(), Some(5));
        assert_eq!(Instruction::Lb { rd: 5, rs1: 1, imm: 0 }.kind(), InstructionKind::Memory);
    }
}
