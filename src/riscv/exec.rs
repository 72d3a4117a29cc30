// riscv/exec.rs
use crate::riscv::{instruction::Instruction, memory::Bus, registers::Registers};

/// Applies one decoded instruction. Cannot fail: operands were validated by
/// the decoder.
pub fn execute<B: Bus>(inst: Instruction, regs: &mut Registers, mem: &mut B) {
    match inst {
        // R
        Instruction::Add{rd,rs1,rs2} => regs.write(rd, regs.read(rs1).wrapping_add(regs.read(rs2))),
        Instruction::Sub{rd,rs1,rs2} => regs.write(rd, regs.read(rs1).wrapping_sub(regs.read(rs2))),
        Instruction::And{rd,rs1,rs2} => regs.write(rd, regs.read(rs1) & regs.read(rs2)),
        Instruction::Or {rd,rs1,rs2} => regs.write(rd, regs.read(rs1) | regs.read(rs2)),
        Instruction::Xor{rd,rs1,rs2} => regs.write(rd, regs.read(rs1) ^ regs.read(rs2)),
        // logical, not bitwise
        Instruction::Nor{rd,rs1,rs2} => regs.write(rd, ((regs.read(rs1) | regs.read(rs2)) == 0) as i32),
        Instruction::Slt{rd,rs1,rs2} => regs.write(rd, (regs.read(rs1) < regs.read(rs2)) as i32),
        Instruction::Sll{rd,rs1,rs2} | Instruction::Sla{rd,rs1,rs2} => {
            let s = (regs.read(rs2) & 0x1F) as u32;
            regs.write(rd, regs.read(rs1) << s);
        }
        Instruction::Sra{rd,rs1,rs2} => {
            let s = (regs.read(rs2) & 0x1F) as u32;
            regs.write(rd, regs.read(rs1) >> s);
        }

        // I
        Instruction::Addi{rd,rs1,imm} => regs.write(rd, regs.read(rs1).wrapping_add(imm)),
        Instruction::Andi{rd,rs1,imm} => regs.write(rd, regs.read(rs1) & imm),
        Instruction::Ori {rd,rs1,imm} => regs.write(rd, regs.read(rs1) | imm),
        Instruction::Xori{rd,rs1,imm} => regs.write(rd, regs.read(rs1) ^ imm),
        Instruction::Slti{rd,rs1,imm} => regs.write(rd, (regs.read(rs1) < imm) as i32),

        Instruction::Lw{rd,rs1,imm} => {
            let a = regs.read(rs1).wrapping_add(imm);
            regs.write(rd, mem.load32(a) as i32);
        }
        Instruction::Lb{rd,rs1,imm} => {
            let a = regs.read(rs1).wrapping_add(imm);
            regs.write(rd, mem.load8(a) as i8 as i32);
        }
        Instruction::Sw{rs2,rs1,imm} => {
            let a = regs.read(rs1).wrapping_add(imm);
            mem.store32(a, regs.read(rs2) as u32);
        }
        Instruction::Sb{rs2,rs1,imm} => {
            let a = regs.read(rs1).wrapping_add(imm);
            mem.store8(a, regs.read(rs2) as u8);
        }

        Instruction::Lui{rd,imm} => regs.write(rd, imm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riscv::memory::SparseMemory;

    fn run(inst: Instruction, setup: &[(u8, i32)]) -> (Registers, SparseMemory) {
        let mut regs = Registers::new();
        for &(r, v) in setup {
            regs.write(r, v);
        }
        let mut mem = SparseMemory::default();
        execute(inst, &mut regs, &mut mem);
        (regs, mem)
    }

    #[test]
    fn arithmetic_wraps() {
        let (regs, _) = run(Instruction::Add { rd: 3, rs1: 1, rs2: 2 }, &[(1, i32::MAX), (2, 1)]);
        assert_eq!(regs.read(3), i32::MIN);
        let (regs, _) = run(Instruction::Sub { rd: 3, rs1: 1, rs2: 2 }, &[(1, 5), (2, 7)]);
        assert_eq!(regs.read(3), -2);
    }

    #[test]
    fn nor_is_logical() {
        let (regs, _) = run(Instruction::Nor { rd: 3, rs1: 1, rs2: 2 }, &[]);
        assert_eq!(regs.read(3), 1);
        let (regs, _) = run(Instruction::Nor { rd: 3, rs1: 1, rs2: 2 }, &[(1, 4)]);
        assert_eq!(regs.read(3), 0);
    }

    #[test]
    fn shifts_mask_amount() {
        let (regs, _) = run(Instruction::Sll { rd: 3, rs1: 1, rs2: 2 }, &[(1, 1), (2, 33)]);
        assert_eq!(regs.read(3), 2);
        let (regs, _) = run(Instruction::Sra { rd: 3, rs1: 1, rs2: 2 }, &[(1, -16), (2, 2)]);
        assert_eq!(regs.read(3), -4);
        let (regs, _) = run(Instruction::Sla { rd: 3, rs1: 1, rs2: 2 }, &[(1, 3), (2, 4)]);
        assert_eq!(regs.read(3), 48);
    }

    #[test]
    fn slt_is_signed() {
        let (regs, _) = run(Instruction::Slt { rd: 3, rs1: 1, rs2: 2 }, &[(1, -1), (2, 1)]);
        assert_eq!(regs.read(3), 1);
        let (regs, _) = run(Instruction::Slti { rd: 3, rs1: 1, imm: -5 }, &[(1, -1)]);
        assert_eq!(regs.read(3), 0);
    }

    #[test]
    fn writes_to_x0_are_dropped() {
        let (regs, _) = run(Instruction::Addi { rd: 0, rs1: 1, imm: 1 }, &[(1, 9)]);
        assert_eq!(regs.x[0], 0);
    }

    #[test]
    fn sb_keeps_low_byte_only() {
        let (_, mem) = run(Instruction::Sb { rs2: 3, rs1: 1, imm: 1 }, &[(1, 10), (3, 0x1234)]);
        assert_eq!(mem.get(11), 0x34);
        assert_eq!(mem.get(12), 0);
        assert_eq!(mem.len(), 1);
    }

    #[test]
    fn lb_sign_extends() {
        let mut regs = Registers::new();
        let mut mem = SparseMemory::default();
        mem.store8(-4, 0x80);
        mem.store8(-3, 0x7F);
        execute(Instruction::Lb { rd: 5, rs1: 0, imm: -4 }, &mut regs, &mut mem);
        execute(Instruction::Lb { rd: 6, rs1: 0, imm: -3 }, &mut regs, &mut mem);
        assert_eq!(regs.read(5), -128);
        assert_eq!(regs.read(6), 127);
    }

    #[test]
    fn negative_offset_addresses_below_base() {
        let mut regs = Registers::new();
        let mut mem = SparseMemory::default();
        regs.write(1, 100);
        regs.write(2, -559038737); // 0xDEADBEEF
        execute(Instruction::Sw { rs2: 2, rs1: 1, imm: -8 }, &mut regs, &mut mem);
        assert_eq!(mem.load32(92), 0xDEAD_BEEF);
        execute(Instruction::Lw { rd: 3, rs1: 1, imm: -8 }, &mut regs, &mut mem);
        assert_eq!(regs.read(3), -559038737);
    }
}
