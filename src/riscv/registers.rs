// riscv/registers.rs

pub const REGISTER_COUNT: usize = 32;

/// Integer register file, `x0..x31`. `x0` always reads as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    pub x: [i32; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline] pub fn read(&self, r: u8) -> i32 { if r == 0 { 0 } else { self.x[r as usize] } }
    #[inline] pub fn write(&mut self, r: u8, v: i32) { if r != 0 { self.x[r as usize] = v; } }

    /// Forces `x0` back to zero, whatever the caller poked into it.
    #[inline]
    pub fn clear_zero(&mut self) {
        self.x[0] = 0;
    }
}
