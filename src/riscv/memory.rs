// riscv/memory.rs
use super::errors::InterpError;
use super::list::LinkedList;
use tracing::trace;

pub const DEFAULT_BUCKETS: usize = 1024;

/// Byte-addressable view of memory used by the executor.
///
/// Every cell holds one byte. Words are little-endian and address
/// arithmetic wraps at 32 bits.
pub trait Bus {
    fn load8(&self, addr: i32) -> u8;
    fn store8(&mut self, addr: i32, value: u8);

    fn load32(&self, addr: i32) -> u32 {
        let mut bytes = [0u8; 4];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = self.load8(addr.wrapping_add(i as i32));
        }
        u32::from_le_bytes(bytes)
    }

    fn store32(&mut self, addr: i32, value: u32) {
        for (i, b) in value.to_le_bytes().into_iter().enumerate() {
            self.store8(addr.wrapping_add(i as i32), b);
        }
    }
}

/// Sparse memory: a fixed number of hash buckets keyed by address.
pub struct SparseMemory {
    buckets: Vec<LinkedList>,
}

impl SparseMemory {
    pub fn new(bucket_count: usize) -> Result<Self, InterpError> {
        if bucket_count == 0 {
            return Err(InterpError::Config("bucket count must be positive"));
        }
        let buckets = (0..bucket_count).map(|_| LinkedList::new()).collect();
        Ok(Self { buckets })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    // |addr| mod n; unsigned_abs keeps i32::MIN in range (2^31)
    #[inline]
    fn bucket_of(&self, addr: i32) -> usize {
        addr.unsigned_abs() as usize % self.buckets.len()
    }

    pub fn put(&mut self, addr: i32, value: i32) {
        let idx = self.bucket_of(addr);
        self.buckets[idx].insert_or_update(addr, value);
    }

    pub fn get(&self, addr: i32) -> i32 {
        self.buckets[self.bucket_of(addr)].get(addr)
    }

    /// Number of distinct addresses ever written.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(LinkedList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(LinkedList::is_empty)
    }

    /// All written cells, sorted by address.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let mut cells: Vec<(i32, i32)> = self.buckets.iter().flat_map(LinkedList::iter).collect();
        cells.sort_unstable_by_key(|&(addr, _)| addr);
        cells
    }
}

impl Default for SparseMemory {
    fn default() -> Self {
        Self {
            buckets: (0..DEFAULT_BUCKETS).map(|_| LinkedList::new()).collect(),
        }
    }
}

impl Bus for SparseMemory {
    fn load8(&self, addr: i32) -> u8 {
        let v = self.get(addr) as u8;
        trace!(addr, value = v, "load8");
        v
    }

    fn store8(&mut self, addr: i32, value: u8) {
        trace!(addr, value, "store8");
        self.put(addr, i32::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_buckets_rejected() {
        assert!(matches!(SparseMemory::new(0), Err(InterpError::Config(_))));
    }

    #[test]
    fn unwritten_reads_zero() {
        let mem = SparseMemory::new(16).unwrap();
        assert_eq!(mem.get(0), 0);
        assert_eq!(mem.get(-1), 0);
        assert_eq!(mem.load32(1000), 0);
        assert!(mem.is_empty());
    }

    #[test]
    fn sign_twins_share_bucket_but_not_value() {
        let mut mem = SparseMemory::new(8).unwrap();
        mem.put(5, 1);
        mem.put(-5, 2);
        assert_eq!(mem.bucket_of(5), mem.bucket_of(-5));
        assert_eq!(mem.get(5), 1);
        assert_eq!(mem.get(-5), 2);
        assert_eq!(mem.len(), 2);
    }

    #[test]
    fn min_address_is_hashable() {
        let mut mem = SparseMemory::new(DEFAULT_BUCKETS).unwrap();
        assert_eq!(mem.bucket_of(i32::MIN), (1usize << 31) % DEFAULT_BUCKETS);
        mem.store8(i32::MIN, 0xAB);
        assert_eq!(mem.load8(i32::MIN), 0xAB);
    }

    #[test]
    fn word_is_little_endian() {
        let mut mem = SparseMemory::default();
        mem.store32(100, 0x0102_0304);
        assert_eq!(mem.get(100), 0x04);
        assert_eq!(mem.get(101), 0x03);
        assert_eq!(mem.get(102), 0x02);
        assert_eq!(mem.get(103), 0x01);
        assert_eq!(mem.load32(100), 0x0102_0304);
        assert_eq!(mem.len(), 4);
    }

    #[test]
    fn word_wraps_around_address_space() {
        let mut mem = SparseMemory::default();
        mem.store32(i32::MAX - 1, 0xDEAD_BEEF);
        assert_eq!(mem.load8(i32::MIN), 0xAD);
        assert_eq!(mem.load8(i32::MIN + 1), 0xDE);
        assert_eq!(mem.load32(i32::MAX - 1), 0xDEAD_BEEF);
    }

    #[test]
    fn cells_sorted_by_address() {
        let mut mem = SparseMemory::new(4).unwrap();
        mem.put(9, 1);
        mem.put(-3, 2);
        mem.put(4, 3);
        assert_eq!(mem.cells(), vec![(-3, 2), (4, 3), (9, 1)]);
    }

    proptest! {
        #[test]
        fn put_get_round_trip(addr in any::<i32>(), v in 0i32..256) {
            let mut mem = SparseMemory::new(64).unwrap();
            mem.put(addr, v);
            prop_assert_eq!(mem.get(addr), v);
        }

        #[test]
        fn len_counts_distinct_addresses(addrs in prop::collection::hash_set(any::<i32>(), 0..128)) {
            let mut mem = SparseMemory::new(32).unwrap();
            for &a in &addrs {
                mem.put(a, 1);
                mem.put(a, 2);
            }
            prop_assert_eq!(mem.len(), addrs.len());
        }
    }
}
