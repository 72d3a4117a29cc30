use super::memory::DEFAULT_BUCKETS;

/// Interpreter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsaConfig {
    /// Number of hash buckets in the sparse memory. Fixed for the session.
    pub bucket_count: usize,
    /// Also accept `nor` and `sla` as register-type mnemonics.
    pub extended: bool,
}

impl Default for IsaConfig {
    fn default() -> Self {
        Self { bucket_count: DEFAULT_BUCKETS, extended: false }
    }
}
