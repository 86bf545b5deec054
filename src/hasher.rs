use std::hash::{BuildHasher, Hasher};

pub(crate) const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
pub(crate) const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit, optionally continuing from a previous hash.
pub(crate) const fn fnv1a_64(seed: Option<u64>, bytes: &[u8]) -> u64 {
    let mut hash = if let Some(seed) = seed { seed } else { FNV_OFFSET_BASIS };

    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }

    hash
}

/// The `17 * 23 + x` combinator used for node fingerprints.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fingerprint(u64);

impl Default for Fingerprint {
    #[inline]
    fn default() -> Self {
        Self(17)
    }
}

impl Fingerprint {
    #[inline]
    pub fn add(&mut self, value: u64) {
        self.0 = self.0.wrapping_mul(23).wrapping_add(value);
    }

    #[inline]
    pub fn add_bool(&mut self, value: bool) {
        self.add(value as u64);
    }

    #[inline]
    pub fn add_f64(&mut self, value: f64) {
        self.add(value.to_bits());
    }

    #[inline]
    pub fn finish(self) -> u64 {
        self.0
    }
}

/// Hashes keys that are already well distributed 64-bit hashes, such as [`crate::nodeid::NodeId`].
#[derive(Clone, Default)]
pub(crate) struct IdentityBuildHasher;

pub(crate) struct IdentityHasher(u64);

impl Default for IdentityHasher {
    #[inline]
    fn default() -> Self {
        Self(0)
    }
}

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.0 = i as u64;
    }

    // Fallback to FNV-1a 64-bit. This should never be called.
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        debug_assert!(false);
        self.0 = fnv1a_64(None, bytes);
    }
}

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}
