//! Multiplicative string hash (`h = h * 33 + byte`, seeded at 5381).
//!
//! The table feeds raw key bytes to `Hasher::write`, so home indices computed
//! with this hasher are reproducible across runs and platforms.

use core::hash::{BuildHasher, Hasher};

/// Hasher state for the `h * 33 + byte` string hash. Arithmetic wraps at 64 bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Djb2Hasher {
    hash: u64,
}

impl Djb2Hasher {
    pub const SEED: u64 = 5381;

    pub const fn new() -> Self {
        Self { hash: Self::SEED }
    }
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = (self.hash << 5)
                .wrapping_add(self.hash)
                .wrapping_add(u64::from(b));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

/// Builder for [`Djb2Hasher`]; the default hasher of `StringTable`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Djb2BuildHasher;

impl BuildHasher for Djb2BuildHasher {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Djb2Hasher::new()
    }
}

/// Hash the raw bytes of `key` with a hasher built from `builder`.
///
/// `str`'s own `Hash` impl appends a terminator byte; going through `write`
/// directly keeps the result equal to the plain byte-wise hash.
#[inline]
pub(crate) fn hash_str<S: BuildHasher>(builder: &S, key: &str) -> u64 {
    let mut h = builder.build_hasher();
    h.write(key.as_bytes());
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_seed() {
        assert_eq!(hash_str(&Djb2BuildHasher, ""), 5381);
    }

    /// Invariant: matches the reference recurrence byte for byte.
    #[test]
    fn known_values() {
        // 5381 * 33 + 'a'
        assert_eq!(hash_str(&Djb2BuildHasher, "a"), 177_670);
        // (5381 * 33 + 'a') * 33 + 'b'
        assert_eq!(hash_str(&Djb2BuildHasher, "ab"), 5_863_208);

        let reference = |s: &str| {
            s.bytes().fold(5381u64, |h, b| {
                h.wrapping_mul(33).wrapping_add(u64::from(b))
            })
        };
        for s in ["", "x", "hello", "a much longer key that wraps around 64 bits"] {
            assert_eq!(hash_str(&Djb2BuildHasher, s), reference(s));
        }
    }

    #[test]
    fn split_writes_equal_single_write() {
        let mut a = Djb2Hasher::new();
        a.write(b"hel");
        a.write(b"lo");
        let mut b = Djb2Hasher::new();
        b.write(b"hello");
        assert_eq!(a.finish(), b.finish());
    }
}
