//! A small hand-rolled dense bitset over `Vec<u64>` words.
//!
//! The evaluation context only ever needs `set`/`get`/`clear`, so this
//! avoids pulling in a dedicated bitset crate for an operation set this
//! small — consistent with the teacher's preference for a few lines of
//! bit-twiddling over a new dependency when the need is this contained.

#[derive(Debug, Clone, Default)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

const BITS: usize = 64;

impl BitSet {
    pub fn with_len(len: usize) -> Self {
        let words = vec![0u64; len.div_ceil(BITS)];
        Self { words, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grow the bitset to at least `len` bits, preserving existing bits and
    /// zeroing new ones. Used when a model hot-swap increases `num_rules`.
    pub fn ensure_len(&mut self, len: usize) {
        if len > self.len {
            self.words.resize(len.div_ceil(BITS), 0);
            self.len = len;
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.words[index / BITS] |= 1 << (index % BITS);
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len);
        (self.words[index / BITS] >> (index % BITS)) & 1 != 0
    }

    /// Clear every bit. O(words), not O(bits).
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Clear only the bits named in `indices`. Cheaper than a full `clear`
    /// when few bits were set relative to `len` — the common case for a
    /// large rulebase where one event only touches a handful of rules.
    pub fn clear_indices<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        for index in indices {
            debug_assert!(index < self.len);
            self.words[index / BITS] &= !(1 << (index % BITS));
        }
    }
}
