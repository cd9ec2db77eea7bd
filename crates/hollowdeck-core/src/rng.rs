//! Deterministic pseudo-random streams.
//!
//! Every stochastic decision in the engine draws from a [`Mulberry32`]
//! stream: a fast 32-bit mixing recurrence with no cryptographic ambition.
//! The point is reproducibility (the same seed always replays the same
//! visual sequence) and isolation: each animated node and each scheduler
//! owns its private stream, with no hidden shared state between them.

/// 32-bit mixing PRNG producing floats in `[0, 1)`.
///
/// Same seed ⇒ identical sequence. State is a single 32-bit counter;
/// cloning a stream forks its future draws.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Stream seeded from an explicit 32-bit value.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Stream seeded from a text label via [`hash_label`].
    pub fn from_label(label: &str) -> Self {
        Self::new(hash_label(label))
    }

    /// Non-reproducible stream seeded from OS entropy.
    ///
    /// Used by the scheduler streams, where replay is not a goal.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Next raw 32-bit draw.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut r = self.state;
        r = (r ^ (r >> 15)).wrapping_mul(r | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform draw in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index in `[0, n)`. Returns 0 for an empty domain.
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let i = (self.next_f64() * n as f64) as usize;
        i.min(n - 1)
    }

    /// Uniform element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// FNV-1a 32-bit hash: maps an arbitrary label to a seed deterministically.
pub fn hash_label(label: &str) -> u32 {
    let mut h: u32 = 2_166_136_261;
    for b in label.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16_777_619);
    }
    h
}
