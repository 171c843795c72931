//! `RND`/`RANDOMIZE`/`RNDSEED` (spec.md §4.D, §4.E).
//!
//! The PRNG algorithm itself is core-language behavior, not an external collaborator — only its
//! entropy source is (`RANDOMIZE` asks [`crate::shims::Clock::free_running_seed`]). Grounded on
//! the `rand` dependency pulled in from the example pack's other emulator-class manifests (see
//! `DESIGN.md`).

use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng};

pub struct Rng {
    inner: SmallRng,
}

impl Rng {
    /// Cold-start seed. Deterministic until `RANDOMIZE`/`RNDSEED` reseed it, same as the
    /// firmware's PRNG starts from a fixed state until explicitly seeded.
    pub fn new() -> Self {
        Rng {
            inner: SmallRng::seed_from_u64(0),
        }
    }

    pub fn seed(&mut self, seed: u32) {
        self.inner = SmallRng::seed_from_u64(u64::from(seed));
    }

    /// `RND(n)`: uniform in `[0, n)` for `n > 0`. (E4) `n <= 0` is an undefined case per
    /// spec.md §9; this implementation returns `0`, documented in `DESIGN.md`.
    pub fn next_in_range(&mut self, n: i16) -> i16 {
        if n <= 0 {
            0
        } else {
            self.inner.gen_range(0..n)
        }
    }
}

impl Default for Rng {
    fn default() -> Self {
        Rng::new()
    }
}
