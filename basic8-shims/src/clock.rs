//! `Clock` adapters (spec.md §5 "Suspension points", §6): `DELAY`'s busy-wait and `RANDOMIZE`'s
//! timer-derived PRNG seed.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use basic8::shims::Clock;

/// The real wall clock: `delay_ms` blocks the cooperative loop as spec.md §5 describes (`DELAY`
/// is one of the three suspension points), and `free_running_seed` reads system time the way the
/// reference hardware reads a free-running timer register.
#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn free_running_seed(&mut self) -> u32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0)
    }
}

/// A deterministic double for tests: `delay_ms` is a no-op (tests must not actually sleep) and
/// the seed is fixed at construction.
pub struct FixedClock {
    seed: u32,
}

impl FixedClock {
    pub fn new(seed: u32) -> FixedClock {
        FixedClock { seed }
    }
}

impl Clock for FixedClock {
    fn delay_ms(&mut self, _ms: u32) {}

    fn free_running_seed(&mut self) -> u32 {
        self.seed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_clock_returns_its_seed_every_time() {
        let mut clock = FixedClock::new(42);
        assert_eq!(clock.free_running_seed(), 42);
        assert_eq!(clock.free_running_seed(), 42);
    }

    #[test]
    fn fixed_clock_delay_does_not_block() {
        let mut clock = FixedClock::new(0);
        clock.delay_ms(u32::MAX);
    }
}
