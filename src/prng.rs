//! Small-state uniform PRNG used by the Monte Carlo equity engine and the
//! deck sampler.
//!
//! Wraps a xorshift-family generator (`Xoshiro256PlusPlus`) rather than
//! reaching for `rand::thread_rng()` directly, so that seeding is explicit and
//! a single `Prng` instance can be threaded through a whole equity query
//! without touching any shared, thread-local state.

use rand::rngs::OsRng;
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// A thread-local-by-construction uniform PRNG.
///
/// Never share one `Prng` across threads: nothing in this crate makes that
/// safe to do concurrently (see spec's concurrency model — each worker should
/// hold its own instance).
pub struct Prng {
    inner: Xoshiro256PlusPlus,
}

impl Prng {
    /// Seeds a new generator from OS entropy.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Prng {
            inner: Xoshiro256PlusPlus::from_seed(seed),
        }
    }

    /// Seeds a new generator deterministically, for reproducible tests.
    pub fn from_seed(seed: u64) -> Self {
        Prng {
            inner: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Returns a uniform float in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        // 53 bits of mantissa precision, the usual trick for uniform doubles.
        let hi = (self.inner.next_u64() >> 11) as f64;
        hi * (1.0 / (1u64 << 53) as f64)
    }

    /// Returns a uniform integer in `0..n`, without modulo bias.
    ///
    /// Uses rejection sampling against the smallest power-of-two range that
    /// covers `n`: draw a `u32`, mask it down to that range, and retry if the
    /// masked value falls outside `0..n`.
    pub fn randint(&mut self, n: u32) -> u32 {
        assert!(n > 0, "randint requires n > 0");
        if n == 1 {
            return 0;
        }
        let mask = (n - 1).next_power_of_two() - 1;
        loop {
            let candidate = self.inner.next_u32() & mask;
            if candidate < n {
                return candidate;
            }
        }
    }
}

impl Default for Prng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stays_in_unit_interval() {
        let mut rng = Prng::from_seed(42);
        for _ in 0..10_000 {
            let r = rng.random();
            assert!((0.0..1.0).contains(&r), "out of range: {}", r);
        }
    }

    #[test]
    fn randint_respects_bound() {
        let mut rng = Prng::from_seed(7);
        for _ in 0..10_000 {
            let r = rng.randint(52);
            assert!(r < 52);
        }
    }

    #[test]
    fn randint_one_is_always_zero() {
        let mut rng = Prng::from_seed(1);
        for _ in 0..100 {
            assert_eq!(rng.randint(1), 0);
        }
    }

    #[test]
    fn randint_is_roughly_uniform_fast() {
        // A cheap sanity check; the spec's literal 10^7-sample / 1000-bin
        // tolerance test is `uniformity_within_spec_tolerance` below (ignored
        // by default, since it takes a while).
        let mut rng = Prng::from_seed(99);
        let bins = 50;
        let samples = 200_000;
        let mut counts = vec![0u32; bins];
        for _ in 0..samples {
            counts[rng.randint(bins as u32) as usize] += 1;
        }
        let expected = samples as f64 / bins as f64;
        for (i, &c) in counts.iter().enumerate() {
            let deviation = (c as f64 - expected).abs() / expected;
            assert!(
                deviation < 0.1,
                "bin {} deviated {:.3} from expected {}",
                i,
                deviation,
                expected
            );
        }
    }

    #[test]
    #[ignore]
    fn uniformity_within_spec_tolerance() {
        // 10^7 calls to randint(1000): per-bin counts should stay within
        // ~450 of the expected 10^4.
        let mut rng = Prng::from_seed(2024);
        let bins = 1000;
        let samples = 10_000_000;
        let mut counts = vec![0u32; bins];
        for _ in 0..samples {
            counts[rng.randint(bins as u32) as usize] += 1;
        }
        let expected = samples as f64 / bins as f64;
        for (i, &c) in counts.iter().enumerate() {
            assert!(
                (c as f64 - expected).abs() < 450.0,
                "bin {} = {}, expected ~{}",
                i,
                c,
                expected
            );
        }
    }

    #[test]
    #[ignore]
    fn deck_sized_draws_within_spec_tolerance() {
        // 36500 * 52 calls to randint(52): counts should land within 1000 of
        // the expected 36500.
        let mut rng = Prng::from_seed(55);
        let samples = 36_500 * 52;
        let mut counts = vec![0u32; 52];
        for _ in 0..samples {
            counts[rng.randint(52) as usize] += 1;
        }
        for (i, &c) in counts.iter().enumerate() {
            assert!(
                (c as i64 - 36_500).unsigned_abs() < 1000,
                "card {} drawn {} times",
                i,
                c
            );
        }
    }
}
