//! Random sources for lesson generation.
//!
//! Every generation request asks its provider for a fresh generator, so
//! concurrent requests never share random state.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Hands out a new generator for each lesson generation call.
pub trait RngProvider: Send + Sync {
    fn rng(&self) -> SmallRng;
}

/// Seeds every generator from the wall clock. Not suitable for anything
/// security sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSeeded;

impl RngProvider for ClockSeeded {
    fn rng(&self) -> SmallRng {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        // Fold the high bits in so the seed still changes every call
        #[allow(clippy::cast_possible_truncation)]
        let seed = (nanos as u64) ^ ((nanos >> 64) as u64);
        SmallRng::seed_from_u64(seed)
    }
}

/// Always hands out a generator seeded with the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedSeed(pub u64);

impl RngProvider for FixedSeed {
    fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.0)
    }
}
