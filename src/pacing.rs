//! Randomized pacing delays between actions.
//!
//! Delays are drawn uniformly from a band so input timing never repeats
//! exactly. The exact distribution is not a contract; scale 0 turns every
//! delay into a no-op.

use crate::config::PacingConfig;
use crate::geometry::{Point, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;

pub struct Pacer {
    scale: f32,
    rng: StdRng,
}

impl Pacer {
    pub fn new(config: &PacingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            scale: config.scale,
            rng,
        }
    }

    /// Sleep somewhere in `[base, base + flex]` seconds.
    pub fn sleep(&mut self, base: f32, flex: f32) {
        let secs = if flex > 0.0 {
            self.rng.gen_range(base..=base + flex)
        } else {
            base
        };
        self.sleep_exact(secs);
    }

    /// Default short delay between two inputs.
    pub fn tick(&mut self) {
        self.sleep(0.4, 0.3);
    }

    pub fn touch_hold_ms(&mut self) -> u32 {
        self.rng.gen_range(50..=120)
    }

    pub fn jitter(&mut self, region: &Region) -> Point {
        region.random_point(&mut self.rng)
    }

    fn sleep_exact(&self, secs: f32) {
        let scaled = secs * self.scale;
        if scaled > 0.0 {
            thread::sleep(Duration::from_secs_f32(scaled));
        }
    }
}
