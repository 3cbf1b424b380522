//! Random sources for spawn-time and per-frame draws

use std::f32::consts::TAU;

/// Uniform random draws in [0, 1). Every stochastic component takes one of these,
/// so simulations can be replayed by injecting a seeded source.
pub trait RandomSource {
    /// Returns a float in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Returns a float in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an integer in [min, max], both ends inclusive
    fn range_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        min + ((self.next_f32() * span) as u32).min(max - min)
    }

    /// Returns an angle in [0, 2π)
    fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }
}

/// Seedable xorshift32 generator
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for ParticleRng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Replays a fixed list of draws, cycling when exhausted. Handy for pinning
/// exact spawn layouts in tests.
pub struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRng {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!(v >= 0.0 && v < 10.0);
        }
    }

    #[test]
    fn rng_is_deterministic_per_seed() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn zero_seed_still_produces_values() {
        let mut rng = ParticleRng::new(0);
        let first = rng.next_f32();
        let second = rng.next_f32();
        assert_ne!(first, second);
    }

    #[test]
    fn range_int_is_inclusive() {
        let mut rng = ScriptedRng::new(vec![0.0, 0.999_999, 0.5]);
        assert_eq!(rng.range_int(3, 5), 3);
        assert_eq!(rng.range_int(3, 5), 5);
        assert_eq!(rng.range_int(3, 5), 4);
        assert_eq!(rng.range_int(4, 4), 4);
    }

    #[test]
    fn scripted_rng_cycles() {
        let mut rng = ScriptedRng::new(vec![0.25, 0.75]);
        assert_eq!(rng.next_f32(), 0.25);
        assert_eq!(rng.next_f32(), 0.75);
        assert_eq!(rng.next_f32(), 0.25);
    }
}
