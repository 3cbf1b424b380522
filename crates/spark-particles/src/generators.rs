//! Spawn-timing strategies: how many particles an emitter creates per tick

use crate::rand::RandomSource;
use spark_core::{Result, SparkError};

/// Spawn request for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emission {
    pub count: u32,
    /// The count comes from a blast; initers get `on_blast` before creation
    pub blast: bool,
}

impl Emission {
    pub const NONE: Self = Self {
        count: 0,
        blast: false,
    };

    pub fn steady(count: u32) -> Self {
        Self {
            count,
            blast: false,
        }
    }

    pub fn blast(count: u32) -> Self {
        Self { count, blast: true }
    }
}

/// Decides spawn counts for one emitter
pub trait Generator {
    /// Reset timing state and return the number of particles to create immediately
    fn start_emitter(&mut self, rng: &mut dyn RandomSource) -> u32;

    /// Advance timing by `elapsed` seconds and return this tick's spawn request
    fn spawn_particles(&mut self, elapsed: f32, rng: &mut dyn RandomSource) -> Emission;

    /// Arm a one-shot burst. Only meaningful for burst-capable generators.
    fn blast(&mut self) {}
}

/// Upper bound on random draws a single frame makes while catching up
const MAX_CATCH_UP_DRAWS: u32 = 4096;

/// Whole intervals needed to lift `time_to_next` above zero
fn intervals_due(time_to_next: f64, interval: f64) -> f64 {
    if time_to_next > 0.0 {
        0.0
    } else {
        (-time_to_next / interval).floor() + 1.0
    }
}

fn saturate(count: f64) -> u32 {
    count.clamp(0.0, u32::MAX as f64) as u32
}

/// Fixed rate in particles per second. Fractional time carries across ticks.
#[derive(Debug, Clone)]
pub struct Steady {
    rate: f32,
    interval: f64,
    time_to_next: f64,
}

impl Steady {
    pub fn new(rate: f32) -> Self {
        let interval = if rate > 0.0 { 1.0 / rate as f64 } else { 0.0 };
        Self {
            rate,
            interval,
            time_to_next: interval,
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Generator for Steady {
    fn start_emitter(&mut self, _rng: &mut dyn RandomSource) -> u32 {
        self.time_to_next = self.interval;
        0
    }

    fn spawn_particles(&mut self, elapsed: f32, _rng: &mut dyn RandomSource) -> Emission {
        if self.rate <= 0.0 || self.interval <= 0.0 {
            return Emission::NONE;
        }
        self.time_to_next -= elapsed as f64;
        let due = intervals_due(self.time_to_next, self.interval);
        self.time_to_next += due * self.interval;
        Emission::steady(saturate(due))
    }
}

/// Spawns only when blasted, with a count drawn uniformly from an inclusive range
#[derive(Debug, Clone)]
pub struct Blast {
    count_start: u32,
    count_end: u32,
    auto_blast: bool,
    armed: bool,
}

impl Blast {
    pub fn new(count_start: u32, count_end: u32) -> Result<Self> {
        if count_start > count_end {
            return Err(SparkError::InvalidConfig(format!(
                "blast count range {count_start}..={count_end} is reversed"
            )));
        }
        Ok(Self {
            count_start,
            count_end,
            auto_blast: false,
            armed: false,
        })
    }

    /// Arm a blast as soon as the emitter starts
    pub fn with_auto_blast(mut self, auto_blast: bool) -> Self {
        self.auto_blast = auto_blast;
        self
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Generator for Blast {
    fn start_emitter(&mut self, _rng: &mut dyn RandomSource) -> u32 {
        if self.auto_blast {
            self.armed = true;
        }
        0
    }

    fn spawn_particles(&mut self, _elapsed: f32, rng: &mut dyn RandomSource) -> Emission {
        if !self.armed {
            return Emission::NONE;
        }
        self.armed = false;
        Emission::blast(rng.range_int(self.count_start, self.count_end))
    }

    fn blast(&mut self) {
        self.armed = true;
    }
}

/// Bursts every `interval` seconds.
///
/// Each elapsed interval adds `(count_end - count_start) * random * count_start`
/// to the burst, which is not a uniform draw from the count range.
#[derive(Debug, Clone)]
pub struct Pulse {
    interval: f32,
    count_start: f32,
    count_end: f32,
    initial_pulse: bool,
    time_to_next: f64,
}

impl Pulse {
    pub fn new(interval: f32, count_start: u32, count_end: u32) -> Self {
        Self {
            interval,
            count_start: count_start as f32,
            count_end: count_end as f32,
            initial_pulse: false,
            time_to_next: interval as f64,
        }
    }

    /// Fire a pulse from `start_emitter`
    pub fn with_initial_pulse(mut self, initial_pulse: bool) -> Self {
        self.initial_pulse = initial_pulse;
        self
    }

    fn pulse_size(&self, rng: &mut dyn RandomSource) -> f32 {
        (self.count_end - self.count_start) * rng.next_f32() * self.count_start
    }
}

impl Generator for Pulse {
    fn start_emitter(&mut self, rng: &mut dyn RandomSource) -> u32 {
        self.time_to_next = self.interval as f64;
        if self.initial_pulse {
            self.pulse_size(rng).max(0.0) as u32
        } else {
            0
        }
    }

    fn spawn_particles(&mut self, elapsed: f32, rng: &mut dyn RandomSource) -> Emission {
        if self.interval <= 0.0 {
            return Emission::NONE;
        }
        let interval = self.interval as f64;
        self.time_to_next -= elapsed as f64;
        let due = intervals_due(self.time_to_next, interval);
        self.time_to_next += due * interval;
        if due == 0.0 {
            return Emission::NONE;
        }

        // Past the draw limit the sampled intervals stand in for the rest
        let drawn = due.min(MAX_CATCH_UP_DRAWS as f64);
        let mut sum = 0.0f64;
        for _ in 0..drawn as u32 {
            sum += self.pulse_size(rng) as f64;
        }
        Emission::steady(saturate(sum * due / drawn))
    }
}

/// Like `Steady`, but the rate is redrawn from `[rate_start, rate_end)` after
/// every particle.
#[derive(Debug, Clone)]
pub struct SteadyRandom {
    rate_start: f32,
    rate_end: f32,
    rate: f32,
    time_to_next: f64,
}

impl SteadyRandom {
    pub fn new(rate_start: f32, rate_end: f32) -> Self {
        Self {
            rate_start,
            rate_end,
            rate: 0.0,
            time_to_next: 0.0,
        }
    }

    pub fn current_rate(&self) -> f32 {
        self.rate
    }
}

impl Generator for SteadyRandom {
    fn start_emitter(&mut self, rng: &mut dyn RandomSource) -> u32 {
        self.rate = rng.range(self.rate_start, self.rate_end);
        self.time_to_next = if self.rate > 0.0 { 1.0 / self.rate as f64 } else { 0.0 };
        0
    }

    fn spawn_particles(&mut self, elapsed: f32, rng: &mut dyn RandomSource) -> Emission {
        if self.rate <= 0.0 && self.rate_start <= 0.0 && self.rate_end <= 0.0 {
            return Emission::NONE;
        }
        self.time_to_next -= elapsed as f64;
        let mut count = 0u32;
        while self.time_to_next <= 0.0 {
            count = count.saturating_add(1);
            self.rate = rng.range(self.rate_start, self.rate_end);
            if self.rate <= 0.0 {
                break;
            }
            let interval = 1.0 / self.rate as f64;
            self.time_to_next += interval;
            if count >= MAX_CATCH_UP_DRAWS {
                // Finish a very long frame at the last drawn rate
                let due = intervals_due(self.time_to_next, interval);
                self.time_to_next += due * interval;
                count = count.saturating_add(saturate(due));
                break;
            }
        }
        Emission::steady(count)
    }
}
