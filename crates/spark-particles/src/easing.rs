//! Energy curves: map a particle's age against its lifetime to remaining energy
//!
//! Every curve follows the classical Penner easing equations evaluated with
//! a start value of 1 and a change of -1, so energy leaves 1.0 at birth and
//! arrives at 0.0 when age reaches lifetime. Elastic curves overshoot that
//! range mid-life and are left unclamped.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Easing family used by the `Age` modifier to derive energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
}

impl Easing {
    /// Energy remaining for a particle of `age` seconds out of `lifetime`.
    /// Lifetimes of zero or less have no energy.
    pub fn energy(&self, age: f32, lifetime: f32) -> f32 {
        if lifetime <= 0.0 {
            return 0.0;
        }
        let t = age.clamp(0.0, lifetime);
        let (b, c, d) = (1.0, -1.0, lifetime);
        match self {
            Easing::Linear => c * t / d + b,
            Easing::QuadIn => quad_in(t, b, c, d),
            Easing::QuadOut => quad_out(t, b, c, d),
            Easing::QuadInOut => quad_in_out(t, b, c, d),
            Easing::ElasticIn => elastic_in(t, b, c, d),
            Easing::ElasticOut => elastic_out(t, b, c, d),
            Easing::ElasticInOut => elastic_in_out(t, b, c, d),
        }
    }
}

fn quad_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t + b
}

fn quad_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

fn quad_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    let t = t - 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

fn elastic_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = d * 0.3;
    let (a, s) = (c, p / 4.0);
    let t = t - 1.0;
    -(a * 2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin()) + b
}

fn elastic_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = d * 0.3;
    let (a, s) = (c, p / 4.0);
    a * 2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() + c + b
}

fn elastic_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d / 2.0);
    if t == 2.0 {
        return b + c;
    }
    let p = d * (0.3 * 1.5);
    let (a, s) = (c, p / 4.0);
    let t = t - 1.0;
    if t < 0.0 {
        return -0.5 * (a * 2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin()) + b;
    }
    a * 2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() * 0.5 + c + b
}
