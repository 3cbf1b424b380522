//! Kinematic and lifetime initers

use super::{Initer, IniterKind};
use crate::emitter::EmitterView;
use crate::particle::Particle;
use crate::rand::RandomSource;
use spark_core::Vec2;

/// Adds a velocity sampled per axis from `[min, max)`. When the particle
/// already has a rotation the sample is rotated with it.
#[derive(Debug, Clone)]
pub struct Velocity {
    pub min: Vec2,
    pub max: Vec2,
}

impl Velocity {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

impl Initer for Velocity {
    fn kind(&self) -> IniterKind {
        IniterKind::Velocity
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        let mut v = Vec2::new(
            rng.range(self.min.x, self.max.x),
            rng.range(self.min.y, self.max.y),
        );
        if particle.rotation != 0.0 {
            v = v.rotated(particle.rotation);
        }
        particle.velocity += v;
    }
}

/// Adds to lifetime, so several of these stack
#[derive(Debug, Clone)]
pub struct LifeTime {
    pub range_start: f32,
    pub range_end: f32,
}

impl LifeTime {
    pub fn new(range_start: f32, range_end: f32) -> Self {
        Self {
            range_start,
            range_end,
        }
    }
}

impl Initer for LifeTime {
    fn kind(&self) -> IniterKind {
        IniterKind::LifeTime
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        particle.lifetime += rng.range(self.range_start, self.range_end);
    }
}

/// Adds rotational velocity in radians per second
#[derive(Debug, Clone)]
pub struct RotationVelocity {
    pub start: f32,
    pub end: f32,
}

impl RotationVelocity {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

impl Initer for RotationVelocity {
    fn kind(&self) -> IniterKind {
        IniterKind::RotationVelocity
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        particle.rotation_velocity += rng.range(self.start, self.end);
    }
}

/// Adds rotation in radians
#[derive(Debug, Clone)]
pub struct Rotation {
    pub start: f32,
    pub end: f32,
}

impl Rotation {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn from_degrees(start: f32, end: f32) -> Self {
        Self::new(start.to_radians(), end.to_radians())
    }
}

impl Initer for Rotation {
    fn kind(&self) -> IniterKind {
        IniterKind::Rotation
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        particle.rotation += rng.range(self.start, self.end);
    }
}

/// Sets scale. Y is drawn separately unless `linked`.
#[derive(Debug, Clone)]
pub struct Scale {
    pub start: f32,
    pub end: f32,
    pub linked: bool,
}

impl Scale {
    pub fn new(start: f32, end: f32, linked: bool) -> Self {
        Self { start, end, linked }
    }

    pub fn uniform(start: f32, end: f32) -> Self {
        Self::new(start, end, true)
    }
}

impl Initer for Scale {
    fn kind(&self) -> IniterKind {
        IniterKind::Scale
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        let x = rng.range(self.start, self.end);
        let y = if self.linked {
            x
        } else {
            rng.range(self.start, self.end)
        };
        particle.scale = Vec2::new(x, y);
    }
}

/// Sets mass, read by `Friction`
#[derive(Debug, Clone)]
pub struct Mass {
    pub start: f32,
    pub end: f32,
}

impl Mass {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

impl Initer for Mass {
    fn kind(&self) -> IniterKind {
        IniterKind::Mass
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        particle.mass = rng.range(self.start, self.end);
    }
}

/// Sets the collision radius consumers use for hit tests
#[derive(Debug, Clone)]
pub struct CollisionRadius {
    pub radius: f32,
}

impl CollisionRadius {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Initer for CollisionRadius {
    fn kind(&self) -> IniterKind {
        IniterKind::CollisionRadius
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        _rng: &mut dyn RandomSource,
    ) {
        particle.collision_radius = self.radius;
    }
}
