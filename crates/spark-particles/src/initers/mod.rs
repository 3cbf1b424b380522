//! Spawn-time property setters
//!
//! Initers run once per new particle, after the factory reset and after the
//! emitter has stamped its own position onto the particle. Most of them *add*
//! to what is already there (position, velocity, rotation, lifetime), so
//! several initers can stack contributions on the same field.

mod animation;
mod appearance;
mod motion;
mod position;

pub use animation::{FrameAnimation, RandomFrameAnimation};
pub use appearance::{Alpha, BlendModeIniter, FixedOrderColor, RandomColor};
pub use motion::{CollisionRadius, LifeTime, Mass, Rotation, RotationVelocity, Scale, Velocity};
pub use position::{CirclePosition, RectPosition};

use crate::emitter::EmitterView;
use crate::particle::Particle;
use crate::rand::RandomSource;

/// Identity an initer registers under, used for lookup and removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IniterKind {
    CirclePosition,
    RectPosition,
    Alpha,
    BlendMode,
    Velocity,
    LifeTime,
    RotationVelocity,
    Rotation,
    Scale,
    Mass,
    CollisionRadius,
    FrameAnimation,
    RandomFrameAnimation,
    RandomColor,
    FixedOrderColor,
    /// Application-defined initer
    Custom(&'static str),
}

/// Sets a new particle's starting properties
pub trait Initer {
    fn kind(&self) -> IniterKind;

    fn init(&mut self, emitter: &EmitterView, particle: &mut Particle, rng: &mut dyn RandomSource);

    /// Called once per blast, before the blast's particles are created
    fn on_blast(&mut self, _emitter: &EmitterView, _count: u32, _rng: &mut dyn RandomSource) {}
}
