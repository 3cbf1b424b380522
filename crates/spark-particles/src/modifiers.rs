//! Per-frame particle modifiers
//!
//! An emitter applies its modifiers to each live particle in registration
//! order, so later modifiers see what earlier ones wrote this frame. Once a
//! modifier marks a particle dead the rest are skipped for that particle.

use crate::easing::{lerp_f32, Easing};
use crate::emitter::EmitterView;
use crate::particle::Particle;
use crate::rand::RandomSource;
use spark_core::Vec2;

/// Identity a modifier registers under, used for lookup and removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Accelerate,
    Friction,
    RandomDrift,
    SortY,
    TargetScale,
    TargetVelocity,
    Fade,
    Move,
    Rotate,
    Age,
    Animate,
    /// Application-defined modifier
    Custom(&'static str),
}

/// Mutates one live particle per frame
pub trait Modifier {
    fn kind(&self) -> ModifierKind;

    fn update(
        &mut self,
        emitter: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        rng: &mut dyn RandomSource,
    );
}

/// Constant acceleration
#[derive(Debug, Clone)]
pub struct Accelerate {
    pub acceleration: Vec2,
}

impl Accelerate {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            acceleration: Vec2::new(x, y),
        }
    }
}

impl Modifier for Accelerate {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Accelerate
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.velocity += self.acceleration * elapsed;
    }
}

/// Drag that scales with speed and mass. Never reverses a particle.
#[derive(Debug, Clone)]
pub struct Friction {
    pub drag: f32,
}

impl Friction {
    pub fn new(drag: f32) -> Self {
        Self { drag }
    }
}

impl Modifier for Friction {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Friction
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        let speed = particle.velocity.length();
        if speed == 0.0 || particle.mass == 0.0 {
            return;
        }
        let slowdown = self.drag * elapsed * particle.mass * speed;
        let scale = (speed - slowdown) / speed;
        if scale <= 0.0 {
            particle.velocity = Vec2::ZERO;
        } else {
            particle.velocity = particle.velocity * scale;
        }
    }
}

/// Random velocity noise plus a constant bias, both per second
#[derive(Debug, Clone)]
pub struct RandomDrift {
    pub drift: Vec2,
    pub bias: Vec2,
}

impl RandomDrift {
    pub fn new(drift: Vec2, bias: Vec2) -> Self {
        Self { drift, bias }
    }
}

impl Modifier for RandomDrift {
    fn kind(&self) -> ModifierKind {
        ModifierKind::RandomDrift
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        rng: &mut dyn RandomSource,
    ) {
        let noise = Vec2::new(
            rng.range(-self.drift.x, self.drift.x),
            rng.range(-self.drift.y, self.drift.y),
        );
        particle.velocity += noise * elapsed + self.bias * elapsed;
    }
}

/// Writes `position.y + offset` into `sort_value` for the renderer
#[derive(Debug, Clone, Default)]
pub struct SortY {
    pub offset: f32,
}

impl SortY {
    pub fn new(offset: f32) -> Self {
        Self { offset }
    }
}

impl Modifier for SortY {
    fn kind(&self) -> ModifierKind {
        ModifierKind::SortY
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        _elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.sort_value = particle.position.y + self.offset;
    }
}

/// Eases scale toward a target: `scale += (target - scale) * rate * elapsed`
#[derive(Debug, Clone)]
pub struct TargetScale {
    pub target: Vec2,
    pub rate: f32,
}

impl TargetScale {
    pub fn new(target: f32, rate: f32) -> Self {
        Self {
            target: Vec2::new(target, target),
            rate,
        }
    }
}

impl Modifier for TargetScale {
    fn kind(&self) -> ModifierKind {
        ModifierKind::TargetScale
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.scale += (self.target - particle.scale) * (self.rate * elapsed);
    }
}

/// Eases velocity toward a target vector
#[derive(Debug, Clone)]
pub struct TargetVelocity {
    pub target: Vec2,
    pub rate: f32,
}

impl TargetVelocity {
    pub fn new(target: Vec2, rate: f32) -> Self {
        Self { target, rate }
    }
}

impl Modifier for TargetVelocity {
    fn kind(&self) -> ModifierKind {
        ModifierKind::TargetVelocity
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.velocity += (self.target - particle.velocity) * (self.rate * elapsed);
    }
}

/// Drives rendered alpha from energy: `color.a * lerp(end, start, energy)`
#[derive(Debug, Clone)]
pub struct Fade {
    pub start_alpha: f32,
    pub end_alpha: f32,
}

impl Fade {
    pub fn new(start_alpha: f32, end_alpha: f32) -> Self {
        Self {
            start_alpha,
            end_alpha,
        }
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Modifier for Fade {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Fade
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        _elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.alpha =
            particle.color.a * lerp_f32(self.end_alpha, self.start_alpha, particle.energy);
    }
}

/// Integrates position from velocity, keeping the previous position
#[derive(Debug, Clone, Default)]
pub struct Move;

impl Modifier for Move {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Move
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.last_position = particle.position;
        particle.position += particle.velocity * elapsed;
    }
}

/// Integrates rotation from rotational velocity
#[derive(Debug, Clone, Default)]
pub struct Rotate;

impl Modifier for Rotate {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Rotate
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.rotation += particle.rotation_velocity * elapsed;
    }
}

/// Advances age and derives energy; kills the particle at end of life
#[derive(Debug, Clone, Default)]
pub struct Age {
    pub easing: Easing,
}

impl Age {
    pub fn new(easing: Easing) -> Self {
        Self { easing }
    }
}

impl Modifier for Age {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Age
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        particle.age += elapsed;
        if particle.age >= particle.lifetime {
            particle.energy = 0.0;
            particle.is_dead = true;
        } else {
            particle.energy = self.easing.energy(particle.age, particle.lifetime);
        }
    }
}

/// Advances sprite playback time
#[derive(Debug, Clone, Default)]
pub struct Animate;

impl Modifier for Animate {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Animate
    }

    fn update(
        &mut self,
        _: &EmitterView,
        particle: &mut Particle,
        elapsed: f32,
        _: &mut dyn RandomSource,
    ) {
        if particle.sprite.is_some() {
            particle.anim_time += particle.anim_speed * elapsed;
        }
    }
}
