//! Whole-emitter modifiers: move or reshape the spawn point itself

use crate::emitter::EmitterView;
use spark_core::Vec2;

/// Mutates emitter-level state once per frame
pub trait EmitterModifier {
    /// Called once when the emitter starts
    fn init(&mut self, emitter: &mut EmitterView);

    /// Called every frame after start, paused or not, before particle modifiers
    fn update(&mut self, emitter: &mut EmitterView, elapsed: f32);
}

/// Swings the emitter around the point it started at.
/// Angular rate is `speed / radius`, so `speed` is the linear speed along the circle.
#[derive(Debug, Clone)]
pub struct Orbit {
    pub radius: f32,
    pub speed: f32,
    /// Radians
    pub start_angle: f32,
    center: Vec2,
    angle: f32,
}

impl Orbit {
    pub fn new(radius: f32, speed: f32) -> Self {
        Self {
            radius,
            speed,
            start_angle: 0.0,
            center: Vec2::ZERO,
            angle: 0.0,
        }
    }

    pub fn with_start_angle(mut self, start_angle: f32) -> Self {
        self.start_angle = start_angle;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn angular_rate(&self) -> f32 {
        if self.radius > 0.0 {
            self.speed / self.radius
        } else {
            0.0
        }
    }

    fn place(&self, emitter: &mut EmitterView) {
        emitter.position = self.center + Vec2::from_angle(self.angle) * self.radius;
    }
}

impl EmitterModifier for Orbit {
    fn init(&mut self, emitter: &mut EmitterView) {
        self.center = emitter.position;
        self.angle = self.start_angle;
        self.place(emitter);
    }

    fn update(&mut self, emitter: &mut EmitterView, elapsed: f32) {
        self.angle += self.angular_rate() * elapsed;
        self.place(emitter);
    }
}
