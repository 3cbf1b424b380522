//! Spawn position shapes

use super::{Initer, IniterKind};
use crate::emitter::EmitterView;
use crate::particle::Particle;
use crate::rand::RandomSource;
use spark_core::{Rect, Vec2};
use std::f32::consts::TAU;

/// Places particles on a ring (or inside an ellipse when `radius` is zero),
/// optionally launching them outward along the spawn angle.
#[derive(Debug, Clone)]
pub struct CirclePosition {
    pub radius: f32,
    /// Per-axis random offset added on the ring, or the ellipse half-extents without one
    pub jitter: Vec2,
    /// Outward launch speed range; `None` leaves velocity untouched
    pub velocity: Option<(f32, f32)>,
    /// Space a blast's particles evenly around the circle
    pub distribute_evenly: bool,
    /// Randomize the first angle of each blast instead of using `start_angle`
    pub random_start_angle: bool,
    /// Radians
    pub start_angle: f32,
    blast_count: u32,
    blast_angle: f32,
    blast_index: u32,
}

impl CirclePosition {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            jitter: Vec2::ZERO,
            velocity: None,
            distribute_evenly: false,
            random_start_angle: false,
            start_angle: 0.0,
            blast_count: 0,
            blast_angle: 0.0,
            blast_index: 0,
        }
    }

    pub fn with_jitter(mut self, jitter: Vec2) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_velocity(mut self, start: f32, end: f32) -> Self {
        self.velocity = Some((start, end));
        self
    }

    pub fn distribute_evenly(mut self, start_angle: f32, random_start_angle: bool) -> Self {
        self.distribute_evenly = true;
        self.start_angle = start_angle;
        self.random_start_angle = random_start_angle;
        self
    }

    /// Base angle recorded at the most recent blast
    pub fn blast_angle(&self) -> f32 {
        self.blast_angle
    }

    fn next_angle(&mut self, rng: &mut dyn RandomSource) -> f32 {
        if self.distribute_evenly && self.blast_count > 0 {
            let step = TAU / self.blast_count as f32;
            let angle = self.blast_angle + step * (self.blast_index % self.blast_count) as f32;
            self.blast_index += 1;
            angle
        } else {
            rng.angle()
        }
    }
}

impl Initer for CirclePosition {
    fn kind(&self) -> IniterKind {
        IniterKind::CirclePosition
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        let angle = self.next_angle(rng);
        let dir = Vec2::from_angle(angle);

        if let Some((start, end)) = self.velocity {
            particle.velocity += dir * rng.range(start, end);
        }

        if self.radius > 0.0 {
            let jx = rng.range(-self.jitter.x, self.jitter.x);
            let jy = rng.range(-self.jitter.y, self.jitter.y);
            particle.position += Vec2::new(dir.x * self.radius + jx, dir.y * self.radius + jy);
        } else {
            let reach = rng.next_f32();
            particle.position +=
                Vec2::new(dir.x * self.jitter.x * reach, dir.y * self.jitter.y * reach);
        }
    }

    fn on_blast(&mut self, _emitter: &EmitterView, count: u32, rng: &mut dyn RandomSource) {
        self.blast_count = count;
        self.blast_index = 0;
        self.blast_angle = if self.random_start_angle {
            rng.angle()
        } else {
            self.start_angle
        };
    }
}

/// Adds a uniform offset inside a rectangle
#[derive(Debug, Clone)]
pub struct RectPosition {
    pub rect: Rect,
}

impl RectPosition {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Rectangle of the given size centered on the emitter
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(Rect::new(-width / 2.0, -height / 2.0, width, height))
    }
}

impl Initer for RectPosition {
    fn kind(&self) -> IniterKind {
        IniterKind::RectPosition
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        let x = rng.range(self.rect.x, self.rect.x + self.rect.width);
        let y = rng.range(self.rect.y, self.rect.y + self.rect.height);
        particle.position += Vec2::new(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::{ParticleRng, ScriptedRng};

    fn view() -> EmitterView {
        EmitterView::at(Vec2::new(100.0, 50.0))
    }

    #[test]
    fn ring_placement_is_additive() {
        let mut rng = ScriptedRng::constant(0.25); // angle = π/2
        let mut initer = CirclePosition::new(10.0);
        let mut p = Particle::new();
        p.position = Vec2::new(100.0, 50.0);

        initer.init(&view(), &mut p, &mut rng);
        assert!((p.position.x - 100.0).abs() < 1e-4);
        assert!((p.position.y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn radial_velocity_follows_angle() {
        let mut rng = ScriptedRng::constant(0.0); // angle 0, speed = start
        let mut initer = CirclePosition::new(5.0).with_velocity(3.0, 7.0);
        let mut p = Particle::new();
        p.velocity = Vec2::new(0.0, 1.0);

        initer.init(&view(), &mut p, &mut rng);
        assert!((p.velocity.x - 3.0).abs() < 1e-6);
        assert!((p.velocity.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn even_distribution_spaces_blast() {
        let mut rng = ParticleRng::new(3);
        let mut initer = CirclePosition::new(1.0).distribute_evenly(0.5, false);
        initer.on_blast(&view(), 4, &mut rng);

        for i in 0..4 {
            let mut p = Particle::new();
            initer.init(&view(), &mut p, &mut rng);
            let angle = p.position.y.atan2(p.position.x).rem_euclid(TAU);
            let expected = (0.5 + i as f32 * TAU / 4.0).rem_euclid(TAU);
            assert!((angle - expected).abs() < 1e-4, "particle {i}: {angle} vs {expected}");
        }
    }

    #[test]
    fn ellipse_scatter_stays_inside_jitter() {
        let mut rng = ParticleRng::new(11);
        let mut initer = CirclePosition::new(0.0).with_jitter(Vec2::new(4.0, 2.0));
        for _ in 0..200 {
            let mut p = Particle::new();
            initer.init(&view(), &mut p, &mut rng);
            let nx = p.position.x / 4.0;
            let ny = p.position.y / 2.0;
            assert!(nx * nx + ny * ny <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn rect_offset_within_bounds() {
        let mut rng = ParticleRng::new(5);
        let mut initer = RectPosition::centered(10.0, 4.0);
        for _ in 0..200 {
            let mut p = Particle::new();
            initer.init(&view(), &mut p, &mut rng);
            assert!(initer.rect.contains(p.position));
        }
    }
}
