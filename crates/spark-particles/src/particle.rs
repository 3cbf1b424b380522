//! Particle types: CPU simulation state and GPU instance data

use bytemuck::{Pod, Zeroable};
use spark_core::{BlendMode, Color, Vec2};
use std::sync::Arc;

/// A bound frame sequence. Dropping the handle releases the particle's hold
/// on the sprite sheet's frame list.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteHandle {
    pub frames: Arc<[u32]>,
}

impl SpriteHandle {
    pub fn new(frames: Arc<[u32]>) -> Self {
        Self { frames }
    }

    /// Frame shown after `time` seconds of playback at one frame per second
    /// (speed is applied to `time` by the caller). Loops.
    pub fn frame_at(&self, time: f32) -> u32 {
        if self.frames.is_empty() {
            return 0;
        }
        let idx = time.max(0.0) as usize % self.frames.len();
        self.frames[idx]
    }
}

/// CPU-side particle state (not sent to GPU)
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    /// Position before the most recent `Move` step
    pub last_position: Vec2,
    pub velocity: Vec2,
    /// Radians
    pub rotation: f32,
    /// Radians per second
    pub rotation_velocity: f32,
    pub scale: Vec2,
    pub mass: f32,
    pub collision_radius: f32,
    pub color: Color,
    /// Opacity handed to the renderer; derived from `color.a` by fade modifiers
    pub alpha: f32,
    pub blend_mode: BlendMode,
    pub sprite: Option<SpriteHandle>,
    pub anim_time: f32,
    pub anim_speed: f32,
    pub age: f32,
    pub lifetime: f32,
    /// Normalized remaining life, rewritten each frame by the `Age` modifier
    pub energy: f32,
    pub is_dead: bool,
    /// Scratch key for external depth sorting
    pub sort_value: f32,
}

impl Particle {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            rotation_velocity: 0.0,
            scale: Vec2::ONE,
            mass: 1.0,
            collision_radius: 0.0,
            color: Color::WHITE,
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
            sprite: None,
            anim_time: 0.0,
            anim_speed: 0.0,
            age: 0.0,
            lifetime: 0.0,
            energy: 1.0,
            is_dead: false,
            sort_value: 0.0,
        }
    }

    /// Restore every field to its construction default and release the sprite
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Normalized age in [0, 1]
    pub fn age_ratio(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).min(1.0)
        }
    }

    /// Sprite frame to draw, or 0 when no animation is bound
    pub fn current_frame(&self) -> u32 {
        self.sprite
            .as_ref()
            .map(|s| s.frame_at(self.anim_time))
            .unwrap_or(0)
    }

    /// Equality against the reset defaults, used to verify pooled instances
    pub fn is_pristine(&self) -> bool {
        let fresh = Self::new();
        self.position == fresh.position
            && self.last_position == fresh.last_position
            && self.velocity == fresh.velocity
            && self.rotation == fresh.rotation
            && self.rotation_velocity == fresh.rotation_velocity
            && self.scale == fresh.scale
            && self.mass == fresh.mass
            && self.collision_radius == fresh.collision_radius
            && self.color == fresh.color
            && self.alpha == fresh.alpha
            && self.blend_mode == fresh.blend_mode
            && self.sprite.is_none()
            && self.anim_time == fresh.anim_time
            && self.anim_speed == fresh.anim_speed
            && self.age == fresh.age
            && self.lifetime == fresh.lifetime
            && self.energy == fresh.energy
            && self.is_dead == fresh.is_dead
            && self.sort_value == fresh.sort_value
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU instance data, one per live particle.
/// 48 bytes laid out as three vec4 rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Position + scale packed into vec4
    pub pos_scale: [f32; 4], // xy = position, zw = scale
    /// Mix color with rendered alpha
    pub color: [f32; 4], // rgb = color, a = alpha
    /// Rotation, sprite frame, blend mode, sort key
    pub rotation_frame: [f32; 4], // x = rotation, y = frame, z = blend mode, w = sort value
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            pos_scale: [p.position.x, p.position.y, p.scale.x, p.scale.y],
            color: [p.color.r, p.color.g, p.color.b, p.alpha],
            rotation_frame: [
                p.rotation,
                p.current_frame() as f32,
                p.blend_mode.index() as f32,
                p.sort_value,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_defaults_and_drops_sprite() {
        let mut p = Particle::new();
        p.position = Vec2::new(3.0, 4.0);
        p.lifetime = 2.0;
        p.is_dead = true;
        p.sprite = Some(SpriteHandle::new(Arc::from(vec![1, 2, 3])));
        assert!(!p.is_pristine());

        p.reset();
        assert!(p.is_pristine());
    }

    #[test]
    fn sprite_frames_loop() {
        let mut p = Particle::new();
        p.sprite = Some(SpriteHandle::new(Arc::from(vec![10, 11, 12])));
        p.anim_time = 1.5;
        assert_eq!(p.current_frame(), 11);
        p.anim_time = 4.2;
        assert_eq!(p.current_frame(), 11);
    }

    #[test]
    fn particle_instance_layout() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 48);
        assert_eq!(std::mem::align_of::<ParticleInstance>(), 4);
    }
}
