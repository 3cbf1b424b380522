//! Frame-animation initers

use super::{Initer, IniterKind};
use crate::emitter::EmitterView;
use crate::particle::{Particle, SpriteHandle};
use crate::rand::RandomSource;
use crate::sprite::{Animation, SpriteLookup};
use spark_core::{Result, SparkError};

fn resolve(sprites: &dyn SpriteLookup, sheet: &str, name: &str) -> Animation {
    match sprites.animation(sheet, name) {
        Ok(animation) => animation,
        Err(err) => {
            tracing::warn!(
                sheet,
                name,
                %err,
                "animation lookup failed, using a single default frame"
            );
            Animation::fallback()
        }
    }
}

fn bind(particle: &mut Particle, animation: &Animation) {
    particle.sprite = Some(SpriteHandle::new(animation.frames.clone()));
    particle.anim_speed = animation.speed;
    particle.anim_time = 0.0;
}

/// Binds one named animation to every particle
#[derive(Debug, Clone)]
pub struct FrameAnimation {
    animation: Animation,
}

impl FrameAnimation {
    /// Looks the animation up once. A missing name is logged and replaced by a single frame.
    pub fn new(sprites: &dyn SpriteLookup, sheet: &str, name: &str) -> Self {
        Self {
            animation: resolve(sprites, sheet, name),
        }
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }
}

impl Initer for FrameAnimation {
    fn kind(&self) -> IniterKind {
        IniterKind::FrameAnimation
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        _rng: &mut dyn RandomSource,
    ) {
        bind(particle, &self.animation);
    }
}

/// Binds an animation picked uniformly from a set
#[derive(Debug, Clone)]
pub struct RandomFrameAnimation {
    animations: Vec<Animation>,
}

impl RandomFrameAnimation {
    pub fn new<S: AsRef<str>>(
        sprites: &dyn SpriteLookup,
        sheet: &str,
        names: &[S],
    ) -> Result<Self> {
        if names.is_empty() {
            return Err(SparkError::InvalidConfig(
                "random frame animation needs at least one name".to_string(),
            ));
        }
        let animations = names
            .iter()
            .map(|name| resolve(sprites, sheet, name.as_ref()))
            .collect();
        Ok(Self { animations })
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }
}

impl Initer for RandomFrameAnimation {
    fn kind(&self) -> IniterKind {
        IniterKind::RandomFrameAnimation
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        let idx = rng.range_int(0, self.animations.len() as u32 - 1) as usize;
        bind(particle, &self.animations[idx]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::ScriptedRng;
    use crate::sprite::SpriteAtlas;
    use spark_core::Vec2;

    fn atlas() -> SpriteAtlas {
        let mut atlas = SpriteAtlas::new();
        atlas.insert("fx", "spark", Animation::new(vec![1, 2, 3], 10.0));
        atlas.insert("fx", "ember", Animation::new(vec![7, 8], 5.0));
        atlas
    }

    #[test]
    fn binds_named_animation() {
        let mut rng = ScriptedRng::constant(0.0);
        let mut initer = FrameAnimation::new(&atlas(), "fx", "spark");
        let mut p = Particle::new();
        initer.init(&EmitterView::at(Vec2::ZERO), &mut p, &mut rng);

        assert_eq!(p.current_frame(), 1);
        assert!((p.anim_speed - 10.0).abs() < 1e-6);
    }

    #[test]
    fn missing_name_falls_back_to_one_frame() {
        let initer = FrameAnimation::new(&atlas(), "fx", "does-not-exist");
        assert_eq!(initer.animation(), &Animation::fallback());
    }

    #[test]
    fn random_pick_from_set() {
        let mut rng = ScriptedRng::constant(0.99);
        let mut initer = RandomFrameAnimation::new(&atlas(), "fx", &["spark", "ember"]).unwrap();
        let mut p = Particle::new();
        initer.init(&EmitterView::at(Vec2::ZERO), &mut p, &mut rng);
        assert_eq!(p.current_frame(), 7);

        assert!(RandomFrameAnimation::new::<&str>(&atlas(), "fx", &[]).is_err());
    }
}
