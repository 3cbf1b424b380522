//! Spark Particles - pooled 2D particle emitters
//!
//! Provides per-emitter particle simulation with:
//! - A recycling particle factory with a hard instance cap
//! - Pluggable spawn timing (`generators`), spawn-time setup (`initers`),
//!   per-particle frame rules (`modifiers`) and whole-emitter rules
//!   (`emitter_modifiers`)
//! - Energy curves driving aging and fades
//! - Order-preserving compaction of dead particles
//! - GPU instance packing for instanced draw calls
//! - TOML effect definitions

pub mod config;
pub mod easing;
pub mod emitter;
pub mod emitter_modifiers;
pub mod engine;
pub mod generators;
pub mod initers;
pub mod modifiers;
pub mod particle;
pub mod pool;
pub mod rand;
pub mod render;
pub mod sprite;

pub use config::{EffectDef, EngineConfig};
pub use easing::Easing;
pub use emitter::{Emitter, EmitterId, EmitterView, FrameStats};
pub use emitter_modifiers::EmitterModifier;
pub use engine::ParticleEngine;
pub use generators::{Emission, Generator};
pub use initers::{Initer, IniterKind};
pub use modifiers::{Modifier, ModifierKind};
pub use particle::{Particle, ParticleInstance, SpriteHandle};
pub use pool::ParticleFactory;
pub use rand::{ParticleRng, RandomSource};
pub use render::{InstanceBuffer, ParticleDrawData};
pub use sprite::{Animation, SpriteAtlas, SpriteLookup};

pub use spark_core::{BlendMode, Color, Rect, Result, SparkError, Vec2};
