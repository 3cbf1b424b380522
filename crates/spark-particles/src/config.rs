//! Engine settings and TOML effect definitions

use crate::easing::Easing;
use crate::emitter::Emitter;
use crate::emitter_modifiers::{EmitterModifier, Orbit};
use crate::generators::{Blast, Generator, Pulse, Steady, SteadyRandom};
use crate::initers::{
    Alpha, BlendModeIniter, CirclePosition, CollisionRadius, FixedOrderColor, FrameAnimation,
    Initer, LifeTime, Mass, RandomColor, RandomFrameAnimation, RectPosition, Rotation,
    RotationVelocity, Scale, Velocity,
};
use crate::modifiers::{
    Accelerate, Age, Animate, Fade, Friction, Modifier, Move, RandomDrift, Rotate, SortY,
    TargetScale, TargetVelocity,
};
use crate::pool::DEFAULT_MAX_INSTANCES;
use crate::sprite::SpriteLookup;
use serde::Deserialize;
use spark_core::{Rect, Result, SparkError, Vec2};

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Recycle retired particles instead of dropping them
    pub pooling: bool,
    /// Hard cap on constructed particle instances
    pub max_instances: usize,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pooling: true,
            max_instances: DEFAULT_MAX_INSTANCES,
            seed: 0xDEAD_BEEF,
        }
    }
}

impl EngineConfig {
    /// Parse an EngineConfig from a TOML table. Missing keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = table.get("pooling") {
            config.pooling = v
                .as_bool()
                .ok_or_else(|| wrong_type("pooling", "a boolean", v))?;
        }
        if let Some(v) = table.get("max_instances") {
            let n = v
                .as_integer()
                .ok_or_else(|| wrong_type("max_instances", "an integer", v))?;
            config.max_instances = usize::try_from(n)
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    SparkError::InvalidConfig(format!("max_instances must be positive, got {n}"))
                })?;
        }
        if let Some(v) = table.get("seed") {
            let n = v
                .as_integer()
                .ok_or_else(|| wrong_type("seed", "an integer", v))?;
            config.seed = u32::try_from(n).map_err(|_| {
                SparkError::InvalidConfig(format!("seed must be in 0..={}, got {n}", u32::MAX))
            })?;
        }

        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        Self::from_toml(&table)
    }
}

fn wrong_type(key: &str, expected: &str, found: &toml::Value) -> SparkError {
    SparkError::InvalidConfig(format!(
        "{key} must be {expected}, got {}",
        found.type_str()
    ))
}

/// A particle effect: any number of emitters described in TOML
///
/// ```toml
/// [[emitter]]
/// position = [0.0, 0.0]
/// generator = { kind = "steady", rate = 30.0 }
///
/// [[emitter.initer]]
/// kind = "lifetime"
/// range = [0.5, 1.5]
///
/// [[emitter.modifier]]
/// kind = "age"
/// easing = "quad_out"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EffectDef {
    #[serde(default, rename = "emitter")]
    pub emitters: Vec<EmitterDef>,
}

impl EffectDef {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmitterDef {
    #[serde(default)]
    pub position: [f32; 2],
    #[serde(default = "default_true")]
    pub autostart: bool,
    pub generator: GeneratorDef,
    #[serde(default, rename = "initer")]
    pub initers: Vec<IniterDef>,
    #[serde(default, rename = "modifier")]
    pub modifiers: Vec<ModifierDef>,
    #[serde(default, rename = "emitter_modifier")]
    pub emitter_modifiers: Vec<EmitterModifierDef>,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorDef {
    Steady {
        rate: f32,
    },
    Blast {
        count: [u32; 2],
        #[serde(default)]
        auto_blast: bool,
    },
    Pulse {
        interval: f32,
        count: [u32; 2],
        #[serde(default)]
        initial_pulse: bool,
    },
    SteadyRandom {
        rate: [f32; 2],
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IniterDef {
    CirclePosition {
        #[serde(default)]
        radius: f32,
        #[serde(default)]
        jitter: [f32; 2],
        velocity: Option<[f32; 2]>,
        #[serde(default)]
        distribute_evenly: bool,
        #[serde(default)]
        random_start_angle: bool,
        #[serde(default)]
        start_angle: f32,
    },
    RectPosition {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Alpha {
        range: [f32; 2],
    },
    BlendMode {
        mode: String,
    },
    Velocity {
        min: [f32; 2],
        max: [f32; 2],
    },
    Lifetime {
        range: [f32; 2],
    },
    RotationVelocity {
        range: [f32; 2],
    },
    Rotation {
        range: [f32; 2],
    },
    Scale {
        range: [f32; 2],
        #[serde(default)]
        linked: bool,
    },
    Mass {
        range: [f32; 2],
    },
    CollisionRadius {
        radius: f32,
    },
    FrameAnimation {
        sheet: String,
        name: String,
    },
    RandomFrameAnimation {
        sheet: String,
        names: Vec<String>,
    },
    RandomColor {
        colors: Vec<String>,
    },
    FixedOrderColor {
        colors: Vec<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierDef {
    Accelerate {
        acceleration: [f32; 2],
    },
    Friction {
        drag: f32,
    },
    RandomDrift {
        drift: [f32; 2],
        #[serde(default)]
        bias: [f32; 2],
    },
    SortY {
        #[serde(default)]
        offset: f32,
    },
    TargetScale {
        target: f32,
        rate: f32,
    },
    TargetVelocity {
        target: [f32; 2],
        rate: f32,
    },
    Fade {
        #[serde(default = "default_one")]
        start_alpha: f32,
        #[serde(default)]
        end_alpha: f32,
    },
    Move,
    Rotate,
    Age {
        #[serde(default)]
        easing: Easing,
    },
    Animate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitterModifierDef {
    Orbit {
        radius: f32,
        speed: f32,
        #[serde(default)]
        start_angle: f32,
    },
}

impl GeneratorDef {
    pub fn build(&self) -> Result<Box<dyn Generator>> {
        let generator: Box<dyn Generator> = match *self {
            GeneratorDef::Steady { rate } => Box::new(Steady::new(rate)),
            GeneratorDef::Blast { count, auto_blast } => {
                Box::new(Blast::new(count[0], count[1])?.with_auto_blast(auto_blast))
            }
            GeneratorDef::Pulse {
                interval,
                count,
                initial_pulse,
            } => Box::new(
                Pulse::new(interval, count[0], count[1]).with_initial_pulse(initial_pulse),
            ),
            GeneratorDef::SteadyRandom { rate } => Box::new(SteadyRandom::new(rate[0], rate[1])),
        };
        Ok(generator)
    }
}

impl IniterDef {
    pub fn build(&self, sprites: &dyn SpriteLookup) -> Result<Box<dyn Initer>> {
        let initer: Box<dyn Initer> = match self {
            IniterDef::CirclePosition {
                radius,
                jitter,
                velocity,
                distribute_evenly,
                random_start_angle,
                start_angle,
            } => {
                let mut initer =
                    CirclePosition::new(*radius).with_jitter(Vec2::from_array(*jitter));
                if let Some([start, end]) = velocity {
                    initer = initer.with_velocity(*start, *end);
                }
                if *distribute_evenly {
                    initer = initer.distribute_evenly(*start_angle, *random_start_angle);
                }
                Box::new(initer)
            }
            IniterDef::RectPosition {
                x,
                y,
                width,
                height,
            } => Box::new(RectPosition::new(Rect::new(*x, *y, *width, *height))),
            IniterDef::Alpha { range } => Box::new(Alpha::new(range[0], range[1])),
            IniterDef::BlendMode { mode } => Box::new(BlendModeIniter::from_name(mode)),
            IniterDef::Velocity { min, max } => Box::new(Velocity::new(
                Vec2::from_array(*min),
                Vec2::from_array(*max),
            )),
            IniterDef::Lifetime { range } => Box::new(LifeTime::new(range[0], range[1])),
            IniterDef::RotationVelocity { range } => {
                Box::new(RotationVelocity::new(range[0], range[1]))
            }
            IniterDef::Rotation { range } => Box::new(Rotation::new(range[0], range[1])),
            IniterDef::Scale { range, linked } => Box::new(Scale::new(range[0], range[1], *linked)),
            IniterDef::Mass { range } => Box::new(Mass::new(range[0], range[1])),
            IniterDef::CollisionRadius { radius } => Box::new(CollisionRadius::new(*radius)),
            IniterDef::FrameAnimation { sheet, name } => {
                Box::new(FrameAnimation::new(sprites, sheet, name))
            }
            IniterDef::RandomFrameAnimation { sheet, names } => {
                Box::new(RandomFrameAnimation::new(sprites, sheet, names.as_slice())?)
            }
            IniterDef::RandomColor { colors } => {
                Box::new(RandomColor::from_hex_strings(colors.as_slice())?)
            }
            IniterDef::FixedOrderColor { colors } => {
                Box::new(FixedOrderColor::from_hex_strings(colors.as_slice())?)
            }
        };
        Ok(initer)
    }
}

impl ModifierDef {
    pub fn build(&self) -> Box<dyn Modifier> {
        match *self {
            ModifierDef::Accelerate { acceleration } => {
                Box::new(Accelerate::new(acceleration[0], acceleration[1]))
            }
            ModifierDef::Friction { drag } => Box::new(Friction::new(drag)),
            ModifierDef::RandomDrift { drift, bias } => Box::new(RandomDrift::new(
                Vec2::from_array(drift),
                Vec2::from_array(bias),
            )),
            ModifierDef::SortY { offset } => Box::new(SortY::new(offset)),
            ModifierDef::TargetScale { target, rate } => Box::new(TargetScale::new(target, rate)),
            ModifierDef::TargetVelocity { target, rate } => {
                Box::new(TargetVelocity::new(Vec2::from_array(target), rate))
            }
            ModifierDef::Fade {
                start_alpha,
                end_alpha,
            } => Box::new(Fade::new(start_alpha, end_alpha)),
            ModifierDef::Move => Box::new(Move),
            ModifierDef::Rotate => Box::new(Rotate),
            ModifierDef::Age { easing } => Box::new(Age::new(easing)),
            ModifierDef::Animate => Box::new(Animate),
        }
    }
}

impl EmitterModifierDef {
    pub fn build(&self) -> Box<dyn EmitterModifier> {
        match *self {
            EmitterModifierDef::Orbit {
                radius,
                speed,
                start_angle,
            } => Box::new(Orbit::new(radius, speed).with_start_angle(start_angle)),
        }
    }
}

impl EmitterDef {
    /// Build an unstarted emitter
    pub fn build(&self, sprites: &dyn SpriteLookup) -> Result<Emitter> {
        let mut emitter = Emitter::from_boxed(self.generator.build()?)
            .with_position(Vec2::from_array(self.position));
        for def in &self.initers {
            emitter.add_boxed_init(def.build(sprites)?);
        }
        for def in &self.modifiers {
            emitter.add_boxed_modifier(def.build());
        }
        for def in &self.emitter_modifiers {
            emitter.add_boxed_emitter_modifier(def.build());
        }
        Ok(emitter)
    }
}
