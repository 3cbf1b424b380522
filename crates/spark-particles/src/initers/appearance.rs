//! Color, alpha and blend initers

use super::{Initer, IniterKind};
use crate::emitter::EmitterView;
use crate::particle::Particle;
use crate::rand::RandomSource;
use spark_core::{BlendMode, Color, Result, SparkError};

/// Sets mix-color alpha from `[start, end)`
#[derive(Debug, Clone)]
pub struct Alpha {
    pub start: f32,
    pub end: f32,
}

impl Alpha {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

impl Initer for Alpha {
    fn kind(&self) -> IniterKind {
        IniterKind::Alpha
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        particle.color.a = rng.range(self.start, self.end);
        particle.alpha = particle.color.a;
    }
}

/// Stamps a fixed blend mode
#[derive(Debug, Clone)]
pub struct BlendModeIniter {
    pub mode: BlendMode,
}

impl BlendModeIniter {
    pub fn new(mode: BlendMode) -> Self {
        Self { mode }
    }

    /// Unrecognized names fall back to additive
    pub fn from_name(name: &str) -> Self {
        Self::new(BlendMode::from_name(name))
    }
}

impl Initer for BlendModeIniter {
    fn kind(&self) -> IniterKind {
        IniterKind::BlendMode
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        _rng: &mut dyn RandomSource,
    ) {
        particle.blend_mode = self.mode;
    }
}

/// RGB comes from `color`; alpha keeps the particle's value scaled by the color's own alpha
fn apply_palette_color(particle: &mut Particle, color: Color) {
    let alpha = particle.color.a * color.a;
    particle.color = Color::new(color.r, color.g, color.b, alpha);
    particle.alpha = alpha;
}

fn check_palette(colors: &[Color]) -> Result<()> {
    if colors.is_empty() {
        return Err(SparkError::InvalidConfig(
            "color palette must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Picks a palette color uniformly per particle
#[derive(Debug, Clone)]
pub struct RandomColor {
    colors: Vec<Color>,
}

impl RandomColor {
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        check_palette(&colors)?;
        Ok(Self { colors })
    }

    /// Build from hex strings such as `#ff8800`
    pub fn from_hex_strings<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let parsed = colors
            .iter()
            .map(|c| Color::parse(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed)
    }
}

impl Initer for RandomColor {
    fn kind(&self) -> IniterKind {
        IniterKind::RandomColor
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        rng: &mut dyn RandomSource,
    ) {
        let idx = rng.range_int(0, self.colors.len() as u32 - 1) as usize;
        apply_palette_color(particle, self.colors[idx]);
    }
}

/// Cycles through a palette in order, one color per spawned particle
#[derive(Debug, Clone)]
pub struct FixedOrderColor {
    colors: Vec<Color>,
    next: usize,
}

impl FixedOrderColor {
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        check_palette(&colors)?;
        Ok(Self { colors, next: 0 })
    }

    pub fn from_hex_strings<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let parsed = colors
            .iter()
            .map(|c| Color::parse(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed)
    }
}

impl Initer for FixedOrderColor {
    fn kind(&self) -> IniterKind {
        IniterKind::FixedOrderColor
    }

    fn init(
        &mut self,
        _emitter: &EmitterView,
        particle: &mut Particle,
        _rng: &mut dyn RandomSource,
    ) {
        apply_palette_color(particle, self.colors[self.next]);
        self.next = (self.next + 1) % self.colors.len();
    }
}
