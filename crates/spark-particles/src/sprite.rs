//! Sprite-sheet lookup boundary used by the animation initers

use serde::Deserialize;
use spark_core::{Result, SparkError};
use std::collections::HashMap;
use std::sync::Arc;

/// An ordered frame sequence and its playback speed (frames per second)
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub frames: Arc<[u32]>,
    pub speed: f32,
}

impl Animation {
    pub fn new(frames: Vec<u32>, speed: f32) -> Self {
        Self {
            frames: Arc::from(frames),
            speed,
        }
    }

    /// The single frame used when a requested animation is missing
    pub fn fallback() -> Self {
        Self::new(vec![0], 0.0)
    }
}

/// Resolves named animations from sprite sheets
pub trait SpriteLookup {
    fn animation(&self, sheet: &str, name: &str) -> Result<Animation>;
}

/// In-memory sheet → animation table
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sheets: HashMap<String, HashMap<String, Animation>>,
}

#[derive(Debug, Deserialize)]
struct AtlasFile {
    #[serde(default)]
    sheets: HashMap<String, HashMap<String, AnimationDef>>,
}

#[derive(Debug, Deserialize)]
struct AnimationDef {
    frames: Vec<u32>,
    #[serde(default = "default_speed")]
    speed: f32,
}

fn default_speed() -> f32 {
    12.0
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: &str, name: &str, animation: Animation) {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .insert(name.to_string(), animation);
    }

    /// Parse an atlas from TOML:
    ///
    /// ```toml
    /// [sheets.fx.spark]
    /// frames = [0, 1, 2, 3]
    /// speed = 24.0
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: AtlasFile = toml::from_str(source)?;
        let mut atlas = Self::new();
        for (sheet, animations) in file.sheets {
            for (name, def) in animations {
                atlas.insert(&sheet, &name, Animation::new(def.frames, def.speed));
            }
        }
        Ok(atlas)
    }
}

impl SpriteLookup for SpriteAtlas {
    fn animation(&self, sheet: &str, name: &str) -> Result<Animation> {
        let animations = self
            .sheets
            .get(sheet)
            .ok_or_else(|| SparkError::SheetNotFound(sheet.to_string()))?;
        animations
            .get(name)
            .cloned()
            .ok_or_else(|| SparkError::MissingAnimation {
                sheet: sheet.to_string(),
                name: name.to_string(),
            })
    }
}
