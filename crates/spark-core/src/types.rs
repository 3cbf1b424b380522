//! Spatial and common types

use crate::error::{Result, SparkError};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +X)
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn from_array(arr: [f32; 2]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
        }
    }

    pub fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Rotate counter-clockwise by `angle` radians
    pub fn rotated(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Axis-aligned rectangle, origin at its top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const GREEN: Self = Self {
        r: 0.0,
        g: 1.0,
        b: 0.0,
        a: 1.0,
    };
    pub const BLUE: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` (leading `#` optional) or a basic color name
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "red" => return Ok(Self::RED),
            "green" => return Ok(Self::GREEN),
            "blue" => return Ok(Self::BLUE),
            _ => {}
        }

        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let bad = || SparkError::ParseError(format!("invalid color '{s}'"));
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| bad())?;

        match digits.len() {
            3 => {
                let expand = |n: u32| ((n & 0xF) * 17) as f32 / 255.0;
                Ok(Self::new(
                    expand(value >> 8),
                    expand(value >> 4),
                    expand(value),
                    1.0,
                ))
            }
            6 => Ok(Self::from_hex(value)),
            8 => {
                let mut color = Self::from_hex(value >> 8);
                color.a = (value & 0xFF) as f32 / 255.0;
                Ok(color)
            }
            _ => Err(bad()),
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Blend operation a renderer applies when compositing a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    Normal,
    #[default]
    Additive,
    None,
    NegativeMultiply,
    MergeCopy,
    Difference,
    Multiply,
    AlphaChannel,
}

impl BlendMode {
    /// Map a blend mode name. Anything unrecognized is additive ("lighter").
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" | "source-over" => BlendMode::Normal,
            "additive" | "add" | "lighter" => BlendMode::Additive,
            "none" => BlendMode::None,
            "negative-multiply" | "negative_multiply" => BlendMode::NegativeMultiply,
            "merge-copy" | "merge_copy" | "copy" => BlendMode::MergeCopy,
            "difference" => BlendMode::Difference,
            "multiply" => BlendMode::Multiply,
            "alpha-channel" | "alpha_channel" => BlendMode::AlphaChannel,
            _ => BlendMode::Additive,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Additive => "additive",
            BlendMode::None => "none",
            BlendMode::NegativeMultiply => "negative-multiply",
            BlendMode::MergeCopy => "merge-copy",
            BlendMode::Difference => "difference",
            BlendMode::Multiply => "multiply",
            BlendMode::AlphaChannel => "alpha-channel",
        }
    }

    /// Stable index used when packing render instances
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(4.0, 6.0);

        assert_eq!(v1 + v2, Vec2::new(5.0, 8.0));
        assert_eq!(v2 - v1, Vec2::new(3.0, 4.0));
        assert_eq!(v1 * 2.0, Vec2::new(2.0, 4.0));
        assert!(((v2 - v1).length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_rotation() {
        let v = Vec2::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn test_color_parse_forms() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::RED);
        assert_eq!(Color::parse("fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("Blue").unwrap(), Color::BLUE);

        let translucent = Color::parse("#00ff0080").unwrap();
        assert!((translucent.g - 1.0).abs() < 1e-6);
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);

        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("not-a-color").is_err());
    }

    #[test]
    fn test_blend_mode_fallback() {
        assert_eq!(BlendMode::from_name("multiply"), BlendMode::Multiply);
        assert_eq!(BlendMode::from_name("lighter"), BlendMode::Additive);
        assert_eq!(BlendMode::from_name("sparkly"), BlendMode::Additive);
        for mode in [BlendMode::Normal, BlendMode::MergeCopy, BlendMode::AlphaChannel] {
            assert_eq!(BlendMode::from_name(mode.name()), mode);
        }
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(-1.0, -1.0, 2.0, 2.0);
        assert!(r.contains(Vec2::ZERO));
        assert!(!r.contains(Vec2::new(1.5, 0.0)));
    }
}
