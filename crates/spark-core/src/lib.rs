//! Spark Core - Foundational types for the Spark particle engine
//!
//! This crate provides the value types the simulation crates share:
//! - `Vec2`, `Rect` - 2D spatial types
//! - `Color` - RGBA mix colors, parsed from hex strings
//! - `BlendMode` - the closed set of blend operations a renderer understands
//! - Error types and Result alias

mod error;
mod types;

pub use error::{Result, SparkError};
pub use types::{BlendMode, Color, Rect, Vec2};
