//! Drawing surface abstraction
//!
//! The simulation draws through this trait so the same controllers render to a
//! browser canvas or to an in-memory recorder.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) color with 8-bit channels and float alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced (clamped to [0, 1])
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` string for the canvas 2D API
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Gradient stop at `offset` in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Errors reported by a drawing backend
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The drawing context is gone (canvas detached or never acquired).
    ContextLost,
    /// Gradient could not be created or a stop was rejected.
    Gradient(String),
    /// A path or stroke operation failed.
    Draw(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ContextLost => write!(f, "Drawing context is not available"),
            SurfaceError::Gradient(msg) => write!(f, "Failed to build gradient: {}", msg),
            SurfaceError::Draw(msg) => write!(f, "Draw call failed: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// A persistent 2D drawing target matching the viewport
pub trait Surface {
    /// Whether a drawing context is currently available
    fn is_ready(&self) -> bool {
        true
    }

    /// Reset the drawable area. Idempotent.
    fn resize(&mut self, width: u32, height: u32);

    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Soft circular gradient centered at `center`
    fn draw_radial_glow(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> Result<(), SurfaceError>;

    /// Quadratic curve from `a` to `b` bent toward `control`
    fn draw_curve(
        &mut self,
        a: Vec2,
        control: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
        opacity: f32,
    ) -> Result<(), SurfaceError>;

    /// Straight stroke from `a` to `b`
    fn draw_line(
        &mut self,
        a: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
        opacity: f32,
    ) -> Result<(), SurfaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_format() {
        assert_eq!(Rgba::new(100, 200, 255, 0.5).to_css(), "rgba(100, 200, 255, 0.500)");
    }

    #[test]
    fn test_with_alpha_clamps() {
        let c = Rgba::new(1, 2, 3, 1.0);
        assert_eq!(c.with_alpha(1.7).a, 1.0);
        assert_eq!(c.with_alpha(-0.2).a, 0.0);
        assert_eq!(c.with_alpha(0.25).r, 1);
    }
}
