//! Shared simulation types
//!
//! Viewport bounds and seeded RNG state used by both layers.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_dimension;

/// RNG stream for the ambient field
pub const FIELD_STREAM: u64 = 0xf1e1d;
/// RNG stream for the cursor spray
pub const SPRAY_STREAM: u64 = 0x5b7a1;

/// Drawable viewport extent, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Bounds {
    /// Create bounds, clamping each dimension to at least 1×1
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }
    }

    /// Build bounds from integer pixel sizes reported by the host
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(Vec2::ZERO, self.max())
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_bounds_clamp_degenerate() {
        let b = Bounds::new(0.0, -20.0);
        assert_eq!(b.width, 1.0);
        assert_eq!(b.height, 1.0);

        let b = Bounds::new(f32::NAN, f32::INFINITY);
        assert_eq!(b, Bounds::new(1.0, 1.0));
    }

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(100.0, 50.0);
        assert!(b.contains(Vec2::ZERO));
        assert!(b.contains(Vec2::new(100.0, 50.0)));
        assert!(!b.contains(Vec2::new(100.1, 10.0)));
        assert_eq!(b.clamp(Vec2::new(-5.0, 80.0)), Vec2::new(0.0, 50.0));
    }

    #[test]
    fn test_rng_streams_differ() {
        let mut a = RngState::new(7, FIELD_STREAM).to_rng();
        let mut b = RngState::new(7, SPRAY_STREAM).to_rng();
        let xs: Vec<u32> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }
}
