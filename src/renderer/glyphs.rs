//! Glyph styling for nodes, edges and sparkles
//!
//! Pure functions from simulation records to draw parameters, so the look can
//! be tested without a drawing backend.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::surface::{ColorStop, Rgba};
use crate::consts::*;
use crate::sim::{Edge, Node, Particle};

/// Colors used by both layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub node: Rgba,
    pub edge: Rgba,
    pub sparkle: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            node: Rgba::new(100, 200, 255, 1.0),
            edge: Rgba::new(100, 200, 255, 1.0),
            sparkle: Rgba::new(255, 255, 255, 1.0),
        }
    }
}

/// Radial glow parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: [ColorStop; 3],
}

/// Stroke parameters for an edge curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStroke {
    pub control: Vec2,
    pub opacity: f32,
    pub width: f32,
}

/// Node glyph: radius breathes with energy, core brightest at peak energy
pub fn node_glow(node: &Node, palette: &Palette) -> Glow {
    let outer_radius = NODE_GLYPH_RADIUS * (0.5 + 0.5 * node.energy);
    let core = 0.2 + 0.8 * node.energy;
    Glow {
        center: node.pos,
        inner_radius: 0.0,
        outer_radius,
        stops: [
            ColorStop::new(0.0, palette.node.with_alpha(core)),
            ColorStop::new(0.4, palette.node.with_alpha(core * 0.4)),
            ColorStop::new(1.0, palette.node.with_alpha(0.0)),
        ],
    }
}

/// Edge stroke with the control point jittered around the midpoint
pub fn edge_stroke<R: Rng>(edge: &Edge, nodes: &[Node], rng: &mut R) -> EdgeStroke {
    let mid = (nodes[edge.a].pos + nodes[edge.b].pos) * 0.5;
    let jitter = Vec2::new(
        rng.random_range(-EDGE_JITTER..=EDGE_JITTER),
        rng.random_range(-EDGE_JITTER..=EDGE_JITTER),
    );
    EdgeStroke {
        control: mid + jitter,
        opacity: EDGE_MAX_OPACITY * edge.strength,
        width: EDGE_MAX_WIDTH * edge.strength,
    }
}

/// Sparkle glyph: glow four times the particle size, fading with life
pub fn particle_glow(particle: &Particle, palette: &Palette) -> Glow {
    let alpha = particle.brightness() * particle.life.clamp(0.0, 1.0);
    Glow {
        center: particle.pos,
        inner_radius: 0.0,
        outer_radius: particle.size * PARTICLE_GLOW_SCALE,
        stops: [
            ColorStop::new(0.0, palette.sparkle.with_alpha(alpha)),
            ColorStop::new(0.3, palette.sparkle.with_alpha(alpha * 0.5)),
            ColorStop::new(1.0, palette.sparkle.with_alpha(0.0)),
        ],
    }
}

/// Horizontal and vertical arms of the sparkle cross-hair
pub fn sparkle_cross(particle: &Particle) -> [(Vec2, Vec2); 2] {
    let arm = particle.size * 2.0;
    let p = particle.pos;
    [
        (p - Vec2::new(arm, 0.0), p + Vec2::new(arm, 0.0)),
        (p - Vec2::new(0.0, arm), p + Vec2::new(0.0, arm)),
    ]
}
