//! Ambient field controller
//!
//! A fixed population of drifting nodes joined by curved edges whenever two
//! nodes come within `CONNECT_RADIUS`.

use rand_pcg::Pcg32;

use super::node::{Edge, Node, advance_nodes, clamp_nodes, find_edges, spawn_nodes};
use super::state::{Bounds, FIELD_STREAM, RngState};
use crate::consts::MAX_NODES;
use crate::renderer::glyphs::{self, Palette};
use crate::renderer::{Surface, SurfaceError};

/// Owns the node population and the per-frame edge scratch buffer
#[derive(Debug, Clone)]
pub struct AmbientField {
    nodes: Vec<Node>,
    bounds: Bounds,
    rng: Pcg32,
    /// Edges found by the last render pass
    edges: Vec<Edge>,
    palette: Palette,
}

impl AmbientField {
    pub fn new(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            bounds: Bounds::default(),
            rng: RngState::new(seed, FIELD_STREAM).to_rng(),
            edges: Vec::new(),
            palette: Palette::default(),
        }
    }

    /// Build a field from explicit nodes (tests, replays)
    pub fn from_nodes(nodes: Vec<Node>, bounds: Bounds, seed: u64) -> Self {
        let mut field = Self::new(seed);
        field.nodes = nodes;
        field.bounds = bounds;
        field
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the population with `count` freshly seeded nodes
    pub fn initialize(&mut self, count: usize, bounds: Bounds) {
        let count = if count > MAX_NODES {
            log::warn!("Node count {} exceeds limit, using {}", count, MAX_NODES);
            MAX_NODES
        } else {
            count
        };
        self.bounds = bounds;
        self.nodes = spawn_nodes(count, bounds, &mut self.rng);
        self.edges.clear();
        log::debug!(
            "Ambient field initialized: {} nodes in {}x{}",
            count,
            bounds.width,
            bounds.height
        );
    }

    /// Adopt new viewport bounds, pulling stray nodes back inside
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        clamp_nodes(&mut self.nodes, bounds);
    }

    pub fn tick(&mut self) {
        advance_nodes(&mut self.nodes, self.bounds);
    }

    /// Draw node glows, then edges. Returns the number of failed draw calls.
    pub fn render(&mut self, surface: &mut dyn Surface) -> usize {
        let mut first_error: Option<SurfaceError> = None;
        let mut failures = 0;

        for node in &self.nodes {
            let glow = glyphs::node_glow(node, &self.palette);
            if let Err(e) = surface.draw_radial_glow(
                glow.center,
                glow.inner_radius,
                glow.outer_radius,
                &glow.stops,
            ) {
                failures += 1;
                first_error.get_or_insert(e);
            }
        }

        find_edges(&self.nodes, &mut self.edges);
        for edge in &self.edges {
            let stroke = glyphs::edge_stroke(edge, &self.nodes, &mut self.rng);
            if let Err(e) = surface.draw_curve(
                self.nodes[edge.a].pos,
                stroke.control,
                self.nodes[edge.b].pos,
                self.palette.edge,
                stroke.width,
                stroke.opacity,
            ) {
                failures += 1;
                first_error.get_or_insert(e);
            }
        }

        if let Some(e) = first_error {
            log::warn!("Ambient field: {} draw calls failed ({})", failures, e);
        }
        failures
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
