//! Ambient field nodes
//!
//! Nodes are plain records; the free functions here advance a whole slice
//! at once so the field controller never dispatches per entity.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Bounds;
use crate::consts::*;

/// A drifting node in the ambient field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Phase accumulator (radians, kept in [0, 2π))
    pub phase: f32,
    /// Pulse brightness, |sin(phase)|
    pub energy: f32,
}

impl Node {
    pub fn new(pos: Vec2, vel: Vec2, phase: f32) -> Self {
        let phase = phase.rem_euclid(TAU);
        Self {
            pos,
            vel,
            phase,
            energy: phase.sin().abs(),
        }
    }
}

/// A transient connection between two nodes, recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// Proximity falloff times average energy, in [0, 1]
    pub strength: f32,
}

/// Create `count` nodes uniformly inside `bounds`
pub fn spawn_nodes<R: Rng>(count: usize, bounds: Bounds, rng: &mut R) -> Vec<Node> {
    (0..count)
        .map(|_| {
            let pos = Vec2::new(
                rng.random_range(0.0..=bounds.width),
                rng.random_range(0.0..=bounds.height),
            );
            let vel = Vec2::new(
                rng.random_range(-NODE_MAX_AXIS_SPEED..=NODE_MAX_AXIS_SPEED),
                rng.random_range(-NODE_MAX_AXIS_SPEED..=NODE_MAX_AXIS_SPEED),
            );
            let phase = rng.random_range(0.0..TAU);
            Node::new(pos, vel, phase)
        })
        .collect()
}

/// Advance every node by one tick: drift, pulse, reflect off walls, clamp
pub fn advance_nodes(nodes: &mut [Node], bounds: Bounds) {
    let max = bounds.max();
    for node in nodes.iter_mut() {
        let next = node.pos + node.vel;

        if next.x < 0.0 || next.x > max.x {
            node.vel.x = -node.vel.x;
        }
        if next.y < 0.0 || next.y > max.y {
            node.vel.y = -node.vel.y;
        }
        node.pos = bounds.clamp(next);

        node.phase = (node.phase + NODE_PHASE_STEP).rem_euclid(TAU);
        node.energy = node.phase.sin().abs();
    }
}

/// Pull nodes back inside after the viewport shrinks
pub fn clamp_nodes(nodes: &mut [Node], bounds: Bounds) {
    for node in nodes.iter_mut() {
        node.pos = bounds.clamp(node.pos);
    }
}

/// Edge strength for a pair at `distance` with mean energy `avg_energy`.
///
/// Returns `None` when the pair is out of range.
#[inline]
pub fn edge_strength(distance: f32, avg_energy: f32) -> Option<f32> {
    if distance.is_nan() || distance >= CONNECT_RADIUS {
        return None;
    }
    let falloff = (CONNECT_RADIUS - distance) / CONNECT_RADIUS;
    Some((falloff * avg_energy).clamp(0.0, 1.0))
}

/// Collect every unordered pair of nodes within the connection radius.
///
/// O(n²) in node count; the population is capped at `MAX_NODES`.
pub fn find_edges(nodes: &[Node], out: &mut Vec<Edge>) {
    out.clear();
    let radius_sq = CONNECT_RADIUS * CONNECT_RADIUS;
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            let dist_sq = a.pos.distance_squared(b.pos);
            if dist_sq >= radius_sq {
                continue;
            }
            let distance = dist_sq.sqrt();
            if let Some(strength) = edge_strength(distance, (a.energy + b.energy) * 0.5) {
                out.push(Edge {
                    a: i,
                    b: j,
                    distance,
                    strength,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FIELD_STREAM, RngState};
    use proptest::prelude::*;

    #[test]
    fn test_zero_velocity_scenario() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut nodes = vec![
            Node::new(Vec2::ZERO, Vec2::ZERO, 0.0),
            Node::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 0.0),
        ];
        advance_nodes(&mut nodes, bounds);

        assert_eq!(nodes[0].pos, Vec2::ZERO);
        assert_eq!(nodes[1].pos, Vec2::new(10.0, 10.0));
        for node in &nodes {
            assert!((node.energy - 0.02_f32.sin().abs()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reflects_off_right_wall() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut nodes = vec![Node::new(Vec2::new(99.9, 50.0), Vec2::new(0.25, 0.0), 0.0)];
        advance_nodes(&mut nodes, bounds);
        assert_eq!(nodes[0].pos.x, 100.0);
        assert!(nodes[0].vel.x < 0.0);
        advance_nodes(&mut nodes, bounds);
        assert!(nodes[0].pos.x < 100.0);
    }

    #[test]
    fn test_reflects_off_top_wall() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut nodes = vec![Node::new(Vec2::new(50.0, 0.1), Vec2::new(0.0, -0.25), 0.0)];
        advance_nodes(&mut nodes, bounds);
        assert_eq!(nodes[0].pos.y, 0.0);
        assert!(nodes[0].vel.y > 0.0);
    }

    #[test]
    fn test_edge_strength_extremes() {
        assert_eq!(edge_strength(0.0, 1.0), Some(1.0));
        assert_eq!(edge_strength(CONNECT_RADIUS, 1.0), None);
        assert_eq!(edge_strength(CONNECT_RADIUS + 20.0, 1.0), None);
        let mid = edge_strength(75.0, 1.0).unwrap();
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_find_edges_pairs_once() {
        let nodes = vec![
            Node::new(Vec2::new(0.0, 0.0), Vec2::ZERO, 1.0),
            Node::new(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0),
            Node::new(Vec2::new(400.0, 0.0), Vec2::ZERO, 1.0),
        ];
        let mut edges = Vec::new();
        find_edges(&nodes, &mut edges);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a, edges[0].b), (0, 1));
        assert!((edges[0].distance - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_is_seeded() {
        let bounds = Bounds::new(800.0, 600.0);
        let a = spawn_nodes(50, bounds, &mut RngState::new(42, FIELD_STREAM).to_rng());
        let b = spawn_nodes(50, bounds, &mut RngState::new(42, FIELD_STREAM).to_rng());
        assert_eq!(a, b);
        assert!(a.iter().all(|n| bounds.contains(n.pos)));
        assert!(a.iter().all(|n| n.vel.x.abs() <= NODE_MAX_AXIS_SPEED
            && n.vel.y.abs() <= NODE_MAX_AXIS_SPEED));
    }

    proptest! {
        #[test]
        fn prop_nodes_stay_in_bounds(
            w in 1.0f32..2000.0,
            h in 1.0f32..2000.0,
            px in -50.0f32..2050.0,
            py in -50.0f32..2050.0,
            vx in -5.0f32..5.0,
            vy in -5.0f32..5.0,
            ticks in 1usize..200,
        ) {
            let bounds = Bounds::new(w, h);
            let mut nodes = vec![Node::new(Vec2::new(px, py), Vec2::new(vx, vy), 0.0)];
            for _ in 0..ticks {
                advance_nodes(&mut nodes, bounds);
                prop_assert!(bounds.contains(nodes[0].pos));
                prop_assert!((0.0..=1.0).contains(&nodes[0].energy));
            }
        }
    }
}
