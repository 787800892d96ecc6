//! Deterministic simulation module
//!
//! Both animation layers live here. Updates are pure and deterministic:
//! - One fixed logical step per tick
//! - Seeded RNG only (separate streams per layer)
//! - Entities are plain records advanced by free functions
//! - Drawing goes through the `Surface` trait, never a concrete backend

pub mod field;
pub mod node;
pub mod particle;
pub mod spray;
pub mod state;

pub use field::AmbientField;
pub use node::{Edge, Node, advance_nodes, edge_strength, find_edges};
pub use particle::{Particle, advance_particles};
pub use spray::CursorSpray;
pub use state::{Bounds, RngState};
