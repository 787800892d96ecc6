//! Neural Canvas - animated backdrop for the portfolio site
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ambient node field, cursor spray)
//! - `renderer`: Drawing surface abstraction and glyph styling
//! - `engine`: Frame loop state machine driving both layers
//! - `settings`: Quality presets and user preferences
//! - `web`: Browser bindings (canvas 2D, requestAnimationFrame, DOM listeners)

pub mod engine;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use engine::{FrameHandle, Host, InputEvent, InputQueue, LoopError, LoopState, SimulationLoop};
pub use renderer::{RecordingSurface, Surface, SurfaceError};
pub use settings::{QualityPreset, Settings};

/// Animation constants
pub mod consts {
    /// Default ambient node population
    pub const DEFAULT_NODE_COUNT: usize = 50;
    /// Upper bound on nodes (edge pass is O(n²) per frame)
    pub const MAX_NODES: usize = 400;
    /// Maximum random speed per axis for ambient nodes
    pub const NODE_MAX_AXIS_SPEED: f32 = 0.25;
    /// Phase advance per tick (radians)
    pub const NODE_PHASE_STEP: f32 = 0.02;
    /// Base glyph radius for nodes
    pub const NODE_GLYPH_RADIUS: f32 = 8.0;
    /// Nodes closer than this are connected by an edge
    pub const CONNECT_RADIUS: f32 = 150.0;
    /// Control point jitter for edge curves (± per axis)
    pub const EDGE_JITTER: f32 = 10.0;
    /// Edge opacity at full strength
    pub const EDGE_MAX_OPACITY: f32 = 0.5;
    /// Edge line width at full strength
    pub const EDGE_MAX_WIDTH: f32 = 2.0;

    /// Particles spawned per pointer-move event
    pub const PARTICLES_PER_MOVE: usize = 3;
    /// Spawn jitter around the pointer (± per axis)
    pub const SPAWN_JITTER: f32 = 10.0;
    /// Particle speed range
    pub const PARTICLE_MIN_SPEED: f32 = 0.5;
    pub const PARTICLE_MAX_SPEED: f32 = 2.0;
    /// Particle size range at spawn
    pub const PARTICLE_MIN_SIZE: f32 = 1.0;
    pub const PARTICLE_MAX_SIZE: f32 = 3.0;
    /// Life lost per tick, sampled per particle
    pub const PARTICLE_MIN_DECAY: f32 = 0.01;
    pub const PARTICLE_MAX_DECAY: f32 = 0.03;
    /// Multiplicative size shrink per tick
    pub const PARTICLE_SHRINK: f32 = 0.99;
    /// Particles at or below this size are culled
    pub const PARTICLE_MIN_VISIBLE_SIZE: f32 = 0.1;
    /// Sparkle phase advance per tick (radians)
    pub const SPARKLE_PHASE_STEP: f32 = 0.1;
    /// Glow radius relative to particle size
    pub const PARTICLE_GLOW_SCALE: f32 = 4.0;
    /// Soft cap on live particles (oldest dropped first)
    pub const DEFAULT_MAX_PARTICLES: usize = 2000;

    /// Smallest accepted viewport dimension
    pub const MIN_DIMENSION: f32 = 1.0;
}

/// Clamp a viewport dimension so downstream math never divides by zero
#[inline]
pub fn clamp_dimension(value: f32) -> f32 {
    if value.is_finite() {
        value.max(consts::MIN_DIMENSION)
    } else {
        consts::MIN_DIMENSION
    }
}
