//! Cursor spray controller
//!
//! Pointer movement spawns bursts of sparkles that drift, fade and shrink
//! until they are culled.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::particle::{Particle, advance_particles};
use super::state::{RngState, SPRAY_STREAM};
use crate::consts::{DEFAULT_MAX_PARTICLES, PARTICLES_PER_MOVE};
use crate::renderer::glyphs::{self, Palette};
use crate::renderer::{Surface, SurfaceError};

#[derive(Debug, Clone)]
pub struct CursorSpray {
    /// Live particles, oldest first
    particles: Vec<Particle>,
    rng: Pcg32,
    max_particles: usize,
    per_move: usize,
    enabled: bool,
    palette: Palette,
    /// Particles dropped by the soft cap since creation
    dropped: u64,
}

impl CursorSpray {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: RngState::new(seed, SPRAY_STREAM).to_rng(),
            max_particles: DEFAULT_MAX_PARTICLES,
            per_move: PARTICLES_PER_MOVE,
            enabled: true,
            palette: Palette::default(),
            dropped: 0,
        }
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Disabled sprays ignore pointer movement (reduced motion)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.particles.clear();
        }
    }

    /// Spawn a burst at the pointer, evicting the oldest particles past the cap
    pub fn on_pointer_move(&mut self, pos: Vec2) {
        if !self.enabled || !pos.is_finite() {
            return;
        }
        for _ in 0..self.per_move {
            self.particles.push(Particle::spawn(pos, &mut self.rng));
        }

        let overflow = self.particles.len().saturating_sub(self.max_particles);
        if overflow > 0 {
            self.particles.drain(..overflow);
            self.dropped += overflow as u64;
            log::trace!("Spray at cap, dropped {} oldest particles", overflow);
        }
    }

    pub fn tick(&mut self) {
        advance_particles(&mut self.particles);
    }

    /// Draw each sparkle as a glow plus cross-hair. Returns failed draw calls.
    pub fn render(&self, surface: &mut dyn Surface) -> usize {
        let mut first_error: Option<SurfaceError> = None;
        let mut failures = 0;
        let mut note = |result: Result<(), SurfaceError>| {
            if let Err(e) = result {
                failures += 1;
                first_error.get_or_insert(e);
            }
        };

        for particle in &self.particles {
            let glow = glyphs::particle_glow(particle, &self.palette);
            note(surface.draw_radial_glow(
                glow.center,
                glow.inner_radius,
                glow.outer_radius,
                &glow.stops,
            ));
            let brightness = particle.brightness();
            for (a, b) in glyphs::sparkle_cross(particle) {
                note(surface.draw_line(a, b, self.palette.sparkle, 1.0, brightness));
            }
        }

        if let Some(e) = first_error {
            log::warn!("Cursor spray: {} draw calls failed ({})", failures, e);
        }
        failures
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
