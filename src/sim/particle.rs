//! Cursor spray particles

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A short-lived sparkle spawned at the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, culled at or below zero
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    pub size: f32,
    /// Brightness oscillator phase (radians)
    pub sparkle: f32,
}

impl Particle {
    /// Sample a particle around `origin` with jitter, random heading, speed, size and decay
    pub fn spawn<R: Rng>(origin: Vec2, rng: &mut R) -> Self {
        let jitter = Vec2::new(
            rng.random_range(-SPAWN_JITTER..=SPAWN_JITTER),
            rng.random_range(-SPAWN_JITTER..=SPAWN_JITTER),
        );
        let heading = rng.random_range(0.0..TAU);
        let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
        Self {
            pos: origin + jitter,
            vel: Vec2::from_angle(heading) * speed,
            life: 1.0,
            decay: rng.random_range(PARTICLE_MIN_DECAY..PARTICLE_MAX_DECAY),
            size: rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE),
            sparkle: rng.random_range(0.0..TAU),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0 && self.size > PARTICLE_MIN_VISIBLE_SIZE
    }

    /// Current sparkle brightness in [0, 1]
    #[inline]
    pub fn brightness(&self) -> f32 {
        self.sparkle.sin().abs()
    }
}

/// Advance all particles one tick, then drop the dead ones.
///
/// Survivors keep their relative order. Returns how many were culled.
pub fn advance_particles(particles: &mut Vec<Particle>) -> usize {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= p.decay;
        p.sparkle = (p.sparkle + SPARKLE_PHASE_STEP).rem_euclid(TAU);
        p.size *= PARTICLE_SHRINK;
    }
    let before = particles.len();
    particles.retain(Particle::is_alive);
    before - particles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{RngState, SPRAY_STREAM};
    use proptest::prelude::*;

    fn particle(life: f32, decay: f32, size: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            life,
            decay,
            size,
            sparkle: 0.0,
        }
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = RngState::new(3, SPRAY_STREAM).to_rng();
        let origin = Vec2::new(50.0, 50.0);
        for _ in 0..200 {
            let p = Particle::spawn(origin, &mut rng);
            assert_eq!(p.life, 1.0);
            assert!((p.pos - origin).abs().max_element() <= SPAWN_JITTER);
            assert!((PARTICLE_MIN_DECAY..PARTICLE_MAX_DECAY).contains(&p.decay));
            assert!((PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE).contains(&p.size));
            let speed = p.vel.length();
            assert!(speed >= PARTICLE_MIN_SPEED - 1e-4 && speed <= PARTICLE_MAX_SPEED + 1e-4);
        }
    }

    #[test]
    fn test_advance_moves_and_decays() {
        let mut ps = vec![particle(1.0, 0.02, 2.0)];
        advance_particles(&mut ps);
        assert_eq!(ps[0].pos, Vec2::new(1.0, -1.0));
        assert!((ps[0].life - 0.98).abs() < 1e-6);
        assert!((ps[0].size - 1.98).abs() < 1e-6);
        assert!((ps[0].sparkle - SPARKLE_PHASE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_cull_preserves_survivor_order() {
        let mut ps = vec![
            particle(1.0, 0.01, 2.0),
            particle(0.01, 0.02, 2.0),
            particle(0.5, 0.01, 2.0),
            particle(1.0, 0.01, 0.1),
        ];
        ps[0].pos = Vec2::new(1.0, 0.0);
        ps[2].pos = Vec2::new(3.0, 0.0);
        let culled = advance_particles(&mut ps);
        assert_eq!(culled, 2);
        assert_eq!(ps.len(), 2);
        assert!(ps[0].pos.x < ps[1].pos.x);
    }

    proptest! {
        #[test]
        fn prop_life_non_increasing_until_removed(
            decay in 0.001f32..0.05,
            size in 0.2f32..5.0,
        ) {
            let mut ps = vec![particle(1.0, decay, size)];
            let mut last_life = 1.0f32;
            let mut last_size = size;
            while !ps.is_empty() {
                advance_particles(&mut ps);
                if let Some(p) = ps.first() {
                    prop_assert!(p.life <= last_life);
                    prop_assert!(p.size <= last_size);
                    prop_assert!(p.life > 0.0 && p.life <= 1.0);
                    last_life = p.life;
                    last_size = p.size;
                }
            }
        }
    }
}
