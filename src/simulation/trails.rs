//! Fading trail particles
//!
//! Purely cosmetic: particles are emitted behind moving planets and never
//! feed back into the physics. Each one shrinks and fades every tick and
//! removes itself from the registry once fully transparent.

use crate::simulation::geometry::{hypot, NVec2};
use crate::simulation::states::{Planet, World};

/// Fraction of the radius lost per delta unit
const SHRINK_RATE: f64 = 0.02;

/// Alpha lost per delta unit
const FADE_RATE: f64 = 0.005;

/// Particles emitted per unit of distance travelled in one frame
const TRAIL_RESOLUTION: f64 = 0.25;

/// Alpha cap; alpha below the cap scales with the emitting planet's speed
const ALPHA_CAP: f64 = 0.02;

/// One decaying trail marker. Positioned by center so shrinking stays
/// symmetric about it.
#[derive(Debug, Clone)]
pub struct TrailParticle {
    pub center: NVec2,
    pub radius: f64,
    pub alpha: f64,
    pub color: u32,
}

impl TrailParticle {
    /// Decay one tick. Returns false once the particle has expired and
    /// must leave the registry.
    pub fn tick(&mut self, delta: f64) -> bool {
        self.radius -= self.radius * SHRINK_RATE * delta;
        self.alpha -= FADE_RATE * delta;
        self.alpha > 0.0
    }
}

/// Emit trail particles for one planet after integration.
///
/// Lays a dotted line of particles along the last frame's displacement
/// (one per four units of distance, positions snapped up to whole units)
/// and always one at the current center. Alpha scales with speed up to
/// [`ALPHA_CAP`]; radius matches the planet's own.
pub fn emit(world: &mut World, planet: &Planet) {
    let alpha = (planet.speed() / 1000.0).min(ALPHA_CAP);
    let radius = planet.size;
    let color = planet.color;

    let (dist, dist_x, dist_y) = hypot(planet.position, planet.prev_position);

    let steps = (dist * TRAIL_RESOLUTION).floor() as u32;
    for i in 0..steps {
        let progress = f64::from(i) / f64::from(steps);
        let pos = NVec2::new(
            (planet.position.x + dist_x * progress).ceil(),
            (planet.position.y + dist_y * progress).ceil(),
        );

        world.spawn_particle(TrailParticle {
            center: pos.add_scalar(planet.size),
            radius,
            alpha,
            color,
        });
    }

    world.spawn_particle(TrailParticle {
        center: planet.center(),
        radius,
        alpha,
        color,
    });
}

/// Decay every live particle and drop the expired ones
pub fn decay(world: &mut World, delta: f64) {
    world.particles.retain(|_, particle| particle.tick(delta));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_alpha_strictly_decreases() {
        let mut p = TrailParticle {
            center: NVec2::new(0.0, 0.0),
            radius: 5.0,
            alpha: 0.02,
            color: 0xffffff,
        };
        let mut prev = p.alpha;
        for _ in 0..3 {
            assert!(p.tick(1.0));
            assert!(p.alpha < prev);
            prev = p.alpha;
        }
    }

    #[test]
    fn particle_expires_at_zero_alpha() {
        let mut p = TrailParticle {
            center: NVec2::new(0.0, 0.0),
            radius: 5.0,
            alpha: 0.005,
            color: 0xffffff,
        };
        assert!(!p.tick(1.0));
    }
}
