//! Force model for the sandbox
//!
//! Defines the closed set of pull laws ([`ForceKind`]) and the shared
//! [`accelerate`] routine that decomposes a scalar pull onto the two axes
//! of a planet's motion. Every pull is scaled by the current tick's delta.

use crate::simulation::geometry::{hypot, NVec2};
use crate::simulation::states::Planet;

/// Exponential base common to all planets and the virtual pointer.
/// Loosely inspired by an inverse-square law, deliberately not one.
pub const GRAV_LAW: f64 = 1.01;

/// Substituted for a zero center distance so coincident planets get a
/// large but finite, deterministic push instead of a NaN
pub const DIST_EPSILON: f64 = 0.001;

/// Cap on the held (drag) pull magnitude
pub const HELD_PULL_CAP: f64 = 50.0;

/// Cap on the soft rope pull magnitude
pub const SOFT_ROPE_CAP: f64 = 5.0;

/// Multiplier fed to [`accelerate`] for the collision repulsion impulse
pub const COLLISION_MULTIPLIER: f64 = -10.0;

/// Rope stiffness mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stiffness {
    Soft, // cannot push, weak pull, capped
    Stiff, // pushes back below rest length, strong pull
}

impl Stiffness {
    /// Pull strength factor in the rope force law
    pub fn strength(self) -> f64 {
        match self {
            Stiffness::Stiff => 0.5,
            Stiffness::Soft => 0.1,
        }
    }
}

/// Snapshot of the mass-bearing side of a force pair
///
/// Both planets and the virtual pointer reduce to this; the pointer has
/// zero size so its center is its position
#[derive(Debug, Clone, Copy)]
pub struct Influence {
    pub position: NVec2, // top-left of the bounding box
    pub size: f64,       // radius; 0 for the pointer
    pub mass: f64,
    pub grav_law: f64,
}

impl Influence {
    pub fn center(&self) -> NVec2 {
        self.position.add_scalar(self.size)
    }
}

impl From<&Planet> for Influence {
    fn from(p: &Planet) -> Self {
        Self {
            position: p.position,
            size: p.size,
            mass: p.mass,
            grav_law: p.grav_law,
        }
    }
}

/// The closed set of pull laws
///
/// Each variant maps `(influencer, distance, delta)` to a signed scalar
/// pull; direction is applied later by [`accelerate`]
#[derive(Debug, Clone, Copy)]
pub enum ForceKind {
    /// Baseline attraction between free planets: `base^(-d) * mass * delta`
    Ambient,
    /// Pointer pull on a dragged planet. Grows with distance (positive
    /// exponent, unlike ambient) so a dragged planet cannot escape the
    /// pointer; capped at [`HELD_PULL_CAP`]
    Held,
    /// Elastic link targeting `rest_length`. Soft ropes only ever pull;
    /// stiff ropes push back when compressed
    Rope { rest_length: f64, stiffness: Stiffness },
    /// Overlap repulsion. Same law as `Ambient`; the caller supplies
    /// [`COLLISION_MULTIPLIER`] to turn it into a separating impulse
    Collision,
}

impl ForceKind {
    /// Scalar pull exerted by `influencer` at center distance `distance`
    pub fn pull(&self, influencer: &Influence, distance: f64, delta: f64) -> f64 {
        match *self {
            ForceKind::Ambient | ForceKind::Collision => {
                influencer.grav_law.powf(-distance) * influencer.mass * delta
            }
            ForceKind::Held => {
                let pull = influencer.grav_law.powf(distance * 2.0) * influencer.mass * delta;
                pull.min(HELD_PULL_CAP)
            }
            ForceKind::Rope {
                rest_length,
                stiffness,
            } => {
                // Effective distance relative to the rest length
                let distance = distance - rest_length;

                let mut pull = influencer.grav_law.powf(distance * 2.0)
                    * stiffness.strength()
                    * delta;
                if pull > SOFT_ROPE_CAP && stiffness == Stiffness::Soft {
                    pull = SOFT_ROPE_CAP;
                }
                if distance <= 0.0 {
                    match stiffness {
                        Stiffness::Stiff => pull *= -2.0, // compressed: push apart
                        Stiffness::Soft => return 0.0,    // slack: ropes cannot push
                    }
                }

                pull
            }
        }
    }
}

/// Accelerate `subject` toward (or away from) `influencer`
///
/// Splits the scalar pull into x/y components proportional to each axis'
/// share of the total center distance and adds them to the subject's
/// motion. A multiplier of exactly zero is a no-op, which is how a zeroed
/// gravity multiplier config disables planet-planet attraction outright.
///
/// Coincident centers substitute [`DIST_EPSILON`] on the distance and both
/// axis deltas, keeping the result finite and deterministic.
pub fn accelerate(
    subject: &mut Planet,
    influencer: &Influence,
    multiplier: f64,
    kind: ForceKind,
    delta: f64,
) {
    if multiplier == 0.0 {
        return;
    }

    let (mut distance, mut dist_x, mut dist_y) = hypot(influencer.center(), subject.center());
    if distance == 0.0 {
        distance = DIST_EPSILON;
        dist_x = DIST_EPSILON;
        dist_y = DIST_EPSILON;
    }

    // Proportional share of the pull on each axis
    let share = NVec2::new(dist_x / distance, dist_y / distance);

    let pull = kind.pull(influencer, distance, delta);
    subject.motion += share * (pull * multiplier);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn influence_at(x: f64, y: f64, mass: f64) -> Influence {
        Influence {
            position: NVec2::new(x, y),
            size: 0.0,
            mass,
            grav_law: GRAV_LAW,
        }
    }

    #[test]
    fn held_pull_is_capped() {
        let inf = influence_at(0.0, 0.0, 1.0);
        let pull = ForceKind::Held.pull(&inf, 10_000.0, 1.0);
        assert_eq!(pull, HELD_PULL_CAP);
    }

    #[test]
    fn soft_rope_at_rest_length_pulls_nothing() {
        let inf = influence_at(0.0, 0.0, 1.0);
        let kind = ForceKind::Rope {
            rest_length: 100.0,
            stiffness: Stiffness::Soft,
        };
        assert_eq!(kind.pull(&inf, 100.0, 1.0), 0.0);
        assert_eq!(kind.pull(&inf, 50.0, 1.0), 0.0); // slack, still no push
    }

    #[test]
    fn stiff_rope_pushes_when_compressed() {
        let inf = influence_at(0.0, 0.0, 1.0);
        let kind = ForceKind::Rope {
            rest_length: 100.0,
            stiffness: Stiffness::Stiff,
        };
        assert!(kind.pull(&inf, 50.0, 1.0) < 0.0);
        assert!(kind.pull(&inf, 150.0, 1.0) > 0.0);
    }

    #[test]
    fn ambient_pull_decays_with_distance() {
        let inf = influence_at(0.0, 0.0, 1.0);
        let near = ForceKind::Ambient.pull(&inf, 10.0, 1.0);
        let far = ForceKind::Ambient.pull(&inf, 100.0, 1.0);
        assert!(near > far);
        assert!(far > 0.0);
    }
}
