//! Core state types for the sandbox.
//!
//! Defines the live world and its inhabitants:
//! - `Planet` with its interaction [`Mode`] state machine
//! - `Rope` linking two planets through the rope registry
//! - `World` holding the three keyed registries (planets, ropes, trail
//!   particles), each with its own monotonically increasing id counter.
//!
//! Registries are `BTreeMap`s so per-tick iteration is stable and ascends
//! by spawn order.

use std::collections::BTreeMap;

use rand::Rng;

use crate::simulation::forces::{Stiffness, GRAV_LAW};
use crate::simulation::geometry::NVec2;
use crate::simulation::trails::TrailParticle;

pub type PlanetId = u64;
pub type RopeId = u64;
pub type ParticleId = u64;

/// Ratio between a planet's mass and its visual/collision radius
pub const SIZE_PER_MASS: f64 = 200.0;

/// Interaction mode of a planet. Exactly one mode is active at a time;
/// dragging takes priority over pinning but remembers it, so releasing a
/// grabbed pinned planet pins it again in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Subject to every force source
    Free,
    /// Excluded from force-driven motion; still pulls on others
    Pinned,
    /// Under direct pointer control; only the pointer and ropes pull
    Dragging { pinned: bool },
}

impl Mode {
    pub fn is_dragging(self) -> bool {
        matches!(self, Mode::Dragging { .. })
    }

    pub fn is_pinned(self) -> bool {
        matches!(self, Mode::Pinned | Mode::Dragging { pinned: true })
    }
}

/// A planet/ball in the sandbox
#[derive(Debug, Clone)]
pub struct Planet {
    pub id: PlanetId,
    pub position: NVec2, // top-left of the bounding box
    pub prev_position: NVec2, // position before the last integration
    pub motion: NVec2, // accumulated velocity
    pub mass: f64,
    pub size: f64, // radius, always mass * SIZE_PER_MASS
    pub color: u32, // 0xRRGGBB
    pub grav_law: f64,
    pub mode: Mode,
    pub ropes: Vec<RopeId>, // ropes this planet is an endpoint of
}

impl Planet {
    /// Center of the planet's circle
    pub fn center(&self) -> NVec2 {
        self.position.add_scalar(self.size)
    }

    /// Bounding box edge length
    pub fn diameter(&self) -> f64 {
        self.size * 2.0
    }

    /// Current speed, independent of direction
    pub fn speed(&self) -> f64 {
        self.motion.norm()
    }

    /// Starts click-and-drag, remembering the current pin state
    pub fn begin_drag(&mut self) {
        self.mode = match self.mode {
            Mode::Free => Mode::Dragging { pinned: false },
            Mode::Pinned => Mode::Dragging { pinned: true },
            dragging => dragging,
        };
    }

    /// Ends click-and-drag, restoring the remembered pin state
    pub fn end_drag(&mut self) {
        if let Mode::Dragging { pinned } = self.mode {
            self.mode = if pinned { Mode::Pinned } else { Mode::Free };
        }
    }

    /// Toggles the pin. Entering the pinned state zeroes motion so the
    /// planet holds exactly where it was pinned.
    pub fn toggle_pin(&mut self) {
        self.mode = match self.mode {
            Mode::Free => Mode::Pinned,
            Mode::Pinned => Mode::Free,
            Mode::Dragging { pinned } => Mode::Dragging { pinned: !pinned },
        };
        if self.mode.is_pinned() {
            self.motion = NVec2::zeros();
        }
    }
}

/// Cosmetic transform of a rope segment, recomputed every unpaused tick
/// and only ever read by the renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct RopeVisual {
    pub anchor: NVec2, // center of endpoint `one`
    pub length: f64,   // center distance between the endpoints
    pub angle: f64,    // bearing between the endpoints, radians
}

/// An elastic link between two planets
///
/// Rest length and stiffness are stamped from the live settings at attach
/// time. Both endpoints hold this rope's id; despawning either endpoint
/// removes the rope and the partner's back-reference in the same step.
#[derive(Debug, Clone)]
pub struct Rope {
    pub id: RopeId,
    pub one: PlanetId,
    pub two: PlanetId,
    pub rest_length: f64,
    pub stiffness: Stiffness,
    pub visual: RopeVisual,
}

impl Rope {
    /// The endpoint opposite `id`, if `id` is an endpoint at all
    pub fn other(&self, id: PlanetId) -> Option<PlanetId> {
        if self.one == id {
            Some(self.two)
        } else if self.two == id {
            Some(self.one)
        } else {
            None
        }
    }
}

/// The live sandbox state: three independent keyed registries and their
/// id counters
#[derive(Debug, Default)]
pub struct World {
    pub planets: BTreeMap<PlanetId, Planet>,
    pub ropes: BTreeMap<RopeId, Rope>,
    pub particles: BTreeMap<ParticleId, TrailParticle>,
    next_planet_id: PlanetId,
    next_rope_id: RopeId,
    next_particle_id: ParticleId,
    pub elapsed: f64, // total scaled time ticked so far
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a planet with its top-left at `(x, y)`. A random color is
    /// rolled when none is given.
    pub fn spawn_planet(&mut self, mass: f64, x: f64, y: f64, color: Option<u32>) -> PlanetId {
        let id = self.next_planet_id;
        self.next_planet_id += 1;

        let color = color.unwrap_or_else(|| rand::thread_rng().gen_range(1..=0xffffff));
        let position = NVec2::new(x, y);
        self.planets.insert(
            id,
            Planet {
                id,
                position,
                prev_position: position,
                motion: NVec2::zeros(),
                mass,
                size: mass * SIZE_PER_MASS,
                color,
                grav_law: GRAV_LAW,
                mode: Mode::Free,
                ropes: Vec::new(),
            },
        );
        id
    }

    /// Despawn is terminal: removes the planet and detaches every rope it
    /// was an endpoint of, clearing the partners' back-references
    pub fn despawn_planet(&mut self, id: PlanetId) {
        let Some(planet) = self.planets.remove(&id) else {
            return; // stale reference, silent no-op
        };
        self.detach_ropes(id, &planet.ropes);
    }

    /// Remove the given ropes from the registry and from the partners of
    /// `id`. Split out of [`Self::despawn_planet`] so the integrator can
    /// cascade a mid-tick despawn of a planet it has already taken out of
    /// the registry.
    pub fn detach_ropes(&mut self, id: PlanetId, rope_ids: &[RopeId]) {
        for rope_id in rope_ids {
            let Some(rope) = self.ropes.remove(rope_id) else {
                continue;
            };
            if let Some(partner) = rope.other(id) {
                if let Some(p) = self.planets.get_mut(&partner) {
                    p.ropes.retain(|r| r != rope_id);
                }
            }
        }
    }

    /// Rope two planets together. Self-ropes and absent endpoints are
    /// rejected silently.
    pub fn attach_rope(
        &mut self,
        one: PlanetId,
        two: PlanetId,
        rest_length: f64,
        stiffness: Stiffness,
    ) -> Option<RopeId> {
        if one == two || !self.planets.contains_key(&one) || !self.planets.contains_key(&two) {
            return None;
        }

        let id = self.next_rope_id;
        self.next_rope_id += 1;

        self.ropes.insert(
            id,
            Rope {
                id,
                one,
                two,
                rest_length,
                stiffness,
                visual: RopeVisual::default(),
            },
        );
        // Reciprocal links on both endpoints
        if let Some(p) = self.planets.get_mut(&one) {
            p.ropes.push(id);
        }
        if let Some(p) = self.planets.get_mut(&two) {
            p.ropes.push(id);
        }
        Some(id)
    }

    /// Detach a single rope from both endpoints
    pub fn detach_rope(&mut self, id: RopeId) {
        let Some(rope) = self.ropes.remove(&id) else {
            return;
        };
        for endpoint in [rope.one, rope.two] {
            if let Some(p) = self.planets.get_mut(&endpoint) {
                p.ropes.retain(|r| *r != id);
            }
        }
    }

    pub fn spawn_particle(&mut self, particle: TrailParticle) -> ParticleId {
        let id = self.next_particle_id;
        self.next_particle_id += 1;
        self.particles.insert(id, particle);
        id
    }

    /// Topmost planet whose circle contains `point`, newest first
    pub fn planet_at(&self, point: NVec2) -> Option<PlanetId> {
        self.planets
            .values()
            .rev()
            .find(|p| (point - p.center()).norm() <= p.size)
            .map(|p| p.id)
    }

    /// Clear-screen action: despawns every planet (ropes cascade) and
    /// every trail particle
    pub fn clear(&mut self) {
        let ids: Vec<PlanetId> = self.planets.keys().copied().collect();
        for id in ids {
            self.despawn_planet(id);
        }
        self.particles.clear();
    }
}
