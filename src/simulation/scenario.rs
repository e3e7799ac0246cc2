//! Build a fully-initialized sandbox from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - live settings (`Settings`)
//! - world state (`World` with the configured planets and ropes)
//! - interaction state (`Session`)
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! input and integration systems.

use bevy::prelude::Resource;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::input::{stiffness_of, Session};
use crate::simulation::params::Settings;
use crate::simulation::states::{PlanetId, World};

/// Bevy resource representing a fully-initialized sandbox
///
/// In Bevy terms, this is inserted as a `Resource` and then read and
/// mutated by the systems responsible for input, integration, and
/// visualization
#[derive(Resource)]
pub struct Scenario {
    pub settings: Settings,
    pub world: World,
    pub session: Session,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        let settings: Settings = cfg.settings.into();
        let mut world = World::new();

        // Planets: map each config entry into the live registry, keeping
        // the resulting ids so ropes can reference planets by list index
        let ids: Vec<PlanetId> = cfg
            .planets
            .iter()
            .map(|pc| {
                let id = world.spawn_planet(pc.mass, pc.x, pc.y, pc.color);
                if pc.pinned {
                    if let Some(p) = world.planets.get_mut(&id) {
                        p.toggle_pin();
                    }
                }
                id
            })
            .collect();

        // Ropes by planet list index; out-of-range entries are dropped
        for rc in &cfg.ropes {
            let (Some(&one), Some(&two)) = (ids.get(rc.one), ids.get(rc.two)) else {
                continue;
            };
            world.attach_rope(one, two, settings.rope_length, stiffness_of(&settings));
        }

        Self {
            settings,
            world,
            session: Session::new(),
        }
    }

    /// The demo scene shown when no scenario file is given: a pinned
    /// anchor with a two-planet rope chain hanging off it
    pub fn demo(viewport_width: f64) -> Self {
        let settings = Settings::default();
        let mut world = World::new();

        let mass = settings.planet_size / crate::simulation::states::SIZE_PER_MASS;
        let a = world.spawn_planet(mass, viewport_width / 2.0 - 12.0, 100.0, None);
        let b = world.spawn_planet(mass, viewport_width / 2.0 - 150.0, 200.0, None);
        let c = world.spawn_planet(mass, viewport_width / 2.0 - 20.0, 350.0, None);

        if let Some(p) = world.planets.get_mut(&a) {
            p.toggle_pin();
        }
        world.attach_rope(b, a, settings.rope_length, stiffness_of(&settings));
        world.attach_rope(c, b, settings.rope_length, stiffness_of(&settings));

        Self {
            settings,
            world,
            session: Session::new(),
        }
    }
}
