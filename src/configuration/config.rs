//! Configuration types for loading sandbox scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! sandbox scenario. A scenario consists of:
//!
//! - [`SettingsConfig`] – the live-tunable physics and behavior options
//! - [`PlanetConfig`]   – initial state for each planet
//! - [`RopeConfig`]     – initial rope links between planets (by list index)
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! settings:
//!   pause: false
//!   game_speed: 1.0
//!   planet_size: 25.0
//!   planetGravityMultiplier: 0.0
//!   trails: true
//!   do_planet_collision: true
//!   worldGravity: 0.5
//!   wallBounce: 0.6
//!   edgeBehavior: "collide"     # or "collide-top-open" or "despawn"
//!   airFriction: 0.01
//!   rope_length: 100.0
//!   stiff_rope: false
//!
//! planets:
//!   - mass: 0.125
//!     x: 488.0
//!     y: 100.0
//!     pinned: true
//!   - mass: 0.125
//!     x: 350.0
//!     y: 200.0
//!
//! ropes:
//!   - one: 0
//!     two: 1
//! ```
//!
//! Missing settings keys fall back to the stock defaults, so a scenario may
//! specify only what it changes. The camelCase keys mirror the option names
//! the sandbox has always used.

use serde::Deserialize;

/// What happens when a planet reaches the edge of the viewport
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeBehavior {
    #[serde(rename = "collide")] // bounce off all four walls
    Collide,

    #[serde(rename = "collide-top-open")] // bounce off bottom/left/right, open ceiling
    CollideTopOpen,

    #[serde(rename = "despawn")] // destroy planets that fully leave the viewport
    Despawn,
}

/// Live-tunable sandbox options, re-read by the integrator every tick
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SettingsConfig {
    pub pause: bool,
    pub game_speed: f64, // multiplier applied to the frame delta
    pub planet_size: f64, // radius assigned to newly brushed planets
    #[serde(rename = "planetGravityMultiplier")]
    pub planet_gravity_multiplier: f64, // 0 disables planet-planet attraction
    pub trails: bool,
    pub do_planet_collision: bool,
    #[serde(rename = "worldGravity")]
    pub world_gravity: f64, // constant downward acceleration
    #[serde(rename = "wallBounce")]
    pub wall_bounce: f64, // restitution on wall contact
    #[serde(rename = "edgeBehavior")]
    pub edge_behavior: EdgeBehavior,
    #[serde(rename = "airFriction")]
    pub air_friction: f64, // exponential velocity damping rate
    pub rope_length: f64, // rest length stamped onto newly attached ropes
    pub stiff_rope: bool, // stiffness stamped onto newly attached ropes
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            pause: false,
            game_speed: 1.0,
            planet_size: 25.0,
            planet_gravity_multiplier: 0.0,
            trails: true,
            do_planet_collision: true,
            world_gravity: 0.5,
            wall_bounce: 0.6,
            edge_behavior: EdgeBehavior::Collide,
            air_friction: 0.01,
            rope_length: 100.0,
            stiff_rope: false,
        }
    }
}

/// Configuration for a single planet's initial state
#[derive(Deserialize, Debug)]
pub struct PlanetConfig {
    pub mass: f64,   // Mass; visual/collision radius is mass * 200
    pub x: f64,      // Initial top-left x in viewport units
    pub y: f64,      // Initial top-left y in viewport units
    pub color: Option<u32>, // 0xRRGGBB; random when omitted
    #[serde(default)]
    pub pinned: bool, // Start pinned in place
}

/// A rope between two planets, referenced by their index in the planet list
#[derive(Deserialize, Debug)]
pub struct RopeConfig {
    pub one: usize,
    pub two: usize,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub settings: SettingsConfig, // Live-tunable options
    pub planets: Vec<PlanetConfig>, // Planets present at startup
    pub ropes: Vec<RopeConfig>, // Ropes present at startup
}
