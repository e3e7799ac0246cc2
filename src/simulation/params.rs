//! Live sandbox settings for the simulation
//!
//! `Settings` holds the runtime options the integrator re-reads every tick:
//! - pause flag and game speed,
//! - planet-planet gravity multiplier and collision toggle,
//! - world gravity, wall restitution, edge behavior, air friction,
//! - rope defaults (rest length, stiffness) and trail toggle

use crate::configuration::config::{EdgeBehavior, SettingsConfig};

#[derive(Debug, Clone)]
pub struct Settings {
    pub pause: bool,
    pub game_speed: f64, // frame delta multiplier
    pub planet_size: f64, // brush radius for new planets
    pub planet_gravity_multiplier: f64, // 0 disables planet-planet pull
    pub trails: bool,
    pub do_planet_collision: bool,
    pub world_gravity: f64, // downward acceleration per tick
    pub wall_bounce: f64, // restitution
    pub edge_behavior: EdgeBehavior,
    pub air_friction: f64, // damping rate
    pub rope_length: f64, // rest length for new ropes
    pub stiff_rope: bool, // stiffness for new ropes
}

impl From<SettingsConfig> for Settings {
    fn from(cfg: SettingsConfig) -> Self {
        Self {
            pause: cfg.pause,
            game_speed: cfg.game_speed,
            planet_size: cfg.planet_size,
            planet_gravity_multiplier: cfg.planet_gravity_multiplier,
            trails: cfg.trails,
            do_planet_collision: cfg.do_planet_collision,
            world_gravity: cfg.world_gravity,
            wall_bounce: cfg.wall_bounce,
            edge_behavior: cfg.edge_behavior,
            air_friction: cfg.air_friction,
            rope_length: cfg.rope_length,
            stiff_rope: cfg.stiff_rope,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        SettingsConfig::default().into()
    }
}

/// Viewport bounds used by the boundary policy
///
/// Re-read from the window every tick, never cached, so resizes take
/// effect immediately
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}
