pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::geometry::{hypot, hypot_center, angle_relative, NVec2};
pub use simulation::states::{Mode, Planet, PlanetId, Rope, RopeId, World, SIZE_PER_MASS};
pub use simulation::forces::{accelerate, ForceKind, Influence, Stiffness, GRAV_LAW};
pub use simulation::params::{Settings, Viewport};
pub use simulation::input::{Brush, Pointer, Session};
pub use simulation::trails::TrailParticle;
pub use simulation::integrator::step;
pub use simulation::scenario::Scenario;

pub use configuration::config::{EdgeBehavior, PlanetConfig, RopeConfig, ScenarioConfig, SettingsConfig};

pub use visualization::vis2d::run_2d;

pub use benchmark::benchmark::bench_tick;
