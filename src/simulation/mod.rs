pub mod geometry;
pub mod states;
pub mod params;
pub mod forces;
pub mod input;
pub mod trails;
pub mod integrator;
pub mod scenario;
