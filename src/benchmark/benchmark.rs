use std::time::Instant;

use crate::simulation::input::Session;
use crate::simulation::integrator::step;
use crate::simulation::params::{Settings, Viewport};
use crate::simulation::states::World;

/// Time full ticks of the free-interaction loop at different world sizes
///
/// The per-tick cost is quadratic in the planet count (every planet checks
/// every other); this prints how far the toy can be pushed before frames
/// drop.
pub fn bench_tick() {
    // Different world sizes to test
    let ns = [50, 100, 200, 400, 800];
    let steps = 10;

    for n in ns {
        let mut world = World::new();

        // deterministic positions, no rand needed
        for i in 0..n {
            let i_f = i as f64;
            let x = 500.0 + (i_f * 0.37).sin() * 400.0;
            let y = 350.0 + (i_f * 0.13).cos() * 300.0;
            world.spawn_planet(0.125, x, y, Some(0xffffff));
        }

        let mut settings = Settings::default();
        settings.planet_gravity_multiplier = 1.0; // exercise the full pair loop
        settings.trails = false;

        let mut session = Session::new();
        let viewport = Viewport {
            width: 1000.0,
            height: 700.0,
        };

        // Warm up
        step(&mut world, &mut session, &settings, viewport, 1.0);

        let t0 = Instant::now();
        for _ in 0..steps {
            step(&mut world, &mut session, &settings, viewport, 1.0);
        }
        let per_tick = t0.elapsed().as_secs_f64() / steps as f64;

        println!("N = {n:4}, tick = {per_tick:8.6} s");
    }
}
