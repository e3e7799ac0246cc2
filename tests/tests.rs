use gravtoy::simulation::forces::{accelerate, ForceKind, Influence, Stiffness, COLLISION_MULTIPLIER};
use gravtoy::simulation::geometry::NVec2;
use gravtoy::simulation::input::{Brush, Session};
use gravtoy::simulation::integrator::step;
use gravtoy::simulation::params::{Settings, Viewport};
use gravtoy::simulation::states::{Mode, PlanetId, World};
use gravtoy::simulation::trails::TrailParticle;
use gravtoy::configuration::config::EdgeBehavior;

/// Standard test viewport
pub fn viewport() -> Viewport {
    Viewport {
        width: 1000.0,
        height: 700.0,
    }
}

/// Settings with every ambient force silenced, so only the interaction
/// under test moves anything
pub fn quiet_settings() -> Settings {
    let mut s = Settings::default();
    s.planet_gravity_multiplier = 0.0;
    s.do_planet_collision = false;
    s.world_gravity = 0.0;
    s.air_friction = 0.0;
    s.trails = false;
    s
}

/// Spawn a planet of radius 25 with its center at `(cx, cy)`
pub fn planet_centered(world: &mut World, cx: f64, cy: f64) -> PlanetId {
    world.spawn_planet(0.125, cx - 25.0, cy - 25.0, Some(0xffffff))
}

/// Advance the world `n` ticks with a neutral frame delta
pub fn run_ticks(world: &mut World, session: &mut Session, settings: &Settings, n: usize) {
    for _ in 0..n {
        step(world, session, settings, viewport(), 1.0);
    }
}

// ==================================================================================
// Force model tests
// ==================================================================================

#[test]
fn collision_impulse_is_symmetric() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 500.0, 300.0);
    let b = planet_centered(&mut world, 530.0, 300.0);

    let inf_a = Influence::from(&world.planets[&a]);
    let inf_b = Influence::from(&world.planets[&b]);

    // Apply both sides of the pair from identical distance inputs
    let pa = world.planets.get_mut(&a).unwrap();
    accelerate(pa, &inf_b, COLLISION_MULTIPLIER, ForceKind::Collision, 1.0);
    let motion_a = pa.motion;

    let pb = world.planets.get_mut(&b).unwrap();
    accelerate(pb, &inf_a, COLLISION_MULTIPLIER, ForceKind::Collision, 1.0);
    let motion_b = pb.motion;

    assert!(
        (motion_a + motion_b).norm() < 1e-12,
        "impulses not equal and opposite: {motion_a:?} vs {motion_b:?}"
    );
    assert!(motion_a.norm() > 0.0, "no impulse applied at all");
    // Repulsion: A sits left of B, so A must be pushed further left
    assert!(motion_a.x < 0.0);
    assert!(motion_b.x > 0.0);
}

#[test]
fn zero_distance_accelerate_is_finite_and_deterministic() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 500.0, 300.0);
    let b = planet_centered(&mut world, 500.0, 300.0); // coincident

    let inf = Influence::from(&world.planets[&b]);
    let planet = world.planets.get_mut(&a).unwrap();

    accelerate(planet, &inf, 1.0, ForceKind::Ambient, 1.0);
    let first = planet.motion;
    assert!(first.x.is_finite() && first.y.is_finite());
    assert!(!first.x.is_nan() && !first.y.is_nan());

    planet.motion = NVec2::zeros();
    accelerate(planet, &inf, 1.0, ForceKind::Ambient, 1.0);
    assert_eq!(planet.motion, first, "epsilon substitution must be deterministic");
}

#[test]
fn zero_multiplier_is_a_no_op() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 500.0, 300.0);
    let b = planet_centered(&mut world, 600.0, 300.0);

    let inf = Influence::from(&world.planets[&b]);
    let planet = world.planets.get_mut(&a).unwrap();
    accelerate(planet, &inf, 0.0, ForceKind::Ambient, 1.0);

    assert_eq!(planet.motion, NVec2::zeros());
}

// ==================================================================================
// Mode state machine tests
// ==================================================================================

#[test]
fn mode_transition_table() {
    let mut world = World::new();
    let id = planet_centered(&mut world, 500.0, 300.0);
    let p = world.planets.get_mut(&id).unwrap();

    assert_eq!(p.mode, Mode::Free);

    // Free -> Dragging (unpinned) -> Free
    p.begin_drag();
    assert_eq!(p.mode, Mode::Dragging { pinned: false });
    p.end_drag();
    assert_eq!(p.mode, Mode::Free);

    // Free -> Pinned -> Dragging (remembers pin) -> Pinned
    p.toggle_pin();
    assert_eq!(p.mode, Mode::Pinned);
    p.begin_drag();
    assert_eq!(p.mode, Mode::Dragging { pinned: true });
    assert!(p.mode.is_dragging() && p.mode.is_pinned());
    p.end_drag();
    assert_eq!(p.mode, Mode::Pinned);

    // Unpin while dragging sticks after release
    p.begin_drag();
    p.toggle_pin();
    p.end_drag();
    assert_eq!(p.mode, Mode::Free);
}

#[test]
fn pinned_planet_never_moves() {
    let mut world = World::new();
    let pinned = planet_centered(&mut world, 500.0, 300.0);
    // Overlapping neighbor (centers 30 apart, diameters 50) so the
    // collision repulsion path fires too, not just ambient gravity
    planet_centered(&mut world, 530.0, 300.0);

    world.planets.get_mut(&pinned).unwrap().toggle_pin();
    let before = world.planets[&pinned].position;

    let mut settings = quiet_settings();
    settings.planet_gravity_multiplier = 1.0;
    settings.do_planet_collision = true;
    settings.world_gravity = 0.5;

    let mut session = Session::new();
    run_ticks(&mut world, &mut session, &settings, 200);

    let after = &world.planets[&pinned];
    assert_eq!(after.position, before);
    assert_eq!(after.motion, NVec2::zeros());
}

#[test]
fn pinned_planet_banks_no_collision_impulse() {
    let mut world = World::new();
    let pinned = planet_centered(&mut world, 500.0, 300.0);
    let free = planet_centered(&mut world, 520.0, 300.0); // overlapping
    world.planets.get_mut(&pinned).unwrap().toggle_pin();

    let mut settings = quiet_settings();
    settings.do_planet_collision = true;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    // The free planet is repelled; the pinned one must not accumulate the
    // back-impulse it would otherwise unleash on unpin
    assert!(world.planets[&free].motion.norm() > 0.0);
    assert_eq!(world.planets[&pinned].motion, NVec2::zeros());

    world.planets.get_mut(&pinned).unwrap().toggle_pin();
    assert_eq!(world.planets[&pinned].motion, NVec2::zeros());
}

#[test]
fn dragged_planet_moves_even_while_paused() {
    let mut world = World::new();
    let dragged = planet_centered(&mut world, 100.0, 100.0);
    let frozen = planet_centered(&mut world, 400.0, 400.0);
    world.planets.get_mut(&frozen).unwrap().motion = NVec2::new(5.0, 0.0);

    let mut settings = quiet_settings();
    settings.pause = true;

    let mut session = Session::new();
    session.pointer_moved(NVec2::new(900.0, 500.0));
    world.planets.get_mut(&dragged).unwrap().begin_drag();
    session.dragging = Some(dragged);

    let dragged_before = world.planets[&dragged].position;
    let frozen_before = world.planets[&frozen].position;
    run_ticks(&mut world, &mut session, &settings, 5);

    assert_ne!(world.planets[&dragged].position, dragged_before);
    // Pause freezes everything not under the pointer
    assert_eq!(world.planets[&frozen].position, frozen_before);
    assert_eq!(world.planets[&frozen].motion, NVec2::new(5.0, 0.0));
}

// ==================================================================================
// Rope tests
// ==================================================================================

#[test]
fn soft_rope_at_rest_length_is_idle() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 450.0, 300.0);
    let b = planet_centered(&mut world, 550.0, 300.0); // exactly 100 apart
    world.attach_rope(a, b, 100.0, Stiffness::Soft).unwrap();

    let settings = quiet_settings();
    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    assert_eq!(world.planets[&a].motion, NVec2::zeros());
    assert_eq!(world.planets[&b].motion, NVec2::zeros());
}

#[test]
fn rope_links_are_reciprocal() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 400.0, 300.0);
    let b = planet_centered(&mut world, 600.0, 300.0);

    let rope = world.attach_rope(a, b, 100.0, Stiffness::Soft).unwrap();
    assert!(world.planets[&a].ropes.contains(&rope));
    assert!(world.planets[&b].ropes.contains(&rope));

    world.detach_rope(rope);
    assert!(world.ropes.is_empty());
    assert!(world.planets[&a].ropes.is_empty());
    assert!(world.planets[&b].ropes.is_empty());
}

#[test]
fn self_ropes_are_rejected() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 400.0, 300.0);
    assert!(world.attach_rope(a, a, 100.0, Stiffness::Soft).is_none());
    assert!(world.ropes.is_empty());
    assert!(world.planets[&a].ropes.is_empty());
}

#[test]
fn despawn_cascade_leaves_no_dangling_ropes() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 300.0, 300.0);
    let b = planet_centered(&mut world, 400.0, 300.0);
    let c = planet_centered(&mut world, 500.0, 300.0);
    world.attach_rope(a, b, 100.0, Stiffness::Soft).unwrap();
    world.attach_rope(b, c, 100.0, Stiffness::Soft).unwrap();

    world.despawn_planet(b);

    assert!(!world.planets.contains_key(&b));
    assert!(world.ropes.is_empty(), "ropes must cascade with their endpoint");
    assert!(world.planets[&a].ropes.is_empty());
    assert!(world.planets[&c].ropes.is_empty());
}

#[test]
fn rope_chain_hangs_without_runaway() {
    // A pinned anchor with a two-rope chain below it, stretched past the
    // rest length; the chain must oscillate toward rest without diverging
    let mut world = World::new();
    let a = planet_centered(&mut world, 525.0, 125.0);
    let b = planet_centered(&mut world, 525.0, 275.0); // 150 from a
    let c = planet_centered(&mut world, 525.0, 435.0); // 160 from b
    world.planets.get_mut(&a).unwrap().toggle_pin();
    world.attach_rope(b, a, 100.0, Stiffness::Soft).unwrap();
    world.attach_rope(c, b, 100.0, Stiffness::Soft).unwrap();

    let mut settings = quiet_settings();
    settings.air_friction = 0.01;

    let anchor = world.planets[&a].position;
    let mut session = Session::new();
    for _ in 0..500 {
        step(&mut world, &mut session, &settings, viewport(), 1.0);

        // Bounded velocity growth, every tick
        for p in world.planets.values() {
            assert!(
                p.speed() < 50.0,
                "rope chain diverged, speed {}",
                p.speed()
            );
        }
    }

    assert_eq!(world.planets[&a].position, anchor);

    // The stretched ropes must have drawn the chain closer to rest length
    let dist_ab = (world.planets[&a].center() - world.planets[&b].center()).norm();
    let dist_bc = (world.planets[&b].center() - world.planets[&c].center()).norm();
    assert!(dist_ab < 150.0, "b never approached its anchor: {dist_ab}");
    assert!(dist_bc < 160.0, "c never approached b: {dist_bc}");
}

// ==================================================================================
// Boundary tests
// ==================================================================================

#[test]
fn floor_collision_reflects_and_clamps() {
    let mut world = World::new();
    let id = world.spawn_planet(0.125, 500.0, 655.0, Some(0xffffff)); // past floor 650
    world.planets.get_mut(&id).unwrap().motion = NVec2::new(0.0, 10.0);

    let mut settings = quiet_settings();
    settings.edge_behavior = EdgeBehavior::Collide;
    settings.wall_bounce = 0.6;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    let p = &world.planets[&id];
    assert!(
        (p.motion.y - (-6.0)).abs() < 1e-12,
        "velocity not reflected and scaled: {}",
        p.motion.y
    );
    assert!(p.position.y <= 650.0, "left past the floor: {}", p.position.y);
}

#[test]
fn top_open_mode_has_no_ceiling() {
    let mut world = World::new();
    let id = world.spawn_planet(0.125, 500.0, -20.0, Some(0xffffff));
    world.planets.get_mut(&id).unwrap().motion = NVec2::new(0.0, -1.0);

    let mut settings = quiet_settings();
    settings.edge_behavior = EdgeBehavior::CollideTopOpen;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    let p = &world.planets[&id];
    assert!(p.motion.y < 0.0, "ceiling bounced in top-open mode");
    assert!(p.position.y < -20.0);
}

#[test]
fn despawn_on_exit_removes_planet_and_its_ropes() {
    let mut world = World::new();
    let escaping = world.spawn_planet(0.125, 500.0, 800.0, Some(0xffffff)); // below 700 + 50
    let partner = planet_centered(&mut world, 500.0, 300.0);
    world
        .attach_rope(escaping, partner, 100.0, Stiffness::Soft)
        .unwrap();

    let mut settings = quiet_settings();
    settings.edge_behavior = EdgeBehavior::Despawn;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    assert!(!world.planets.contains_key(&escaping));
    assert!(world.ropes.is_empty());
    assert!(world.planets[&partner].ropes.is_empty());
}

#[test]
fn despawn_on_exit_applies_to_pinned_planets() {
    // A planet dragged off-screen and released with its pin remembered
    // must still be culled, not linger pinned outside the viewport
    let mut world = World::new();
    let id = world.spawn_planet(0.125, 500.0, 800.0, Some(0xffffff)); // below 700 + 50
    world.planets.get_mut(&id).unwrap().toggle_pin();

    let mut settings = quiet_settings();
    settings.edge_behavior = EdgeBehavior::Despawn;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    assert!(world.planets.is_empty());
}

// ==================================================================================
// Trail tests
// ==================================================================================

#[test]
fn trail_alpha_decreases_until_removal() {
    let mut world = World::new();
    let id = world.spawn_particle(TrailParticle {
        center: NVec2::new(100.0, 100.0),
        radius: 10.0,
        alpha: 0.012,
        color: 0xffffff,
    });

    let settings = quiet_settings();
    let mut session = Session::new();

    // 0.005 alpha lost per unit delta: two ticks survive, the third kills
    let mut prev = world.particles[&id].alpha;
    for _ in 0..2 {
        step(&mut world, &mut session, &settings, viewport(), 1.0);
        let alpha = world.particles[&id].alpha;
        assert!(alpha < prev);
        prev = alpha;
    }
    step(&mut world, &mut session, &settings, viewport(), 1.0);
    assert!(
        !world.particles.contains_key(&id),
        "expired particle still registered"
    );
}

#[test]
fn moving_planet_emits_trail_particles() {
    let mut world = World::new();
    let id = planet_centered(&mut world, 500.0, 300.0);
    world.planets.get_mut(&id).unwrap().motion = NVec2::new(12.0, 0.0);

    let mut settings = quiet_settings();
    settings.trails = true;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    assert!(!world.particles.is_empty());
    for particle in world.particles.values() {
        // Alpha scales with speed, capped at 0.02
        assert!(particle.alpha <= 0.02);
        assert!(particle.radius > 0.0);
    }
}

#[test]
fn fast_planet_lays_interpolated_trail_line() {
    let mut world = World::new();
    let id = planet_centered(&mut world, 500.0, 300.0);
    world.planets.get_mut(&id).unwrap().motion = NVec2::new(40.0, 0.0);

    let mut settings = quiet_settings();
    settings.trails = true;

    let mut session = Session::new();
    step(&mut world, &mut session, &settings, viewport(), 1.0);

    // 40 units covered in one frame: one particle per 4 units along the
    // displacement plus one at the current center
    assert_eq!(world.particles.len(), 11);
}

// ==================================================================================
// Gesture tests
// ==================================================================================

#[test]
fn planet_brush_spawns_centered_and_dragging() {
    let mut world = World::new();
    let settings = quiet_settings();
    let mut session = Session::new();
    session.brush = Brush::Planet;
    session.pointer_moved(NVec2::new(300.0, 200.0));

    session.pointer_down(&mut world, &settings);

    assert_eq!(world.planets.len(), 1);
    let p = world.planets.values().next().unwrap();
    assert_eq!(p.center(), NVec2::new(300.0, 200.0));
    assert_eq!(p.size, settings.planet_size);
    assert!(p.mode.is_dragging(), "held press must start a drag");
    assert_eq!(session.dragging, Some(p.id));
    assert!(session.pressed);

    let id = p.id;
    session.pointer_up(&mut world);
    assert_eq!(world.planets[&id].mode, Mode::Free);
    assert!(session.dragging.is_none());
    assert!(!session.pressed);
}

#[test]
fn rope_gesture_links_two_clicks() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 300.0, 300.0);
    let b = planet_centered(&mut world, 600.0, 300.0);

    let settings = quiet_settings();
    let mut session = Session::new();
    session.brush = Brush::Rope;

    session.pointer_moved(world.planets[&a].center());
    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);
    assert_eq!(session.rope_selection, Some(a));
    assert!(world.ropes.is_empty(), "first click must only mark the source");

    session.pointer_moved(world.planets[&b].center());
    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);

    assert!(session.rope_selection.is_none());
    assert_eq!(world.ropes.len(), 1);
    let rope = world.ropes.values().next().unwrap();
    assert_eq!(rope.rest_length, settings.rope_length);
}

#[test]
fn rope_gesture_rejects_roped_second_selection() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 300.0, 300.0);
    let b = planet_centered(&mut world, 600.0, 300.0);
    let c = planet_centered(&mut world, 450.0, 500.0);
    world.attach_rope(a, b, 100.0, Stiffness::Soft).unwrap();

    let settings = quiet_settings();
    let mut session = Session::new();
    session.brush = Brush::Rope;

    // c -> b must fall through silently: b is already roped
    session.pointer_moved(world.planets[&c].center());
    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);
    session.pointer_moved(world.planets[&b].center());
    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);

    assert_eq!(world.ropes.len(), 1);
    assert!(world.planets[&c].ropes.is_empty());
    assert!(session.rope_selection.is_none(), "gesture must still reset");
}

#[test]
fn erase_brush_despawns_and_invalidates_references() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 300.0, 300.0);

    let settings = quiet_settings();
    let mut session = Session::new();
    session.brush = Brush::Rope;
    session.pointer_moved(world.planets[&a].center());
    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);
    assert_eq!(session.rope_selection, Some(a));

    session.brush = Brush::Erase;
    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);

    assert!(world.planets.is_empty());
    assert!(session.rope_selection.is_none(), "stale selection survived despawn");
}

#[test]
fn clear_screen_empties_every_registry() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 300.0, 300.0);
    let b = planet_centered(&mut world, 600.0, 300.0);
    world.attach_rope(a, b, 100.0, Stiffness::Soft).unwrap();
    world.spawn_particle(TrailParticle {
        center: NVec2::new(100.0, 100.0),
        radius: 10.0,
        alpha: 0.02,
        color: 0xffffff,
    });

    world.clear();

    assert!(world.planets.is_empty());
    assert!(world.ropes.is_empty(), "ropes must cascade with their planets");
    assert!(world.particles.is_empty());
}

#[test]
fn pin_brush_toggles() {
    let mut world = World::new();
    let a = planet_centered(&mut world, 300.0, 300.0);

    let settings = quiet_settings();
    let mut session = Session::new();
    session.brush = Brush::Pin;
    session.pointer_moved(world.planets[&a].center());

    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);
    assert_eq!(world.planets[&a].mode, Mode::Pinned);

    session.pointer_down(&mut world, &settings);
    session.pointer_up(&mut world);
    assert_eq!(world.planets[&a].mode, Mode::Free);
}
