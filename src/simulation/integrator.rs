//! Per-tick integrator for the sandbox
//!
//! One [`step`] call per rendered frame. For every live planet it resolves
//! the interaction mode, accumulates force contributions, applies the
//! boundary policy, integrates motion into position, and emits trail
//! particles; afterwards the trail registry decays and the rope visuals
//! are brought up to date.
//!
//! The subject planet is taken out of the registry while it ticks, so the
//! influencer loop needs no self-check and a planet despawned earlier in
//! the same tick is simply no longer found — a silent skip, not an error.

use crate::configuration::config::EdgeBehavior;
use crate::simulation::forces::{accelerate, ForceKind, Influence, COLLISION_MULTIPLIER};
use crate::simulation::geometry::{angle_relative, hypot, hypot_center};
use crate::simulation::input::Session;
use crate::simulation::params::{Settings, Viewport};
use crate::simulation::states::{Mode, Planet, PlanetId, RopeVisual, World};
use crate::simulation::trails;

/// Result of ticking a single planet
enum Outcome {
    Live,
    Despawn, // left the viewport under the despawn edge behavior
}

/// Advance the whole world by one frame
///
/// `frame_delta` is the host frame clock's elapsed-time factor; the
/// configured game speed scales it here so speed changes apply live.
/// Pause freezes everything except planets currently being dragged.
pub fn step(
    world: &mut World,
    session: &mut Session,
    settings: &Settings,
    viewport: Viewport,
    frame_delta: f64,
) {
    let delta = frame_delta * settings.game_speed;
    world.elapsed += delta;

    // Snapshot the id set; planets despawned mid-tick drop out of the map
    // and are skipped when their turn comes
    let ids: Vec<PlanetId> = world.planets.keys().copied().collect();
    for id in ids {
        let Some(mut planet) = world.planets.remove(&id) else {
            continue;
        };
        if settings.pause && !planet.mode.is_dragging() {
            world.planets.insert(id, planet);
            continue;
        }

        match tick_planet(&mut planet, world, session, settings, viewport, delta) {
            Outcome::Live => {
                world.planets.insert(id, planet);
            }
            Outcome::Despawn => {
                world.detach_ropes(id, &planet.ropes);
                session.invalidate(world);
            }
        }
    }

    if settings.pause {
        return;
    }

    trails::decay(world, delta);
    update_rope_visuals(world);
}

/// Tick one planet that has been taken out of the registry
fn tick_planet(
    planet: &mut Planet,
    world: &mut World,
    session: &Session,
    settings: &Settings,
    viewport: Viewport,
    delta: f64,
) -> Outcome {
    // A pinned planet holds its exact spot: it accumulates no motion and
    // skips the boundary policy, but still pulls on everything else as an
    // influencer in their loops
    let held_in_place = planet.mode == Mode::Pinned;

    // Interaction resolution: dragged, free, or held in place
    if planet.mode.is_dragging() {
        // Implicit damping so the planet settles onto the pointer
        planet.motion /= 2.0;
        accelerate(
            planet,
            &session.pointer.influence(),
            1.0,
            ForceKind::Held,
            delta,
        );
    } else if planet.mode == Mode::Free {
        free_interactions(planet, world, settings, delta);
    }

    if !held_in_place {
        rope_forces(planet, world, delta);
    }

    match settings.edge_behavior {
        EdgeBehavior::Collide | EdgeBehavior::CollideTopOpen => {
            // Wall bounce moves the planet, so the pin suppresses it
            if !held_in_place {
                bounce_off_walls(planet, settings, viewport);
            }
        }
        EdgeBehavior::Despawn => {
            // Applies to pinned planets too: a planet dragged off-screen
            // and released with its pin remembered must not linger
            if fully_outside(planet, viewport) {
                return Outcome::Despawn;
            }
        }
    }

    // World gravity and air friction; suppressed by the pin even while the
    // planet is being dragged
    if !planet.mode.is_pinned() {
        planet.motion.y += settings.world_gravity * delta;
        planet.motion -= planet.motion * settings.air_friction * delta;
    }

    // Integration
    if !held_in_place {
        planet.prev_position = planet.position;
        planet.position += planet.motion * delta;
    }

    if settings.trails {
        trails::emit(world, planet);
    }

    Outcome::Live
}

/// Ambient gravity and collision repulsion against every other live planet
fn free_interactions(planet: &mut Planet, world: &mut World, settings: &Settings, delta: f64) {
    let influencer_ids: Vec<PlanetId> = world.planets.keys().copied().collect();
    for other_id in influencer_ids {
        let Some(other) = world.planets.get_mut(&other_id) else {
            continue;
        };
        let influence = Influence::from(&*other);

        // Planet gravity; the multiplier short-circuits this when zeroed
        accelerate(
            planet,
            &influence,
            settings.planet_gravity_multiplier,
            ForceKind::Ambient,
            delta,
        );

        if !settings.do_planet_collision {
            continue;
        }

        // Overlap repulsion, applied from both planets' perspectives in
        // the same pass; the pair gets the impulse twice per tick, which
        // is the tuned behavior
        let (distance, _, _) = hypot(influence.center(), planet.center());
        if distance < planet.diameter().max(other.diameter()) {
            accelerate(
                planet,
                &influence,
                COLLISION_MULTIPLIER,
                ForceKind::Collision,
                delta,
            );
            // The back-impulse honors the other planet's pin: a pinned
            // planet must not bank motion it would unleash on unpin
            if other.mode != Mode::Pinned {
                let back = Influence::from(&*planet);
                accelerate(other, &back, COLLISION_MULTIPLIER, ForceKind::Collision, delta);
            }
        }
    }
}

/// Pull toward the far endpoint of every attached rope
fn rope_forces(planet: &mut Planet, world: &World, delta: f64) {
    for rope_id in planet.ropes.clone() {
        let Some(rope) = world.ropes.get(&rope_id) else {
            continue; // stale link, tolerated
        };
        let Some(partner_id) = rope.other(planet.id) else {
            continue;
        };
        let Some(partner) = world.planets.get(&partner_id) else {
            continue;
        };

        let kind = ForceKind::Rope {
            rest_length: rope.rest_length,
            stiffness: rope.stiffness,
        };
        accelerate(planet, &Influence::from(partner), 1.0, kind, delta);
    }
}

/// Reflect and clamp against the viewport walls. The ceiling only exists
/// in the fully closed collide mode.
fn bounce_off_walls(planet: &mut Planet, settings: &Settings, viewport: Viewport) {
    let d = planet.diameter();
    let bounce = settings.wall_bounce;

    // Floor
    let floor = viewport.height - d;
    if planet.position.y > floor {
        planet.position.y = floor - 1.0;
        planet.motion.y *= -bounce;
    }
    // Ceiling
    if settings.edge_behavior == EdgeBehavior::Collide && planet.position.y < 0.0 {
        planet.position.y = 1.0;
        planet.motion.y *= -bounce;
    }
    // Left wall
    if planet.position.x < 0.0 {
        planet.position.x = 1.0;
        planet.motion.x *= -bounce;
    }
    // Right wall
    let right = viewport.width - d;
    if planet.position.x > right {
        planet.position.x = right - 1.0;
        planet.motion.x *= -bounce;
    }
}

/// True once the planet's bounding box is a full diameter beyond any edge
fn fully_outside(planet: &Planet, viewport: Viewport) -> bool {
    let d = planet.diameter();
    planet.position.y < -d
        || planet.position.y > viewport.height + d
        || planet.position.x < -d
        || planet.position.x > viewport.width + d
}

/// Recompute every rope's cosmetic segment transform: anchored at endpoint
/// one's center, stretched to the center distance, rotated to the bearing
fn update_rope_visuals(world: &mut World) {
    let World {
        ropes, planets, ..
    } = world;

    for rope in ropes.values_mut() {
        let (Some(one), Some(two)) = (planets.get(&rope.one), planets.get(&rope.two)) else {
            continue;
        };

        let (distance, _, _) = hypot_center(one.position, one.size, two.position, two.size);
        rope.visual = RopeVisual {
            anchor: one.center(),
            length: distance,
            angle: angle_relative(one.position, two.position),
        };
    }
}
