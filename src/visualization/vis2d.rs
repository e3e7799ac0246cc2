use bevy::math::primitives::{Circle, Rectangle};
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::utils::HashMap;
use bevy::window::PrimaryWindow;

use crate::simulation::geometry::NVec2;
use crate::simulation::integrator::step;
use crate::simulation::input::Brush;
use crate::simulation::params::Viewport;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{ParticleId, PlanetId, RopeId};

/// The host frame clock runs at nominal 60 fps; a delta of 1.0 means one
/// nominal frame elapsed
const NOMINAL_FPS: f64 = 60.0;

/// Maps from registry ids to the ECS entities drawing them
#[derive(Resource, Default)]
struct PlanetSprites(HashMap<PlanetId, Entity>);

#[derive(Resource, Default)]
struct PinSprites(HashMap<PlanetId, Entity>);

#[derive(Resource, Default)]
struct RopeSprites(HashMap<RopeId, Entity>);

#[derive(Resource, Default)]
struct TrailSprites(HashMap<ParticleId, Entity>);

pub fn run_2d(scenario: Scenario) {
    println!(
        "run_2d: starting Bevy 2D viewer with {} planets",
        scenario.world.planets.len()
    );

    App::new()
        .insert_resource(scenario)
        .insert_resource(ClearColor(Color::srgb_u8(0x11, 0x11, 0x11)))
        .init_resource::<PlanetSprites>()
        .init_resource::<PinSprites>()
        .init_resource::<RopeSprites>()
        .init_resource::<TrailSprites>()
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_camera_system)
        .add_systems(
            Update,
            (
                input_system,
                physics_step_system,
                sync_trails_system,
                sync_ropes_system,
                sync_planets_system,
            )
                .chain(),
        )
        .run();
}

fn setup_camera_system(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Window-space position (top-left origin, y down) to Bevy world space
fn to_world(p: NVec2, window: &Window) -> Vec2 {
    Vec2::new(
        p.x as f32 - window.width() / 2.0,
        window.height() / 2.0 - p.y as f32,
    )
}

fn color_of(rgb: u32, alpha: f32) -> Color {
    Color::srgba_u8(
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
        (alpha * 255.0) as u8,
    )
}

/// Feed pointer and keyboard state into the interaction session
fn input_system(
    mut scenario: ResMut<Scenario>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let Scenario {
        world,
        session,
        settings,
    } = &mut *scenario;

    if let Some(cursor) = window.cursor_position() {
        session.pointer_moved(NVec2::new(f64::from(cursor.x), f64::from(cursor.y)));
    }

    if buttons.just_pressed(MouseButton::Left) {
        session.pointer_down(world, settings);
    }
    if buttons.just_released(MouseButton::Left) {
        session.pointer_up(world);
    }

    // Brush selection
    for (key, brush) in [
        (KeyCode::Digit1, Brush::Planet),
        (KeyCode::Digit2, Brush::Erase),
        (KeyCode::Digit3, Brush::Grab),
        (KeyCode::Digit4, Brush::Rope),
        (KeyCode::Digit5, Brush::Pin),
    ] {
        if keys.just_pressed(key) {
            session.brush = brush;
        }
    }

    if keys.just_pressed(KeyCode::Space) {
        settings.pause = !settings.pause;
    }
    if keys.just_pressed(KeyCode::KeyT) {
        settings.trails = !settings.trails;
    }
    if keys.just_pressed(KeyCode::KeyC) {
        world.clear();
        session.invalidate(world);
    }
}

/// Per-frame physics tick, re-reading the viewport so resizes apply live
fn physics_step_system(
    mut scenario: ResMut<Scenario>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let viewport = Viewport {
        width: f64::from(window.width()),
        height: f64::from(window.height()),
    };

    let Scenario {
        world,
        session,
        settings,
    } = &mut *scenario;

    let frame_delta = time.delta_seconds_f64() * NOMINAL_FPS;
    step(world, session, settings, viewport, frame_delta);
}

/// Reconcile planet circles (and their pin markers) with the registry
fn sync_planets_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: ResMut<PlanetSprites>,
    mut pins: ResMut<PinSprites>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut transforms: Query<&mut Transform>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    // Drop sprites of despawned planets (children, i.e. pin markers, go
    // down with them)
    sprites.0.retain(|id, entity| {
        let live = scenario.world.planets.contains_key(id);
        if !live {
            commands.entity(*entity).despawn_recursive();
            pins.0.remove(id);
        }
        live
    });

    for planet in scenario.world.planets.values() {
        let pos = to_world(planet.center(), window);
        // Spawn order doubles as draw order, planets above trails/ropes
        let z = 1.0 + planet.id as f32 * 1e-4;

        match sprites.0.get(&planet.id) {
            Some(&entity) => {
                if let Ok(mut transform) = transforms.get_mut(entity) {
                    transform.translation = pos.extend(z);
                }
            }
            None => {
                let entity = commands
                    .spawn((MaterialMesh2dBundle {
                        mesh: Mesh2dHandle(meshes.add(Circle::new(planet.size as f32))),
                        material: materials.add(ColorMaterial::from(color_of(planet.color, 1.0))),
                        transform: Transform::from_translation(pos.extend(z)),
                        ..Default::default()
                    },))
                    .id();
                sprites.0.insert(planet.id, entity);
            }
        }

        // Pin marker lives as a child at the planet's center
        let pinned = planet.mode.is_pinned();
        let marked = pins.0.contains_key(&planet.id);
        if pinned && !marked {
            if let Some(&parent) = sprites.0.get(&planet.id) {
                let marker = commands
                    .spawn(MaterialMesh2dBundle {
                        mesh: Mesh2dHandle(meshes.add(Circle::new(5.0))),
                        material: materials
                            .add(ColorMaterial::from(Color::srgb_u8(0xff, 0x66, 0x44))),
                        transform: Transform::from_xyz(0.0, 0.0, 0.01),
                        ..Default::default()
                    })
                    .id();
                commands.entity(parent).add_child(marker);
                pins.0.insert(planet.id, marker);
            }
        } else if !pinned && marked {
            if let Some(marker) = pins.0.remove(&planet.id) {
                commands.entity(marker).despawn();
            }
        }
    }
}

/// Reconcile rope segments with the registry, driven purely by each
/// rope's cosmetic visual transform
fn sync_ropes_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: ResMut<RopeSprites>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut transforms: Query<&mut Transform>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    sprites.0.retain(|id, entity| {
        let live = scenario.world.ropes.contains_key(id);
        if !live {
            commands.entity(*entity).despawn();
        }
        live
    });

    for rope in scenario.world.ropes.values() {
        let visual = rope.visual;

        // Far endpoint reconstructed from the visual's bearing
        let far = NVec2::new(
            visual.anchor.x - visual.angle.sin() * visual.length,
            visual.anchor.y - visual.angle.cos() * visual.length,
        );
        let a = to_world(visual.anchor, window);
        let b = to_world(far, window);
        let mid = (a + b) / 2.0;
        let dir = b - a;
        let rotation = Quat::from_rotation_z(dir.y.atan2(dir.x) - std::f32::consts::FRAC_PI_2);

        let transform = Transform {
            translation: mid.extend(0.5),
            rotation,
            scale: Vec3::new(1.0, visual.length.max(1.0) as f32, 1.0),
        };

        match sprites.0.get(&rope.id) {
            Some(&entity) => {
                if let Ok(mut t) = transforms.get_mut(entity) {
                    *t = transform;
                }
            }
            None => {
                let entity = commands
                    .spawn(MaterialMesh2dBundle {
                        mesh: Mesh2dHandle(meshes.add(Rectangle::new(2.0, 1.0))),
                        material: materials.add(ColorMaterial::from(Color::WHITE)),
                        transform,
                        ..Default::default()
                    })
                    .id();
                sprites.0.insert(rope.id, entity);
            }
        }
    }
}

/// Reconcile trail particles: spawn new ones, shrink/fade live ones, drop
/// expired ones
fn sync_trails_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: ResMut<TrailSprites>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(&mut Transform, &Handle<ColorMaterial>)>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    sprites.0.retain(|id, entity| {
        let live = scenario.world.particles.contains_key(id);
        if !live {
            commands.entity(*entity).despawn();
        }
        live
    });

    for (id, particle) in &scenario.world.particles {
        let pos = to_world(particle.center, window).extend(0.0);
        let scale = Vec3::splat(particle.radius.max(0.0) as f32);

        match sprites.0.get(id) {
            Some(&entity) => {
                if let Ok((mut transform, material)) = query.get_mut(entity) {
                    transform.translation = pos;
                    transform.scale = scale;
                    if let Some(mat) = materials.get_mut(material) {
                        mat.color = color_of(particle.color, particle.alpha as f32);
                    }
                }
            }
            None => {
                // Unit circle scaled by the particle radius so shrinking is
                // a transform update, not a mesh rebuild
                let entity = commands
                    .spawn(MaterialMesh2dBundle {
                        mesh: Mesh2dHandle(meshes.add(Circle::new(1.0))),
                        material: materials
                            .add(ColorMaterial::from(color_of(particle.color, particle.alpha as f32))),
                        transform: Transform {
                            translation: pos,
                            scale,
                            ..Default::default()
                        },
                        ..Default::default()
                    })
                    .id();
                sprites.0.insert(*id, entity);
            }
        }
    }
}
