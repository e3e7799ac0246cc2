//! Pointer state and brush gestures
//!
//! The viewer translates raw window events into calls on [`Session`]; the
//! core never touches the windowing layer directly. The pointer doubles as
//! a virtual mass-1 body so the drag force reuses the ordinary force model.

use crate::simulation::forces::{Influence, GRAV_LAW};
use crate::simulation::geometry::NVec2;
use crate::simulation::params::Settings;
use crate::simulation::states::{PlanetId, World, SIZE_PER_MASS};

/// The active tool applied by pointer presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Brush {
    #[default]
    Planet, // spawn a planet under the pointer
    Erase,  // despawn the planet under the pointer
    Grab,   // drag the planet under the pointer
    Rope,   // two-click gesture linking two planets
    Pin,    // toggle pinning of the planet under the pointer
}

/// The pointer in simulation coordinates, acting as a virtual zero-size
/// body with unit mass
#[derive(Debug, Clone, Copy)]
pub struct Pointer {
    pub position: NVec2,
}

impl Pointer {
    pub fn influence(&self) -> Influence {
        Influence {
            position: self.position,
            size: 0.0,
            mass: 1.0,
            grav_law: GRAV_LAW,
        }
    }
}

/// Per-session interaction state: pointer, brush, and the references the
/// gestures are in the middle of building
#[derive(Debug)]
pub struct Session {
    pub pointer: Pointer,
    pub brush: Brush,
    pub pressed: bool, // primary button currently held
    pub dragging: Option<PlanetId>,
    pub rope_selection: Option<PlanetId>, // first click of the rope gesture
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pointer: Pointer {
                position: NVec2::zeros(),
            },
            brush: Brush::Planet,
            pressed: false,
            dragging: None,
            rope_selection: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, position: NVec2) {
        self.pointer.position = position;
    }

    /// Primary button press: applies the active brush. Invalid gestures
    /// (self-rope, second selection already roped, stale ids) fall through
    /// silently with no state change.
    pub fn pointer_down(&mut self, world: &mut World, settings: &Settings) {
        self.pressed = true;

        if let Some(id) = world.planet_at(self.pointer.position) {
            match self.brush {
                Brush::Erase => {
                    world.despawn_planet(id);
                    self.invalidate(world);
                }
                Brush::Grab => self.begin_drag(world, id),
                Brush::Rope => match self.rope_selection.take() {
                    Some(pending) => {
                        // Second click completes the link, but only onto an
                        // unroped planet and never back onto the first
                        let unroped = world
                            .planets
                            .get(&id)
                            .is_some_and(|p| p.ropes.is_empty());
                        if pending != id && unroped {
                            world.attach_rope(
                                pending,
                                id,
                                settings.rope_length,
                                stiffness_of(settings),
                            );
                        }
                    }
                    None => self.rope_selection = Some(id),
                },
                Brush::Pin => {
                    if let Some(p) = world.planets.get_mut(&id) {
                        p.toggle_pin();
                    }
                }
                Brush::Planet => {}
            }
        }

        // The planet brush spawns regardless of what was under the pointer,
        // centered on it; a planet spawned under a held button starts
        // dragging until release
        if self.brush == Brush::Planet && self.dragging.is_none() {
            let size = settings.planet_size;
            let id = world.spawn_planet(
                size / SIZE_PER_MASS,
                self.pointer.position.x - size,
                self.pointer.position.y - size,
                None,
            );
            if self.pressed {
                self.begin_drag(world, id);
            }
        }
    }

    /// Primary button release ends any drag in progress
    pub fn pointer_up(&mut self, world: &mut World) {
        self.pressed = false;
        if let Some(id) = self.dragging.take() {
            if let Some(p) = world.planets.get_mut(&id) {
                p.end_drag();
            }
        }
    }

    fn begin_drag(&mut self, world: &mut World, id: PlanetId) {
        if let Some(p) = world.planets.get_mut(&id) {
            p.begin_drag();
            self.dragging = Some(id);
        }
    }

    /// Drop any reference to a planet that no longer exists. Called after
    /// every despawn source so stale ids are never carried across ticks.
    pub fn invalidate(&mut self, world: &World) {
        if self
            .dragging
            .is_some_and(|id| !world.planets.contains_key(&id))
        {
            self.dragging = None;
        }
        if self
            .rope_selection
            .is_some_and(|id| !world.planets.contains_key(&id))
        {
            self.rope_selection = None;
        }
    }
}

/// Stiffness stamped onto ropes attached under the current settings
pub fn stiffness_of(settings: &Settings) -> crate::simulation::forces::Stiffness {
    if settings.stiff_rope {
        crate::simulation::forces::Stiffness::Stiff
    } else {
        crate::simulation::forces::Stiffness::Soft
    }
}
