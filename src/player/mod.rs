//! First-person player: look, grounded movement and the hookshot.
//!
//! The controller itself (`controller::tick`) is engine-agnostic and talks to
//! the world through `ControllerHost`. The rest of this module wires it into
//! Bevy: input sampling, the `WorldHost` adapter, rig spawning and the
//! presentation systems.
//!
//! # Example:
//!
//! ```ignore
//! app.add_plugins(PlayerControllerPlugin);
//! // in a startup system
//! spawn_player(&mut commands, &mut meshes, &mut materials, &settings, Vec3::Y * 2.0, ());
//! ```
pub mod camera;
pub mod controller;
pub mod effects;
pub mod fov;
pub mod hookshot;
pub mod host;
pub mod input;
pub mod movement;
pub mod physics;
pub mod rig;

use bevy::prelude::*;

pub use camera::{cursor_grab, lock_cursor, PlayerLook};
pub use controller::{tick, ControllerHost, PlayerController};
pub use effects::HookshotPresentation;
pub use fov::CameraFov;
pub use hookshot::{FlightExit, HookshotEvent, HookshotState};
pub use host::{player_controller, WorldHost};
pub use input::{gather_input, ControllerInput};
pub use physics::{BoxCollider, CharacterBody, StaticCollider};
pub use rig::{spawn_player, validate_player_rigs, PlayerRig};

/// Marks the player body entity.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Ordering of the per-frame player work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSet {
    Input,
    Simulate,
    Present,
}

/// Registers the controller, its input and its presentation systems.
pub struct PlayerControllerPlugin;

impl Plugin for PlayerControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HookshotEvent>()
            .configure_sets(
                Update,
                (PlayerSet::Input, PlayerSet::Simulate, PlayerSet::Present).chain(),
            )
            .add_systems(Startup, lock_cursor)
            .add_systems(PostStartup, validate_player_rigs)
            .add_systems(Update, (cursor_grab, gather_input).chain().in_set(PlayerSet::Input))
            .add_systems(Update, player_controller.in_set(PlayerSet::Simulate))
            .add_systems(
                Update,
                (
                    (
                        effects::sync_camera_rig,
                        effects::sync_rope,
                        effects::sync_anchor_marker,
                        effects::sync_speed_lines,
                    ),
                    (fov::ease_camera_fov, effects::animate_speed_lines),
                )
                    .chain()
                    .in_set(PlayerSet::Present),
            )
            .add_systems(Update, log_hookshot_events.after(PlayerSet::Simulate));
    }
}

fn log_hookshot_events(mut events: EventReader<HookshotEvent>) {
    for event in events.read() {
        info!("hookshot: {event:?}");
    }
}
