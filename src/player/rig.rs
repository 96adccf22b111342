//! Spawning and validating the player rig.
//!
//! A rig is the player body plus the entities the controller drives: the
//! camera (child of the body), the rope, the anchor marker and the
//! speed-line emitter (child of the camera). The controller cannot work
//! without any of them, so a broken rig stops the app at startup.

use bevy::prelude::*;

use crate::player::controller::PlayerController;
use crate::player::effects::{AnchorMarker, HookshotPresentation, HookshotRope, SpeedLine, SpeedLines};
use crate::player::fov::CameraFov;
use crate::player::input::ControllerInput;
use crate::player::physics::CharacterBody;
use crate::player::Player;
use crate::settings::Settings;

const SPEED_LINE_COUNT: usize = 24;

/// Entities the controller drives on behalf of a player.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerRig {
    pub camera: Entity,
    pub rope: Entity,
    pub anchor_marker: Entity,
    pub speed_lines: Entity,
}

/// Spawn a complete player rig standing at `position` and return the body entity.
///
/// The camera is tagged with any `extra` components the caller needs (for
/// example a sky renderer marker).
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    settings: &Settings,
    position: Vec3,
    extra: impl Bundle,
) -> Entity {
    let rope_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.25, 0.15),
        perceptual_roughness: 0.9,
        ..default()
    });
    let rope = commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(0.06, 0.06, 1.0)),
                material: rope_material,
                visibility: Visibility::Hidden,
                ..default()
            },
            HookshotRope,
        ))
        .id();

    let anchor_marker = commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(0.25, 0.25, 0.25)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(1.0, 0.3, 0.1),
                    unlit: true,
                    ..default()
                }),
                visibility: Visibility::Hidden,
                ..default()
            },
            AnchorMarker,
        ))
        .id();

    let streak_mesh = meshes.add(Cuboid::new(0.01, 0.01, 1.6));
    let streak_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let speed_lines = commands
        .spawn((SpatialBundle { visibility: Visibility::Hidden, ..default() }, SpeedLines::default()))
        .with_children(|emitter| {
            for i in 0..SPEED_LINE_COUNT {
                let line = speed_line_seed(i);
                emitter.spawn((
                    PbrBundle {
                        mesh: streak_mesh.clone(),
                        material: streak_material.clone(),
                        ..default()
                    },
                    line,
                ));
            }
        })
        .id();

    let fov = settings.camera.normal_fov;
    let camera = commands
        .spawn((
            Camera3dBundle {
                transform: Transform::from_translation(Vec3::Y * settings.camera.eye_height),
                projection: Projection::Perspective(PerspectiveProjection {
                    fov: fov.to_radians(),
                    ..default()
                }),
                ..default()
            },
            CameraFov::new(fov),
            extra,
        ))
        .add_child(speed_lines)
        .id();

    let body = commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position)),
            Player,
            PlayerController::default(),
            ControllerInput::default(),
            CharacterBody::default(),
            HookshotPresentation::new(fov),
            PlayerRig { camera, rope, anchor_marker, speed_lines },
        ))
        .add_child(camera)
        .id();

    info!("spawned player {body:?} at {position}");
    body
}

/// Deterministic lane and phase for streak `i`, spread on a golden-angle spiral.
#[allow(clippy::cast_precision_loss)]
fn speed_line_seed(i: usize) -> SpeedLine {
    let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let angle = i as f32 * golden;
    let radius = 0.9 + 0.8 * ((i * 7) % SPEED_LINE_COUNT) as f32 / SPEED_LINE_COUNT as f32;
    SpeedLine {
        lane: Vec2::new(angle.cos(), angle.sin()) * radius,
        phase: (i as f32 / SPEED_LINE_COUNT as f32).fract(),
    }
}

/// Fail fast if any player is missing a rig entity the controller relies on.
///
/// # Panics
/// Panics when a rig references an entity that is not a camera with
/// `CameraFov`, a rope, an anchor marker or a speed-line emitter.
#[allow(clippy::needless_pass_by_value)]
pub fn validate_player_rigs(
    players: Query<(Entity, &PlayerRig), With<Player>>,
    cameras: Query<(), (With<Camera3d>, With<CameraFov>, With<Projection>)>,
    ropes: Query<(), With<HookshotRope>>,
    markers: Query<(), With<AnchorMarker>>,
    emitters: Query<(), With<SpeedLines>>,
) {
    for (player, rig) in &players {
        assert!(cameras.contains(rig.camera), "player {player:?}: camera {:?} is missing or has no CameraFov", rig.camera);
        assert!(ropes.contains(rig.rope), "player {player:?}: hookshot rope {:?} is missing", rig.rope);
        assert!(markers.contains(rig.anchor_marker), "player {player:?}: anchor marker {:?} is missing", rig.anchor_marker);
        assert!(emitters.contains(rig.speed_lines), "player {player:?}: speed lines {:?} are missing", rig.speed_lines);
    }
    debug!("validated {} player rig(s)", players.iter().count());
}
