//! User interface helpers: HUD, debug overlay and utilities.
//!
//! This module implements a text overlay with controller state, an optional
//! gizmo view of the level colliders and hookshot aim, and spawning of a
//! crosshair UI element. The overlay refreshes on a timer rather than every
//! frame.

use crate::player::host::collect_colliders;
use crate::player::physics::{raycast, StaticCollider};
use crate::player::{CameraFov, CharacterBody, Player, PlayerController, PlayerRig};
use crate::settings::Settings;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore};
use bevy::prelude::*;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Resource, Default)]
pub struct DebugGizmosVisible(pub bool);

#[derive(Component)]
pub struct DebugOverlayText;

/// Registers the overlay, gizmo view and their toggles.
pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_debug_overlay, spawn_debug_overlay))
            .add_systems(
                Update,
                (
                    toggle_debug_overlay,
                    toggle_debug_gizmos,
                    update_debug_overlay,
                    render_debug_gizmos,
                ),
            );
    }
}

/// Insert debug overlay resources.
pub fn setup_debug_overlay(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(
        0.25,
        TimerMode::Repeating,
    )));
    commands.insert_resource(DebugOverlayState::default());
    commands.insert_resource(DebugGizmosVisible::default());
}

/// Toggle the debug overlay visibility when its key (F1 by default) is pressed.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.controls.key_for("toggle_debug", KeyCode::F1)) {
        state.visible = !state.visible;
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_gizmos(
    mut gizmos: ResMut<DebugGizmosVisible>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.controls.key_for("toggle_gizmos", KeyCode::F2)) {
        gizmos.0 = !gizmos.0;
    }
}

/// Compass label for a horizontal facing direction (-Z is north).
#[must_use]
pub fn compass(forward: Vec3) -> &'static str {
    const LABELS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let angle = forward.x.atan2(-forward.z).to_degrees().rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = ((angle + 22.5) / 45.0) as usize % LABELS.len();
    LABELS[idx]
}

/// One overlay block describing a player's controller.
#[must_use]
pub fn describe_player(
    transform: &Transform,
    controller: &PlayerController,
    body: &CharacterBody,
    fov: Option<&CameraFov>,
) -> String {
    let pos = transform.translation;
    let look = controller.look;
    let mut text = format!(
        "Pos: ({:.1}, {:.1}, {:.1})\nFacing: {} (yaw {:.0}, pitch {:.0})\nGrounded: {}\nHookshot: {}",
        pos.x,
        pos.y,
        pos.z,
        compass(look.walk_forward()),
        look.yaw,
        look.pitch,
        body.grounded,
        controller.hookshot.label(),
    );
    if let Some(anchor) = controller.hookshot.anchor() {
        text.push_str(&format!(
            " -> ({:.1}, {:.1}, {:.1}) {:.1}m",
            anchor.x,
            anchor.y,
            anchor.z,
            pos.distance(anchor)
        ));
    }
    text.push_str(&format!(
        "\nVertical velocity: {:.2}\nMomentum: {:.2}",
        controller.vertical_velocity,
        controller.momentum.length()
    ));
    if let Some(fov) = fov {
        text.push_str(&format!("\nFOV: {:.1} -> {:.0}", fov.current, fov.target));
    }
    text
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub state: Res<'w, DebugOverlayState>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub players: Query<
        'w,
        's,
        (
            &'static Transform,
            &'static PlayerController,
            &'static CharacterBody,
            &'static PlayerRig,
        ),
        With<Player>,
    >,
    pub cameras: Query<'w, 's, &'static CameraFov>,
}

/// Refresh the debug overlay text once every interval.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else { return };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&bevy::diagnostic::FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let frame_time = ctx
        .diagnostics
        .get(&bevy::diagnostic::FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let mut out = format!("FPS: {fps:.1}\nFrame Time: {frame_time:.2} ms");
    for (transform, controller, body, rig) in &ctx.players {
        out.push('\n');
        out.push_str(&describe_player(
            transform,
            controller,
            body,
            ctx.cameras.get(rig.camera).ok(),
        ));
    }
    text.sections[0].value = out;
}

/// Spawn the (initially empty) overlay text in the top-left corner.
pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font_size: 18.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                    ..default()
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

/// Draw level colliders, the hookshot aim ray and the active rope.
#[allow(clippy::needless_pass_by_value)]
pub fn render_debug_gizmos(
    visible: Res<DebugGizmosVisible>,
    settings: Res<Settings>,
    mut gizmos: Gizmos,
    level: Query<(&Transform, &StaticCollider), Without<Player>>,
    players: Query<(&Transform, &PlayerController, &CharacterBody), With<Player>>,
) {
    if !visible.0 {
        return;
    }

    let green = Color::srgb(0.0, 1.0, 0.0);
    let colliders = collect_colliders(&level);
    for c in &colliders {
        gizmos.cuboid(
            Transform::from_translation(c.center).with_scale(c.half_extents * 2.0),
            Color::srgba(0.0, 1.0, 0.0, 0.35),
        );
    }

    for (transform, controller, body) in &players {
        gizmos.cuboid(
            Transform::from_translation(transform.translation).with_scale(body.half_extents * 2.0),
            Color::srgb(0.2, 0.6, 1.0),
        );

        let eye = transform.translation + Vec3::Y * settings.camera.eye_height;
        let forward = controller.look.view_forward();
        match raycast(&colliders, eye, forward, settings.hookshot.max_range) {
            Some(hit) => {
                gizmos.line(eye, hit, green);
                gizmos.sphere(hit, Quat::IDENTITY, 0.2, green);
            }
            None => gizmos.ray(eye, forward * settings.hookshot.max_range, Color::srgb(1.0, 0.0, 0.0)),
        }

        if let Some(anchor) = controller.hookshot.anchor() {
            gizmos.line(transform.translation, anchor, Color::srgb(1.0, 0.6, 0.0));
            gizmos.sphere(anchor, Quat::IDENTITY, settings.hookshot.arrival_distance, Color::srgb(1.0, 0.6, 0.0));
        }
    }
}

/// Spawn a crosshair UI element centered on the screen.
///
/// # Arguments
/// * `commands` - mutable `Commands` used to spawn UI nodes
pub fn spawn_crosshair(commands: &mut Commands) {
    commands
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|p| {
            p.spawn(NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    width: Val::Px(20.0),
                    height: Val::Px(2.0),
                    ..default()
                },
                background_color: Color::WHITE.into(),
                ..default()
            });
            p.spawn(NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    width: Val::Px(2.0),
                    height: Val::Px(20.0),
                    ..default()
                },
                background_color: Color::WHITE.into(),
                ..default()
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::HookshotState;

    #[test]
    fn compass_points() {
        assert_eq!(compass(Vec3::NEG_Z), "N");
        assert_eq!(compass(Vec3::X), "E");
        assert_eq!(compass(Vec3::Z), "S");
        assert_eq!(compass(Vec3::NEG_X), "W");
        assert_eq!(compass(Vec3::new(1.0, 0.0, -1.0)), "NE");
    }

    #[test]
    fn description_includes_anchor_only_while_hooked() {
        let transform = Transform::from_xyz(0.0, 1.0, 0.0);
        let body = CharacterBody::default();
        let mut controller = PlayerController::default();

        let walking = describe_player(&transform, &controller, &body, None);
        assert!(walking.contains("Hookshot: normal"));
        assert!(!walking.contains("->"));

        controller.hookshot = HookshotState::FlyingPlayer { anchor: Vec3::new(0.0, 1.0, -10.0) };
        let fov = CameraFov { current: 80.0, target: 100.0 };
        let flying = describe_player(&transform, &controller, &body, Some(&fov));
        assert!(flying.contains("Hookshot: flying -> (0.0, 1.0, -10.0) 10.0m"));
        assert!(flying.contains("FOV: 80.0 -> 100"));
    }
}
