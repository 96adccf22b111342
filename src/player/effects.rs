//! Hookshot presentation: rope, anchor marker, speed lines and camera sync.
//!
//! The controller writes what should be shown into `HookshotPresentation`;
//! the systems here turn that into transforms and visibility on the rig's
//! entities. Nothing in this module feeds back into the simulation.

use bevy::prelude::*;

use crate::player::controller::PlayerController;
use crate::player::fov::CameraFov;
use crate::player::rig::PlayerRig;
use crate::player::Player;
use crate::settings::Settings;

/// Where the rope leaves the body, in body-local space.
pub const ROPE_HAND_OFFSET: Vec3 = Vec3::new(0.35, 0.35, -0.3);

const SPEED_LINE_NEAR: f32 = -1.5;
const SPEED_LINE_FAR: f32 = -14.0;
const SPEED_LINE_RATE: f32 = 45.0;

/// Rope pose requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopePose {
    pub anchor: Vec3,
    pub length: f32,
}

/// What the player's hookshot visuals should currently show.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HookshotPresentation {
    pub rope: Option<RopePose>,
    pub anchor_marker: Option<Vec3>,
    pub speed_lines: bool,
    pub target_fov: f32,
}

impl HookshotPresentation {
    #[must_use]
    pub fn new(fov: f32) -> Self {
        Self {
            rope: None,
            anchor_marker: None,
            speed_lines: false,
            target_fov: fov,
        }
    }
}

/// The rope mesh: a unit box stretched along its local Z.
#[derive(Component)]
pub struct HookshotRope;

/// Small box placed where the last hookshot ray hit.
#[derive(Component)]
pub struct AnchorMarker;

/// Speed-line emitter parented to the camera.
#[derive(Component, Debug, Default)]
pub struct SpeedLines {
    pub active: bool,
}

/// One streak of the speed-line effect.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpeedLine {
    /// Offset from the view axis in camera space.
    pub lane: Vec2,
    /// Progress from far (0) to near (1).
    pub phase: f32,
}

/// Transform for a rope running from `start` toward `anchor`, `length` long.
#[must_use]
pub fn rope_transform(start: Vec3, anchor: Vec3, length: f32) -> Transform {
    let dir = (anchor - start).normalize_or_zero();
    let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    let forward = if dir == Vec3::ZERO { Vec3::NEG_Z } else { dir };
    Transform::from_translation(start + dir * length * 0.5)
        .looking_to(forward, up)
        .with_scale(Vec3::new(1.0, 1.0, length.max(0.0)))
}

/// Apply the controller's look and FOV choice to the rig camera.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_camera_rig(
    settings: Res<Settings>,
    players: Query<(&PlayerController, &HookshotPresentation, &PlayerRig), With<Player>>,
    mut cameras: Query<(&mut Transform, &mut CameraFov), Without<Player>>,
) {
    for (controller, presentation, rig) in &players {
        let Ok((mut transform, mut fov)) = cameras.get_mut(rig.camera) else {
            continue;
        };
        transform.translation = Vec3::Y * settings.camera.eye_height;
        transform.rotation = controller.look.camera_tilt();
        fov.target = presentation.target_fov;
    }
}

/// Stretch the rope from the player's hand toward the anchor, or hide it.
#[allow(clippy::type_complexity)]
pub fn sync_rope(
    players: Query<(&Transform, &HookshotPresentation, &PlayerRig), With<Player>>,
    mut ropes: Query<(&mut Transform, &mut Visibility), (With<HookshotRope>, Without<Player>)>,
) {
    for (body, presentation, rig) in &players {
        let Ok((mut transform, mut visibility)) = ropes.get_mut(rig.rope) else {
            continue;
        };
        match presentation.rope {
            Some(pose) => {
                let start = body.translation + body.rotation * ROPE_HAND_OFFSET;
                *transform = rope_transform(start, pose.anchor, pose.length);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Park the anchor marker on the last hit point.
#[allow(clippy::type_complexity)]
pub fn sync_anchor_marker(
    players: Query<(&HookshotPresentation, &PlayerRig), With<Player>>,
    mut markers: Query<(&mut Transform, &mut Visibility), (With<AnchorMarker>, Without<Player>)>,
) {
    for (presentation, rig) in &players {
        let Ok((mut transform, mut visibility)) = markers.get_mut(rig.anchor_marker) else {
            continue;
        };
        if let Some(point) = presentation.anchor_marker {
            transform.translation = point;
            *visibility = Visibility::Visible;
        } else {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Start or stop the speed-line emitter to match the presentation state.
pub fn sync_speed_lines(
    players: Query<(&HookshotPresentation, &PlayerRig), With<Player>>,
    mut emitters: Query<(&mut SpeedLines, &mut Visibility)>,
) {
    for (presentation, rig) in &players {
        let Ok((mut lines, mut visibility)) = emitters.get_mut(rig.speed_lines) else {
            continue;
        };
        if lines.active != presentation.speed_lines {
            lines.active = presentation.speed_lines;
        }
        *visibility = if lines.active { Visibility::Inherited } else { Visibility::Hidden };
    }
}

/// Advance a streak's phase, wrapping back to the far end.
#[must_use]
pub fn advance_phase(phase: f32, dt: f32) -> f32 {
    let span = SPEED_LINE_NEAR - SPEED_LINE_FAR;
    (phase + dt * SPEED_LINE_RATE / span).fract()
}

/// Scroll active streaks toward the camera.
#[allow(clippy::needless_pass_by_value)]
pub fn animate_speed_lines(
    time: Res<Time>,
    emitters: Query<&SpeedLines>,
    mut streaks: Query<(&mut Transform, &mut SpeedLine, &Parent)>,
) {
    let dt = time.delta_seconds();
    for (mut transform, mut line, parent) in &mut streaks {
        let Ok(emitter) = emitters.get(parent.get()) else { continue };
        if !emitter.active {
            continue;
        }
        line.phase = advance_phase(line.phase, dt);
        let z = SPEED_LINE_FAR + (SPEED_LINE_NEAR - SPEED_LINE_FAR) * line.phase;
        transform.translation = line.lane.extend(z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rope_spans_from_start_toward_anchor() {
        let start = Vec3::ZERO;
        let anchor = Vec3::new(0.0, 0.0, -10.0);
        let t = rope_transform(start, anchor, 4.0);
        assert!((t.translation - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        assert!((t.scale.z - 4.0).abs() < 1e-6);
        // local -Z points at the anchor
        assert!((t.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn vertical_rope_has_valid_rotation() {
        let t = rope_transform(Vec3::ZERO, Vec3::new(0.0, 20.0, 0.0), 5.0);
        assert!(t.rotation.is_finite());
        assert!((t.forward().as_vec3() - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn zero_length_rope_is_collapsed() {
        let t = rope_transform(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 0.0);
        assert_eq!(t.scale.z, 0.0);
        assert_eq!(t.translation, Vec3::ZERO);
    }

    #[test]
    fn streak_phase_wraps() {
        let mut phase = 0.0;
        for _ in 0..500 {
            phase = advance_phase(phase, 0.016);
            assert!((0.0..1.0).contains(&phase));
        }
    }
}
