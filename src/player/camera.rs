//! Camera control and cursor helpers.
//!
//! `PlayerLook` holds the body yaw and camera pitch and applies look deltas.
//! `cursor_grab` toggles cursor lock/visibility in response to input, and
//! `lock_cursor` grabs the cursor once at startup.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

/// Stores the player's look orientation in degrees.
///
/// - `yaw`: body rotation around the vertical axis, positive turns right.
/// - `pitch`: camera tilt, positive looks down, clamped to the configured limit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerLook {
    /// Horizontal angle (degrees).
    pub yaw: f32,
    /// Vertical angle (degrees).
    pub pitch: f32,
}

impl PlayerLook {
    /// Apply a look delta (x right-positive, y up-positive) and clamp the pitch.
    ///
    /// Public so benchmarks/systems can call the same logic.
    pub fn apply_delta(&mut self, delta: Vec2, settings: &crate::settings::Settings) {
        let sensitivity = settings.controls.mouse_sensitivity;
        let limit = settings.camera.pitch_limit.abs();

        self.yaw += delta.x * sensitivity;
        self.pitch -= delta.y * sensitivity;
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    /// Rotation of the body: yaw only.
    #[must_use]
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Local rotation of the camera relative to the body: pitch only.
    #[must_use]
    pub fn camera_tilt(&self) -> Quat {
        Quat::from_rotation_x(-self.pitch.to_radians())
    }

    /// World-space view direction.
    #[must_use]
    pub fn view_forward(&self) -> Vec3 {
        self.body_rotation() * self.camera_tilt() * Vec3::NEG_Z
    }

    /// Horizontal forward axis used for walking.
    #[must_use]
    pub fn walk_forward(&self) -> Vec3 {
        self.body_rotation() * Vec3::NEG_Z
    }

    /// Horizontal right axis used for strafing.
    #[must_use]
    pub fn walk_right(&self) -> Vec3 {
        self.body_rotation() * Vec3::X
    }
}

/// Grab and hide the cursor once the primary window exists.
pub fn lock_cursor(mut wq: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut w) = wq.get_single_mut() {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }
}

/// Toggle cursor grab and visibility.
///
/// # Arguments
/// * `wq` - mutable window query to change cursor state
/// * `mb` - mouse button input to detect left-click for grabbing
/// * `kb` - keyboard input to detect the pause key to release cursor
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut wq: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<crate::settings::Settings>,
) {
    let Ok(mut w) = wq.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    let pause_kc = settings.controls.key_for("pause", KeyCode::Escape);
    if kb.just_pressed(pause_kc) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}
