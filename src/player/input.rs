//! Per-frame input snapshot for the controller.
//!
//! `gather_input` samples keyboard and mouse once per frame into a
//! `ControllerInput` component so the controller tick never touches Bevy's
//! input resources directly.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::player::Player;
use crate::settings::Settings;

/// Everything the controller reads from the player in a single tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    /// Look delta, x right-positive and y up-positive.
    pub look: Vec2,
    /// Raw movement axes: x strafe (right-positive), y forward (forward-positive).
    pub movement: Vec2,
    /// Jump was pressed this frame.
    pub jump: bool,
    /// Hookshot was pressed this frame.
    pub hookshot: bool,
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Sample bindings and mouse motion into each player's `ControllerInput`.
///
/// Look input is dropped while the cursor is visible so menus and the paused
/// state do not turn the camera.
#[allow(clippy::needless_pass_by_value)]
pub fn gather_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    motion_events: Res<Events<MouseMotion>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<Settings>,
    mut query: Query<&mut ControllerInput, With<Player>>,
) {
    let controls = &settings.controls;

    let mut look = Vec2::ZERO;
    for ev in motion_events.iter_current_update_events() {
        // screen space grows downward; the controller wants up-positive
        look += Vec2::new(ev.delta.x, -ev.delta.y);
    }
    if controls.invert_x {
        look.x = -look.x;
    }
    if controls.invert_y {
        look.y = -look.y;
    }

    let cursor_locked = windows.get_single().is_ok_and(|w| !w.cursor.visible);
    if !cursor_locked {
        look = Vec2::ZERO;
    }

    let movement = Vec2::new(
        axis(
            keyboard.pressed(controls.key_for("right", KeyCode::KeyD)),
            keyboard.pressed(controls.key_for("left", KeyCode::KeyA)),
        ),
        axis(
            keyboard.pressed(controls.key_for("forward", KeyCode::KeyW)),
            keyboard.pressed(controls.key_for("back", KeyCode::KeyS)),
        ),
    );
    let jump = keyboard.just_pressed(controls.key_for("jump", KeyCode::Space));
    let hookshot = keyboard.just_pressed(controls.key_for("hookshot", KeyCode::KeyE));

    for mut input in &mut query {
        *input = ControllerInput { look, movement, jump, hookshot };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        assert_eq!(axis(true, true), 0.0);
        assert_eq!(axis(false, false), 0.0);
        assert_eq!(axis(true, false), 1.0);
        assert_eq!(axis(false, true), -1.0);
    }
}
