//! The player controller: state, host capabilities and the per-tick dispatch.
//!
//! `tick` is engine-agnostic. Everything it needs from the world (collision,
//! ray queries, presentation) goes through [`ControllerHost`], and the frame
//! delta is passed in explicitly, so the state machine runs the same under
//! Bevy (`host::WorldHost`) and under the recording host used in tests.

use bevy::prelude::*;

use crate::player::camera::PlayerLook;
use crate::player::hookshot::{
    clamped_pull_speed, extend_rope, flight_exit, FlightExit, HookshotEvent, HookshotState,
};
use crate::player::input::ControllerInput;
use crate::player::movement::character_movement;
use crate::settings::Settings;

/// Capabilities the controller consumes from its host.
///
/// Physics queries come first; the remaining methods drive presentation only
/// and must not feed back into the simulation.
pub trait ControllerHost {
    /// Position of the body the controller moves.
    fn position(&self) -> Vec3;

    /// World-space origin of the camera, used as the hookshot ray origin.
    fn eye_position(&self) -> Vec3;

    /// Whether the last `move_and_collide` ended resting on walkable ground.
    fn is_grounded(&self) -> bool;

    /// Move the body by `displacement`, resolving collisions.
    fn move_and_collide(&mut self, displacement: Vec3);

    /// Nearest hit point along the ray, if any. `direction` is normalised.
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<Vec3>;

    /// Apply the body's yaw (degrees, positive turns right).
    fn set_body_yaw(&mut self, yaw_degrees: f32);

    /// Set the target vertical field of view in degrees.
    fn set_camera_fov(&mut self, fov_degrees: f32);

    /// Start or stop the speed-line effect.
    fn set_speed_lines(&mut self, active: bool);

    /// Show the rope aimed at `anchor` and stretched to `length`.
    fn aim_rope(&mut self, anchor: Vec3, length: f32);

    /// Hide the rope.
    fn hide_rope(&mut self);

    /// Move the debug anchor marker to `point`.
    fn mark_anchor(&mut self, _point: Vec3) {}
}

/// Controller state owned by the player entity.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct PlayerController {
    pub look: PlayerLook,
    /// Vertical velocity from gravity and jumping, units per second.
    pub vertical_velocity: f32,
    /// Leftover velocity from a jump-cancelled flight, decays over time.
    pub momentum: Vec3,
    pub hookshot: HookshotState,
}

/// Advance the controller by one tick of `dt` seconds.
///
/// Which phases run depends only on the state at the start of the tick:
/// - `Normal`: look, grounded movement, throw check.
/// - `Thrown`: rope extension, look, grounded movement.
/// - `FlyingPlayer`: look, then the pull and its exit checks.
///
/// Returns the hookshot transition that happened this tick, if any.
pub fn tick<H: ControllerHost>(
    controller: &mut PlayerController,
    input: &ControllerInput,
    host: &mut H,
    settings: &Settings,
    dt: f32,
) -> Option<HookshotEvent> {
    match controller.hookshot {
        HookshotState::Normal => {
            look(controller, input, host, settings);
            character_movement(controller, input, host, settings, dt);
            try_throw(controller, input, host)
        }
        HookshotState::Thrown { anchor, length } => {
            let event = extend_throw(controller, host, settings, anchor, length, dt);
            look(controller, input, host, settings);
            character_movement(controller, input, host, settings, dt);
            event
        }
        HookshotState::FlyingPlayer { anchor } => {
            look(controller, input, host, settings);
            fly_toward(controller, input, host, settings, anchor, dt)
        }
    }
}

fn look<H: ControllerHost>(
    controller: &mut PlayerController,
    input: &ControllerInput,
    host: &mut H,
    settings: &Settings,
) {
    controller.look.apply_delta(input.look, settings);
    host.set_body_yaw(controller.look.yaw);
}

fn try_throw<H: ControllerHost>(
    controller: &mut PlayerController,
    input: &ControllerInput,
    host: &mut H,
) -> Option<HookshotEvent> {
    if !input.hookshot {
        return None;
    }

    let origin = host.eye_position();
    let anchor = host.raycast(origin, controller.look.view_forward())?;

    host.mark_anchor(anchor);
    host.aim_rope(anchor, 0.0);
    controller.hookshot = HookshotState::Thrown { anchor, length: 0.0 };
    debug!("hookshot thrown at {anchor}");
    Some(HookshotEvent::Thrown { anchor })
}

fn extend_throw<H: ControllerHost>(
    controller: &mut PlayerController,
    host: &mut H,
    settings: &Settings,
    anchor: Vec3,
    length: f32,
    dt: f32,
) -> Option<HookshotEvent> {
    let distance = host.position().distance(anchor);
    let (length, attached) = extend_rope(length, distance, settings.hookshot.throw_speed, dt);
    host.aim_rope(anchor, length);

    if !attached {
        controller.hookshot = HookshotState::Thrown { anchor, length };
        return None;
    }

    controller.hookshot = HookshotState::FlyingPlayer { anchor };
    host.set_camera_fov(settings.camera.hookshot_fov);
    host.set_speed_lines(true);
    debug!("hookshot attached at {anchor}");
    Some(HookshotEvent::Attached { anchor })
}

fn fly_toward<H: ControllerHost>(
    controller: &mut PlayerController,
    input: &ControllerInput,
    host: &mut H,
    settings: &Settings,
    anchor: Vec3,
    dt: f32,
) -> Option<HookshotEvent> {
    let hookshot = &settings.hookshot;

    let to_anchor = anchor - host.position();
    let direction = to_anchor.normalize_or_zero();
    let speed = clamped_pull_speed(to_anchor.length(), hookshot);
    host.move_and_collide(direction * speed * hookshot.speed_multiplier * dt);

    let remaining = host.position().distance(anchor);
    host.aim_rope(anchor, remaining);

    let exit = flight_exit(remaining, input.hookshot, input.jump, direction, speed, hookshot)?;
    if let FlightExit::JumpCancelled { momentum } = exit {
        controller.momentum = momentum;
    }
    stop_hookshot(controller, host, settings);
    debug!("hookshot released: {exit:?}");
    Some(HookshotEvent::Released(exit))
}

/// Return to walking: the single cleanup path for every flight exit.
fn stop_hookshot<H: ControllerHost>(
    controller: &mut PlayerController,
    host: &mut H,
    settings: &Settings,
) {
    controller.hookshot = HookshotState::Normal;
    controller.vertical_velocity = 0.0;
    host.hide_rope();
    host.set_camera_fov(settings.camera.normal_fov);
    host.set_speed_lines(false);
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingHost;
    use super::*;

    const DT: f32 = 0.02;

    fn press_hookshot() -> ControllerInput {
        ControllerInput { hookshot: true, ..Default::default() }
    }

    fn press_jump() -> ControllerInput {
        ControllerInput { jump: true, ..Default::default() }
    }

    fn flying_toward(anchor: Vec3) -> PlayerController {
        PlayerController {
            hookshot: HookshotState::FlyingPlayer { anchor },
            vertical_velocity: -7.0,
            ..Default::default()
        }
    }

    #[test]
    fn grounded_idle_tick_applies_gravity_once() {
        let settings = Settings::default();
        let mut controller = PlayerController::default();
        let mut host = RecordingHost::floating(Vec3::new(0.0, 5.0, 0.0));
        host.grounded = true;

        let event = tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);

        assert_eq!(event, None);
        assert!((controller.vertical_velocity - -1.2).abs() < 1e-6);
        assert!(host.position.y < 5.0);
        assert!((host.position.y - (5.0 - 1.2 * DT)).abs() < 1e-5);
        assert_eq!(controller.hookshot, HookshotState::Normal);
    }

    #[test]
    fn jump_from_ground_launches_upward() {
        let settings = Settings::default();
        let mut controller = PlayerController::default();
        let mut host = RecordingHost::on_floor(Vec3::ZERO);

        tick(&mut controller, &press_jump(), &mut host, &settings, DT);

        assert!((controller.vertical_velocity - (3.0 - 1.2)).abs() < 1e-5);
        assert!(host.position.y > 0.0);
        assert_eq!(controller.hookshot, HookshotState::Normal);
    }

    #[test]
    fn throw_needs_both_press_and_hit() {
        let settings = Settings::default();

        // press without a hit
        let mut controller = PlayerController::default();
        let mut host = RecordingHost::on_floor(Vec3::ZERO);
        assert_eq!(tick(&mut controller, &press_hookshot(), &mut host, &settings, DT), None);
        assert_eq!(controller.hookshot, HookshotState::Normal);
        assert_eq!(host.rope, None);

        // hit without a press
        host.hit = Some(Vec3::new(0.0, 0.0, -20.0));
        assert_eq!(tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT), None);
        assert_eq!(controller.hookshot, HookshotState::Normal);

        // both
        let anchor = Vec3::new(0.0, 0.0, -20.0);
        let event = tick(&mut controller, &press_hookshot(), &mut host, &settings, DT);
        assert_eq!(event, Some(HookshotEvent::Thrown { anchor }));
        assert_eq!(controller.hookshot, HookshotState::Thrown { anchor, length: 0.0 });
        assert_eq!(host.rope, Some((anchor, 0.0)));
        assert_eq!(host.marker, Some(anchor));
    }

    #[test]
    fn throw_attaches_after_length_covers_distance() {
        let settings = Settings::default();
        let anchor = Vec3::new(0.0, 0.0, -20.0);
        let mut controller = PlayerController::default();
        let mut host = RecordingHost::on_floor(Vec3::ZERO);
        host.hit = Some(anchor);

        tick(&mut controller, &press_hookshot(), &mut host, &settings, DT);

        let expected_ticks = (20.0_f32 / settings.hookshot.throw_speed / DT).ceil() as usize;
        assert_eq!(expected_ticks, 7);

        let mut last_length = 0.0;
        for n in 1..=expected_ticks {
            let event = tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);
            if n < expected_ticks {
                assert_eq!(event, None, "attached early at tick {n}");
                let HookshotState::Thrown { length, .. } = controller.hookshot else {
                    panic!("left Thrown at tick {n}");
                };
                assert!(length >= last_length);
                last_length = length;
                assert_eq!(host.last_fov(), None);
            } else {
                assert_eq!(event, Some(HookshotEvent::Attached { anchor }));
            }
        }

        assert_eq!(controller.hookshot, HookshotState::FlyingPlayer { anchor });
        assert_eq!(host.last_fov(), Some(100.0));
        assert_eq!(host.speed_lines, Some(true));
    }

    #[test]
    fn player_can_walk_while_rope_extends() {
        let settings = Settings::default();
        let anchor = Vec3::new(0.0, 0.0, -200.0);
        let mut controller = PlayerController {
            hookshot: HookshotState::Thrown { anchor, length: 0.0 },
            ..Default::default()
        };
        let mut host = RecordingHost::on_floor(Vec3::ZERO);
        let input = ControllerInput { movement: Vec2::new(1.0, 0.0), ..Default::default() };

        tick(&mut controller, &input, &mut host, &settings, DT);

        assert!(host.position.x > 0.0);
        assert!(matches!(controller.hookshot, HookshotState::Thrown { .. }));
    }

    #[test]
    fn flight_pulls_without_gravity() {
        let settings = Settings::default();
        let anchor = Vec3::new(0.0, 30.0, 0.0);
        let mut controller = flying_toward(anchor);
        let mut host = RecordingHost::floating(Vec3::ZERO);

        let event = tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);

        assert_eq!(event, None);
        // 30 units away: speed 30 * 5, straight up
        assert!((host.position - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-4);
        assert_eq!(controller.vertical_velocity, -7.0);
        assert_eq!(host.moves.len(), 1);
    }

    #[test]
    fn arrival_returns_to_normal_with_one_cleanup() {
        let settings = Settings::default();
        let anchor = Vec3::new(0.0, 0.0, -0.5);
        let mut controller = flying_toward(anchor);
        let mut host = RecordingHost::floating(Vec3::ZERO);

        let event = tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);

        assert_eq!(event, Some(HookshotEvent::Released(FlightExit::Arrived)));
        assert_eq!(controller.hookshot, HookshotState::Normal);
        assert_eq!(controller.vertical_velocity, 0.0);
        assert_eq!(host.fov_calls, vec![60.0]);
        assert_eq!(host.speed_lines, Some(false));
        assert_eq!(host.speed_line_calls, 1);
        assert_eq!(host.hide_calls, 1);
        assert_eq!(host.rope, None);
    }

    #[test]
    fn every_trigger_at_once_still_cleans_up_once() {
        let settings = Settings::default();
        let anchor = Vec3::new(0.0, 0.0, -0.5);
        let mut controller = flying_toward(anchor);
        let mut host = RecordingHost::floating(Vec3::ZERO);
        let input = ControllerInput { jump: true, hookshot: true, ..Default::default() };

        let event = tick(&mut controller, &input, &mut host, &settings, DT);

        assert_eq!(event, Some(HookshotEvent::Released(FlightExit::Arrived)));
        assert_eq!(controller.momentum, Vec3::ZERO);
        assert_eq!(host.fov_calls.len(), 1);
        assert_eq!(host.hide_calls, 1);
        assert_eq!(host.speed_line_calls, 1);
    }

    #[test]
    fn cancel_press_ends_flight_without_momentum() {
        let settings = Settings::default();
        let anchor = Vec3::new(0.0, 0.0, -100.0);
        let mut controller = flying_toward(anchor);
        let mut host = RecordingHost::floating(Vec3::ZERO);
        let input = ControllerInput { jump: true, hookshot: true, ..Default::default() };

        let event = tick(&mut controller, &input, &mut host, &settings, DT);

        assert_eq!(event, Some(HookshotEvent::Released(FlightExit::Cancelled)));
        assert_eq!(controller.hookshot, HookshotState::Normal);
        assert_eq!(controller.momentum, Vec3::ZERO);
        assert_eq!(host.hide_calls, 1);
    }

    #[test]
    fn jump_cancel_launches_with_momentum() {
        let settings = Settings::default();
        let anchor = Vec3::new(25.0, 0.0, 0.0);
        let mut controller = flying_toward(anchor);
        let mut host = RecordingHost::floating(Vec3::ZERO);

        let event = tick(&mut controller, &press_jump(), &mut host, &settings, DT);

        let expected = Vec3::X * 25.0 * 7.0 + Vec3::Y * 30.0;
        let Some(HookshotEvent::Released(FlightExit::JumpCancelled { momentum })) = event else {
            panic!("expected a jump cancel, got {event:?}");
        };
        assert!((momentum - expected).length() < 1e-3);
        assert_eq!(controller.momentum, momentum);
        assert_eq!(controller.hookshot, HookshotState::Normal);
        assert_eq!(controller.vertical_velocity, 0.0);
        assert_eq!(host.last_fov(), Some(60.0));
    }

    #[test]
    fn momentum_carries_into_walking_and_fades() {
        let settings = Settings::default();
        let mut controller = PlayerController {
            momentum: Vec3::new(175.0, 30.0, 0.0),
            ..Default::default()
        };
        let mut host = RecordingHost::floating(Vec3::ZERO);

        tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);
        assert!(host.position.x > 3.0);

        let mut last = controller.momentum.length();
        for _ in 0..2_000 {
            if controller.momentum == Vec3::ZERO {
                break;
            }
            tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);
            assert!(controller.momentum.length() < last);
            last = controller.momentum.length();
        }
        assert_eq!(controller.momentum, Vec3::ZERO);
    }

    #[test]
    fn look_runs_in_every_phase() {
        let settings = Settings::default();
        let input = ControllerInput { look: Vec2::new(10.0, 0.0), ..Default::default() };
        let anchor = Vec3::new(0.0, 0.0, -300.0);

        for state in [
            HookshotState::Normal,
            HookshotState::Thrown { anchor, length: 0.0 },
            HookshotState::FlyingPlayer { anchor },
        ] {
            let mut controller = PlayerController { hookshot: state, ..Default::default() };
            let mut host = RecordingHost::on_floor(Vec3::ZERO);
            tick(&mut controller, &input, &mut host, &settings, DT);
            let expected = 10.0 * settings.controls.mouse_sensitivity;
            assert!((controller.look.yaw - expected).abs() < 1e-5, "{state:?}");
            assert!((host.yaw - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn rethrow_resets_anchor_and_length() {
        let settings = Settings::default();
        let mut controller = PlayerController::default();
        let mut host = RecordingHost::on_floor(Vec3::ZERO);

        host.hit = Some(Vec3::new(0.0, 0.0, -0.6));
        tick(&mut controller, &press_hookshot(), &mut host, &settings, DT);
        tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);
        tick(&mut controller, &ControllerInput::default(), &mut host, &settings, DT);
        assert_eq!(controller.hookshot, HookshotState::Normal);

        let second = Vec3::new(40.0, 0.0, 0.0);
        host.hit = Some(second);
        tick(&mut controller, &press_hookshot(), &mut host, &settings, DT);
        assert_eq!(controller.hookshot, HookshotState::Thrown { anchor: second, length: 0.0 });
    }
}
