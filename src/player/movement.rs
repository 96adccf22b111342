//! Grounded movement: walking, gravity, jumping and leftover momentum.
//!
//! The math lives in small free functions so benchmarks and tests exercise the
//! same code the controller runs. `character_movement` strings them together
//! for one tick and hands the displacement to the host.

use bevy::prelude::*;

use crate::player::camera::PlayerLook;
use crate::player::controller::{ControllerHost, PlayerController};
use crate::player::input::ControllerInput;
use crate::settings::{MovementSettings, Settings};

/// Horizontal walking velocity from raw axes (x strafe, y forward).
///
/// Axes are not normalised, so diagonal input is faster than straight input.
#[must_use]
pub fn planar_velocity(look: &PlayerLook, axes: Vec2, move_speed: f32) -> Vec3 {
    (look.walk_right() * axes.x + look.walk_forward() * axes.y) * move_speed
}

/// Step the vertical velocity for one tick.
///
/// Grounded contact zeroes the velocity, a jump edge while grounded replaces
/// it with `jump_force`, and gravity is always accumulated afterwards.
#[must_use]
pub fn step_vertical_velocity(
    velocity_y: f32,
    grounded: bool,
    jump: bool,
    movement: &MovementSettings,
    dt: f32,
) -> f32 {
    let mut vy = velocity_y;
    if grounded {
        vy = 0.0;
        if jump {
            vy = movement.jump_force;
        }
    }
    vy + movement.gravity * dt
}

/// Exponentially decay `momentum` toward zero, snapping once it is negligible.
///
/// The decay factor is floored at zero so a large `drag * dt` stops the
/// momentum instead of reversing it.
#[must_use]
pub fn decay_momentum(momentum: Vec3, drag: f32, snap_epsilon: f32, dt: f32) -> Vec3 {
    if momentum == Vec3::ZERO {
        return momentum;
    }
    let factor = (1.0 - drag * dt).max(0.0);
    let next = momentum * factor;
    if next.length() < snap_epsilon {
        Vec3::ZERO
    } else {
        next
    }
}

/// Run grounded movement for one tick: walk, gravity/jump, momentum, then move.
pub fn character_movement<H: ControllerHost>(
    controller: &mut PlayerController,
    input: &ControllerInput,
    host: &mut H,
    settings: &Settings,
    dt: f32,
) {
    let movement = &settings.movement;

    let mut velocity = planar_velocity(&controller.look, input.movement, movement.move_speed);

    controller.vertical_velocity = step_vertical_velocity(
        controller.vertical_velocity,
        host.is_grounded(),
        input.jump,
        movement,
        dt,
    );
    velocity.y = controller.vertical_velocity;
    velocity += controller.momentum;

    host.move_and_collide(velocity * dt);

    controller.momentum = decay_momentum(
        controller.momentum,
        movement.momentum_drag,
        movement.momentum_snap_epsilon,
        dt,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_idle_tick_accumulates_one_step_of_gravity() {
        let movement = MovementSettings::default();
        let vy = step_vertical_velocity(-5.0, true, false, &movement, 0.02);
        assert!((vy - -1.2).abs() < 1e-6, "vy = {vy}");
    }

    #[test]
    fn jump_only_applies_on_ground() {
        let movement = MovementSettings::default();
        let grounded = step_vertical_velocity(0.0, true, true, &movement, 0.02);
        assert!((grounded - (3.0 - 1.2)).abs() < 1e-6);

        let airborne = step_vertical_velocity(-4.0, false, true, &movement, 0.02);
        assert!((airborne - (-4.0 - 1.2)).abs() < 1e-6);
    }

    #[test]
    fn planar_velocity_is_not_normalised() {
        let look = PlayerLook::default();
        let v = planar_velocity(&look, Vec2::new(1.0, 1.0), 20.0);
        assert!((v - Vec3::new(20.0, 0.0, -20.0)).length() < 1e-4);
    }

    #[test]
    fn momentum_decreases_monotonically_and_reaches_zero() {
        let mut m = Vec3::new(150.0, 30.0, -80.0);
        let mut last = m.length();
        let mut ticks = 0;
        while m != Vec3::ZERO {
            m = decay_momentum(m, 3.0, 0.01, 0.02);
            assert!(m.length() < last);
            last = m.length();
            ticks += 1;
            assert!(ticks < 1_000, "momentum never settled");
        }
    }

    #[test]
    fn huge_drag_stops_instead_of_reversing() {
        let m = decay_momentum(Vec3::X * 10.0, 500.0, 0.01, 0.1);
        assert_eq!(m, Vec3::ZERO);
    }

    #[test]
    fn zero_momentum_stays_zero() {
        assert_eq!(decay_momentum(Vec3::ZERO, 3.0, 0.01, 0.02), Vec3::ZERO);
    }
}
