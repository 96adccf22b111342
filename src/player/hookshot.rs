//! Hookshot state and the math behind each phase.
//!
//! The state is a plain enum: the anchor and rope length only exist while a
//! hook is out, so they cannot be read in the `Normal` phase.

use bevy::prelude::*;

use crate::settings::HookshotSettings;

/// Phase of the hookshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum HookshotState {
    /// No hook out; the player walks.
    #[default]
    Normal,
    /// The rope is extending toward `anchor`; the player can still walk.
    Thrown { anchor: Vec3, length: f32 },
    /// The rope is attached and pulls the player toward `anchor`.
    FlyingPlayer { anchor: Vec3 },
}

impl HookshotState {
    /// Anchor of the current hook, if one is out.
    #[must_use]
    pub fn anchor(&self) -> Option<Vec3> {
        match *self {
            HookshotState::Normal => None,
            HookshotState::Thrown { anchor, .. } | HookshotState::FlyingPlayer { anchor } => {
                Some(anchor)
            }
        }
    }

    /// Short name for overlays and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            HookshotState::Normal => "normal",
            HookshotState::Thrown { .. } => "thrown",
            HookshotState::FlyingPlayer { .. } => "flying",
        }
    }
}

/// Why a flight ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightExit {
    /// The player got within `arrival_distance` of the anchor.
    Arrived,
    /// The hookshot key was pressed again.
    Cancelled,
    /// Jump was pressed; `momentum` carries the player onward.
    JumpCancelled { momentum: Vec3 },
}

/// Transition reported by a controller tick.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum HookshotEvent {
    /// A throw started toward `anchor`.
    Thrown { anchor: Vec3 },
    /// The rope reached the anchor and the pull began.
    Attached { anchor: Vec3 },
    /// The flight ended.
    Released(FlightExit),
}

/// Grow the rope by one tick. Returns the new length and whether it reached the anchor.
#[must_use]
pub fn extend_rope(length: f32, distance_to_anchor: f32, throw_speed: f32, dt: f32) -> (f32, bool) {
    let length = length + throw_speed.max(0.0) * dt;
    (length, length >= distance_to_anchor)
}

/// Distance-based pull speed before the flight multiplier.
#[must_use]
pub fn clamped_pull_speed(distance: f32, hookshot: &HookshotSettings) -> f32 {
    distance.clamp(hookshot.min_speed, hookshot.max_speed.max(hookshot.min_speed))
}

/// Momentum granted when a flight is cancelled with jump.
#[must_use]
pub fn jump_cancel_momentum(direction: Vec3, clamped_speed: f32, hookshot: &HookshotSettings) -> Vec3 {
    direction * clamped_speed * hookshot.boost_multiplier + Vec3::Y * hookshot.jump_speed
}

/// Decide whether the flight ends this tick.
///
/// Triggers are checked in order (arrival, cancel, jump) and only the first
/// one that fires is reported.
#[must_use]
pub fn flight_exit(
    distance_after_move: f32,
    hookshot_pressed: bool,
    jump_pressed: bool,
    direction: Vec3,
    clamped_speed: f32,
    hookshot: &HookshotSettings,
) -> Option<FlightExit> {
    if distance_after_move < hookshot.arrival_distance {
        Some(FlightExit::Arrived)
    } else if hookshot_pressed {
        Some(FlightExit::Cancelled)
    } else if jump_pressed {
        Some(FlightExit::JumpCancelled {
            momentum: jump_cancel_momentum(direction, clamped_speed, hookshot),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_only_exists_while_hooked() {
        assert_eq!(HookshotState::Normal.anchor(), None);
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(HookshotState::Thrown { anchor: a, length: 0.0 }.anchor(), Some(a));
        assert_eq!(HookshotState::FlyingPlayer { anchor: a }.anchor(), Some(a));
    }

    #[test]
    fn rope_attaches_once_length_covers_distance() {
        let (len, attached) = extend_rope(0.0, 20.0, 150.0, 0.02);
        assert!((len - 3.0).abs() < 1e-5);
        assert!(!attached);

        let (len, attached) = extend_rope(18.0, 20.0, 150.0, 0.02);
        assert!(len >= 20.0);
        assert!(attached);
    }

    #[test]
    fn rope_never_shrinks() {
        let (len, _) = extend_rope(5.0, 100.0, -30.0, 0.5);
        assert_eq!(len, 5.0);
    }

    #[test]
    fn pull_speed_clamps_to_range() {
        let h = HookshotSettings::default();
        assert_eq!(clamped_pull_speed(0.5, &h), 10.0);
        assert_eq!(clamped_pull_speed(25.0, &h), 25.0);
        assert_eq!(clamped_pull_speed(300.0, &h), 40.0);
    }

    #[test]
    fn arrival_wins_over_cancel_and_jump() {
        let h = HookshotSettings::default();
        let exit = flight_exit(0.5, true, true, Vec3::Z, 10.0, &h);
        assert_eq!(exit, Some(FlightExit::Arrived));
    }

    #[test]
    fn cancel_wins_over_jump() {
        let h = HookshotSettings::default();
        let exit = flight_exit(12.0, true, true, Vec3::Z, 12.0, &h);
        assert_eq!(exit, Some(FlightExit::Cancelled));
    }

    #[test]
    fn jump_cancel_boosts_along_rope_and_up() {
        let h = HookshotSettings::default();
        let exit = flight_exit(25.0, false, true, Vec3::X, 25.0, &h);
        assert_eq!(
            exit,
            Some(FlightExit::JumpCancelled { momentum: Vec3::new(175.0, 30.0, 0.0) })
        );
    }

    #[test]
    fn no_trigger_keeps_flying() {
        let h = HookshotSettings::default();
        assert_eq!(flight_exit(25.0, false, false, Vec3::X, 25.0, &h), None);
    }
}
