//! Minimal kinematic physics for the player: box collision and ray queries.
//!
//! The level is a set of static axis-aligned boxes. `move_and_collide` pushes
//! the player box out of anything it walks into, one axis at a time (vertical
//! first so ground contact is resolved before walls), and `raycast` finds the
//! nearest box face along a ray for the hookshot.

use bevy::prelude::*;

/// Gap kept between the body and a surface after resolving a contact.
const SKIN: f32 = 1.0e-4;
/// Upper bound on sub-steps per move so a huge displacement stays bounded.
const MAX_SUBSTEPS: usize = 64;

/// Marks a static level box; `half_extents` are in world units.
#[derive(Component, Debug, Clone, Copy)]
pub struct StaticCollider {
    pub half_extents: Vec3,
}

/// The player's collision box and the result of its last move.
#[derive(Component, Debug, Clone, Copy)]
pub struct CharacterBody {
    pub half_extents: Vec3,
    /// Set by the last `move_and_collide` call.
    pub grounded: bool,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.4, 0.9, 0.4),
            grounded: false,
        }
    }
}

/// An axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxCollider {
    #[must_use]
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents: half_extents.abs() }
    }

    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Strict overlap: touching faces do not count.
    #[must_use]
    pub fn overlaps(&self, other: &BoxCollider) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.cmplt(b_max).all() && a_max.cmpgt(b_min).all()
    }

    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min()).all() && point.cmple(self.max()).all()
    }

    /// Distance along the ray to the first face hit, if any.
    ///
    /// `direction` need not be normalised; the result is in units of it.
    #[must_use]
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() < f32::EPSILON {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (min[axis] - o) / d;
            let t2 = (max[axis] - o) / d;
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        }

        (t_enter <= t_exit && t_enter >= 0.0).then_some(t_enter)
    }
}

/// Outcome of a kinematic move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub position: Vec3,
    /// A downward move was stopped by a surface.
    pub grounded: bool,
}

/// Move a box of `half_extents` centred at `position` by `displacement`,
/// stopping against `colliders`.
///
/// The displacement is split into sub-steps no longer than half the body's
/// thinnest half extent so fast pulls cannot tunnel through thin walls.
#[must_use]
pub fn move_and_collide(
    position: Vec3,
    half_extents: Vec3,
    displacement: Vec3,
    colliders: &[BoxCollider],
) -> MoveResult {
    let max_step = (half_extents.min_element() * 0.5).max(0.05);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((displacement.length() / max_step).ceil() as usize).clamp(1, MAX_SUBSTEPS);
    #[allow(clippy::cast_precision_loss)]
    let step = displacement / steps as f32;

    let mut pos = position;
    let mut grounded = false;

    for _ in 0..steps {
        for axis in [1, 0, 2] {
            let delta = step[axis];
            if delta == 0.0 {
                continue;
            }
            pos[axis] += delta;

            let body = BoxCollider::new(pos, half_extents);
            for c in colliders.iter().filter(|c| c.overlaps(&body)) {
                if delta > 0.0 {
                    pos[axis] = c.min()[axis] - half_extents[axis] - SKIN;
                } else {
                    pos[axis] = c.max()[axis] + half_extents[axis] + SKIN;
                    if axis == 1 {
                        grounded = true;
                    }
                }
            }
        }
    }

    MoveResult { position: pos, grounded }
}

/// Nearest hit point along a ray within `max_distance`.
///
/// Boxes that contain the origin are skipped, so a ray cast from inside a
/// trigger volume or from the player's own footprint still reaches the level.
#[must_use]
pub fn raycast(
    colliders: &[BoxCollider],
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<Vec3> {
    let dir = direction.try_normalize()?;
    colliders
        .iter()
        .filter(|c| !c.contains(origin))
        .filter_map(|c| c.ray_entry(origin, dir))
        .filter(|t| *t <= max_distance)
        .min_by(f32::total_cmp)
        .map(|t| origin + dir * t)
}
