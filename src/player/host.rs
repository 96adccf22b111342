//! The Bevy side of the controller.
//!
//! `WorldHost` borrows one player's components plus a snapshot of the level
//! colliders and implements `ControllerHost` on top of them.
//! `player_controller` builds one per player each frame and runs the tick.

use bevy::prelude::*;

use crate::player::controller::{tick, ControllerHost, PlayerController};
use crate::player::camera::PlayerLook;
use crate::player::effects::{HookshotPresentation, RopePose};
use crate::player::hookshot::HookshotEvent;
use crate::player::input::ControllerInput;
use crate::player::physics::{self, BoxCollider, CharacterBody, StaticCollider};
use crate::player::Player;
use crate::settings::Settings;

/// Longest frame the controller will simulate in one step, in seconds.
pub const MAX_TICK_DT: f32 = 0.1;

/// A player's components seen through the controller's capability trait.
pub struct WorldHost<'a> {
    pub transform: &'a mut Transform,
    pub body: &'a mut CharacterBody,
    pub presentation: &'a mut HookshotPresentation,
    pub colliders: &'a [BoxCollider],
    pub eye_height: f32,
    pub max_range: f32,
}

impl ControllerHost for WorldHost<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn eye_position(&self) -> Vec3 {
        self.transform.translation + Vec3::Y * self.eye_height
    }

    fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    fn move_and_collide(&mut self, displacement: Vec3) {
        let result = physics::move_and_collide(
            self.transform.translation,
            self.body.half_extents,
            displacement,
            self.colliders,
        );
        self.transform.translation = result.position;
        self.body.grounded = result.grounded;
    }

    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        physics::raycast(self.colliders, origin, direction, self.max_range)
    }

    fn set_body_yaw(&mut self, yaw_degrees: f32) {
        self.transform.rotation = PlayerLook { yaw: yaw_degrees, pitch: 0.0 }.body_rotation();
    }

    fn set_camera_fov(&mut self, fov_degrees: f32) {
        self.presentation.target_fov = fov_degrees;
    }

    fn set_speed_lines(&mut self, active: bool) {
        self.presentation.speed_lines = active;
    }

    fn aim_rope(&mut self, anchor: Vec3, length: f32) {
        self.presentation.rope = Some(RopePose { anchor, length });
    }

    fn hide_rope(&mut self) {
        self.presentation.rope = None;
    }

    fn mark_anchor(&mut self, point: Vec3) {
        self.presentation.anchor_marker = Some(point);
    }
}

/// Level boxes are root entities, so their local transform is their world transform.
#[must_use]
pub fn collect_colliders<'a>(
    boxes: impl IntoIterator<Item = (&'a Transform, &'a StaticCollider)>,
) -> Vec<BoxCollider> {
    boxes
        .into_iter()
        .map(|(transform, collider)| {
            BoxCollider::new(transform.translation, collider.half_extents * transform.scale)
        })
        .collect()
}

/// Run one controller tick for every player.
#[allow(clippy::needless_pass_by_value, clippy::type_complexity)]
pub fn player_controller(
    time: Res<Time>,
    settings: Res<Settings>,
    level: Query<(&Transform, &StaticCollider), Without<Player>>,
    mut players: Query<
        (
            &mut Transform,
            &mut PlayerController,
            &ControllerInput,
            &mut CharacterBody,
            &mut HookshotPresentation,
        ),
        With<Player>,
    >,
    mut events: EventWriter<HookshotEvent>,
) {
    let dt = time.delta_seconds().min(MAX_TICK_DT);
    if dt <= 0.0 {
        return;
    }

    let colliders = collect_colliders(&level);

    for (mut transform, mut controller, input, mut body, mut presentation) in &mut players {
        let mut host = WorldHost {
            transform: &mut transform,
            body: &mut body,
            presentation: &mut presentation,
            colliders: &colliders,
            eye_height: settings.camera.eye_height,
            max_range: settings.hookshot.max_range,
        };
        if let Some(event) = tick(&mut controller, input, &mut host, &settings, dt) {
            events.send(event);
        }
    }
}
