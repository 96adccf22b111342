//! Camera field of view easing.
//!
//! The controller only ever picks a target FOV; `CameraFov` eases the camera
//! toward it so the switch into and out of a hookshot pull reads as a zoom.

use bevy::prelude::*;

use crate::settings::Settings;

/// Current and target vertical FOV of a camera, in degrees.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraFov {
    pub current: f32,
    pub target: f32,
}

impl CameraFov {
    #[must_use]
    pub fn new(fov: f32) -> Self {
        Self { current: fov, target: fov }
    }

    /// Move `current` toward `target` by a `speed * dt` fraction of the gap.
    pub fn ease(&mut self, speed: f32, dt: f32) {
        let t = (speed * dt).clamp(0.0, 1.0);
        self.current += (self.target - self.current) * t;
    }
}

/// Ease every `CameraFov` and write the result into its perspective projection.
#[allow(clippy::needless_pass_by_value)]
pub fn ease_camera_fov(
    time: Res<Time>,
    settings: Res<Settings>,
    mut cameras: Query<(&mut CameraFov, &mut Projection)>,
) {
    let dt = time.delta_seconds();
    for (mut fov, mut projection) in &mut cameras {
        fov.ease(settings.camera.fov_lerp_speed, dt);
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = fov.current.to_radians();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_approaches_target_without_overshoot() {
        let mut fov = CameraFov::new(60.0);
        fov.target = 100.0;
        let mut last = fov.current;
        for _ in 0..200 {
            fov.ease(4.0, 0.02);
            assert!(fov.current >= last);
            assert!(fov.current <= 100.0);
            last = fov.current;
        }
        assert!((fov.current - 100.0).abs() < 0.1);
    }

    #[test]
    fn large_step_snaps_to_target() {
        let mut fov = CameraFov::new(100.0);
        fov.target = 60.0;
        fov.ease(4.0, 1.0);
        assert_eq!(fov.current, 60.0);
    }
}
