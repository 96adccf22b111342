//! Display-related systems: vsync and shadow toggles applied from `Settings`
//! at runtime so a hot-reloaded settings file takes effect immediately.
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use hookshot::settings::Settings;

use crate::app::setup::Sun;

/// Present mode for a vsync preference.
#[must_use]
pub fn present_mode_for(vsync: bool) -> PresentMode {
    if vsync { PresentMode::Fifo } else { PresentMode::AutoNoVsync }
}

/// Sync `Settings.graphics.vsync` into the present mode of the primary window.
///
/// # Arguments
/// - `settings`: The current settings resource, from which the vsync preference is read.
/// - `windows`: Query for the primary window to update its present mode.
/// - `last`: A local cache of the last applied vsync state to avoid redundant updates.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let desired = settings.graphics.vsync;
    if *last == Some(desired) { return; }

    for mut w in &mut windows {
        w.present_mode = present_mode_for(desired);
    }
    *last = Some(desired);
}

/// Sync `Settings.graphics.shadows` into the sun's shadow flag.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_shadow_settings(
    settings: Res<Settings>,
    mut suns: Query<&mut DirectionalLight, With<Sun>>,
) {
    if !settings.is_changed() {
        return;
    }
    for mut light in &mut suns {
        if light.shadows_enabled != settings.graphics.shadows {
            light.shadows_enabled = settings.graphics.shadows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_maps_to_fifo() {
        assert_eq!(present_mode_for(true), PresentMode::Fifo);
        assert_eq!(present_mode_for(false), PresentMode::AutoNoVsync);
    }
}
