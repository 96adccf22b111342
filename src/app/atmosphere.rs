//! Atmosphere-related systems.
//! Keeps the `bevy_atmosphere` sky in step with the `Settings` resource and
//! with the direction of the scene's sun.
use bevy::prelude::*;
use bevy_atmosphere::prelude::{AtmosphereMut, AtmosphereSettings as BevyAtmosphereSettings, Nishita};
use hookshot::settings::Settings;

use crate::app::setup::Sun;

/// Sync `Settings.atmosphere` fields into the running `BevyAtmosphereSettings`.
///
/// The `enabled` flag is only read at startup; toggling it needs a restart.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_atmosphere_settings(
    settings: Res<Settings>,
    mut last: Local<Option<(u32, bool)>>,
    mut atm_settings: ResMut<BevyAtmosphereSettings>,
) {
    let r = settings.atmosphere.resolution;
    let d = settings.atmosphere.dithering;
    if *last == Some((r, d)) {
        return;
    }

    atm_settings.resolution = r;
    atm_settings.dithering = d;
    *last = Some((r, d));
    info!("atmosphere: resolution {r}, dithering {d}");
}

/// Point the sky's sun where the directional `Sun` light comes from.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_sun_position(
    mut atmosphere: AtmosphereMut<Nishita>,
    sun: Query<&Transform, (With<Sun>, Changed<Transform>)>,
) {
    if let Ok(transform) = sun.get_single() {
        // light travels along -Z, so the sun sits behind it
        atmosphere.sun_position = transform.back().as_vec3();
    }
}
