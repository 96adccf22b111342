use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use bevy_atmosphere::prelude::*;
use hookshot::debug::DebugDumpPlugin;
use hookshot::player::PlayerControllerPlugin;
use hookshot::settings::loader as settings_loader;
use hookshot::ui::DebugOverlayPlugin;

mod app;

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "hookshot".to_string(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: crate::app::display::present_mode_for(settings.graphics.vsync),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(PlayerControllerPlugin)
        .add_plugins(DebugOverlayPlugin)
        .add_plugins(DebugDumpPlugin);

    if settings.atmosphere.enabled {
        app.add_plugins(AtmospherePlugin)
            .insert_resource(AtmosphereModel::default())
            .insert_resource(AtmosphereSettings {
                resolution: settings.atmosphere.resolution,
                dithering: settings.atmosphere.dithering,
                ..Default::default()
            });
        app.add_systems(Update, (crate::app::sync_atmosphere_settings, crate::app::sync_sun_position));
    }

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, crate::app::setup);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, crate::app::sync_vsync_settings);
    app.add_systems(Update, crate::app::sync_shadow_settings);

    app.run();
}
