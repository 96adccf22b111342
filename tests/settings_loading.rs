use std::fs;
use std::path::PathBuf;

use bevy::prelude::KeyCode;
use hookshot::settings::loader::{load_settings_from_dir, setup_settings_watcher};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hookshot-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn shipped_settings_match_defaults() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/data/settings");
    let settings = load_settings_from_dir(dir);
    assert_eq!(settings.movement.gravity, -60.0);
    assert_eq!(settings.movement.jump_force, 3.0);
    assert_eq!(settings.hookshot.throw_speed, 150.0);
    assert_eq!(settings.hookshot.boost_multiplier, 7.0);
    assert_eq!(settings.camera.normal_fov, 60.0);
    assert_eq!(settings.camera.hookshot_fov, 100.0);
    assert_eq!(settings.controls.key_for("hookshot", KeyCode::KeyQ), KeyCode::KeyE);
}

#[test]
fn malformed_file_is_skipped() {
    let dir = scratch_dir("malformed");
    fs::write(dir.join("a_broken.ron"), "(movement: (gravity: ").expect("write");
    fs::write(dir.join("b_good.ron"), "(movement: (gravity: -20.0))").expect("write");
    fs::write(dir.join("notes.txt"), "(movement: (gravity: 5.0))").expect("write");

    let settings = load_settings_from_dir(dir.to_str().expect("utf-8 path"));
    assert_eq!(settings.movement.gravity, -20.0);
    assert_eq!(settings.movement.move_speed, 20.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_or_missing_directory_falls_back_to_defaults() {
    let dir = scratch_dir("empty");
    let settings = load_settings_from_dir(dir.to_str().expect("utf-8 path"));
    assert_eq!(settings.hookshot.max_speed, 40.0);

    let missing = load_settings_from_dir("no/such/settings/dir");
    assert_eq!(missing.hookshot.min_speed, 10.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn watcher_fails_for_missing_directory() {
    assert!(setup_settings_watcher("no/such/settings/dir").is_err());
}
