//! Debug utilities, including a system (F3 default) to dump diagnostics,
//! entity counts, process memory and every player's controller state to a
//! timestamped text file in './debug-dumps/'.
//!
//! Useful for capturing a snapshot of a hookshot misbehaving without having
//! to attach a debugger mid-flight.
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::player::{CharacterBody, Player, PlayerController};
use crate::settings::Settings;

/// Directory dumps are written to.
pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

fn kb_to_mb(kb: u64) -> String {
    format!("{:.2} MB", (kb as f64) / 1024.0)
}

/// Frame and process numbers gathered for a dump.
#[derive(Debug, Default, Clone, Copy)]
pub struct DumpStats {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub entities: usize,
    pub cores: usize,
    pub process_kb: u64,
    pub process_virtual_kb: u64,
    pub total_kb: u64,
    pub used_kb: u64,
}

/// Format a dump. `players` yields each player's position, controller and body.
pub fn format_dump<'a>(
    human_ts: &str,
    epoch_secs: u64,
    stats: &DumpStats,
    players: impl IntoIterator<Item = (Vec3, &'a PlayerController, &'a CharacterBody)>,
) -> String {
    let mut out = String::new();
    writeln!(out, "Debug dump: {epoch_secs}").ok();
    writeln!(out, "Timestamp: {human_ts} (epoch secs: {epoch_secs})").ok();
    writeln!(out, "FPS: {:.1}, frame_time: {:.4} ms", stats.fps, stats.frame_time_ms).ok();
    writeln!(out, "Entities: {}", stats.entities).ok();
    writeln!(out, "CPU cores (available): {}", stats.cores).ok();
    writeln!(
        out,
        "Process memory: {} (virtual {})",
        kb_to_mb(stats.process_kb),
        kb_to_mb(stats.process_virtual_kb)
    )
    .ok();
    writeln!(
        out,
        "System memory: total={} used={}",
        kb_to_mb(stats.total_kb),
        kb_to_mb(stats.used_kb)
    )
    .ok();

    writeln!(out, "\nPlayers:").ok();
    let mut any = false;
    for (position, controller, body) in players {
        any = true;
        writeln!(out, "  position: {position}").ok();
        writeln!(out, "  grounded: {}", body.grounded).ok();
        writeln!(out, "  look: yaw {:.2} pitch {:.2}", controller.look.yaw, controller.look.pitch).ok();
        writeln!(out, "  vertical velocity: {:.3}", controller.vertical_velocity).ok();
        writeln!(out, "  momentum: {}", controller.momentum).ok();
        writeln!(out, "  hookshot: {:?}", controller.hookshot).ok();
    }
    if !any {
        writeln!(out, "  (no player spawned)").ok();
    }
    out
}

/// Listen for the dump key and write a snapshot to `DUMP_DIR`.
#[allow(clippy::needless_pass_by_value)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    query_entities: Query<Entity>,
    players: Query<(&Transform, &PlayerController, &CharacterBody), With<Player>>,
) {
    if !keys.just_pressed(settings.controls.key_for("dump_debug", KeyCode::F3)) {
        return;
    }

    let now = SystemTime::now();
    let ts_secs = now.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
    let dt: DateTime<Utc> = DateTime::from(now);
    let human_ts = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    let fname = format!("{DUMP_DIR}/debug-{ts_secs}.txt");

    let mut sys = System::new_all();
    sys.refresh_all();
    let proc = sys.process(Pid::from_u32(std::process::id()));

    let stats = DumpStats {
        fps: diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0),
        frame_time_ms: diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0),
        entities: query_entities.iter().count(),
        cores: std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
        process_kb: proc.map_or(0, |p| p.memory()),
        process_virtual_kb: proc.map_or(0, |p| p.virtual_memory()),
        total_kb: sys.total_memory(),
        used_kb: sys.used_memory(),
    };

    let out = format_dump(
        &human_ts,
        ts_secs,
        &stats,
        players.iter().map(|(t, c, b)| (t.translation, c, b)),
    );

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{}': {}", DUMP_DIR, e);
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {}: {}", fname, e);
    } else {
        info!("wrote debug dump: {}", fname);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::HookshotState;

    #[test]
    fn dump_lists_controller_state() {
        let controller = PlayerController {
            hookshot: HookshotState::FlyingPlayer { anchor: Vec3::new(1.0, 2.0, 3.0) },
            vertical_velocity: -4.5,
            ..Default::default()
        };
        let body = CharacterBody::default();
        let text = format_dump("2026-01-01 00:00:00", 42, &DumpStats::default(), [(Vec3::ZERO, &controller, &body)]);
        assert!(text.starts_with("Debug dump: 42\n"));
        assert!(text.contains("FlyingPlayer"));
        assert!(text.contains("vertical velocity: -4.500"));
        assert!(!text.contains("no player spawned"));
    }

    #[test]
    fn dump_without_players_says_so() {
        let none: Vec<(Vec3, &PlayerController, &CharacterBody)> = Vec::new();
        let text = format_dump("t", 0, &DumpStats::default(), none);
        assert!(text.contains("(no player spawned)"));
    }
}
