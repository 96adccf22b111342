//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`). Every field
//! carries a serde default so a partial file only overrides what it names.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Enable vertical sync to cap FPS to the display refresh rate.
    #[serde(default = "GraphicsSettings::default_shadows")]
    pub shadows: bool, // Enable/disable directional light shadows
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
    fn default_shadows() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            vsync: Self::default_vsync(),
            shadows: Self::default_shadows(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Degrees of rotation per unit of mouse motion
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 0.12 }

    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("forward".to_string(), "W".to_string());
        m.insert("back".to_string(), "S".to_string());
        m.insert("left".to_string(), "A".to_string());
        m.insert("right".to_string(), "D".to_string());
        m.insert("jump".to_string(), "Space".to_string());
        m.insert("hookshot".to_string(), "E".to_string());
        m.insert("pause".to_string(), "Escape".to_string());
        m.insert("toggle_debug".to_string(), "F1".to_string());
        m.insert("toggle_gizmos".to_string(), "F2".to_string());
        m.insert("dump_debug".to_string(), "F3".to_string());
        m
    }

    /// Resolve the key bound to `action`, falling back to `default` when the
    /// binding is missing or names an unknown key.
    #[must_use]
    pub fn key_for(&self, action: &str, default: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Grounded movement tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_move_speed")]
    pub move_speed: f32, // Walk speed in units per second per input axis
    #[serde(default = "MovementSettings::default_jump_force")]
    pub jump_force: f32, // Vertical velocity set when jumping off the ground
    #[serde(default = "MovementSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration (negative pulls down)
    #[serde(default = "MovementSettings::default_momentum_drag")]
    pub momentum_drag: f32, // Exponential decay rate of leftover momentum
    #[serde(default = "MovementSettings::default_momentum_snap_epsilon")]
    pub momentum_snap_epsilon: f32, // Momentum shorter than this is dropped to zero
}

impl MovementSettings {
    fn default_move_speed() -> f32 { 20.0 }
    fn default_jump_force() -> f32 { 3.0 }
    fn default_gravity() -> f32 { -60.0 }
    fn default_momentum_drag() -> f32 { 3.0 }
    fn default_momentum_snap_epsilon() -> f32 { 0.01 }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: Self::default_move_speed(),
            jump_force: Self::default_jump_force(),
            gravity: Self::default_gravity(),
            momentum_drag: Self::default_momentum_drag(),
            momentum_snap_epsilon: Self::default_momentum_snap_epsilon(),
        }
    }
}

/// Hookshot tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookshotSettings {
    #[serde(default = "HookshotSettings::default_throw_speed")]
    pub throw_speed: f32, // How fast the rope extends toward the anchor
    #[serde(default = "HookshotSettings::default_jump_speed")]
    pub jump_speed: f32, // Upward launch added when a flight is cancelled with jump
    #[serde(default = "HookshotSettings::default_min_speed")]
    pub min_speed: f32, // Lower clamp of the distance-based pull speed
    #[serde(default = "HookshotSettings::default_max_speed")]
    pub max_speed: f32, // Upper clamp of the distance-based pull speed
    #[serde(default = "HookshotSettings::default_speed_multiplier")]
    pub speed_multiplier: f32, // Scales the clamped pull speed during flight
    #[serde(default = "HookshotSettings::default_boost_multiplier")]
    pub boost_multiplier: f32, // Scales the clamped pull speed into momentum on jump-cancel
    #[serde(default = "HookshotSettings::default_arrival_distance")]
    pub arrival_distance: f32, // Flight ends once closer than this to the anchor
    #[serde(default = "HookshotSettings::default_max_range")]
    pub max_range: f32, // Longest ray the hookshot can attach along
}

impl HookshotSettings {
    fn default_throw_speed() -> f32 { 150.0 }
    fn default_jump_speed() -> f32 { 30.0 }
    fn default_min_speed() -> f32 { 10.0 }
    fn default_max_speed() -> f32 { 40.0 }
    fn default_speed_multiplier() -> f32 { 5.0 }
    fn default_boost_multiplier() -> f32 { 7.0 }
    fn default_arrival_distance() -> f32 { 1.0 }
    fn default_max_range() -> f32 { 500.0 }
}

impl Default for HookshotSettings {
    fn default() -> Self {
        Self {
            throw_speed: Self::default_throw_speed(),
            jump_speed: Self::default_jump_speed(),
            min_speed: Self::default_min_speed(),
            max_speed: Self::default_max_speed(),
            speed_multiplier: Self::default_speed_multiplier(),
            boost_multiplier: Self::default_boost_multiplier(),
            arrival_distance: Self::default_arrival_distance(),
            max_range: Self::default_max_range(),
        }
    }
}

/// Camera tuning: FOV presets and look limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_normal_fov")]
    pub normal_fov: f32, // Vertical FOV in degrees while walking
    #[serde(default = "CameraSettings::default_hookshot_fov")]
    pub hookshot_fov: f32, // Vertical FOV in degrees while being pulled
    #[serde(default = "CameraSettings::default_fov_lerp_speed")]
    pub fov_lerp_speed: f32, // How quickly the FOV eases toward its target
    #[serde(default = "CameraSettings::default_pitch_limit")]
    pub pitch_limit: f32, // Maximum camera tilt up or down, in degrees
    #[serde(default = "CameraSettings::default_eye_height")]
    pub eye_height: f32, // Camera offset above the body centre
}

impl CameraSettings {
    fn default_normal_fov() -> f32 { 60.0 }
    fn default_hookshot_fov() -> f32 { 100.0 }
    fn default_fov_lerp_speed() -> f32 { 4.0 }
    fn default_pitch_limit() -> f32 { 89.0 }
    fn default_eye_height() -> f32 { 0.7 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            normal_fov: Self::default_normal_fov(),
            hookshot_fov: Self::default_hookshot_fov(),
            fov_lerp_speed: Self::default_fov_lerp_speed(),
            pitch_limit: Self::default_pitch_limit(),
            eye_height: Self::default_eye_height(),
        }
    }
}

/// Atmosphere settings to configure the `bevy_atmosphere` crate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereSettings {
    #[serde(default = "AtmosphereSettings::default_enabled")]
    pub enabled: bool, // Enable the atmosphere (sky) renderer (requires a restart)
    #[serde(default = "AtmosphereSettings::default_resolution")]
    pub resolution: u32, // Resolution of each skybox face (auto updated at runtime)
    #[serde(default = "AtmosphereSettings::default_dithering")]
    pub dithering: bool, // Dithering to reduce color banding in the sky
}

impl AtmosphereSettings {
    fn default_enabled() -> bool { true }
    fn default_resolution() -> u32 { 512 }
    fn default_dithering() -> bool { true }
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            resolution: Self::default_resolution(),
            dithering: Self::default_dithering(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub hookshot: HookshotSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub atmosphere: AtmosphereSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return FUNCTION.get(n.checked_sub(1)?).copied();
        }

        Some(match s.as_str() {
            // Arrows / navigation
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,

            // Whitespace / control
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,

            // Modifiers
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            _ => return None,
        })
    }
}

pub mod loader;
