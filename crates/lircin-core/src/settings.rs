// Lircin Settings
// Optional TOML tuning for socket paths and dispatch timing

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dispatch::DispatchTuning;
use crate::driver::DriverConfig;

/// User-tunable settings.
///
/// Loaded from a TOML file (default: ~/.config/lircin/settings.toml). Every
/// field is optional; anything absent keeps its built-in default, so an empty
/// or missing file behaves exactly like the stock driver.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    socket_path: Option<PathBuf>,
    legacy_socket_path: Option<PathBuf>,
    idle_timeout_ms: Option<u64>,
    held_timeout_ms: Option<u64>,
    low_battery_timeout_ms: Option<u64>,
    repeat_debounce: Option<u32>,
    /// Path the settings were loaded from (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    socket: Option<SocketSettings>,

    #[serde(default)]
    timing: Option<TimingSettings>,

    #[serde(default)]
    repeat: Option<RepeatSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SocketSettings {
    #[serde(default)]
    path: Option<PathBuf>,

    #[serde(default)]
    legacy_path: Option<PathBuf>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct TimingSettings {
    #[serde(default)]
    idle_ms: Option<u64>,

    #[serde(default)]
    held_ms: Option<u64>,

    #[serde(default)]
    low_battery_ms: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct RepeatSettings {
    #[serde(default)]
    debounce: Option<u32>,
}

impl Settings {
    /// Create settings with every knob at its built-in default
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let socket = parsed.socket.unwrap_or_default();
        let timing = parsed.timing.unwrap_or_default();
        let repeat = parsed.repeat.unwrap_or_default();

        Ok(Self {
            socket_path: socket.path,
            legacy_socket_path: socket.legacy_path,
            idle_timeout_ms: timing.idle_ms,
            held_timeout_ms: timing.held_ms,
            low_battery_timeout_ms: timing.low_battery_ms,
            repeat_debounce: repeat.debounce,
            source_path: None,
        })
    }

    /// The default settings file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lircin").join("settings.toml"))
    }

    /// Load from the default location; a missing file yields the defaults
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::new()),
        }
    }

    pub fn socket_path(&self) -> Option<&Path> {
        self.socket_path.as_deref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Resolve into a driver config, filling gaps with the stock tuning
    pub fn to_driver_config(&self) -> DriverConfig {
        let defaults = DispatchTuning::default();
        let ms = |value: Option<u64>, fallback: Duration| {
            value.map(Duration::from_millis).unwrap_or(fallback)
        };
        DriverConfig {
            socket_path: self.socket_path.clone(),
            legacy_socket_path: self.legacy_socket_path.clone(),
            tuning: DispatchTuning {
                idle_timeout: ms(self.idle_timeout_ms, defaults.idle_timeout),
                held_timeout: ms(self.held_timeout_ms, defaults.held_timeout),
                low_battery_timeout: ms(self.low_battery_timeout_ms, defaults.low_battery_timeout),
                repeat_debounce: self.repeat_debounce.unwrap_or(defaults.repeat_debounce),
            },
        }
    }
}
