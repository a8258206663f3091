//! Configuration module for motion-recorder
//!
//! This module handles the recorder configuration file and the locations of
//! persisted data:
//! - Where session records are stored and how id collisions are handled
//! - Playback defaults
//! - Room layout used for path analysis
//! - Log filtering and optional log files
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hxyulin.motion-recorder/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.motion-recorder/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.motion-recorder\`
//!
//! # Files
//!
//! - `config.toml` - Recorder configuration
//! - `sessions/<id>.json` - Saved sessions (unless `storage.dir` says otherwise)
//!
//! # Example
//!
//! ```ignore
//! use motion_recorder::config::RecorderConfig;
//!
//! let config = RecorderConfig::load_or_default(&path);
//! let mut store = config.storage.open_store()?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::{Room, RoomLayout};
use crate::error::{RecorderError, Result};
use crate::session::SessionPlayer;
use crate::store::{FileSessionStore, OverwritePolicy};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.hxyulin.motion-recorder";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default directory name for session records
pub const SESSIONS_DIR: &str = "sessions";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info,motion_recorder=debug";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        RecorderError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            RecorderError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Recorder Config ====================

/// Complete recorder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Version for future migration support
    pub version: u32,

    pub storage: StorageConfig,

    pub playback: PlaybackConfig,

    pub analysis: AnalysisConfig,

    pub logging: LoggingConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            version: 1,
            storage: StorageConfig::default(),
            playback: PlaybackConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RecorderError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| RecorderError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Write the config file, creating its directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RecorderError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RecorderError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| RecorderError::Config(format!("Failed to write config: {}", e)))
    }
}

// ==================== Storage Config ====================

/// Where and how sessions are persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session directory (defaults to `<app data>/sessions`)
    pub dir: Option<PathBuf>,

    /// What to do when saving to an id that already holds a recording
    pub overwrite_policy: OverwritePolicy,
}

impl StorageConfig {
    /// Session directory after applying the default
    pub fn resolved_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(ensure_app_data_dir()?.join(SESSIONS_DIR)),
        }
    }

    /// Open the configured session store
    pub fn open_store(&self) -> Result<FileSessionStore> {
        FileSessionStore::open(self.resolved_dir()?, self.overwrite_policy)
    }
}

// ==================== Playback Config ====================

/// Playback defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Playback speed multiplier
    pub speed: f32,

    /// Restart from the beginning at the end of the log
    pub loop_playback: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            loop_playback: false,
        }
    }
}

impl PlaybackConfig {
    /// Apply these defaults to a player
    pub fn apply(&self, player: &mut SessionPlayer) {
        player.set_playback_speed(self.speed);
        player.set_loop_playback(self.loop_playback);
    }
}

// ==================== Analysis Config ====================

/// Path analysis settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rooms are spread out by the portal scale
    pub portals: bool,

    /// Custom room layout (defaults to the museum layout)
    pub rooms: Option<Vec<Room>>,
}

impl AnalysisConfig {
    pub fn layout(&self) -> RoomLayout {
        match &self.rooms {
            Some(rooms) => RoomLayout::new(rooms.clone()),
            None => RoomLayout::museum(),
        }
    }
}

// ==================== Logging Config ====================

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub filter: String,

    /// Directory for daily rolling log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }
}

// ==================== Tests ====================
