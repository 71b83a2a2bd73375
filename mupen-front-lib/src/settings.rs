//! Application settings (database, profile files, cache locations, defaults).
//!
//! Stored as TOML at `~/.config/mupen-front/settings.toml`. A missing or
//! corrupt file yields defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mupen_front_db::AmbiguityPolicy;

use crate::error::LibError;
use crate::profile::ProfileKind;

const APP_DIR: &str = "mupen-front";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub defaults: DefaultSettings,
}

/// Custom (editable) and built-in (read-only) profile files of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileFiles {
    pub custom: PathBuf,
    pub builtin: PathBuf,
}

impl ProfileFiles {
    fn for_kind(kind: ProfileKind) -> Self {
        Self {
            custom: config_dir().join(format!("{}_profiles.cfg", kind.file_stem())),
            builtin: data_dir()
                .join("profiles")
                .join(format!("{}.cfg", kind.file_stem())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// `mupen64plus.ini` ROM database
    pub database: PathBuf,
    /// Library cache written by scans
    pub library_cache: PathBuf,
    pub art_dir: PathBuf,
    /// Scratch directory for ROMs extracted from zip archives
    pub unzip_dir: PathBuf,
    /// Directory holding the native emulator libraries
    pub lib_dir: PathBuf,
    /// Root of the per-game save and config directories
    pub game_data: PathBuf,
    /// `mupencheat.txt`
    pub cheats: PathBuf,
    pub emulation_profiles: ProfileFiles,
    pub touchscreen_profiles: ProfileFiles,
    pub controller_profiles: ProfileFiles,
}

impl Default for PathSettings {
    fn default() -> Self {
        let cache = cache_dir();
        Self {
            database: data_dir().join("mupen64plus.ini"),
            library_cache: cache.join("romcache.cfg"),
            art_dir: cache.join("art"),
            unzip_dir: cache.join("unzip"),
            lib_dir: data_dir().join("lib"),
            game_data: data_dir().join("GameData"),
            cheats: data_dir().join("mupencheat.txt"),
            emulation_profiles: ProfileFiles::for_kind(ProfileKind::Emulation),
            touchscreen_profiles: ProfileFiles::for_kind(ProfileKind::Touchscreen),
            controller_profiles: ProfileFiles::for_kind(ProfileKind::Controller),
        }
    }
}

impl PathSettings {
    pub fn profiles(&self, kind: ProfileKind) -> &ProfileFiles {
        match kind {
            ProfileKind::Emulation => &self.emulation_profiles,
            ProfileKind::Touchscreen => &self.touchscreen_profiles,
            ProfileKind::Controller => &self.controller_profiles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub emulation_profile: String,
    pub touchscreen_profile: String,
    pub controller_profile: String,
    /// Look inside zip archives during library scans
    pub search_zips: bool,
    pub download_art: bool,
    pub ambiguity_policy: AmbiguityPolicy,
    /// Hashing workers; 0 means one per CPU
    pub workers: usize,
    /// Keep SRAM, slot and user saves directly in the game-data root
    pub flat_game_data: bool,
    /// Auto-saves kept per game
    pub max_auto_saves: usize,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            emulation_profile: ProfileKind::Emulation.app_default().to_string(),
            touchscreen_profile: ProfileKind::Touchscreen.app_default().to_string(),
            controller_profile: ProfileKind::Controller.app_default().to_string(),
            search_zips: true,
            download_art: false,
            ambiguity_policy: AmbiguityPolicy::default(),
            workers: 0,
            flat_game_data: false,
            max_auto_saves: 5,
        }
    }
}

impl DefaultSettings {
    /// The user's default profile name for `kind`.
    pub fn profile(&self, kind: ProfileKind) -> &str {
        match kind {
            ProfileKind::Emulation => &self.emulation_profile,
            ProfileKind::Touchscreen => &self.touchscreen_profile,
            ProfileKind::Controller => &self.controller_profile,
        }
    }

    /// Worker count with `0` resolved to the available parallelism.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns `~/.config/mupen-front/settings.toml`.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Load settings from the default location.
pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Load settings from disk, returning defaults if missing or corrupt.
pub fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to the default location.
pub fn save_settings(settings: &Settings) -> Result<(), LibError> {
    save_settings_to(settings, &settings_path())
}

/// Save settings to disk atomically (write to temp, then rename).
pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<(), LibError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = settings_to_string(settings)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Pretty-printed TOML, as written by [`save_settings_to`].
pub fn settings_to_string(settings: &Settings) -> Result<String, LibError> {
    toml::to_string_pretty(settings).map_err(|e| LibError::settings(e.to_string()))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
