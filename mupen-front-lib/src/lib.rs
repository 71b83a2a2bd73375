//! Application layer of the mupen-front tools.
//!
//! Ties the header parser and the ROM database together with the pieces a
//! frontend needs around them: settings, profiles, input maps, library
//! scans with their cache file, per-game data directories, cover-art
//! download and the native plugin check. Frontends (currently only the
//! CLI) call into this crate and never touch the lower crates' file
//! formats directly.

pub mod art;
pub mod error;
pub mod game_dirs;
pub mod hasher;
pub mod identify;
pub mod input_map;
pub mod library;
pub mod plugins;
pub mod profile;
pub mod settings;
pub mod worker_pool;

pub use error::LibError;
pub use game_dirs::{GameDirs, GameKey};
pub use identify::{Identification, identify_file};
pub use input_map::InputMap;
pub use library::{CacheEntry, ScanOptions, ScanSummary, remove_missing_entries, scan_library};
pub use plugins::{PluginReport, check_native_libs};
pub use profile::{ControllerProfile, Profile, ProfileKind, ProfileStore};
pub use settings::{Settings, load_settings, save_settings, settings_path};

// Re-exports so frontends need only this crate
pub use mupen_front_core::{AnalysisError, CountryCode, ScanProgress};
pub use mupen_front_db::{
    AmbiguityPolicy, CheatFile, CheatSection, ConfigFile, Resolution, RomDatabase, RomDetail,
};
pub use mupen_front_rom::RomHeader;
