//! Per-game data directories.
//!
//! Every game gets a directory under the game-data root named after its
//! header name, region tag and MD5:
//!
//! ```text
//! GameData/
//!   SUPER MARIO 64 (U) 0123456789ABCDEF0123456789ABCDEF/
//!     SramData/  AutoSaves/  SlotSaves/  UserSaves/  Screenshots/
//!     CoreConfig/mupen64plus.cfg
//! ```
//!
//! With the flat layout, SRAM, slot and user saves all live directly in the
//! game-data root instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use mupen_front_rom::RomHeader;

use crate::error::LibError;
use crate::hasher::compute_md5_file;
use crate::identify::Identification;
use crate::library::CacheEntry;

const SRAM_DATA_DIR: &str = "SramData";
const AUTO_SAVES_DIR: &str = "AutoSaves";
const SLOT_SAVES_DIR: &str = "SlotSaves";
const USER_SAVES_DIR: &str = "UserSaves";
const SCREENSHOTS_DIR: &str = "Screenshots";
const CORE_CONFIG_DIR: &str = "CoreConfig";
const CORE_CONFIG_FILE: &str = "mupen64plus.cfg";

/// Suffix of the marker written next to a finished auto-save.
pub const COMPLETE_SUFFIX: &str = ".complete";

/// The identity fields a game directory is named after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameKey {
    pub md5: String,
    pub header_name: String,
    /// Region tag such as `(U)`
    pub country_symbol: String,
}

impl GameKey {
    pub fn new(
        md5: impl Into<String>,
        header_name: impl Into<String>,
        country_symbol: impl Into<String>,
    ) -> Self {
        Self {
            md5: md5.into(),
            header_name: header_name.into(),
            country_symbol: country_symbol.into(),
        }
    }

    pub fn from_identification(id: &Identification) -> Self {
        Self::new(&id.md5, &id.header.name, id.header.country_symbol())
    }

    pub fn from_cache_entry(entry: &CacheEntry) -> Self {
        Self::new(&entry.md5, &entry.header_name, &entry.country_code)
    }

    /// Read the header and hash a ROM file. No database is needed.
    pub fn for_file(path: &Path) -> Result<Self, LibError> {
        let header = RomHeader::read(path);
        let md5 = compute_md5_file(path)?;
        Ok(Self::new(md5, &header.name, header.country_symbol()))
    }

    /// `"<header name without '/'> <region> <md5>"`
    pub fn dir_name(&self) -> String {
        format!(
            "{} {} {}",
            self.header_name.replace('/', ""),
            self.country_symbol,
            self.md5
        )
    }

    /// Same as [`dir_name`](Self::dir_name) with every `:` removed, for
    /// file systems that reject it.
    pub fn alternate_dir_name(&self) -> String {
        format!("{} {} {}", self.header_name, self.country_symbol, self.md5).replace(':', "")
    }

    /// Last resort: the MD5 alone.
    pub fn fallback_dir_name(&self) -> String {
        self.md5.clone()
    }
}

/// Resolved directories of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameDirs {
    pub base: PathBuf,
    pub sram: PathBuf,
    pub auto_saves: PathBuf,
    pub slot_saves: PathBuf,
    pub user_saves: PathBuf,
    pub screenshots: PathBuf,
    pub core_config: PathBuf,
    /// Per-game core configuration file inside `core_config`
    pub core_config_file: PathBuf,
}

impl GameDirs {
    /// Directories of a game stored in `root/dir_name`. Nothing is created.
    pub fn new(root: &Path, dir_name: &str, flat: bool) -> Self {
        let base = root.join(dir_name);
        let shared = |name: &str| {
            if flat {
                root.to_path_buf()
            } else {
                base.join(name)
            }
        };
        let core_config = base.join(CORE_CONFIG_DIR);
        Self {
            sram: shared(SRAM_DATA_DIR),
            slot_saves: shared(SLOT_SAVES_DIR),
            user_saves: shared(USER_SAVES_DIR),
            auto_saves: base.join(AUTO_SAVES_DIR),
            screenshots: base.join(SCREENSHOTS_DIR),
            core_config_file: core_config.join(CORE_CONFIG_FILE),
            core_config,
            base,
        }
    }

    /// Directories under the primary name, without touching the disk.
    pub fn for_game(root: &Path, key: &GameKey, flat: bool) -> Self {
        Self::new(root, &key.dir_name(), flat)
    }

    /// Create the game's directories. When the primary name cannot be
    /// created the alternate name is tried, then the bare MD5.
    pub fn create(root: &Path, key: &GameKey, flat: bool) -> Result<Self, LibError> {
        let names = [
            key.dir_name(),
            key.alternate_dir_name(),
            key.fallback_dir_name(),
        ];
        let mut last_error = None;
        for name in &names {
            let base = root.join(name);
            match fs::create_dir_all(&base) {
                Ok(()) if base.is_dir() => {
                    let dirs = Self::new(root, name, flat);
                    dirs.create_subdirs()?;
                    return Ok(dirs);
                }
                Ok(()) => {}
                Err(e) => {
                    log::debug!("Could not create {}: {e}", base.display());
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .map(LibError::Io)
            .unwrap_or_else(|| LibError::other(format!("No usable game directory for {}", key.md5))))
    }

    fn create_subdirs(&self) -> io::Result<()> {
        for dir in [
            &self.sram,
            &self.auto_saves,
            &self.slot_saves,
            &self.user_saves,
            &self.screenshots,
            &self.core_config,
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Auto-save files, sorted by name (oldest first).
    fn auto_save_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.auto_saves) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .filter(|e| e.file_name().to_str().is_some_and(is_auto_save_name))
            .map(|e| e.path())
            .filter(|p| !p.is_dir())
            .collect();
        files.sort();
        files
    }

    /// Newest loadable auto-save. Version 2 saves (`.v2.` in the name) only
    /// count once their `.complete` marker exists.
    pub fn latest_auto_save(&self) -> Option<PathBuf> {
        self.auto_save_files()
            .into_iter()
            .filter(|path| !is_v2(path) || complete_marker(path).exists())
            .next_back()
    }

    /// Delete the oldest auto-saves (and their markers) until at most `keep`
    /// remain. Returns how many saves were deleted.
    pub fn prune_auto_saves(&self, keep: usize) -> usize {
        let files = self.auto_save_files();
        let excess = files.len().saturating_sub(keep);
        let mut deleted = 0;
        for path in files.iter().take(excess) {
            log::debug!("Deleting old auto-save {}", path.display());
            match fs::remove_file(path) {
                Ok(()) => deleted += 1,
                Err(e) => log::warn!("Unable to delete auto-save {}: {e}", path.display()),
            }
            let marker = complete_marker(path);
            if marker.exists() {
                if let Err(e) = fs::remove_file(&marker) {
                    log::warn!("Unable to delete {}: {e}", marker.display());
                }
            }
        }
        deleted
    }
}

/// `yyyy-MM-dd-HH-mm-ss.<anything>sav`
fn is_auto_save_name(name: &str) -> bool {
    const TEMPLATE: &[u8] = b"0000-00-00-00-00-00.";
    let bytes = name.as_bytes();
    bytes.len() > TEMPLATE.len()
        && name.ends_with("sav")
        && TEMPLATE.iter().zip(bytes).all(|(&t, &b)| match t {
            b'0' => b.is_ascii_digit(),
            other => b == other,
        })
}

fn is_v2(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(".v2."))
}

fn complete_marker(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(COMPLETE_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "tests/game_dirs_tests.rs"]
mod tests;
