//! ROM identity resolution against the `mupen64plus.ini` database.
//!
//! Entries are keyed by the uppercase MD5 of the whole ROM. When the MD5 is
//! unknown the header CRC is tried instead; a CRC can be shared by several
//! dumps, so CRC lookups report every candidate instead of silently picking
//! one. Callers collapse ambiguous results with an explicit
//! [`AmbiguityPolicy`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mupen_front_core::CountryCode;

use crate::config::ConfigFile;
use crate::detail::RomDetail;
use crate::error::DbError;

/// Result of looking a ROM up by its header CRC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrcLookup {
    Unique(RomDetail),
    /// Several entries share the CRC, in database order.
    Ambiguous(Vec<RomDetail>),
    NotFound,
}

/// Outcome of identifying one ROM file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The MD5 is in the database.
    Exact(RomDetail),
    /// The MD5 is unknown but exactly one entry has this CRC.
    CrcMatch(RomDetail),
    /// Several entries share the CRC.
    Ambiguous {
        candidates: Vec<RomDetail>,
        guess: RomDetail,
    },
    /// Nothing matched; `guess` is named after the file.
    NotFound(RomDetail),
}

impl Resolution {
    /// Collapse to a single record.
    pub fn into_detail(self, policy: AmbiguityPolicy) -> RomDetail {
        match self {
            Self::Exact(d) | Self::CrcMatch(d) | Self::NotFound(d) => d,
            Self::Ambiguous { candidates, guess } => match policy {
                AmbiguityPolicy::FirstCandidate => candidates.into_iter().next().unwrap_or(guess),
                AmbiguityPolicy::Placeholder => guess,
            },
        }
    }

    /// Whether the database recognised the ROM at all.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exact(_) => "md5",
            Self::CrcMatch(_) => "crc",
            Self::Ambiguous { .. } => "ambiguous",
            Self::NotFound(_) => "unknown",
        }
    }
}

/// How to pick a record when a CRC matches several database entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbiguityPolicy {
    /// Take the first entry in database order.
    #[default]
    #[serde(rename = "first")]
    FirstCandidate,
    /// Fall back to the file-name guess.
    #[serde(rename = "placeholder")]
    Placeholder,
}

impl fmt::Display for AmbiguityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstCandidate => write!(f, "first"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

impl FromStr for AmbiguityPolicy {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-candidate" => Ok(Self::FirstCandidate),
            "placeholder" | "guess" => Ok(Self::Placeholder),
            other => Err(DbError::unknown_policy(other)),
        }
    }
}

/// The ROM database, loaded once and indexed by CRC and by uppercase MD5.
#[derive(Debug, Clone)]
pub struct RomDatabase {
    config: ConfigFile,
    crc_index: HashMap<String, Vec<String>>,
    /// Uppercase MD5 to section name as written in the file
    md5_index: HashMap<String, String>,
}

impl RomDatabase {
    /// Load the database file.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if !path.is_file() {
            return Err(DbError::DatabaseNotFound(path.to_path_buf()));
        }
        let config = ConfigFile::load(path)?;
        let db = Self::from_config(config);
        log::debug!(
            "Loaded ROM database {} ({} entries, {} CRCs)",
            path.display(),
            db.len(),
            db.crc_index.len()
        );
        Ok(db)
    }

    /// Index an already parsed database. Entries without a `CRC` are only
    /// reachable by MD5.
    pub fn from_config(config: ConfigFile) -> Self {
        let mut crc_index: HashMap<String, Vec<String>> = HashMap::new();
        let mut md5_index = HashMap::with_capacity(config.len());
        for section in config.sections() {
            md5_index
                .entry(section.name().to_ascii_uppercase())
                .or_insert_with(|| section.name().to_string());
            if let Some(crc) = section.get("CRC") {
                crc_index
                    .entry(crc.to_string())
                    .or_default()
                    .push(section.name().to_string());
            }
        }
        Self {
            config,
            crc_index,
            md5_index,
        }
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.config.path()
    }

    /// Exact lookup by MD5, ignoring case.
    pub fn lookup_by_md5(&self, md5: &str) -> Option<RomDetail> {
        if md5.is_empty() {
            return None;
        }
        let name = self.md5_index.get(&md5.to_ascii_uppercase())?;
        let section = self.config.get(name)?;
        Some(RomDetail::from_section(section, &self.config))
    }

    /// Lookup by header CRC. With several matches, `country` narrows the
    /// candidates to those whose good name carries the country's tag.
    pub fn lookup_by_crc(&self, crc: &str, country: Option<CountryCode>) -> CrcLookup {
        let Some(names) = self.crc_index.get(crc) else {
            return CrcLookup::NotFound;
        };
        let mut candidates: Vec<RomDetail> = names
            .iter()
            .filter_map(|name| self.config.get(name))
            .map(|section| RomDetail::from_section(section, &self.config))
            .collect();

        if candidates.len() > 1 {
            if let Some(country) = country {
                let tag = country.tag();
                let narrowed: Vec<RomDetail> = candidates
                    .iter()
                    .filter(|d| d.display_name().contains(tag))
                    .cloned()
                    .collect();
                if !narrowed.is_empty() {
                    candidates = narrowed;
                }
            }
        }

        match candidates.len() {
            0 => CrcLookup::NotFound,
            1 => candidates
                .pop()
                .map(CrcLookup::Unique)
                .unwrap_or(CrcLookup::NotFound),
            _ => CrcLookup::Ambiguous(candidates),
        }
    }

    /// Identify a ROM: MD5 first, then CRC, then a guess from the file name.
    pub fn resolve(
        &self,
        md5: &str,
        file_path: &Path,
        crc: &str,
        country: Option<CountryCode>,
    ) -> Resolution {
        if let Some(detail) = self.lookup_by_md5(md5) {
            return Resolution::Exact(detail);
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let guess = RomDetail::placeholder(&file_name, crc);

        match self.lookup_by_crc(crc, country) {
            CrcLookup::Unique(detail) => Resolution::CrcMatch(detail),
            CrcLookup::Ambiguous(candidates) => {
                log::debug!(
                    "{} matches {} database entries by CRC {crc}",
                    file_name,
                    candidates.len()
                );
                Resolution::Ambiguous { candidates, guess }
            }
            CrcLookup::NotFound => Resolution::NotFound(guess),
        }
    }
}

#[cfg(test)]
#[path = "tests/database_tests.rs"]
mod tests;
