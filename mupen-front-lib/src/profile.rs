//! Named setting bundles stored as INI sections.
//!
//! Every profile kind has two files: a read-only file of built-in profiles
//! shipped with the app, and an editable file of custom profiles. Lookups
//! consult the custom file first so a user can shadow a built-in profile by
//! name.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mupen_front_db::{ConfigFile, ConfigSection};

use crate::error::LibError;
use crate::input_map::InputMap;
use crate::settings::ProfileFiles;

const KEY_COMMENT: &str = "comment";

/// Which family of profiles a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Emulation,
    Touchscreen,
    Controller,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 3] = [Self::Emulation, Self::Touchscreen, Self::Controller];

    pub(crate) fn file_stem(self) -> &'static str {
        match self {
            Self::Emulation => "emulation",
            Self::Touchscreen => "touchscreen",
            Self::Controller => "controller",
        }
    }

    /// Built-in profile used when neither the selection nor the user's
    /// default exists.
    pub fn app_default(self) -> &'static str {
        match self {
            Self::Emulation => "Glide64-Fast",
            Self::Touchscreen => "Analog",
            Self::Controller => "Android Gamepad",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for ProfileKind {
    type Err = LibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emulation" | "emu" => Ok(Self::Emulation),
            "touchscreen" | "touch" => Ok(Self::Touchscreen),
            "controller" | "ctrl" => Ok(Self::Controller),
            other => Err(LibError::other(format!("Unknown profile kind: {other}"))),
        }
    }
}

/// A named bundle of string settings.
///
/// Ordering and equality use the name only, ignoring case.
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    is_builtin: bool,
    data: BTreeMap<String, String>,
}

impl Profile {
    /// An empty custom profile.
    pub fn new(name: impl Into<String>, comment: Option<&str>) -> Self {
        let mut profile = Self {
            name: name.into(),
            is_builtin: false,
            data: BTreeMap::new(),
        };
        profile.set_comment(comment);
        profile
    }

    pub fn from_section(section: &ConfigSection, is_builtin: bool) -> Self {
        Self {
            name: section.name().to_string(),
            is_builtin,
            data: section
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// All profiles in a file, in file order.
    pub fn list(config: &ConfigFile, is_builtin: bool) -> Vec<Profile> {
        config
            .sections()
            .map(|s| Self::from_section(s, is_builtin))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_builtin(&self) -> bool {
        self.is_builtin
    }

    pub fn comment(&self) -> Option<&str> {
        self.get(KEY_COMMENT)
    }

    pub fn set_comment(&mut self, comment: Option<&str>) {
        match comment {
            Some(c) if !c.is_empty() => self.put(KEY_COMMENT, c),
            _ => {
                self.data.remove(KEY_COMMENT);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// `true`/`false` (any case); anything else gives `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn put(&mut self, key: &str, value: impl Into<String>) {
        self.data.insert(key.to_string(), value.into());
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, value.to_string());
    }

    pub fn put_int(&mut self, key: &str, value: i32) {
        self.put(key, value.to_string());
    }

    /// Settings in key order, including the comment.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge this profile's section from `config`, overwriting existing keys.
    /// Returns false if the name is empty or the section is missing.
    pub fn read_from(&mut self, config: &ConfigFile) -> bool {
        if self.name.is_empty() {
            return false;
        }
        let Some(section) = config.get(&self.name) else {
            return false;
        };
        for (k, v) in section.iter() {
            self.data.insert(k.to_string(), v.to_string());
        }
        true
    }

    /// Write every setting into `config` under this profile's name.
    pub fn write_to(&self, config: &mut ConfigFile) -> bool {
        if self.name.is_empty() {
            return false;
        }
        for (k, v) in &self.data {
            config.put(&self.name, k, v);
        }
        true
    }

    /// Custom copy under a new name; the source comment is not carried over.
    pub fn copy(&self, name: &str, comment: Option<&str>) -> Option<Profile> {
        if name.is_empty() {
            return None;
        }
        let mut copy = Profile::new(name, comment);
        for (k, v) in self.data.iter().filter(|(k, _)| *k != KEY_COMMENT) {
            copy.data.insert(k.clone(), v.clone());
        }
        Some(copy)
    }

    fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Profile {}

impl PartialOrd for Profile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Profile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Controller view of a profile: input map plus analog tuning.
#[derive(Debug, Clone)]
pub struct ControllerProfile {
    pub profile: Profile,
}

impl ControllerProfile {
    const KEY_MAP: &'static str = "map";
    const KEY_DEADZONE: &'static str = "deadzone";
    const KEY_SENSITIVITY: &'static str = "sensitivity";

    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn input_map(&self) -> InputMap {
        InputMap::deserialize(self.profile.get_or(Self::KEY_MAP, ""))
    }

    pub fn set_input_map(&mut self, map: &InputMap) {
        self.profile.put(Self::KEY_MAP, map.serialize());
    }

    /// Analog dead zone, percent.
    pub fn deadzone(&self) -> i32 {
        self.profile.get_int(Self::KEY_DEADZONE, 0)
    }

    /// Analog sensitivity, percent.
    pub fn sensitivity(&self) -> i32 {
        self.profile.get_int(Self::KEY_SENSITIVITY, 100)
    }
}

/// The custom and built-in profile files of one kind.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    kind: ProfileKind,
    custom: ConfigFile,
    builtin: ConfigFile,
}

impl ProfileStore {
    /// Load both files; missing files start empty.
    pub fn open(kind: ProfileKind, files: &ProfileFiles) -> Self {
        Self::from_files(
            kind,
            ConfigFile::load_or_empty(&files.custom),
            ConfigFile::load_or_empty(&files.builtin),
        )
    }

    pub fn from_files(kind: ProfileKind, custom: ConfigFile, builtin: ConfigFile) -> Self {
        Self {
            kind,
            custom,
            builtin,
        }
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    /// Find a profile by exact name, custom file first.
    pub fn find(&self, name: &str) -> Option<Profile> {
        if name.is_empty() {
            return None;
        }
        if let Some(section) = self.custom.get(name) {
            return Some(Profile::from_section(section, false));
        }
        self.builtin
            .get(name)
            .map(|section| Profile::from_section(section, true))
    }

    /// Pick the profile to use: the selection, then the user's default,
    /// then the app default, each looked up in the custom file before the
    /// built-in one.
    pub fn resolve(
        &self,
        selected: Option<&str>,
        default_name: &str,
        app_default: &str,
    ) -> Option<Profile> {
        [selected.unwrap_or_default(), default_name, app_default]
            .into_iter()
            .find_map(|name| self.find(name))
    }

    /// Custom and built-in profiles merged and sorted by name.
    pub fn list(&self) -> Vec<Profile> {
        let mut all = Profile::list(&self.custom, false);
        all.extend(Profile::list(&self.builtin, true));
        all.sort();
        all
    }

    /// Write a custom profile and save the custom file.
    pub fn save_custom(&mut self, profile: &Profile) -> Result<(), LibError> {
        if profile.is_builtin() {
            return Err(LibError::ReadOnlyProfile(profile.name().to_string()));
        }
        if !profile.write_to(&mut self.custom) {
            return Err(LibError::other("Profile name cannot be empty"));
        }
        self.custom.save()?;
        Ok(())
    }

    /// Remove a custom profile and save the custom file.
    pub fn delete_custom(&mut self, name: &str) -> Result<(), LibError> {
        if self.custom.remove_section(name).is_some() {
            self.custom.save()?;
            return Ok(());
        }
        if self.builtin.contains(name) {
            return Err(LibError::ReadOnlyProfile(name.to_string()));
        }
        Err(LibError::ProfileNotFound(name.to_string()))
    }

    pub fn custom(&self) -> &ConfigFile {
        &self.custom
    }

    pub fn builtin(&self) -> &ConfigFile {
        &self.builtin
    }
}

#[cfg(test)]
#[path = "tests/profile_tests.rs"]
mod tests;
