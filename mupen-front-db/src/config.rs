//! INI-style configuration files.
//!
//! The format shared by the ROM database, the profile files and the library
//! cache. Parsing is forgiving in the way the emulator's own reader is:
//! comments start with `#`, `;` or `//`, whitespace around keys and values
//! is ignored, empty values are skipped and a repeated key keeps the last
//! value. The first malformed line ends the parse; everything read up to
//! that point is kept.
//!
//! Files are edited in place and saved back with their comments and line
//! order intact.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DbError;

/// Name of the untitled section holding everything before the first `[title]`.
pub const SECTIONLESS_NAME: &str = "[<sectionless!>]";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment, blank line or ignored assignment, written back as-is
    Verbatim(String),
    /// Section title
    Title(String),
    /// `key=value`; `prefix` is the raw text up to and including `=`
    Param { key: String, prefix: String },
}

/// One `[title]` block and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSection {
    name: String,
    values: HashMap<String, String>,
    lines: Vec<Line>,
}

impl ConfigSection {
    /// Create an empty section. Its title line is emitted on save unless it
    /// is the sectionless preamble.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut lines = Vec::new();
        if !name.is_empty() && name != SECTIONLESS_NAME {
            lines.push(Line::Title(format!("[{name}]")));
        }
        Self {
            name,
            values: HashMap::new(),
            lines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a parameter value. Keys are case-sensitive.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.values.get(key).map(String::as_str)
    }

    /// Parameter names in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            Line::Param { key, .. } => Some(key.as_str()),
            _ => None,
        })
    }

    /// `(key, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys()
            .filter_map(|k| self.values.get(k).map(|v| (k, v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a parameter, replacing any previous spelling of the key
    /// (case-insensitive). An empty value removes the key.
    pub fn put(&mut self, key: &str, value: &str) {
        self.remove(key);
        if !value.is_empty() {
            self.lines.push(Line::Param {
                key: key.to_string(),
                prefix: format!("{key}="),
            });
            self.values.insert(key.to_string(), value.to_string());
        }
    }

    /// Remove a parameter (case-insensitive). Returns true if anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|k, _| !k.eq_ignore_ascii_case(key));
        self.lines.retain(|line| match line {
            Line::Param { key: k, .. } => !k.eq_ignore_ascii_case(key),
            _ => true,
        });
        self.values.len() != before
    }

    /// Record a parsed `key=value` line. A repeated key updates the value
    /// in place without adding a second line.
    fn push_parsed(&mut self, key: &str, value: &str, full_line: &str) {
        if let Some(existing) = self.values.get_mut(key) {
            *existing = value.to_string();
            return;
        }
        let prefix = match full_line.find('=') {
            Some(eq) => full_line[..=eq].to_string(),
            None => format!("{key}="),
        };
        self.lines.push(Line::Param {
            key: key.to_string(),
            prefix,
        });
        self.values.insert(key.to_string(), value.to_string());
    }

    fn write_to(&self, out: &mut String) {
        for line in &self.lines {
            match line {
                Line::Verbatim(text) | Line::Title(text) => out.push_str(text),
                Line::Param { key, prefix } => {
                    let Some(value) = self.values.get(key) else {
                        continue;
                    };
                    out.push_str(prefix);
                    out.push_str(value);
                }
            }
            out.push('\n');
        }
    }
}

/// An INI file: ordered sections plus the path it was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    sections: Vec<ConfigSection>,
    index: HashMap<String, usize>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFile {
    /// An empty in-memory file containing only the preamble section.
    pub fn new() -> Self {
        let mut file = Self {
            path: None,
            sections: Vec::new(),
            index: HashMap::new(),
        };
        file.insert_section(ConfigSection::new(SECTIONLESS_NAME));
        file
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> Self {
        let mut file = Self {
            path: None,
            sections: Vec::new(),
            index: HashMap::new(),
        };
        let mut current = ConfigSection::new(SECTIONLESS_NAME);

        for (lineno, full) in text.lines().enumerate() {
            let line = full.trim();

            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with(';')
                || line.starts_with("//")
            {
                current.lines.push(Line::Verbatim(full.to_string()));
                continue;
            }

            if let Some(eq) = line.find('=') {
                if eq < 1 {
                    log::warn!("Config line {}: assignment without a key", lineno + 1);
                    break;
                }
                let key = line[..eq].trim();
                let value = line[eq + 1..].trim();
                if key.is_empty() {
                    log::warn!("Config line {}: assignment without a key", lineno + 1);
                    break;
                }
                if value.is_empty() {
                    // "key=" is legal and means "unset"
                    current.lines.push(Line::Verbatim(full.to_string()));
                } else {
                    current.push_parsed(key, value, full);
                }
                continue;
            }

            if line.contains('[') {
                let (Some(open), Some(close)) = (line.find('['), line.find(']')) else {
                    log::warn!("Config line {}: unterminated section title", lineno + 1);
                    break;
                };
                if line.len() < 3 || close <= open + 1 {
                    log::warn!("Config line {}: malformed section title", lineno + 1);
                    break;
                }
                let name = line[open + 1..close].trim().to_string();
                file.insert_section(std::mem::replace(&mut current, ConfigSection::new(name)));
                continue;
            }

            log::warn!("Config line {}: unrecognized syntax", lineno + 1);
            break;
        }

        file.insert_section(current);
        file
    }

    /// Read and parse a file. Invalid UTF-8 is decoded lossily.
    pub fn load(path: &Path) -> Result<Self, DbError> {
        let bytes = fs::read(path)?;
        let mut file = Self::parse(&String::from_utf8_lossy(&bytes));
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Read a file, starting empty if it does not exist or cannot be read.
    /// The path is remembered either way so the file can be saved later.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(file) => file,
            Err(e) => {
                if !path.exists() {
                    log::debug!("Config file {} not found, starting empty", path.display());
                } else {
                    log::warn!("Could not read {}: {e}", path.display());
                }
                let mut file = Self::new();
                file.path = Some(path.to_path_buf());
                file
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn get(&self, section: &str) -> Option<&ConfigSection> {
        self.index.get(section).map(|&i| &self.sections[i])
    }

    pub fn get_mut(&mut self, section: &str) -> Option<&mut ConfigSection> {
        match self.index.get(section) {
            Some(&i) => Some(&mut self.sections[i]),
            None => None,
        }
    }

    pub fn contains(&self, section: &str) -> bool {
        self.index.contains_key(section)
    }

    /// Look up `key` in `section`.
    pub fn get_value(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section)?.get(key)
    }

    /// Set `key` in `section`, creating the section at the end if needed.
    pub fn put(&mut self, section: &str, key: &str, value: &str) {
        if !self.contains(section) {
            self.insert_section(ConfigSection::new(section));
        }
        if let Some(s) = self.get_mut(section) {
            s.put(key, value);
        }
    }

    /// Add a section, replacing one with the same name in place.
    pub fn insert_section(&mut self, section: ConfigSection) {
        match self.index.get(section.name()) {
            Some(&i) => self.sections[i] = section,
            None => {
                self.index
                    .insert(section.name().to_string(), self.sections.len());
                self.sections.push(section);
            }
        }
    }

    pub fn remove_section(&mut self, name: &str) -> Option<ConfigSection> {
        let i = self.index.remove(name)?;
        let removed = self.sections.remove(i);
        self.reindex();
        Some(removed)
    }

    /// Drop every section, keeping the path.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.index.clear();
        self.insert_section(ConfigSection::new(SECTIONLESS_NAME));
    }

    /// Titled sections in file order (the preamble is skipped).
    pub fn sections(&self) -> impl Iterator<Item = &ConfigSection> {
        self.sections
            .iter()
            .filter(|s| s.name() != SECTIONLESS_NAME)
    }

    /// Titles of [`sections`](Self::sections).
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections().map(ConfigSection::name)
    }

    /// Number of titled sections.
    pub fn len(&self) -> usize {
        self.sections().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize back to INI text.
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            section.write_to(&mut out);
        }
        out
    }

    /// Save to the remembered path.
    pub fn save(&self) -> Result<(), DbError> {
        let path = self.path.as_deref().ok_or(DbError::NoPath)?;
        self.save_to(path)
    }

    /// Save atomically (write to temp, then rename), creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, self.to_ini_string())?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name().to_string(), i))
            .collect();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
