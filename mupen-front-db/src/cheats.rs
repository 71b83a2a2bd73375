//! Read-only access to `mupencheat.txt`.
//!
//! The file is a list of sections, one per ROM:
//!
//! ```text
//! crc 635A2BFF-8B022326-C:45
//! gn Super Mario 64 (U)
//!  cn Infinite Lives
//!   cd Never run out
//!   8033B21D 0064
//!  cn Level Select
//!   8033B249 ????  0001:"Bob-omb Battlefield",0002:"Whomp's Fortress"
//! ```
//!
//! The section key is the header CRC pair joined by `-`, then `-C:` and the
//! destination byte of the header in two lowercase hex digits.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheatOption {
    /// Four hex digits substituted for `????`
    pub value: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheatCode {
    /// Eight hex digits
    pub address: String,
    /// Four hex digits, or `????` when the value is picked from `options`
    pub value: String,
    pub options: Vec<CheatOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cheat {
    pub name: String,
    pub description: Option<String>,
    pub codes: Vec<CheatCode>,
}

impl Cheat {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            codes: Vec::new(),
        }
    }

    /// Options of the last code that has any.
    pub fn options(&self) -> &[CheatOption] {
        self.codes
            .iter()
            .rev()
            .find(|c| !c.options.is_empty())
            .map(|c| c.options.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheatSection {
    pub key: String,
    pub good_name: String,
    pub cheats: Vec<Cheat>,
}

impl CheatSection {
    /// Cheats ordered by name, ignoring case.
    pub fn sorted_cheats(&self) -> Vec<&Cheat> {
        let mut cheats: Vec<&Cheat> = self.cheats.iter().collect();
        cheats.sort_by_key(|c| c.name.to_lowercase());
        cheats
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheatFile {
    sections: Vec<CheatSection>,
}

impl CheatFile {
    pub fn load(path: &Path) -> Result<Self, DbError> {
        let bytes = fs::read(path)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<CheatSection> = Vec::new();
        // A cheat block stays open until the next blank line
        let mut open = false;

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(key) = line.strip_prefix("crc ") {
                sections.push(CheatSection {
                    key: key.trim().to_string(),
                    good_name: String::new(),
                    cheats: Vec::new(),
                });
                open = false;
                continue;
            }
            // Lines before the first section
            let Some(section) = sections.last_mut() else {
                continue;
            };

            if line.is_empty() {
                open = false;
            } else if line.starts_with("//") {
                continue;
            } else if let Some(name) = line.strip_prefix("gn ") {
                section.good_name = name.to_string();
            } else if let Some(name) = line.strip_prefix(" cn ") {
                section.cheats.push(Cheat::new(name));
                open = true;
            } else if let (true, Some(cheat)) = (open, section.cheats.last_mut()) {
                if let Some(description) = line.strip_prefix("  cd ") {
                    cheat.description = Some(description.to_string());
                } else if let Some(code) = parse_code(line) {
                    cheat.codes.push(code);
                } else {
                    log::warn!("Unknown cheat syntax in {}: {line}", section.key);
                    open = false;
                }
            } else {
                log::warn!("Unknown cheat syntax in {}: {line}", section.key);
            }
        }

        Self { sections }
    }

    pub fn sections(&self) -> impl Iterator<Item = &CheatSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First section for a header CRC (`"XXXXXXXX XXXXXXXX"`) and
    /// destination byte. Without a destination any region of the CRC
    /// matches.
    pub fn section_for(&self, crc: &str, country: Option<u8>) -> Option<&CheatSection> {
        let prefix = match country {
            Some(byte) => format!("{}-C:{byte:02x}", crc.replace(' ', "-")),
            None => format!("{}-C:", crc.replace(' ', "-")),
        };
        self.sections.iter().find(|s| s.key.starts_with(&prefix))
    }
}

/// `  AAAAAAAA VVVV` or `  AAAAAAAA ???? <options>`
fn parse_code(line: &str) -> Option<CheatCode> {
    let rest = line.strip_prefix("  ")?;
    let (address, rest) = split_token(rest, 8)?;
    if !is_hex(address) {
        return None;
    }
    let rest = rest.strip_prefix(' ')?;
    let (value, rest) = split_token(rest, 4)?;
    if value == "????" {
        let rest = rest.strip_prefix(' ')?;
        return Some(CheatCode {
            address: address.to_string(),
            value: value.to_string(),
            options: parse_options(rest),
        });
    }
    if !is_hex(value) {
        return None;
    }
    Some(CheatCode {
        address: address.to_string(),
        value: value.to_string(),
        options: Vec::new(),
    })
}

/// `0001:"First",0002:"Second \"quoted\""`
fn parse_options(text: &str) -> Vec<CheatOption> {
    let mut options = Vec::new();
    let mut rest = text.trim_start();
    while let Some((value, tail)) = split_token(rest, 4) {
        let Some(tail) = tail.strip_prefix(":\"").filter(|_| is_hex(value)) else {
            break;
        };
        let Some(end) = closing_quote(tail) else {
            break;
        };
        options.push(CheatOption {
            value: value.to_string(),
            name: tail[..end].to_string(),
        });
        rest = tail[end + 1..].trim_start_matches(',').trim_start();
    }
    options
}

/// Index of the first `"` not preceded by a backslash.
fn closing_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (0..bytes.len()).find(|&i| bytes[i] == b'"' && (i == 0 || bytes[i - 1] != b'\\'))
}

fn split_token(text: &str, len: usize) -> Option<(&str, &str)> {
    (text.len() >= len && text.is_char_boundary(len)).then(|| text.split_at(len))
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
#[path = "tests/cheats_tests.rs"]
mod tests;
