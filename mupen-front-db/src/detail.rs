//! Metadata records returned by the ROM database.

use serde::Serialize;

use mupen_front_rom::HOMEBREW_CRC;

use crate::config::{ConfigFile, ConfigSection};

const ART_URL_TEMPLATE: &str = "http://www.zurita.me/CoverArt/";
const WIKI_URL_TEMPLATE: &str = "https://github.com/mupen64plus-ae/mupen64plus-ae-meta/wiki/";

const DEFAULT_STATUS: i32 = 0;
const DEFAULT_PLAYERS: i32 = 4;
const DEFAULT_RUMBLE: bool = true;

/// Everything the front-end knows about one ROM.
///
/// Name-derived fields are `None` when the database entry has no `GoodName`,
/// and the URL fields are `None` whenever the base name is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomDetail {
    pub crc: String,
    pub md5: String,
    pub good_name: Option<String>,
    pub base_name: Option<String>,
    pub art_name: Option<String>,
    pub art_url: Option<String>,
    pub wiki_url: Option<String>,
    pub save_type: Option<String>,
    pub status: i32,
    pub players: i32,
    pub rumble: bool,
}

impl RomDetail {
    /// Build a record from a database section, following `RefMD5` for the
    /// shared gameplay fields.
    pub(crate) fn from_section(section: &ConfigSection, database: &ConfigFile) -> Self {
        let md5 = section.name().to_string();
        let crc = section.get("CRC").unwrap_or_default().to_string();

        let good_name = if crc == HOMEBREW_CRC {
            Some(String::new())
        } else {
            let name = section.get("GoodName").map(str::to_string);
            if name.is_none() {
                log::error!("ROM database entry {md5} has no GoodName");
            }
            name
        };

        let shared = match section.get("RefMD5") {
            Some(reference) => {
                let target = database
                    .get(reference)
                    .or_else(|| database.get(&reference.to_ascii_uppercase()));
                if target.is_none() {
                    log::error!("ROM database entry {md5} references missing entry {reference}");
                }
                target
            }
            None => Some(section),
        };

        let mut detail = Self::with_name(crc, md5, good_name, true);
        if let Some(shared) = shared {
            detail.save_type = shared.get("SaveType").map(str::to_string);
            detail.status = parse_int(shared.get("Status"), DEFAULT_STATUS);
            detail.players = parse_int(shared.get("Players"), DEFAULT_PLAYERS);
            detail.rumble = parse_rumble(shared.get("Rumble"));
        }
        detail
    }

    /// Best guess for a ROM the database does not know, named after its file.
    pub fn placeholder(file_name: &str, crc: &str) -> Self {
        let good_name = match file_name.rfind('.') {
            Some(dot) => &file_name[..dot],
            None => file_name,
        };
        Self::with_name(crc.to_string(), String::new(), Some(good_name.to_string()), false)
    }

    fn with_name(crc: String, md5: String, good_name: Option<String>, with_urls: bool) -> Self {
        let base_name = good_name.as_deref().map(base_name_of);
        let usable = base_name
            .as_deref()
            .filter(|b| with_urls && !b.is_empty());
        let art_name = usable.map(art_name_for);
        let art_url = art_name.as_deref().map(|a| format!("{ART_URL_TEMPLATE}{a}"));
        let wiki_url = usable.map(|b| wiki_url_for(b, good_name.as_deref().unwrap_or_default()));

        Self {
            crc,
            md5,
            good_name,
            base_name,
            art_name,
            art_url,
            wiki_url,
            save_type: None,
            status: DEFAULT_STATUS,
            players: DEFAULT_PLAYERS,
            rumble: DEFAULT_RUMBLE,
        }
    }

    /// Good name, or an empty string when the entry has none.
    pub fn display_name(&self) -> &str {
        self.good_name.as_deref().unwrap_or_default()
    }
}

/// The good name up to its first `" ("` tag group, trimmed.
pub fn base_name_of(good_name: &str) -> String {
    match good_name.find(" (") {
        Some(i) => good_name[..i].trim().to_string(),
        None => good_name.trim().to_string(),
    }
}

/// Cover-art file name: punctuation stripped, non-word runs collapsed to `_`.
pub fn art_name_for(base_name: &str) -> String {
    let mut out = String::with_capacity(base_name.len() + 4);
    let mut in_gap = false;
    for c in base_name.chars().filter(|c| !matches!(c, '\'' | '.' | '!')) {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }
    out.push_str(".png");
    out
}

fn wiki_url_for(base_name: &str, good_name: &str) -> String {
    let mut url = format!("{WIKI_URL_TEMPLATE}{}", base_name.replace(' ', "_"));
    if good_name.contains("(Kiosk") {
        url.push_str("_(Kiosk_Demo)");
    }
    url
}

fn parse_int(value: Option<&str>, default: i32) -> i32 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_rumble(value: Option<&str>) -> bool {
    match value {
        None => DEFAULT_RUMBLE,
        Some(v) => v.is_empty() || v == "Yes",
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
