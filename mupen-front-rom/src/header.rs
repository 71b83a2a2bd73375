//! Lenient N64 header parser.
//!
//! The header occupies the first 0x40 bytes of a cartridge image. Parsing
//! never fails: a short or unreadable input produces a zeroed header with
//! `is_valid == false`, and callers decide what to do with it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::byteorder::{MAGIC_Z64, N64Format, normalize_to_big_endian};
use mupen_front_core::CountryCode;
use mupen_front_core::util::{be_u16, be_u32, read_fixed_string};

/// Size of the cartridge header.
pub const HEADER_SIZE: usize = 0x40;

/// Bytes read from disk; 64DD detection needs the marker at 0xE6.
pub const SNIFF_SIZE: usize = 0xE8;

/// CRC string carried by homebrew images that never had their header
/// checksum filled in.
pub const HOMEBREW_CRC: &str = "00000000 00000000";

const MAGIC_ZIP: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const MAGIC_7Z: [u8; 4] = [0x7A, 0x37, 0xAF, 0xBC];
const MAGIC_RAR: [u8; 4] = [0x52, 0x61, 0x72, 0x21];

const NDD_JAPAN: [u8; 4] = [0xE8, 0x48, 0xD3, 0x16];
const NDD_USA: [u8; 4] = [0x22, 0x63, 0xEE, 0x56];
const NDD_DEV: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

/// Parsed view of an N64 cartridge header, normalised to big-endian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomHeader {
    /// On-disk ordering picked from the lead byte
    pub format: N64Format,
    /// PI_BSD_DOM1 latency/pulse/page/release bytes (0x00-0x03)
    pub pi_init: [u8; 4],
    pub clock_rate: u32,
    /// Boot address / program counter (0x08)
    pub pc: u32,
    /// libultra release (0x0C)
    pub release: u32,
    pub crc1: u32,
    pub crc2: u32,
    pub unknown1: u8,
    pub unknown2: u8,
    /// Internal name (0x20-0x34), trimmed
    pub name: String,
    pub unknown3: u32,
    /// 0x38-0x3B; the low byte is the media category ('N' = Game Pak)
    pub manufacturer_id: u32,
    /// Two-character game ID (0x3C)
    pub cartridge_id: u16,
    pub country_code: CountryCode,
    /// `"%08X %08X"` of crc1/crc2, empty when the header was unreadable
    pub crc: String,
    /// Normalised magic equals `80 37 12 40`
    pub is_valid: bool,
    pub is_zip: bool,
    pub is_7zip: bool,
    pub is_rar: bool,
    /// 64DD disk image
    pub is_ndd: bool,
}

impl RomHeader {
    /// Parse a header from the leading bytes of an image.
    ///
    /// Fewer than 0x40 bytes yields a zeroed header; the PI bytes and the
    /// container flags are still filled from whatever is present.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = bytes[..bytes.len().min(SNIFF_SIZE)].to_vec();

        let lead4 = lead_word(&buf);
        let is_zip = lead4 == Some(MAGIC_ZIP);
        let is_7zip = lead4 == Some(MAGIC_7Z);
        let is_rar = lead4 == Some(MAGIC_RAR);

        let mut header = if buf.len() < HEADER_SIZE {
            let mut h = Self::zeroed();
            if let Some(word) = lead4 {
                h.pi_init = word;
            }
            h
        } else {
            let format = N64Format::from_lead_byte(buf[0]);
            normalize_to_big_endian(&mut buf, format);
            let crc1 = be_u32(&buf, 0x10);
            let crc2 = be_u32(&buf, 0x14);
            Self {
                format,
                pi_init: [buf[0], buf[1], buf[2], buf[3]],
                clock_rate: be_u32(&buf, 0x04),
                pc: be_u32(&buf, 0x08),
                release: be_u32(&buf, 0x0C),
                crc1,
                crc2,
                unknown1: buf[0x18],
                unknown2: buf[0x19],
                name: read_fixed_string(&buf[0x20..0x34]),
                unknown3: be_u32(&buf, 0x34),
                manufacturer_id: be_u32(&buf, 0x38),
                cartridge_id: be_u16(&buf, 0x3C),
                country_code: CountryCode::from_byte(buf[0x3E]),
                crc: format!("{:08X} {:08X}", crc1, crc2),
                is_valid: false,
                is_zip: false,
                is_7zip: false,
                is_rar: false,
                is_ndd: false,
            }
        };

        header.is_valid = header.pi_init == MAGIC_Z64;
        header.is_zip = is_zip;
        header.is_7zip = is_7zip;
        header.is_rar = is_rar;

        if let Some(region) = detect_ndd(&buf) {
            header.is_ndd = true;
            header.country_code = region;
            header.name.clear();
        }

        header
    }

    /// Read and parse the header of a file on disk.
    ///
    /// An unreadable file is logged and produces the zeroed header.
    pub fn read(path: &Path) -> Self {
        match read_leading_bytes(path) {
            Ok(bytes) => {
                if bytes.len() < HEADER_SIZE {
                    log::warn!("Not enough data for header: {}", path.display());
                }
                Self::from_bytes(&bytes)
            }
            Err(e) => {
                log::warn!("ROM file could not be read: {} ({e})", path.display());
                Self::from_bytes(&[])
            }
        }
    }

    fn zeroed() -> Self {
        Self {
            format: N64Format::Z64,
            pi_init: [0; 4],
            clock_rate: 0,
            pc: 0,
            release: 0,
            crc1: 0,
            crc2: 0,
            unknown1: 0,
            unknown2: 0,
            name: String::new(),
            unknown3: 0,
            manufacturer_id: 0,
            cartridge_id: 0,
            country_code: CountryCode::Unknown,
            crc: String::new(),
            is_valid: false,
            is_zip: false,
            is_7zip: false,
            is_rar: false,
            is_ndd: false,
        }
    }

    /// Region tag of the header's destination code, e.g. `"(U)"`.
    pub fn country_symbol(&self) -> &'static str {
        self.country_code.tag()
    }

    /// True for the CRC pair homebrew tools leave at zero.
    pub fn is_homebrew_crc(&self) -> bool {
        self.crc == HOMEBREW_CRC
    }

    /// Retail serial in `NUS-CGGD` form (category, game ID, destination).
    ///
    /// Returns `None` when any of the four characters is not printable ASCII.
    pub fn serial(&self) -> Option<String> {
        let category = (self.manufacturer_id & 0xFF) as u8;
        let [id0, id1] = self.cartridge_id.to_be_bytes();
        let dest = self.country_byte()?;
        let chars = [category, id0, id1, dest];
        if chars.iter().any(|&c| !(0x20..0x7F).contains(&c)) {
            return None;
        }
        Some(format!(
            "NUS-{}",
            chars.iter().map(|&c| c as char).collect::<String>()
        ))
    }

    /// Destination byte the country code was read from. `None` for demo
    /// and unknown codes.
    pub fn country_byte(&self) -> Option<u8> {
        let byte = match self.country_code {
            CountryCode::Demo => return None,
            CountryCode::Beta => b'7',
            CountryCode::JapanUsa => b'A',
            CountryCode::Brazil => b'B',
            CountryCode::China => b'C',
            CountryCode::Germany => b'D',
            CountryCode::Usa => b'E',
            CountryCode::France => b'F',
            CountryCode::Netherlands => b'H',
            CountryCode::Italy => b'I',
            CountryCode::Japan => b'J',
            CountryCode::Korea => b'K',
            CountryCode::Canada => b'N',
            CountryCode::Europe => b'P',
            CountryCode::Spain => b'S',
            CountryCode::Australia => b'U',
            CountryCode::Unknown => return None,
        };
        Some(byte)
    }
}

fn lead_word(buf: &[u8]) -> Option<[u8; 4]> {
    if buf.len() < 4 {
        None
    } else {
        Some([buf[0], buf[1], buf[2], buf[3]])
    }
}

/// Detect a 64DD disk image and decode its region from the first word.
/// Expects the buffer already normalised.
fn detect_ndd(buf: &[u8]) -> Option<CountryCode> {
    if buf.len() < SNIFF_SIZE {
        return None;
    }
    let marker = buf[0x04] == 0x10
        && buf[0x18..0x1C].iter().all(|&b| b == 0xFF)
        && buf[0xE6] == 0xFF
        && buf[0xE7] == 0xFF;
    if !marker {
        return None;
    }
    let region = match lead_word(buf) {
        Some(NDD_JAPAN) => CountryCode::Japan,
        Some(NDD_USA) => CountryCode::Usa,
        Some(NDD_DEV) => CountryCode::Beta,
        _ => CountryCode::Unknown,
    };
    Some(region)
}

fn read_leading_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut bytes = Vec::with_capacity(SNIFF_SIZE);
    file.take(SNIFF_SIZE as u64).read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
#[path = "tests/header_tests.rs"]
mod tests;
