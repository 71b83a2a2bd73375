//! N64 byte-order detection and normalization.
//!
//! N64 ROMs exist in three byte orderings. Strict detection looks at the
//! full 4-byte magic; the header parser only looks at the lead byte, which
//! is enough to pick a swap and keeps odd dumps readable.

use serde::{Deserialize, Serialize};

/// N64 ROM byte-order format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum N64Format {
    /// .z64: big-endian (canonical), no swap needed
    Z64,
    /// .v64: byte-swapped pairs
    V64,
    /// .n64: little-endian, reverse 4-byte groups
    N64,
}

/// Magic bytes for each N64 format.
pub const MAGIC_Z64: [u8; 4] = [0x80, 0x37, 0x12, 0x40];
pub const MAGIC_V64: [u8; 4] = [0x37, 0x80, 0x40, 0x12];
pub const MAGIC_N64: [u8; 4] = [0x40, 0x12, 0x37, 0x80];

impl N64Format {
    /// Pick the swap from the first byte of the image: 0x37 is byte-swapped,
    /// 0x40 is word-swapped, anything else is read as-is.
    pub fn from_lead_byte(b: u8) -> Self {
        match b {
            0x37 => Self::V64,
            0x40 => Self::N64,
            _ => Self::Z64,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Z64 => "z64 (big-endian)",
            Self::V64 => "v64 (byte-swapped)",
            Self::N64 => "n64 (little-endian)",
        }
    }
}

/// Detect the N64 byte-order format from the first 4 bytes of a ROM.
///
/// Returns `None` if the magic bytes don't match any known N64 format.
pub fn detect_n64_format(magic: &[u8]) -> Option<N64Format> {
    if magic.len() < 4 {
        return None;
    }
    match [magic[0], magic[1], magic[2], magic[3]] {
        MAGIC_Z64 => Some(N64Format::Z64),
        MAGIC_V64 => Some(N64Format::V64),
        MAGIC_N64 => Some(N64Format::N64),
        _ => None,
    }
}

/// Normalize a buffer of N64 ROM data to big-endian (.z64) byte order.
///
/// For V64 format, swaps byte pairs: `[A,B,C,D]` → `[B,A,D,C]`
/// For N64 format, reverses 4-byte groups: `[A,B,C,D]` → `[D,C,B,A]`
/// A trailing partial pair or word is left untouched.
pub fn normalize_to_big_endian(data: &mut [u8], format: N64Format) {
    match format {
        N64Format::Z64 => {}
        N64Format::V64 => {
            for pair in data.chunks_exact_mut(2) {
                pair.swap(0, 1);
            }
        }
        N64Format::N64 => {
            for word in data.chunks_exact_mut(4) {
                word.reverse();
            }
        }
    }
}

/// Convert a big-endian buffer into the given on-disk ordering.
///
/// Both swaps are involutions, so this is the same operation as
/// [`normalize_to_big_endian`]; the separate name keeps call sites honest.
pub fn denormalize_from_big_endian(data: &mut [u8], format: N64Format) {
    normalize_to_big_endian(data, format);
}

#[cfg(test)]
#[path = "tests/byteorder_tests.rs"]
mod tests;
