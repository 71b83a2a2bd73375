//! Nintendo 64 ROM image handling.
//!
//! - Byte-order detection and normalisation for `.z64`, `.v64` and `.n64` dumps
//! - Lenient header parsing ([`RomHeader`]) that never fails on bad input
//! - Container sniffing (zip/7z/rar) and 64DD disk detection
//! - Boot-code CIC detection and header CRC recomputation

pub mod byteorder;
pub mod checksum;
pub mod header;

pub use byteorder::{N64Format, detect_n64_format, normalize_to_big_endian};
pub use checksum::{CicVariant, compute_header_crc, verify_header_crc};
pub use header::{HOMEBREW_CRC, RomHeader};
