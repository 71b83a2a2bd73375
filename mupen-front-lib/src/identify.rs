//! Single-file identification: header, MD5, database resolution.

use std::path::{Path, PathBuf};

use mupen_front_db::{Resolution, RomDatabase};
use mupen_front_rom::RomHeader;

use crate::error::LibError;
use crate::hasher::compute_md5_file;

#[derive(Debug, Clone)]
pub struct Identification {
    pub path: PathBuf,
    pub header: RomHeader,
    pub md5: String,
    pub resolution: Resolution,
}

/// Read, hash and resolve one ROM file.
pub fn identify_file(db: &RomDatabase, path: &Path) -> Result<Identification, LibError> {
    let header = RomHeader::read(path);
    let md5 = compute_md5_file(path)?;
    let resolution = resolve_header(db, path, &header, &md5);
    Ok(Identification {
        path: path.to_path_buf(),
        header,
        md5,
        resolution,
    })
}

/// Resolve an already hashed file. The header's country only narrows CRC
/// matches when the header itself is readable.
pub fn resolve_header(db: &RomDatabase, path: &Path, header: &RomHeader, md5: &str) -> Resolution {
    let country = (header.is_valid || header.is_ndd).then_some(header.country_code);
    db.resolve(md5, path, &header.crc, country)
}
