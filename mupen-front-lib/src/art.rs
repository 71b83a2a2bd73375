//! Cover-art download for identified ROMs.

use std::fs;
use std::path::Path;

use crate::error::LibError;

/// Marker file that keeps media scanners out of the art directory.
pub const NOMEDIA: &str = ".nomedia";

/// Create the art directory and its `.nomedia` marker.
pub fn prepare_art_dir(dir: &Path) -> Result<(), LibError> {
    fs::create_dir_all(dir)?;
    let marker = dir.join(NOMEDIA);
    if !marker.exists() {
        fs::File::create(&marker)?;
    }
    Ok(())
}

/// Fetch `url` into `dest` unless `dest` already exists.
///
/// Returns `Ok(false)` when the file was already present.
pub fn download_art(url: &str, dest: &Path) -> Result<bool, LibError> {
    if dest.exists() {
        return Ok(false);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let response =
        reqwest::blocking::get(url).map_err(|e| LibError::download(format!("{url}: {e}")))?;
    if !response.status().is_success() {
        return Err(LibError::download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .map_err(|e| LibError::download(format!("Failed to read response for {url}: {e}")))?;

    let tmp = dest.with_extension("part");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, dest)?;
    log::debug!("Downloaded {} ({} bytes)", dest.display(), bytes.len());
    Ok(true)
}
