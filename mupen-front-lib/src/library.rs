//! ROM library scan and the metadata cache it produces.
//!
//! A scan walks a directory tree, identifies every N64 image (including
//! images inside zip archives) and records one cache section per ROM MD5:
//!
//! ```text
//! [0123456789ABCDEF0123456789ABCDEF]
//! goodName=Super Mario 64 (U) [!]
//! baseName=Super Mario 64
//! romPath=/roms/mario.z64
//! artPath=/cache/art/Super_Mario_64.png
//! crc=635A2BFF 8B022326
//! headerName=SUPER MARIO 64
//! countryCode=(U)
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use serde::Serialize;

use mupen_front_core::ScanProgress;
use mupen_front_db::{AmbiguityPolicy, ConfigFile, ConfigSection, RomDatabase};
use mupen_front_rom::RomHeader;

use crate::art::{download_art, prepare_art_dir};
use crate::error::LibError;
use crate::hasher::hash_files;
use crate::identify::resolve_header;
use crate::settings::Settings;

/// Everything a scan needs besides the database.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub cache_path: PathBuf,
    pub art_dir: PathBuf,
    pub unzip_dir: PathBuf,
    pub search_zips: bool,
    pub download_art: bool,
    /// Empty the cache before scanning
    pub clear: bool,
    pub policy: AmbiguityPolicy,
    pub workers: usize,
}

impl ScanOptions {
    pub fn from_settings(root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            root: root.into(),
            cache_path: settings.paths.library_cache.clone(),
            art_dir: settings.paths.art_dir.clone(),
            unzip_dir: settings.paths.unzip_dir.clone(),
            search_zips: settings.defaults.search_zips,
            download_art: settings.defaults.download_art,
            clear: false,
            policy: settings.defaults.ambiguity_policy,
            workers: settings.defaults.worker_count(),
        }
    }
}

/// One cached ROM, as read back from the cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub md5: String,
    pub good_name: String,
    pub base_name: Option<String>,
    /// The ROM file, or the entry name inside `zip_path`
    pub rom_path: String,
    pub zip_path: Option<PathBuf>,
    pub art_path: Option<PathBuf>,
    pub crc: String,
    pub header_name: String,
    pub country_code: String,
}

impl CacheEntry {
    pub fn from_section(section: &ConfigSection) -> Self {
        let text = |key: &str| section.get(key).unwrap_or_default().to_string();
        Self {
            md5: section.name().to_string(),
            good_name: text("goodName"),
            base_name: section.get("baseName").map(str::to_string),
            rom_path: text("romPath"),
            zip_path: section.get("zipPath").map(PathBuf::from),
            art_path: section.get("artPath").map(PathBuf::from),
            crc: text("crc"),
            header_name: text("headerName"),
            country_code: text("countryCode"),
        }
    }

    /// Entries of a cache file, in file order.
    pub fn list(cache: &ConfigFile) -> Vec<CacheEntry> {
        cache.sections().map(Self::from_section).collect()
    }
}

#[derive(Debug)]
pub struct ScanSummary {
    /// Files found under the root
    pub examined: usize,
    pub identified: usize,
    pub skipped: usize,
    pub cache: ConfigFile,
}

/// A ROM image ready to be hashed.
#[derive(Debug)]
struct Candidate {
    /// File on disk that gets hashed
    hash_path: PathBuf,
    header: RomHeader,
    archive: Option<ArchiveSource>,
}

#[derive(Debug)]
struct ArchiveSource {
    zip_path: PathBuf,
    entry_name: String,
}

/// All files under `root`, recursively, sorted by path. A file root is
/// returned as-is. Symlinked files are listed; symlinked directories are
/// not descended into.
pub fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut entries: Vec<(PathBuf, fs::FileType)> = fs::read_dir(root)?
        .flatten()
        .filter_map(|e| e.file_type().ok().map(|t| (e.path(), t)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = Vec::new();
    for (path, file_type) in entries {
        if file_type.is_dir() {
            out.extend(collect_files(&path)?);
        } else if file_type.is_symlink() {
            if path.is_file() {
                out.push(path);
            } else {
                log::debug!("Not following link {}", path.display());
            }
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(out)
}

/// Drop cache sections whose file is gone: the archive when `zipPath` is
/// set, the ROM file otherwise. Sections without either are kept.
pub fn remove_missing_entries(cache: &mut ConfigFile) -> usize {
    let missing: Vec<String> = cache
        .sections()
        .filter(|section| {
            section
                .get("zipPath")
                .or_else(|| section.get("romPath"))
                .is_some_and(|path| !Path::new(path).exists())
        })
        .map(|section| section.name().to_string())
        .collect();
    for name in &missing {
        log::debug!("Removing missing cache entry {name}");
        cache.remove_section(name);
    }
    missing.len()
}

/// Whether an earlier scan already recorded a complete entry from this
/// archive.
fn cache_has_archive(cache: &ConfigFile, archive: &Path) -> bool {
    let archive = archive.to_string_lossy();
    cache.sections().any(|section| {
        section.get("zipPath") == Some(archive.as_ref())
            && section.get("crc").is_some()
            && section.get("countryCode").is_some()
    })
}

/// Scan state shared by every batch of candidates.
struct Scan<'a> {
    db: &'a RomDatabase,
    options: &'a ScanOptions,
    progress_tx: &'a Sender<ScanProgress>,
    runtime: tokio::runtime::Runtime,
    cache: ConfigFile,
    identified: usize,
    skipped: usize,
    /// Art URL and destination, fetched once hashing is done
    art_queue: Vec<(String, PathBuf)>,
}

impl Scan<'_> {
    fn skip(&mut self, path: &Path, reason: impl Into<String>) {
        let _ = self.progress_tx.send(ScanProgress::skipped(path, reason));
        self.skipped += 1;
    }

    /// Hash, identify and record one batch of candidates.
    fn record(&mut self, candidates: Vec<Candidate>) {
        if candidates.is_empty() {
            return;
        }
        let paths = candidates.iter().map(|c| c.hash_path.clone()).collect();
        let mut hashes: HashMap<PathBuf, Result<String, LibError>> = self
            .runtime
            .block_on(hash_files(paths, self.options.workers))
            .into_iter()
            .collect();

        for candidate in candidates {
            let md5 = match hashes.remove(&candidate.hash_path) {
                Some(Ok(md5)) => md5,
                Some(Err(e)) => {
                    log::warn!("Could not hash {}: {e}", candidate.hash_path.display());
                    self.skip(&candidate.hash_path, e.to_string());
                    continue;
                }
                None => {
                    self.skip(&candidate.hash_path, "hash timed out");
                    continue;
                }
            };
            self.write_entry(&candidate, &md5);
        }
    }

    fn write_entry(&mut self, candidate: &Candidate, md5: &str) {
        let detail = resolve_header(self.db, &candidate.hash_path, &candidate.header, md5)
            .into_detail(self.options.policy);
        let art_path = detail
            .art_name
            .as_deref()
            .map(|name| self.options.art_dir.join(name));

        let cache = &mut self.cache;
        cache.remove_section(md5);
        cache.put(md5, "goodName", detail.display_name());
        if let Some(base) = detail.base_name.as_deref().filter(|b| !b.is_empty()) {
            cache.put(md5, "baseName", base);
        }
        match &candidate.archive {
            Some(source) => {
                cache.put(md5, "romPath", &source.entry_name);
                cache.put(md5, "zipPath", &source.zip_path.to_string_lossy());
            }
            None => cache.put(md5, "romPath", &candidate.hash_path.to_string_lossy()),
        }
        if let Some(art_path) = &art_path {
            cache.put(md5, "artPath", &art_path.to_string_lossy());
        }
        cache.put(md5, "crc", &candidate.header.crc);
        cache.put(md5, "headerName", &candidate.header.name);
        cache.put(md5, "countryCode", candidate.header.country_symbol());

        if self.options.download_art {
            if let (Some(url), Some(dest)) = (detail.art_url.clone(), art_path) {
                self.art_queue.push((url, dest));
            }
        }

        self.identified += 1;
        let _ = self
            .progress_tx
            .send(ScanProgress::identified(md5, detail.display_name()));
    }

    /// Extract one archive into a scratch directory under `unzip_dir` and
    /// record its images. The scratch directory is removed on every path
    /// out of this function.
    fn record_archive(&mut self, index: usize, archive: &Path) -> Result<(), LibError> {
        let scratch = tempfile::Builder::new()
            .prefix(&format!("{index:05}-"))
            .tempdir_in(&self.options.unzip_dir)?;
        match extract_zip(archive, scratch.path(), self.progress_tx) {
            Ok(found) => self.record(found),
            Err(e) => {
                log::warn!("Could not read archive {}: {e}", archive.display());
                self.skip(archive, e.to_string());
            }
        }
        if let Err(e) = scratch.close() {
            log::warn!("Could not remove extracted files: {e}");
        }
        Ok(())
    }
}

/// Scan `options.root` and update the cache file.
///
/// Loose images are hashed in batches between archives; each archive is
/// extracted, hashed and removed before the next one is opened. Per-file
/// problems (unreadable archives, hash failures, download errors) are
/// reported as [`ScanProgress::Skipped`] and logged; only failures to
/// enumerate the root, to create scratch space or to write the cache abort
/// the scan.
pub fn scan_library(
    db: &RomDatabase,
    options: &ScanOptions,
    progress_tx: Sender<ScanProgress>,
) -> Result<ScanSummary, LibError> {
    prepare_art_dir(&options.art_dir)?;
    fs::create_dir_all(&options.unzip_dir)?;

    let files = collect_files(&options.root)?;
    let _ = progress_tx.send(ScanProgress::started(files.len()));

    let mut cache = ConfigFile::load_or_empty(&options.cache_path);
    if options.clear {
        cache.clear();
    } else {
        let removed = remove_missing_entries(&mut cache);
        if removed > 0 {
            log::info!("Removed {removed} cache entries for missing files");
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(options.workers.max(1))
        .enable_time()
        .build()?;
    let mut scan = Scan {
        db,
        options,
        progress_tx: &progress_tx,
        runtime,
        cache,
        identified: 0,
        skipped: 0,
        art_queue: Vec::new(),
    };

    let mut pending = Vec::new();
    for (index, file) in files.iter().enumerate() {
        let relative = file.strip_prefix(&options.root).unwrap_or(file);
        let _ = progress_tx.send(ScanProgress::examining(index, relative));

        let header = RomHeader::read(file);
        if header.is_valid || header.is_ndd {
            pending.push(Candidate {
                hash_path: file.clone(),
                header,
                archive: None,
            });
        } else if header.is_zip && options.search_zips {
            if cache_has_archive(&scan.cache, file) {
                log::debug!("Archive {} is already cached", file.display());
                scan.skip(file, "archive already cached");
                continue;
            }
            log::debug!("Found zip file {}", file.display());
            scan.record(std::mem::take(&mut pending));
            scan.record_archive(index, file)?;
        } else {
            scan.skip(file, "not an N64 image");
        }
    }
    scan.record(pending);

    let Scan {
        runtime,
        cache,
        identified,
        skipped,
        art_queue,
        ..
    } = scan;
    drop(runtime);

    for (url, dest) in &art_queue {
        if let Err(e) = download_art(url, dest) {
            log::warn!("{e}");
        }
    }

    cache.save()?;
    let _ = progress_tx.send(ScanProgress::Completed { identified });

    Ok(ScanSummary {
        examined: files.len(),
        identified,
        skipped,
        cache,
    })
}

/// Extract every N64 or 64DD image in an archive into `dest`. Entries that fail to
/// extract or are not N64 images are skipped.
fn extract_zip(
    archive_path: &Path,
    dest: &Path,
    progress_tx: &Sender<ScanProgress>,
) -> Result<Vec<Candidate>, LibError> {
    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;
    fs::create_dir_all(dest)?;

    let mut found = Vec::new();
    for i in 0..archive.len() {
        match extract_entry(&mut archive, i, dest) {
            Ok(Some((entry_name, out_path))) => {
                let _ = progress_tx.send(ScanProgress::Extracting {
                    archive: archive_path.to_path_buf(),
                    entry: entry_name.clone(),
                });
                let header = RomHeader::read(&out_path);
                if header.is_valid || header.is_ndd {
                    found.push(Candidate {
                        hash_path: out_path,
                        header,
                        archive: Some(ArchiveSource {
                            zip_path: archive_path.to_path_buf(),
                            entry_name,
                        }),
                    });
                } else {
                    log::debug!("{entry_name} in {} is not an N64 image", archive_path.display());
                    let _ = fs::remove_file(&out_path);
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Entry {i} of {}: {e}", archive_path.display()),
        }
    }
    Ok(found)
}

fn extract_entry(
    archive: &mut zip::ZipArchive<File>,
    index: usize,
    dest: &Path,
) -> Result<Option<(String, PathBuf)>, LibError> {
    let mut entry = archive.by_index(index)?;
    if entry.is_dir() {
        return Ok(None);
    }
    let Some(file_name) = entry
        .enclosed_name()
        .and_then(|p| p.file_name().map(|n| n.to_os_string()))
    else {
        return Ok(None);
    };
    let out_dir = dest.join(index.to_string());
    fs::create_dir_all(&out_dir)?;
    let out_path = out_dir.join(file_name);
    let mut out = File::create(&out_path)?;
    io::copy(&mut entry, &mut out)?;
    Ok(Some((entry.name().to_string(), out_path)))
}

#[cfg(test)]
#[path = "tests/library_tests.rs"]
mod tests;
