use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use mupen_front_lib::{CacheEntry, ConfigFile, ScanOptions, ScanProgress, scan_library};

use crate::CliError;
use crate::commands::{Context, log_blank, print_json};

pub(crate) struct ScanArgs {
    pub dir: PathBuf,
    pub clear: bool,
    pub no_zips: bool,
    pub download_art: bool,
    pub cache: Option<PathBuf>,
    pub workers: Option<usize>,
}

/// Scan a directory and write the library cache.
pub(crate) fn run_scan(ctx: &Context, args: ScanArgs) -> Result<(), CliError> {
    if !args.dir.exists() {
        return Err(CliError::other(format!(
            "Root path does not exist: {}",
            args.dir.display()
        )));
    }
    let db = ctx.open_database()?;

    let mut options = ScanOptions::from_settings(&args.dir, &ctx.settings);
    options.clear = args.clear;
    options.search_zips = options.search_zips && !args.no_zips;
    options.download_art = options.download_art || args.download_art;
    if let Some(cache) = args.cache {
        options.cache_path = cache;
    }
    if let Some(workers) = args.workers {
        options.workers = workers;
    }

    log::info!(
        "Scanning {} ({} workers{}{})",
        args.dir.display().if_supports_color(Stdout, |t| t.cyan()),
        options.workers,
        if options.search_zips { ", zips" } else { "" },
        if options.download_art { ", art" } else { "" },
    );

    let started = Instant::now();
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("  [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let (tx, rx) = mpsc::channel();
    let db_ref = &db;
    let options_ref = &options;
    let summary = std::thread::scope(|s| {
        let handle = s.spawn(move || scan_library(db_ref, options_ref, tx));

        for event in rx {
            match event {
                ScanProgress::Started { total_files } => pb.set_length(total_files as u64),
                ScanProgress::Examining { index, path } => {
                    pb.set_position(index as u64 + 1);
                    pb.set_message(path.display().to_string());
                }
                ScanProgress::Extracting { entry, .. } => pb.set_message(format!("unzip {entry}")),
                ScanProgress::Identified { md5, good_name } => {
                    pb.suspend(|| log::debug!("{md5} {good_name}"));
                }
                ScanProgress::Skipped { path, reason } => {
                    pb.suspend(|| log::debug!("Skipped {}: {reason}", path.display()));
                }
                ScanProgress::Completed { .. } => pb.finish_and_clear(),
            }
        }
        pb.finish_and_clear();

        handle
            .join()
            .map_err(|_| CliError::other("Scan thread panicked"))
    })??;

    log::info!(
        "{} {} of {} files identified, {} skipped in {:.1}s",
        "Done:".if_supports_color(Stdout, |t| t.bold()),
        summary.identified.if_supports_color(Stdout, |t| t.green()),
        summary.examined,
        summary.skipped,
        started.elapsed().as_secs_f64(),
    );
    log::info!(
        "Cache written to {} at {}",
        options.cache_path.display(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );
    Ok(())
}

/// List the entries of the library cache.
pub(crate) fn run_cache_list(ctx: &Context, path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.unwrap_or_else(|| ctx.settings.paths.library_cache.clone());
    if !path.exists() {
        log::info!(
            "No library cache at {} (run `mupen-front scan <dir>` first)",
            path.display()
        );
        return Ok(());
    }
    let cache = ConfigFile::load(&path).map_err(|e| CliError::config(e.to_string()))?;
    let entries = CacheEntry::list(&cache);

    if ctx.json {
        return print_json(&entries);
    }

    log::info!(
        "{} ({} ROMs)",
        path.display().if_supports_color(Stdout, |t| t.bold()),
        entries.len()
    );
    log_blank();
    for entry in &entries {
        log::info!(
            "  {} {}",
            entry.good_name.if_supports_color(Stdout, |t| t.cyan()),
            entry.country_code.if_supports_color(Stdout, |t| t.dimmed()),
        );
        match &entry.zip_path {
            Some(zip) => log::info!("    {} in {}", entry.rom_path, zip.display()),
            None => log::info!("    {}", entry.rom_path),
        }
        log::info!("    {}  {}", entry.md5, entry.crc);
    }
    Ok(())
}
