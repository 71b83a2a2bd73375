use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use mupen_front_lib::{CheatFile, CheatSection, GameDirs, GameKey, RomHeader};

use crate::CliError;
use crate::commands::{Context, log_blank, print_json};

#[derive(Serialize)]
struct GameReport<'a> {
    key: &'a GameKey,
    dirs: &'a GameDirs,
    latest_auto_save: Option<PathBuf>,
}

/// Show (and optionally create) the data directories of a ROM.
pub(crate) fn run_game(
    ctx: &Context,
    file: &Path,
    create: bool,
    prune: bool,
) -> Result<(), CliError> {
    let key = GameKey::for_file(file)?;
    let defaults = &ctx.settings.defaults;
    let root = &ctx.settings.paths.game_data;

    let dirs = if create {
        GameDirs::create(root, &key, defaults.flat_game_data)?
    } else {
        GameDirs::for_game(root, &key, defaults.flat_game_data)
    };
    if prune {
        let deleted = dirs.prune_auto_saves(defaults.max_auto_saves);
        log::debug!("Deleted {deleted} old auto-save(s)");
    }
    let latest_auto_save = dirs.latest_auto_save();

    if ctx.json {
        return print_json(&GameReport {
            key: &key,
            dirs: &dirs,
            latest_auto_save,
        });
    }

    log::info!("{}", file.display().if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Directory: {}", dirs.base.display());
    log::info!("  SRAM:      {}", dirs.sram.display());
    log::info!("  Auto:      {}", dirs.auto_saves.display());
    log::info!("  Slots:     {}", dirs.slot_saves.display());
    log::info!("  User:      {}", dirs.user_saves.display());
    log::info!("  Shots:     {}", dirs.screenshots.display());
    log::info!("  Config:    {}", dirs.core_config_file.display());
    match latest_auto_save {
        Some(path) => log::info!("  Resume:    {}", path.display()),
        None => log::info!(
            "  Resume:    {}",
            "no auto-save".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    if !create && !dirs.base.is_dir() {
        log::info!(
            "  {}",
            "Not created yet (use --create)".if_supports_color(Stdout, |t| t.yellow())
        );
    }
    Ok(())
}

/// List the cheats recorded for a ROM.
pub(crate) fn run_cheats(ctx: &Context, file: &Path) -> Result<(), CliError> {
    let header = RomHeader::read(file);
    if !header.is_valid {
        return Err(CliError::analysis(format!(
            "{} is not an N64 image",
            file.display()
        )));
    }
    let path = &ctx.settings.paths.cheats;
    let cheats = CheatFile::load(path).map_err(|e| {
        CliError::config(format!(
            "{}: {e} (set paths.cheats in the settings file)",
            path.display()
        ))
    })?;
    let section = cheats.section_for(&header.crc, header.country_byte());

    if ctx.json {
        return print_json(&section);
    }
    match section {
        Some(section) => print_section(section),
        None => log::info!(
            "No cheats for CRC {} {}",
            header.crc,
            header.country_symbol()
        ),
    }
    Ok(())
}

fn print_section(section: &CheatSection) {
    log::info!(
        "{} {}",
        section.good_name.if_supports_color(Stdout, |t| t.bold()),
        section.key.if_supports_color(Stdout, |t| t.dimmed())
    );
    for cheat in section.sorted_cheats() {
        log::info!("  {}", cheat.name.if_supports_color(Stdout, |t| t.cyan()));
        if let Some(description) = &cheat.description {
            log::info!("    {description}");
        }
        for option in cheat.options() {
            log::info!("    {} {}", option.value, option.name);
        }
    }
    log_blank();
}
