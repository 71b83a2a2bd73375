use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use mupen_front_lib::settings::settings_to_string;
use mupen_front_lib::{Settings, save_settings, settings_path};

use crate::CliError;
use crate::commands::{Context, log_blank};

/// Print the effective settings (file values with command-line overrides).
pub(crate) fn run_config_show(ctx: &Context) -> Result<(), CliError> {
    let path = settings_path();
    let state = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found, using defaults)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    };
    log::info!(
        "Settings file: {} {state}",
        path.display().if_supports_color(Stdout, |t| t.cyan())
    );
    log_blank();
    let text = settings_to_string(&ctx.settings)?;
    log::info!("{}", text.trim_end());

    if !ctx.settings.paths.database.exists() {
        log_blank();
        log::warn!(
            "ROM database not found at {}",
            ctx.settings.paths.database.display()
        );
    }
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

/// Write a default settings file.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = settings_path();
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings(&Settings::default())?;
    log::info!(
        "{} {}",
        "Wrote".if_supports_color(Stdout, |t| t.green()),
        path.display()
    );
    Ok(())
}
