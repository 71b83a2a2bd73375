use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use mupen_front_lib::check_native_libs;

use crate::CliError;
use crate::commands::{Context, print_json};

pub(crate) fn run_plugins(ctx: &Context, dir: Option<PathBuf>) -> Result<(), CliError> {
    let dir = dir.unwrap_or_else(|| ctx.settings.paths.lib_dir.clone());
    let report = check_native_libs(&dir);

    if ctx.json {
        print_json(&report)?;
    } else {
        log::info!("Native libraries in {}", dir.display().if_supports_color(Stdout, |t| t.bold()));
        for lib in &report.libs {
            let status = if lib.present {
                "found".if_supports_color(Stdout, |t| t.green()).to_string()
            } else if lib.required {
                "missing".if_supports_color(Stdout, |t| t.red()).to_string()
            } else {
                "absent".if_supports_color(Stdout, |t| t.dimmed()).to_string()
            };
            log::info!("  {:<38} {:<7} {status}", lib.file_name, lib.role);
        }
    }

    let missing = report.missing_required().count();
    if missing > 0 {
        return Err(CliError::config(format!(
            "{missing} required native librar{} missing",
            if missing == 1 { "y is" } else { "ies are" }
        )));
    }
    if report.video_plugins().next().is_none() {
        log::warn!("No video plugin installed");
    }
    Ok(())
}
