use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use mupen_front_lib::{AmbiguityPolicy, Identification, Resolution, RomDetail, identify_file};

use crate::CliError;
use crate::commands::{Context, log_blank, print_json};

#[derive(Serialize)]
struct IdentifyReport<'a> {
    path: &'a Path,
    md5: &'a str,
    crc: &'a str,
    #[serde(rename = "match")]
    match_kind: &'static str,
    policy: AmbiguityPolicy,
    detail: RomDetail,
    candidates: Vec<RomDetail>,
}

/// Identify each file and print the chosen record.
pub(crate) fn run_identify(
    ctx: &Context,
    files: &[PathBuf],
    policy: Option<AmbiguityPolicy>,
) -> Result<(), CliError> {
    let db = ctx.open_database()?;
    let policy = policy.unwrap_or(ctx.settings.defaults.ambiguity_policy);
    log::debug!("Database: {} entries, policy {policy}", db.len());

    let mut ids = Vec::new();
    let mut failures = 0;
    for path in files {
        match identify_file(&db, path) {
            Ok(id) => ids.push(id),
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                failures += 1;
            }
        }
    }

    if ctx.json {
        let reports: Vec<IdentifyReport> = ids.iter().map(|id| report(id, policy)).collect();
        print_json(&reports)?;
    } else {
        for id in &ids {
            print_identification(id, policy);
        }
    }

    if failures > 0 {
        return Err(CliError::other(format!("{failures} file(s) could not be read")));
    }
    Ok(())
}

fn report(id: &Identification, policy: AmbiguityPolicy) -> IdentifyReport<'_> {
    let candidates = match &id.resolution {
        Resolution::Ambiguous { candidates, .. } => candidates.clone(),
        _ => Vec::new(),
    };
    IdentifyReport {
        path: &id.path,
        md5: &id.md5,
        crc: &id.header.crc,
        match_kind: id.resolution.kind(),
        policy,
        detail: id.resolution.clone().into_detail(policy),
        candidates,
    }
}

fn print_identification(id: &Identification, policy: AmbiguityPolicy) {
    log::info!("{}", id.path.display().if_supports_color(Stdout, |t| t.bold()));
    if !id.header.is_valid {
        log::info!(
            "  {}",
            "Header is not a valid N64 header; matching by MD5 only"
                .if_supports_color(Stdout, |t| t.yellow())
        );
    }

    let label = match &id.resolution {
        Resolution::Exact(_) => "MD5 match".if_supports_color(Stdout, |t| t.green()).to_string(),
        Resolution::CrcMatch(_) => "CRC match".if_supports_color(Stdout, |t| t.green()).to_string(),
        Resolution::Ambiguous { candidates, .. } => format!(
            "{} ({} candidates, policy: {policy})",
            "Ambiguous CRC".if_supports_color(Stdout, |t| t.yellow()),
            candidates.len()
        ),
        Resolution::NotFound(_) => "Not in database"
            .if_supports_color(Stdout, |t| t.red())
            .to_string(),
    };
    log::info!("  Match:     {label}");
    log::info!("  MD5:       {}", id.md5);
    log::info!("  CRC:       {}", id.header.crc);

    if let Resolution::Ambiguous { candidates, .. } = &id.resolution {
        for c in candidates {
            log::info!(
                "             - {} {}",
                c.display_name(),
                c.md5.if_supports_color(Stdout, |t| t.dimmed())
            );
        }
    }

    print_detail(&id.resolution.clone().into_detail(policy));
    log_blank();
}

fn print_detail(detail: &RomDetail) {
    log::info!(
        "  Name:      {}",
        detail.display_name().if_supports_color(Stdout, |t| t.cyan())
    );
    if let Some(base) = detail.base_name.as_deref().filter(|b| !b.is_empty()) {
        log::info!("  Base name: {base}");
    }
    if let Some(save) = &detail.save_type {
        log::info!("  Save type: {save}");
    }
    log::info!(
        "  Players:   {}  Rumble: {}  Status: {}",
        detail.players,
        if detail.rumble { "yes" } else { "no" },
        detail.status
    );
    if let Some(url) = &detail.art_url {
        log::info!("  Art:       {url}");
    }
    if let Some(url) = &detail.wiki_url {
        log::info!("  Wiki:      {url}");
    }
}
