use std::fs::File;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use mupen_front_lib::{AnalysisError, RomHeader};
use mupen_front_rom::verify_header_crc;

use crate::CliError;
use crate::commands::{Context, log_blank, print_json};

#[derive(Serialize)]
struct HeaderReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    header: &'a RomHeader,
    serial: Option<String>,
    checksum: Option<ChecksumReport>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ChecksumReport {
    Ok { cic: String },
    Mismatch { message: String },
    Unavailable { message: String },
}

fn verify(path: &Path, header: &RomHeader) -> ChecksumReport {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            return ChecksumReport::Unavailable {
                message: e.to_string(),
            };
        }
    };
    match verify_header_crc(&mut file, header) {
        Ok(crc) => ChecksumReport::Ok {
            cic: crc.cic.name().to_string(),
        },
        Err(e @ AnalysisError::ChecksumMismatch { .. }) => ChecksumReport::Mismatch {
            message: e.to_string(),
        },
        Err(e) => ChecksumReport::Unavailable {
            message: e.to_string(),
        },
    }
}

/// Print the header of each file.
pub(crate) fn run_header(ctx: &Context, files: &[PathBuf], verify_crc: bool) -> Result<(), CliError> {
    let mut reports = Vec::new();
    let mut mismatches = 0;
    let headers: Vec<RomHeader> = files.iter().map(|p| RomHeader::read(p)).collect();

    for (path, header) in files.iter().zip(&headers) {
        let checksum = (verify_crc && header.is_valid).then(|| verify(path, header));
        if matches!(checksum, Some(ChecksumReport::Mismatch { .. })) {
            mismatches += 1;
        }
        if ctx.json {
            reports.push(HeaderReport {
                path,
                header,
                serial: header.serial(),
                checksum,
            });
        } else {
            print_header(path, header, checksum.as_ref());
        }
    }

    if ctx.json {
        print_json(&reports)?;
    }
    if mismatches > 0 {
        return Err(CliError::analysis(format!(
            "{mismatches} file(s) failed checksum verification"
        )));
    }
    Ok(())
}

fn print_header(path: &Path, header: &RomHeader, checksum: Option<&ChecksumReport>) {
    log::info!("{}", path.display().if_supports_color(Stdout, |t| t.bold()));

    if header.is_zip || header.is_7zip || header.is_rar {
        let kind = if header.is_zip {
            "zip"
        } else if header.is_7zip {
            "7z"
        } else {
            "rar"
        };
        log::info!(
            "  {} {} archive",
            "Container:".if_supports_color(Stdout, |t| t.dimmed()),
            kind
        );
        log_blank();
        return;
    }
    if !header.is_valid && !header.is_ndd {
        log::info!(
            "  {}",
            "Not an N64 image".if_supports_color(Stdout, |t| t.yellow())
        );
        log_blank();
        return;
    }

    if header.is_ndd {
        log::info!("  Type:      64DD disk image");
    } else {
        log::info!("  Format:    {}", header.format.description());
        log::info!("  Name:      {}", header.name);
    }
    log::info!(
        "  Country:   {} {}",
        header.country_code.name(),
        header.country_symbol()
    );
    if let Some(serial) = header.serial() {
        log::info!("  Serial:    {serial}");
    }
    log::info!(
        "  CRC:       {}",
        header.crc.if_supports_color(Stdout, |t| t.cyan())
    );
    if header.is_homebrew_crc() {
        log::info!(
            "             {}",
            "(homebrew, no header checksum)".if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    log::info!("  Clock:     0x{:08X}", header.clock_rate);
    log::info!("  Entry:     0x{:08X}", header.pc);
    log::info!("  Release:   0x{:08X}", header.release);

    match checksum {
        Some(ChecksumReport::Ok { cic }) => log::info!(
            "  Checksum:  {} (CIC-{cic})",
            "OK".if_supports_color(Stdout, |t| t.green())
        ),
        Some(ChecksumReport::Mismatch { message }) => log::info!(
            "  Checksum:  {} {message}",
            "BAD".if_supports_color(Stdout, |t| t.red())
        ),
        Some(ChecksumReport::Unavailable { message }) => log::info!(
            "  Checksum:  {}",
            message.if_supports_color(Stdout, |t| t.dimmed())
        ),
        None => {}
    }
    log_blank();
}
