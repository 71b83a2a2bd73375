pub(crate) mod config;
pub(crate) mod game;
pub(crate) mod header;
pub(crate) mod identify;
pub(crate) mod inputmap;
pub(crate) mod plugins;
pub(crate) mod profiles;
pub(crate) mod scan;

use std::io::Write;

use serde::Serialize;

use mupen_front_lib::{RomDatabase, Settings};

use crate::CliError;

/// State shared by every command.
pub(crate) struct Context {
    pub settings: Settings,
    pub json: bool,
}

impl Context {
    pub(crate) fn open_database(&self) -> Result<RomDatabase, CliError> {
        let path = &self.settings.paths.database;
        RomDatabase::open(path).map_err(|e| {
            CliError::database(format!(
                "{e} (set paths.database in the settings file or pass --db)"
            ))
        })
    }
}

/// Pretty JSON written straight to stdout, never through the logger.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    write_json(std::io::stdout().lock(), value)
}

pub(crate) fn write_json<W: Write, T: Serialize + ?Sized>(
    mut out: W,
    value: &T,
) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn log_blank() {
    log::info!("");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_is_one_document() {
        let mut buf = Vec::new();
        write_json(&mut buf, &serde_json::json!({ "md5": "ABC", "players": 4 })).unwrap();
        assert!(buf.ends_with(b"}\n"));
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["players"], 4);
    }
}
