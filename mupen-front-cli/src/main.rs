//! mupen-front CLI
//!
//! Command-line front-end for identifying N64 ROMs against the mupen64plus
//! database, building the library cache, and inspecting profiles, input
//! maps and native plugins.

mod commands;
mod error;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use mupen_front_lib::{AmbiguityPolicy, ProfileKind};

pub(crate) use error::CliError;

#[derive(Parser)]
#[command(name = "mupen-front")]
#[command(about = "Identify and catalogue N64 ROMs for mupen64plus", long_about = None)]
struct Cli {
    /// ROM database (mupen64plus.ini); overrides the settings file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text (header, identify, game, cheats, inputmap, plugins)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed header of ROM files
    Header {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Recompute the header CRC from the boot code and program data
        #[arg(long)]
        verify: bool,
    },

    /// Identify ROM files against the database
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// How to pick a result when a CRC matches several entries (first, placeholder)
        #[arg(long)]
        policy: Option<AmbiguityPolicy>,
    },

    /// Scan a directory tree and rebuild the library cache
    Scan {
        dir: PathBuf,

        /// Empty the cache before scanning
        #[arg(long)]
        clear: bool,

        /// Do not look inside zip archives
        #[arg(long)]
        no_zips: bool,

        /// Download cover art for identified ROMs
        #[arg(long)]
        download_art: bool,

        /// Cache file to write (default from settings)
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Number of hashing workers
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// List the ROMs recorded in the library cache
    Cache {
        /// Cache file to read (default from settings)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show the save and config directories of a ROM
    Game {
        file: PathBuf,

        /// Create the directories
        #[arg(long)]
        create: bool,

        /// Delete auto-saves beyond the configured maximum
        #[arg(long)]
        prune: bool,
    },

    /// List the cheats for a ROM
    Cheats { file: PathBuf },

    /// Inspect emulation, touchscreen and controller profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },

    /// Decode serialized input maps
    #[command(name = "inputmap")]
    InputMap {
        #[command(subcommand)]
        action: InputMapAction,
    },

    /// Check which native emulator libraries are installed
    Plugins {
        /// Library directory (default from settings)
        dir: Option<PathBuf>,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List custom and built-in profiles
    List { kind: ProfileKind },

    /// Show every setting of one profile
    Show { kind: ProfileKind, name: String },

    /// Show which profile would be used
    Resolve {
        kind: ProfileKind,

        /// Profile selected for a game
        #[arg(long)]
        selected: Option<String>,
    },
}

#[derive(Subcommand)]
enum InputMapAction {
    /// Show the bindings of a serialized map (e.g. "true:96,97,0,")
    Decode { serialized: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,

    /// Print the settings file location
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Text output goes to stdout through `log::info!`. With `--json` the JSON
/// document owns stdout and every log record goes to stderr.
fn init_logging(verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { "info" };
    let target = if json {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            if record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(
                    buf,
                    "{}: {}",
                    record.level().as_str().to_lowercase(),
                    record.args()
                )
            }
        })
        .target(target)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json);

    let mut settings = mupen_front_lib::load_settings();
    if let Some(db) = cli.db {
        settings.paths.database = db;
    }
    let ctx = commands::Context {
        settings,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Header { files, verify } => commands::header::run_header(&ctx, &files, verify),
        Commands::Identify { files, policy } => {
            commands::identify::run_identify(&ctx, &files, policy)
        }
        Commands::Scan {
            dir,
            clear,
            no_zips,
            download_art,
            cache,
            workers,
        } => commands::scan::run_scan(
            &ctx,
            commands::scan::ScanArgs {
                dir,
                clear,
                no_zips,
                download_art,
                cache,
                workers,
            },
        ),
        Commands::Cache { path } => commands::scan::run_cache_list(&ctx, path),
        Commands::Game {
            file,
            create,
            prune,
        } => commands::game::run_game(&ctx, &file, create, prune),
        Commands::Cheats { file } => commands::game::run_cheats(&ctx, &file),
        Commands::Profiles { action } => match action {
            ProfilesAction::List { kind } => commands::profiles::run_profiles_list(&ctx, kind),
            ProfilesAction::Show { kind, name } => {
                commands::profiles::run_profiles_show(&ctx, kind, &name)
            }
            ProfilesAction::Resolve { kind, selected } => {
                commands::profiles::run_profiles_resolve(&ctx, kind, selected.as_deref())
            }
        },
        Commands::InputMap { action } => match action {
            InputMapAction::Decode { serialized } => {
                commands::inputmap::run_inputmap_decode(&ctx, &serialized)
            }
        },
        Commands::Plugins { dir } => commands::plugins::run_plugins(&ctx, dir),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Init { force } => commands::config::run_config_init(force),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e.if_supports_color(Stdout, |t| t.red()));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_identify_policy_parses() {
        let cli = Cli::try_parse_from([
            "mupen-front",
            "--db",
            "/tmp/db.ini",
            "identify",
            "--policy",
            "placeholder",
            "a.z64",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/db.ini")));
        match cli.command {
            Commands::Identify { files, policy } => {
                assert_eq!(files, vec![PathBuf::from("a.z64")]);
                assert_eq!(policy, Some(AmbiguityPolicy::Placeholder));
            }
            _ => panic!("expected identify"),
        }
    }

    #[test]
    fn test_profile_kind_parses() {
        let cli = Cli::try_parse_from(["mupen-front", "profiles", "resolve", "controller"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Profiles {
                action: ProfilesAction::Resolve {
                    kind: ProfileKind::Controller,
                    selected: None
                }
            }
        ));
    }

    #[test]
    fn test_game_flags_parse() {
        let cli =
            Cli::try_parse_from(["mupen-front", "game", "--create", "--prune", "a.z64"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Game {
                create: true,
                prune: true,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(
            Cli::try_parse_from(["mupen-front", "identify", "--policy", "best", "a.z64"]).is_err()
        );
    }
}
