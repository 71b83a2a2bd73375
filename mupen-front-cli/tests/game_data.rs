//! `game` and `cheats` against a settings file in a scratch home.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const CHEATS: &str = "\
crc 11111111-22222222-C:45
gn Known Game (U)
 cn Infinite Health
  80001000 0064
";

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mupen-front"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run mupen-front")
}

/// Scratch home with a settings file pointing at `game_data` and a cheat
/// file, plus one ROM.
fn setup(home: &Path) -> std::path::PathBuf {
    let settings_dir = home.join("config").join("mupen-front");
    std::fs::create_dir_all(&settings_dir).unwrap();
    std::fs::write(
        settings_dir.join("settings.toml"),
        format!(
            "[paths]\ngame_data = \"{}\"\ncheats = \"{}\"\n",
            home.join("GameData").display(),
            home.join("mupencheat.txt").display()
        ),
    )
    .unwrap();
    std::fs::write(home.join("mupencheat.txt"), CHEATS).unwrap();

    let mut rom = vec![0u8; 0x1000];
    rom[0..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    rom[0x10..0x18].copy_from_slice(&[0x11, 0x11, 0x11, 0x11, 0x22, 0x22, 0x22, 0x22]);
    rom[0x20..0x2A].copy_from_slice(b"KNOWN GAME");
    rom[0x3E] = b'E';
    let path = home.join("known.z64");
    std::fs::write(&path, rom).unwrap();
    path
}

#[test]
fn test_game_create_reports_dirs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let rom = setup(dir.path());

    let out = run(dir.path(), &["--json", "game", "--create", rom.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be pure JSON");
    let base = Path::new(value["dirs"]["base"].as_str().unwrap());
    assert!(base.starts_with(dir.path().join("GameData")));
    assert!(
        base.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("KNOWN GAME (U) ")
    );
    assert!(base.join("AutoSaves").is_dir());
    assert!(base.join("CoreConfig").is_dir());
    assert!(value["latest_auto_save"].is_null());
}

#[test]
fn test_cheats_for_rom() {
    let dir = tempdir().expect("Failed to create temp dir");
    let rom = setup(dir.path());

    let out = run(dir.path(), &["--json", "cheats", rom.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be pure JSON");
    assert_eq!(value["good_name"], "Known Game (U)");
    assert_eq!(value["cheats"][0]["name"], "Infinite Health");

    let out = run(dir.path(), &["cheats", rom.to_str().unwrap()]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Infinite Health"));
}
