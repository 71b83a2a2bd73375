use super::*;

const MD5: &str = "0123456789ABCDEF0123456789ABCDEF";

fn key(header_name: &str) -> GameKey {
    GameKey::new(MD5, header_name, "(U)")
}

#[test]
fn test_dir_names() {
    let k = key("F/ZERO: X");
    assert_eq!(k.dir_name(), format!("FZERO: X (U) {MD5}"));
    assert_eq!(k.alternate_dir_name(), format!("F/ZERO X (U) {MD5}"));
    assert_eq!(k.fallback_dir_name(), MD5);

    // Disk images have no header name
    assert_eq!(key("").dir_name(), format!(" (U) {MD5}"));
}

#[test]
fn test_key_from_cache_entry() {
    let entry = CacheEntry {
        md5: MD5.to_string(),
        good_name: "Super Mario 64 (U) [!]".to_string(),
        base_name: Some("Super Mario 64".to_string()),
        rom_path: "/roms/mario.z64".to_string(),
        zip_path: None,
        art_path: None,
        crc: "635A2BFF 8B022326".to_string(),
        header_name: "SUPER MARIO 64".to_string(),
        country_code: "(U)".to_string(),
    };
    assert_eq!(GameKey::from_cache_entry(&entry), key("SUPER MARIO 64"));
}

#[test]
fn test_key_for_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut rom = vec![0u8; 0x1000];
    rom[0..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    rom[0x20..0x2A].copy_from_slice(b"KNOWN GAME");
    rom[0x3E] = b'J';
    let path = tmp.path().join("known.z64");
    fs::write(&path, &rom).unwrap();

    let k = GameKey::for_file(&path).unwrap();
    assert_eq!(k.md5, format!("{:X}", md5::compute(&rom)));
    assert_eq!(k.dir_name(), format!("KNOWN GAME (J) {}", k.md5));

    assert!(GameKey::for_file(&tmp.path().join("missing.z64")).is_err());
}

#[test]
fn test_layout() {
    let root = Path::new("/data/GameData");
    let dirs = GameDirs::for_game(root, &key("SUPER MARIO 64"), false);
    let base = root.join(format!("SUPER MARIO 64 (U) {MD5}"));
    assert_eq!(dirs.base, base);
    assert_eq!(dirs.sram, base.join("SramData"));
    assert_eq!(dirs.slot_saves, base.join("SlotSaves"));
    assert_eq!(dirs.user_saves, base.join("UserSaves"));
    assert_eq!(dirs.auto_saves, base.join("AutoSaves"));
    assert_eq!(dirs.screenshots, base.join("Screenshots"));
    assert_eq!(dirs.core_config_file, base.join("CoreConfig").join("mupen64plus.cfg"));
}

#[test]
fn test_flat_layout_shares_save_dirs() {
    let root = Path::new("/data/GameData");
    let dirs = GameDirs::for_game(root, &key("SUPER MARIO 64"), true);
    assert_eq!(dirs.sram, root);
    assert_eq!(dirs.slot_saves, root);
    assert_eq!(dirs.user_saves, root);
    assert_eq!(dirs.auto_saves, dirs.base.join("AutoSaves"));
}

#[test]
fn test_create_makes_every_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = GameDirs::create(tmp.path(), &key("SUPER MARIO 64"), false).unwrap();
    for dir in [
        &dirs.sram,
        &dirs.auto_saves,
        &dirs.slot_saves,
        &dirs.user_saves,
        &dirs.screenshots,
        &dirs.core_config,
    ] {
        assert!(dir.is_dir(), "{} missing", dir.display());
    }
    assert!(!dirs.core_config_file.exists());
}

#[test]
fn test_create_falls_back_to_alternate_names() {
    let tmp = tempfile::tempdir().unwrap();
    let k = key("ZELDA: OOT");

    // A file squatting on the primary name
    fs::write(tmp.path().join(k.dir_name()), b"").unwrap();
    let dirs = GameDirs::create(tmp.path(), &k, false).unwrap();
    assert_eq!(dirs.base, tmp.path().join(format!("ZELDA OOT (U) {MD5}")));

    fs::remove_dir_all(&dirs.base).unwrap();
    fs::write(tmp.path().join(k.alternate_dir_name()), b"").unwrap();
    let dirs = GameDirs::create(tmp.path(), &k, false).unwrap();
    assert_eq!(dirs.base, tmp.path().join(MD5));
    assert!(dirs.auto_saves.is_dir());

    fs::remove_dir_all(&dirs.base).unwrap();
    fs::write(tmp.path().join(MD5), b"").unwrap();
    assert!(GameDirs::create(tmp.path(), &k, false).is_err());
}

#[test]
fn test_auto_save_names() {
    assert!(is_auto_save_name("2024-03-01-12-30-45.sav"));
    assert!(is_auto_save_name("2024-03-01-12-30-45.v2.sav"));
    assert!(!is_auto_save_name("2024-03-01-12-30-45.v2.sav.complete"));
    assert!(!is_auto_save_name("2024-03-01.sav"));
    assert!(!is_auto_save_name("yyyy-mm-dd-hh-mm-ss.sav"));
}

#[test]
fn test_latest_auto_save_needs_complete_marker() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = GameDirs::create(tmp.path(), &key("GAME"), false).unwrap();
    assert_eq!(dirs.latest_auto_save(), None);

    let saves = &dirs.auto_saves;
    fs::write(saves.join("2024-01-01-00-00-00.sav"), b"old").unwrap();
    fs::write(saves.join("2024-02-01-00-00-00.v2.sav"), b"done").unwrap();
    fs::write(saves.join("2024-02-01-00-00-00.v2.sav.complete"), b"").unwrap();
    fs::write(saves.join("2024-03-01-00-00-00.v2.sav"), b"interrupted").unwrap();
    fs::write(saves.join("notes.txt"), b"").unwrap();

    assert_eq!(
        dirs.latest_auto_save(),
        Some(saves.join("2024-02-01-00-00-00.v2.sav"))
    );
}

#[test]
fn test_prune_keeps_newest() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = GameDirs::create(tmp.path(), &key("GAME"), false).unwrap();
    let saves = &dirs.auto_saves;
    for day in 1..=4 {
        let name = format!("2024-01-0{day}-00-00-00.v2.sav");
        fs::write(saves.join(&name), b"").unwrap();
        fs::write(saves.join(format!("{name}.complete")), b"").unwrap();
    }

    assert_eq!(dirs.prune_auto_saves(2), 2);
    let mut left: Vec<String> = fs::read_dir(saves)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(
        left,
        vec![
            "2024-01-03-00-00-00.v2.sav",
            "2024-01-03-00-00-00.v2.sav.complete",
            "2024-01-04-00-00-00.v2.sav",
            "2024-01-04-00-00-00.v2.sav.complete",
        ]
    );
    assert_eq!(dirs.prune_auto_saves(5), 0);
}
