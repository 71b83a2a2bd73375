//! End-to-end identification: header bytes from disk, database on disk.

use std::fs;

use mupen_front_core::CountryCode;
use mupen_front_db::{AmbiguityPolicy, ConfigFile, Resolution, RomDatabase};
use mupen_front_rom::RomHeader;

fn make_header(crc1: u32, crc2: u32, country: u8) -> Vec<u8> {
    let mut rom = vec![0u8; 0x40];
    rom[0..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    rom[0x10..0x14].copy_from_slice(&crc1.to_be_bytes());
    rom[0x14..0x18].copy_from_slice(&crc2.to_be_bytes());
    rom[0x20..0x28].copy_from_slice(b"TESTGAME");
    rom[0x3E] = country;
    rom
}

fn swap_pairs(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(2).flat_map(|c| [c[1], c[0]]).collect()
}

#[test]
fn byte_swapped_dump_resolves_by_crc() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("mupen64plus.ini");
    fs::write(
        &db_path,
        "[0123456789ABCDEF0123456789ABCDEF]\nGoodName=Test Game (E) [!]\nCRC=DEADBEEF 01020304\n\
         [FEDCBA9876543210FEDCBA9876543210]\nGoodName=Test Game (U) [!]\nCRC=DEADBEEF 01020304\n",
    )
    .unwrap();
    let db = RomDatabase::open(&db_path).unwrap();
    assert_eq!(db.len(), 2);

    let rom_path = dir.path().join("test.v64");
    fs::write(&rom_path, swap_pairs(&make_header(0xDEADBEEF, 0x01020304, b'E'))).unwrap();
    let header = RomHeader::read(&rom_path);
    assert!(header.is_valid);
    assert_eq!(header.crc, "DEADBEEF 01020304");
    assert_eq!(header.country_code, CountryCode::Usa);

    let resolution = db.resolve("", &rom_path, &header.crc, Some(header.country_code));
    let Resolution::CrcMatch(detail) = resolution else {
        panic!("expected a CRC match, got {resolution:?}");
    };
    assert_eq!(detail.display_name(), "Test Game (U) [!]");
    assert_eq!(detail.md5, "FEDCBA9876543210FEDCBA9876543210");
}

#[test]
fn unknown_rom_falls_back_to_file_name() {
    let db = RomDatabase::from_config(ConfigFile::new());
    let dir = tempfile::tempdir().unwrap();
    let rom_path = dir.path().join("Foo Bar (U) [!].z64");
    fs::write(&rom_path, make_header(1, 2, b'E')).unwrap();
    let header = RomHeader::read(&rom_path);

    let detail = db
        .resolve("ABCDEF", &rom_path, &header.crc, Some(header.country_code))
        .into_detail(AmbiguityPolicy::default());
    assert_eq!(detail.base_name.as_deref(), Some("Foo Bar"));
    assert_eq!(detail.crc, "00000001 00000002");
    assert_eq!(detail.players, 4);
    assert!(detail.rumble);
}
