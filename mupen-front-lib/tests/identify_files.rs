//! Identification of on-disk ROMs through the public library API.

use std::fs;

use mupen_front_lib::{
    AmbiguityPolicy, ConfigFile, Resolution, RomDatabase, identify_file,
};

fn rom(crc1: u32, crc2: u32, country: u8) -> Vec<u8> {
    let mut data = vec![0u8; 0x400];
    data[0..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    data[0x10..0x14].copy_from_slice(&crc1.to_be_bytes());
    data[0x14..0x18].copy_from_slice(&crc2.to_be_bytes());
    data[0x3E] = country;
    data
}

/// Word-swapped (`.n64`) copy of a big-endian image.
fn word_swap(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .flat_map(|w| [w[3], w[2], w[1], w[0]])
        .collect()
}

#[test]
fn exact_md5_wins_over_crc() {
    let dir = tempfile::tempdir().unwrap();
    let data = rom(0xAAAA0000, 0xBBBB0000, b'J');
    let md5 = format!("{:X}", md5::compute(&data));
    let db = RomDatabase::from_config(ConfigFile::parse(&format!(
        "[{md5}]\nGoodName=Exact (J)\nCRC=AAAA0000 BBBB0000\n\
         [00000000000000000000000000000000]\nGoodName=Other (J)\nCRC=AAAA0000 BBBB0000\n"
    )));
    let path = dir.path().join("exact.z64");
    fs::write(&path, &data).unwrap();

    let id = identify_file(&db, &path).unwrap();
    assert_eq!(id.md5, md5);
    assert!(matches!(id.resolution, Resolution::Exact(ref d) if d.display_name() == "Exact (J)"));
}

#[test]
fn word_swapped_dump_uses_header_country() {
    let dir = tempfile::tempdir().unwrap();
    let db = RomDatabase::from_config(ConfigFile::parse(
        "[11]\nGoodName=Game (J)\nCRC=12345678 9ABCDEF0\n\
         [22]\nGoodName=Game (E)\nCRC=12345678 9ABCDEF0\n",
    ));
    let path = dir.path().join("game.n64");
    fs::write(&path, word_swap(&rom(0x12345678, 0x9ABCDEF0, b'P'))).unwrap();

    let id = identify_file(&db, &path).unwrap();
    let detail = id.resolution.into_detail(AmbiguityPolicy::Placeholder);
    assert_eq!(detail.display_name(), "Game (E)");
}
