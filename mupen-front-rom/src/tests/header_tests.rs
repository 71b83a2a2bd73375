use super::*;
use crate::byteorder::denormalize_from_big_endian;

/// Build a big-endian header for a US Game Pak titled "SUPER MARIO 64".
fn make_z64_header() -> Vec<u8> {
    let mut rom = vec![0u8; SNIFF_SIZE];
    rom[0..4].copy_from_slice(&MAGIC_Z64);
    rom[0x04..0x08].copy_from_slice(&0x0000000Fu32.to_be_bytes());
    rom[0x08..0x0C].copy_from_slice(&0x80246000u32.to_be_bytes());
    rom[0x0C..0x10].copy_from_slice(&0x00001444u32.to_be_bytes());
    rom[0x10..0x14].copy_from_slice(&0x635A2BFFu32.to_be_bytes());
    rom[0x14..0x18].copy_from_slice(&0x8B022326u32.to_be_bytes());
    rom[0x20..0x34].copy_from_slice(b"SUPER MARIO 64      ");
    rom[0x3B] = b'N';
    rom[0x3C] = b'S';
    rom[0x3D] = b'M';
    rom[0x3E] = b'E';
    rom
}

fn in_format(z64: &[u8], format: N64Format) -> Vec<u8> {
    let mut data = z64.to_vec();
    denormalize_from_big_endian(&mut data, format);
    data
}

#[test]
fn test_parse_z64_fields() {
    let header = RomHeader::from_bytes(&make_z64_header());

    assert!(header.is_valid);
    assert_eq!(header.format, N64Format::Z64);
    assert_eq!(header.clock_rate, 0x0F);
    assert_eq!(header.pc, 0x80246000);
    assert_eq!(header.release, 0x1444);
    assert_eq!(header.crc1, 0x635A2BFF);
    assert_eq!(header.crc2, 0x8B022326);
    assert_eq!(header.crc, "635A2BFF 8B022326");
    assert_eq!(header.name, "SUPER MARIO 64");
    assert_eq!(header.manufacturer_id & 0xFF, b'N' as u32);
    assert_eq!(header.cartridge_id, u16::from_be_bytes([b'S', b'M']));
    assert_eq!(header.country_code, CountryCode::Usa);
    assert_eq!(header.country_symbol(), "(U)");
    assert!(!header.is_zip && !header.is_ndd);
}

#[test]
fn test_all_orderings_give_identical_fields() {
    let z64 = make_z64_header();
    let reference = RomHeader::from_bytes(&z64);

    for format in [N64Format::V64, N64Format::N64] {
        let parsed = RomHeader::from_bytes(&in_format(&z64, format));
        assert_eq!(parsed.format, format);
        let normalized = RomHeader {
            format: N64Format::Z64,
            ..parsed
        };
        assert_eq!(normalized, reference, "{:?}", format);
    }
}

#[test]
fn test_header_only_buffer_is_enough() {
    let z64 = make_z64_header();
    let header = RomHeader::from_bytes(&z64[..HEADER_SIZE]);
    assert!(header.is_valid);
    assert_eq!(header.name, "SUPER MARIO 64");
    assert!(!header.is_ndd);
}

#[test]
fn test_short_buffer_is_zeroed() {
    let header = RomHeader::from_bytes(&[0x80, 0x37, 0x12, 0x40, 0x00, 0x00]);
    assert_eq!(header.pi_init, MAGIC_Z64);
    assert!(header.is_valid);
    assert_eq!(header.crc1, 0);
    assert_eq!(header.crc, "");
    assert_eq!(header.name, "");
    assert_eq!(header.country_code, CountryCode::Unknown);

    let empty = RomHeader::from_bytes(&[]);
    assert!(!empty.is_valid);
    assert_eq!(empty.pi_init, [0; 4]);
}

#[test]
fn test_unreadable_file_is_zeroed() {
    let header = RomHeader::read(Path::new("/nonexistent/dir/missing.z64"));
    assert!(!header.is_valid);
    assert_eq!(header.crc, "");
}

#[test]
fn test_homebrew_crc() {
    let mut rom = make_z64_header();
    rom[0x10..0x18].fill(0);
    let header = RomHeader::from_bytes(&rom);
    assert_eq!(header.crc, HOMEBREW_CRC);
    assert!(header.is_homebrew_crc());
}

#[test]
fn test_container_sniffing() {
    let mut zip = vec![0u8; 0x100];
    zip[0..4].copy_from_slice(&[0x50, 0x4B, 0x03, 0x04]);
    let header = RomHeader::from_bytes(&zip);
    assert!(header.is_zip);
    assert!(!header.is_valid);

    let header = RomHeader::from_bytes(&[0x7A, 0x37, 0xAF, 0xBC]);
    assert!(header.is_7zip);

    let header = RomHeader::from_bytes(&[0x52, 0x61, 0x72, 0x21, 0x1A]);
    assert!(header.is_rar);
}

#[test]
fn test_ndd_detection() {
    let mut disk = vec![0u8; SNIFF_SIZE];
    disk[0..4].copy_from_slice(&[0xE8, 0x48, 0xD3, 0x16]);
    disk[0x04] = 0x10;
    disk[0x18..0x1C].fill(0xFF);
    disk[0x20..0x24].copy_from_slice(b"DISK");
    disk[0xE6] = 0xFF;
    disk[0xE7] = 0xFF;

    let header = RomHeader::from_bytes(&disk);
    assert!(header.is_ndd);
    assert!(!header.is_valid);
    assert_eq!(header.country_code, CountryCode::Japan);
    assert_eq!(header.name, "");

    // Too short to carry the trailing marker
    let header = RomHeader::from_bytes(&disk[..0x80]);
    assert!(!header.is_ndd);
}

#[test]
fn test_serial() {
    let header = RomHeader::from_bytes(&make_z64_header());
    assert_eq!(header.serial().as_deref(), Some("NUS-NSME"));

    let mut rom = make_z64_header();
    rom[0x3C] = 0x00;
    assert_eq!(RomHeader::from_bytes(&rom).serial(), None);
}

#[test]
fn test_country_byte() {
    let header = RomHeader::from_bytes(&make_z64_header());
    assert_eq!(header.country_byte(), Some(b'E'));

    let mut rom = make_z64_header();
    rom[0x3E] = b'X';
    assert_eq!(RomHeader::from_bytes(&rom).country_byte(), Some(b'P'));
    rom[0x3E] = b'?';
    assert_eq!(RomHeader::from_bytes(&rom).country_byte(), None);
}
