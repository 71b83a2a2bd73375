/// Decode a fixed-length header string.
///
/// Bytes are taken as Latin-1, NULs are dropped and the result is trimmed.
/// N64 internal names are space- or NUL-padded and occasionally contain
/// Shift-JIS bytes.
pub fn read_fixed_string(buf: &[u8]) -> String {
    let s: String = buf
        .iter()
        .filter(|&&b| b != 0)
        .map(|&b| b as char)
        .collect();
    s.trim().to_string()
}

/// Read a big-endian u32 at `offset`. Caller guarantees bounds.
pub fn be_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Read a big-endian u16 at `offset`. Caller guarantees bounds.
pub fn be_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed_string() {
        assert_eq!(read_fixed_string(b"SUPER MARIO 64      "), "SUPER MARIO 64");
        assert_eq!(read_fixed_string(b"ZELDA\0\0\0"), "ZELDA");
        assert_eq!(read_fixed_string(b"\0\0\0\0"), "");
    }

    #[test]
    fn test_big_endian_reads() {
        let buf = [0x80, 0x37, 0x12, 0x40, 0xAA];
        assert_eq!(be_u32(&buf, 0), 0x80371240);
        assert_eq!(be_u16(&buf, 3), 0x40AA);
    }
}
