use super::*;

#[test]
fn test_decode_common_destinations() {
    assert_eq!(CountryCode::from_byte(b'E'), CountryCode::Usa);
    assert_eq!(CountryCode::from_byte(b'J'), CountryCode::Japan);
    assert_eq!(CountryCode::from_byte(b'P'), CountryCode::Europe);
    assert_eq!(CountryCode::from_byte(b'X'), CountryCode::Europe);
    assert_eq!(CountryCode::from_byte(0x00), CountryCode::Demo);
    assert_eq!(CountryCode::from_byte(0xFF), CountryCode::Unknown);
}

#[test]
fn test_tags_match_good_name_convention() {
    assert_eq!(CountryCode::Usa.tag(), "(U)");
    assert_eq!(CountryCode::Canada.tag(), "(U)");
    assert_eq!(CountryCode::Japan.tag(), "(J)");
    assert_eq!(CountryCode::Europe.tag(), "(E)");
    assert_eq!(CountryCode::Germany.to_string(), "(G)");
}

#[test]
fn test_unknown_tag_never_matches_a_good_name() {
    let name = "Super Mario 64 (U) [!]";
    assert!(!name.contains(CountryCode::Unknown.tag()));
    assert!(name.contains(CountryCode::Usa.tag()));
}
