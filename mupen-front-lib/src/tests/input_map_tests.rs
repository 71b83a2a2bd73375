use super::*;

#[test]
fn test_slot_layout() {
    assert_eq!(NUM_N64_BUTTONS, 14);
    assert_eq!(AXIS_R, 14);
    assert_eq!(BTN_MEMPAK, 19);
    assert_eq!(FUNC_STOP, 20);
    assert_eq!(FUNC_GAMESHARK, 35);
    assert_eq!(NUM_MAPPABLES, 36);
    assert_eq!(slot_name(BTN_A), Some("A"));
    assert_eq!(slot_name(FUNC_GAMESHARK), Some("GameShark"));
    assert_eq!(slot_name(NUM_MAPPABLES), None);
}

#[test]
fn test_empty_map_serialization() {
    let map = InputMap::new();
    let s = map.serialize();
    assert!(s.starts_with("false:"));
    assert_eq!(s.matches("0,").count(), NUM_MAPPABLES);
}

#[test]
fn test_round_trip() {
    let mut map = InputMap::new();
    map.set_enabled(true);
    map.map(BTN_A, 96);
    map.map(AXIS_U, -2);
    map.map(FUNC_PAUSE, 108);
    let restored = InputMap::deserialize(&map.serialize());
    assert_eq!(restored, map);
    assert_eq!(restored.get(-2), Some(AXIS_U));
}

#[test]
fn test_code_maps_to_one_slot() {
    let mut map = InputMap::new();
    map.map(BTN_A, 96);
    map.map(BTN_B, 96);
    assert_eq!(map.code_for(BTN_A), 0);
    assert_eq!(map.code_for(BTN_B), 96);
    assert_eq!(map.get(96), Some(BTN_B));
}

#[test]
fn test_remapping_slot_releases_old_code() {
    let mut map = InputMap::new();
    map.map(START, 100);
    map.map(START, 101);
    assert_eq!(map.get(100), None);
    assert_eq!(map.get(101), Some(START));
    map.unmap(START);
    assert_eq!(map.get(101), None);
    assert_eq!(map.bindings().count(), 0);
}

#[test]
fn test_garbage_entries_are_unbound() {
    let map = InputMap::deserialize("true:96,abc,,97");
    assert!(map.is_enabled());
    assert_eq!(map.code_for(0), 96);
    assert_eq!(map.code_for(1), 0);
    assert_eq!(map.code_for(2), 0);
    assert_eq!(map.code_for(3), 97);
}

#[test]
fn test_missing_prefix_means_disabled() {
    let map = InputMap::deserialize("96,97,");
    assert!(!map.is_enabled());
    assert_eq!(map.get(97), Some(1));
}

#[test]
fn test_out_of_range_slot_ignored() {
    let mut map = InputMap::new();
    map.map(NUM_MAPPABLES, 5);
    assert_eq!(map.get(5), None);
    assert_eq!(map.code_for(NUM_MAPPABLES), 0);
}
