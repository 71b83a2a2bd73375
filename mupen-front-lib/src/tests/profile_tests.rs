use super::*;

const BUILTIN: &str = "\
[Glide64-Fast]
comment=Fast and reliable
video=glide64mk2
frameskip=2

[Rice]
video=rice
";

const CUSTOM: &str = "\
[My Setup]
comment=Mine
video=gliden64
enabled=TRUE
scale=1.5

[Rice]
video=rice-custom
";

fn store() -> ProfileStore {
    ProfileStore::from_files(
        ProfileKind::Emulation,
        ConfigFile::parse(CUSTOM),
        ConfigFile::parse(BUILTIN),
    )
}

#[test]
fn test_typed_getters_fall_back() {
    let p = store().find("My Setup").unwrap();
    assert!(p.get_bool("enabled", false));
    assert!(p.get_bool("missing", true));
    assert_eq!(p.get_int("video", 7), 7);
    assert_eq!(p.get_float("scale", 1.0), 1.5);
    assert_eq!(p.get_or("video", "none"), "gliden64");
    assert_eq!(p.comment(), Some("Mine"));
    assert!(!p.is_builtin());
}

#[test]
fn test_custom_shadows_builtin() {
    let p = store().find("Rice").unwrap();
    assert_eq!(p.get("video"), Some("rice-custom"));
    assert!(!p.is_builtin());
}

#[test]
fn test_resolution_order() {
    let s = store();
    let app = ProfileKind::Emulation.app_default();

    let p = s.resolve(Some("My Setup"), "Rice", app).unwrap();
    assert_eq!(p.name(), "My Setup");

    let p = s.resolve(Some("Gone"), "Rice", app).unwrap();
    assert_eq!(p.get("video"), Some("rice-custom"));

    let p = s.resolve(None, "Gone Too", app).unwrap();
    assert_eq!(p.name(), "Glide64-Fast");
    assert!(p.is_builtin());

    assert!(s.resolve(Some("a"), "b", "c").is_none());
}

#[test]
fn test_list_is_merged_and_sorted() {
    let names: Vec<(String, bool)> = store()
        .list()
        .iter()
        .map(|p| (p.name().to_string(), p.is_builtin()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Glide64-Fast".to_string(), true),
            ("My Setup".to_string(), false),
            ("Rice".to_string(), false),
            ("Rice".to_string(), true),
        ]
    );
}

#[test]
fn test_equality_ignores_case() {
    assert_eq!(Profile::new("Rice", None), Profile::new("RICE", Some("x")));
    assert!(Profile::new("alpha", None) < Profile::new("Beta", None));
}

#[test]
fn test_copy_drops_comment() {
    let source = store().find("Glide64-Fast").unwrap();
    let copy = source.copy("Mine Too", None).unwrap();
    assert_eq!(copy.name(), "Mine Too");
    assert_eq!(copy.comment(), None);
    assert_eq!(copy.get("frameskip"), Some("2"));
    assert!(!copy.is_builtin());
    assert!(source.copy("", None).is_none());

    let with_comment = source.copy("Other", Some("new")).unwrap();
    assert_eq!(with_comment.comment(), Some("new"));
}

#[test]
fn test_write_and_read_back() {
    let mut config = ConfigFile::new();
    let mut p = Profile::new("Test", Some("hello"));
    p.put_int("frameskip", 3);
    p.put_bool("fps", true);
    assert!(p.write_to(&mut config));
    assert_eq!(config.get_value("Test", "frameskip"), Some("3"));

    let mut q = Profile::new("Test", None);
    assert!(q.read_from(&config));
    assert_eq!(q.get_bool("fps", false), true);
    assert_eq!(q.comment(), Some("hello"));

    assert!(!Profile::new("", None).write_to(&mut config));
    assert!(!Profile::new("Absent", None).read_from(&config));
}

#[test]
fn test_store_save_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let files = ProfileFiles {
        custom: dir.path().join("custom.cfg"),
        builtin: dir.path().join("builtin.cfg"),
    };
    std::fs::write(&files.builtin, BUILTIN).unwrap();

    let mut s = ProfileStore::open(ProfileKind::Emulation, &files);
    let copy = s.find("Glide64-Fast").unwrap().copy("Faster", None).unwrap();
    s.save_custom(&copy).unwrap();

    let reopened = ProfileStore::open(ProfileKind::Emulation, &files);
    assert_eq!(reopened.find("Faster").unwrap().get("video"), Some("glide64mk2"));

    let builtin = s.find("Rice").unwrap();
    assert!(matches!(s.save_custom(&builtin), Err(LibError::ReadOnlyProfile(_))));
    assert!(matches!(s.delete_custom("Rice"), Err(LibError::ReadOnlyProfile(_))));
    assert!(matches!(s.delete_custom("Nope"), Err(LibError::ProfileNotFound(_))));
    s.delete_custom("Faster").unwrap();
    assert!(s.find("Faster").is_none());
}

#[test]
fn test_controller_profile_map() {
    let mut profile = Profile::new("Pad", None);
    profile.put("map", "true:96,0,");
    profile.put_int("deadzone", 12);
    let mut controller = ControllerProfile::new(profile);
    let map = controller.input_map();
    assert!(map.is_enabled());
    assert_eq!(map.get(96), Some(0));
    assert_eq!(controller.deadzone(), 12);
    assert_eq!(controller.sensitivity(), 100);

    let mut edited = map.clone();
    edited.map(7, 97);
    controller.set_input_map(&edited);
    assert_eq!(controller.input_map().get(97), Some(7));
}

#[test]
fn test_kind_parsing() {
    assert_eq!("Controller".parse::<ProfileKind>().unwrap(), ProfileKind::Controller);
    assert!("video".parse::<ProfileKind>().is_err());
    assert_eq!(ProfileKind::Touchscreen.to_string(), "touchscreen");
}
