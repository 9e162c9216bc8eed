use super::*;

#[test]
fn defaults_match_reference_device() {
    let cfg = DeviceConfig::default();
    assert_eq!(cfg.cores, 6);
    assert!(cfg.threaded);
    assert!(cfg.vectorized);
    assert_eq!(cfg.clear_color, Color::BLACK);
    cfg.validate().unwrap();
}

#[test]
fn validate_rejects_bad_extents_and_core_counts() {
    assert!(DeviceConfig::new(0, 10).validate().is_err());
    let mut cfg = DeviceConfig::new(16, 16);
    cfg.cores = 0;
    assert!(cfg.validate().is_err());
    cfg.cores = MAX_CORES + 1;
    assert!(cfg.validate().is_err());
    cfg.cores = MAX_CORES;
    cfg.validate().unwrap();
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg: DeviceConfig = serde_json::from_str(r#"{ "width": 32, "cores": 2 }"#).unwrap();
    assert_eq!(cfg.width, 32);
    assert_eq!(cfg.height, 600);
    assert_eq!(cfg.cores, 2);
    assert!(cfg.threaded);
}

#[test]
fn flag_parser_accepts_common_spellings() {
    assert_eq!(parse_flag("1"), Some(true));
    assert_eq!(parse_flag(" TRUE "), Some(true));
    assert_eq!(parse_flag("off"), Some(false));
    assert_eq!(parse_flag("maybe"), None);
}
