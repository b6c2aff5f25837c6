use super::*;

#[test]
fn default_config_has_expected_general_fields() {
    let config = AppConfig::default();
    assert!(!config.general.allow_private);
    assert!(!config.general.switch_context);
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.default_namespace_delay(), Duration::from_secs(5));
}

#[test]
fn default_config_matches_struct_defaults() {
    let embedded = AppConfig::default();
    let derived = GeneralConfig::default();
    assert_eq!(embedded.general.allow_private, derived.allow_private);
    assert_eq!(embedded.general.log_level, derived.log_level);
    assert_eq!(embedded.state.last_target_file, StateConfig::default().last_target_file);
}

#[test]
fn parse_kebab_case_keys() {
    let raw = r#"
[general]
allow-private = true
default-namespace-delay-secs = 0
"#;
    let config: AppConfig = toml::from_str(raw).unwrap();
    assert!(config.general.allow_private);
    assert_eq!(config.general.default_namespace_delay_secs, 0);
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn parse_snake_case_keys() {
    let raw = r#"
[state]
last_target_file = "/tmp/kubedrift.json"
"#;
    let config: AppConfig = toml::from_str(raw).unwrap();
    assert_eq!(config.state.last_target_file, PathBuf::from("/tmp/kubedrift.json"));
}

#[test]
fn partial_toml_merges_with_defaults() {
    let mut base = AppConfig::default();
    let user: AppConfig = toml::from_str("[general]\nlog-level = \"debug\"\n").unwrap();
    base.merge(user);

    assert_eq!(base.general.log_level, "debug");
    assert_eq!(base.state.last_target_file, PathBuf::from(".kubedrift").join("last-target.json"));
}

#[test]
fn save_then_load_from() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.general.switch_context = true;
    config.save(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();
    assert!(loaded.general.switch_context);
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    assert_eq!(AppConfig::init_at(&path).unwrap(), path);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    assert!(AppConfig::init_at(&path).is_err());
}

#[test]
fn load_from_rejects_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[general\nallow-private = ").unwrap();
    assert!(AppConfig::load_from(&path).is_err());
}
