use stashlist::config::Config;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert!(config.ui.mouse_enabled);
    assert!(!config.logging.enabled);
}

#[test]
fn partial_toml_fills_in_defaults() {
    let config: Config = toml::from_str(
        r#"
        [ui]
        mouse_enabled = false
        "#,
    )
    .unwrap();
    assert!(!config.ui.mouse_enabled);
    assert_eq!(config.ui.source_map_columns, 3);
    assert!(!config.logging.enabled);
}

#[test]
fn out_of_range_map_columns_fail_validation() {
    let config: Config = toml::from_str(
        r#"
        [ui]
        source_map_columns = 40
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn logging_section_parses() {
    let config: Config = toml::from_str(
        r#"
        [logging]
        enabled = true
        file = "/tmp/stashlist-test.log"
        "#,
    )
    .unwrap();
    assert!(config.logging.enabled);
    assert!(config.logging.file.is_some());
}
