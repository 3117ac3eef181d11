use super::*;

#[test]
fn default_config_has_expected_values() {
    // Arrange / Act
    let config = Config::default();

    // Assert
    assert_eq!(config.polling.interval_ms, 5000);
    assert_eq!(config.polling.settle_ms, 10);
    assert_eq!(config.polling.capture_timeout_ms, 100);
    assert!(config.sections.always_hidden_enabled);
    assert!(!config.sections.auto_rehide);
    assert!(config.hotkeys.is_empty());
}

#[test]
fn partial_toml_uses_defaults_for_missing_sections() {
    // Arrange
    let toml_str = "[polling]\ninterval_ms = 2000\n";

    // Act
    let config: Config = toml::from_str(toml_str).unwrap();

    // Assert
    assert_eq!(config.polling.interval_ms, 2000);
    assert_eq!(config.polling.settle_ms, 10);
    assert_eq!(config.drag.event_delay_ms, 20);
}

#[test]
fn hotkeys_parse_section_and_modifiers() {
    // Arrange
    let toml_str = r#"
[[hotkeys]]
section = "always_hidden"
key = "A"
modifiers = ["command", "option"]
"#;

    // Act
    let config: Config = toml::from_str(toml_str).unwrap();

    // Assert
    assert_eq!(config.hotkeys.len(), 1);
    assert_eq!(config.hotkeys[0].section, SectionName::AlwaysHidden);
    assert_eq!(
        config.hotkeys[0].modifiers,
        vec![Modifier::Command, Modifier::Option]
    );
}

#[test]
fn unknown_section_name_is_rejected() {
    // Arrange
    let toml_str = "[[hotkeys]]\nsection = \"sometimes\"\nkey = \"S\"\n";

    // Act
    let result: Result<Config, _> = toml::from_str(toml_str);

    // Assert
    assert!(result.is_err());
}

#[test]
fn validate_clamps_extreme_values() {
    // Arrange
    let mut config = Config {
        polling: PollingConfig {
            interval_ms: 0,
            settle_ms: 10_000,
            capture_timeout_ms: 1,
        },
        drag: DragConfig {
            event_delay_ms: 9999,
        },
        sections: SectionsConfig {
            rehide_interval_secs: 0,
            ..Default::default()
        },
        ..Default::default()
    };

    // Act
    config.validate();

    // Assert
    assert_eq!(config.polling.interval_ms, 500);
    assert_eq!(config.polling.settle_ms, 500);
    assert_eq!(config.polling.capture_timeout_ms, 10);
    assert_eq!(config.drag.event_delay_ms, 500);
    assert_eq!(config.sections.rehide_interval_secs, 1);
}

#[test]
fn validate_drops_hotkeys_without_key() {
    // Arrange
    let mut config = Config {
        hotkeys: vec![
            SectionHotkey {
                section: SectionName::Hidden,
                key: " ".into(),
                modifiers: vec![],
            },
            SectionHotkey {
                section: SectionName::Visible,
                key: "V".into(),
                modifiers: vec![Modifier::Control],
            },
        ],
        ..Default::default()
    };

    // Act
    config.validate();

    // Assert
    assert_eq!(config.hotkeys.len(), 1);
    assert_eq!(config.hotkeys[0].section, SectionName::Visible);
}

#[test]
fn durations_follow_millisecond_fields() {
    // Arrange
    let polling = PollingConfig::default();

    // Act / Assert
    assert_eq!(polling.interval(), Duration::from_secs(5));
    assert_eq!(polling.capture_timeout(), Duration::from_millis(100));
    assert_eq!(DragConfig::default().event_delay(), Duration::from_millis(20));
}

#[test]
fn config_template_parses_as_valid_config() {
    // Arrange
    let toml_str = template::generate_config();

    // Act
    let result: Result<Config, _> = toml::from_str(&toml_str);

    // Assert
    assert!(
        result.is_ok(),
        "config template is not valid TOML: {result:?}"
    );
}

#[test]
fn config_template_matches_default_values() {
    // Arrange
    let toml_str = template::generate_config();

    // Act
    let mut config: Config = toml::from_str(&toml_str).unwrap();
    config.validate();

    // Assert
    let mut defaults = Config::default();
    defaults.validate();
    assert_eq!(config, defaults);
}
