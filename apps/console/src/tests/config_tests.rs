use super::{resolve_settings, Settings};

use std::{
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("employee_console_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn explicit_config_overrides_defaults() {
    let path = temp_config("base_url = \"http://hr.internal:8080\"\npage_size = 25\n");

    let settings = resolve_settings(Some(&path), None, None).expect("settings");
    assert_eq!(settings.base_url, "http://hr.internal:8080");
    assert_eq!(settings.page_size, 25);
    assert_eq!(
        settings.search_debounce_ms,
        Settings::default().search_debounce_ms
    );

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_beats_file_and_flag_beats_env() {
    let path = temp_config("base_url = \"http://from-file\"\n");

    let settings =
        resolve_settings(Some(&path), Some("http://from-env".into()), None).expect("settings");
    assert_eq!(settings.base_url, "http://from-env");

    let settings = resolve_settings(
        Some(&path),
        Some("http://from-env".into()),
        Some("http://from-flag".into()),
    )
    .expect("settings");
    assert_eq!(settings.base_url, "http://from-flag");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn blank_env_value_is_ignored() {
    let path = temp_config("");
    let settings = resolve_settings(Some(&path), Some("  ".into()), None).expect("settings");
    assert_eq!(settings.base_url, Settings::default().base_url);
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn missing_explicit_config_is_an_error() {
    let path = env::temp_dir().join("employee_console_test_does_not_exist.toml");
    let err = resolve_settings(Some(&path), None, None).expect_err("must fail");
    assert!(err.to_string().contains("reading config file"));
}

#[test]
fn unknown_keys_are_rejected() {
    let path = temp_config("base_uri = \"typo\"\n");
    let err = resolve_settings(Some(&path), None, None).expect_err("must fail");
    assert!(err.to_string().contains("invalid config file"));
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn list_config_carries_page_size_and_window() {
    let settings = Settings {
        base_url: "http://localhost".into(),
        page_size: 5,
        search_debounce_ms: 120,
    };
    let config = settings.list_config();
    assert_eq!(config.page_size, 5);
    assert_eq!(config.search_debounce.as_millis(), 120);
}
