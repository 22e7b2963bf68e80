use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::{ListConfig, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "console.toml";
pub const BASE_URL_ENV: &str = "EMPLOYEE_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            page_size: self.page_size,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.base_url {
            self.base_url = v;
        }
        if let Some(v) = file.page_size {
            self.page_size = v;
        }
        if let Some(v) = file.search_debounce_ms {
            self.search_debounce_ms = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    base_url: Option<String>,
    page_size: Option<u32>,
    search_debounce_ms: Option<u64>,
}

/// Defaults, then the config file, then `EMPLOYEE_API_BASE_URL`, then the
/// `--base-url` flag.
pub fn load_settings(
    config_path: Option<&Path>,
    base_url_flag: Option<String>,
) -> anyhow::Result<Settings> {
    resolve_settings(
        config_path,
        std::env::var(BASE_URL_ENV).ok(),
        base_url_flag,
    )
}

fn resolve_settings(
    config_path: Option<&Path>,
    base_url_env: Option<String>,
    base_url_flag: Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    // An explicit --config must exist; the default file is optional.
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            settings.apply_file(file);
        }
        Err(err) if err.kind() == ErrorKind::NotFound && config_path.is_none() => {}
        Err(err) => {
            return Err(err).with_context(|| format!("reading config file {}", path.display()))
        }
    }

    if let Some(v) = base_url_env.filter(|v| !v.trim().is_empty()) {
        settings.base_url = v;
    }
    if let Some(v) = base_url_flag {
        settings.base_url = v;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
