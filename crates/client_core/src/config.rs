use std::{collections::HashMap, fs, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, Result};

pub const SETTINGS_FILE: &str = "courtiq.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub query_url: String,
    pub focus_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            query_url: "http://127.0.0.1:5000/ask".into(),
            focus_delay_ms: 300,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    query_url: Option<String>,
    focus_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        for url in [&self.api_base_url, &self.query_url] {
            Url::parse(url).map_err(|source| ClientError::InvalidUrl {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Defaults, then `courtiq.toml` in the working directory, then environment overrides.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    let env: HashMap<String, String> = std::env::vars().collect();
    settings_from_sources(file.as_deref(), &env)
}

pub fn load_settings_from(path: &Path) -> Settings {
    let file = fs::read_to_string(path).ok();
    let env: HashMap<String, String> = std::env::vars().collect();
    settings_from_sources(file.as_deref(), &env)
}

fn settings_from_sources(file: Option<&str>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.query_url {
                    settings.query_url = v;
                }
                if let Some(v) = file_cfg.focus_delay_ms {
                    settings.focus_delay_ms = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
            }
            Err(err) => tracing::warn!("ignoring malformed {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env_override(env, &["COURTIQ_API_URL", "APP__API_BASE_URL"]) {
        settings.api_base_url = v;
    }
    if let Some(v) = env_override(env, &["COURTIQ_QUERY_URL", "APP__QUERY_URL"]) {
        settings.query_url = v;
    }
    if let Some(v) = env_override(env, &["APP__FOCUS_DELAY_MS"]) {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.focus_delay_ms = parsed;
        }
    }
    if let Some(v) = env_override(env, &["APP__REQUEST_TIMEOUT_SECS"]) {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

// Later names win, matching the APP__ prefix taking precedence.
fn env_override(env: &HashMap<String, String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .rev()
        .filter_map(|name| env.get(*name))
        .find(|v| !v.trim().is_empty())
        .cloned()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
