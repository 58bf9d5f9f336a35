use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use forum_core::{game::DEFAULT_OPPONENT_DELAY, AppOptions};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "forum.toml";

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub opponent_delay_ms: u64,
    pub opponent_seed: Option<u64>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/forum.json"),
            opponent_delay_ms: DEFAULT_OPPONENT_DELAY.as_millis() as u64,
            opponent_seed: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            opponent_delay: Duration::from_millis(self.opponent_delay_ms),
            opponent_seed: self.opponent_seed,
        }
    }
}

pub fn load_settings() -> Settings {
    let file_cfg = fs::read_to_string(SETTINGS_FILE).ok();
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_settings(file_cfg.as_deref(), &env)
}

/// Defaults, then `forum.toml`, then environment variables.
pub fn resolve_settings(file_cfg: Option<&str>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_cfg {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) {
            if let Some(v) = file_cfg.get("data_path").and_then(toml::Value::as_str) {
                settings.data_path = PathBuf::from(v);
            }
            if let Some(v) = file_cfg
                .get("opponent_delay_ms")
                .and_then(toml::Value::as_integer)
                .and_then(|v| u64::try_from(v).ok())
            {
                settings.opponent_delay_ms = v;
            }
            if let Some(v) = file_cfg
                .get("opponent_seed")
                .and_then(toml::Value::as_integer)
                .and_then(|v| u64::try_from(v).ok())
            {
                settings.opponent_seed = Some(v);
            }
            if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
                settings.log_filter = v.to_string();
            }
        }
    }

    if let Some(v) = env.get("FORUM_DATA_PATH") {
        settings.data_path = PathBuf::from(v);
    }
    if let Some(v) = env.get("APP__DATA_PATH") {
        settings.data_path = PathBuf::from(v);
    }

    if let Some(v) = env.get("APP__OPPONENT_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.opponent_delay_ms = parsed;
        }
    }

    if let Some(v) = env.get("APP__OPPONENT_SEED") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.opponent_seed = Some(parsed);
        }
    }

    if let Some(v) = env.get("RUST_LOG") {
        settings.log_filter = v.clone();
    }
    if let Some(v) = env.get("APP__LOG_FILTER") {
        settings.log_filter = v.clone();
    }

    settings
}

pub fn prepare_data_path(raw: &Path) -> anyhow::Result<PathBuf> {
    let path = if raw.as_os_str().is_empty() {
        Settings::default().data_path
    } else {
        raw.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directory '{}' for data file '{}'",
                parent.display(),
                path.display()
            )
        })?;
    }

    Ok(path)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
