use std::{
    fs,
    path::{Path, PathBuf},
};

use client_core::{DEFAULT_API_URL, DEFAULT_STORY_LIMIT};
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "news.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub session_path: PathBuf,
    pub story_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            session_path: default_session_path(),
            story_limit: DEFAULT_STORY_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    session_path: Option<PathBuf>,
    story_limit: Option<u32>,
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_with(
    settings_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(settings_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_url {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.session_path {
                    settings.session_path = v;
                }
                match file_cfg.story_limit {
                    Some(v) if v > 0 => settings.story_limit = v,
                    Some(v) => warn!(value = v, "ignoring invalid story_limit in settings file"),
                    None => {}
                }
            }
            Err(err) => warn!(
                path = %settings_path.display(),
                error = %err,
                "ignoring unreadable settings file"
            ),
        }
    }

    if let Some(v) = env("NEWS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("NEWS_SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }

    if let Some(v) = env("APP__STORY_LIMIT") {
        match v.parse::<u32>() {
            Ok(parsed) if parsed > 0 => settings.story_limit = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__STORY_LIMIT"),
        }
    }

    settings.api_url = normalize_api_url(&settings.api_url);
    settings
}

pub fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("news_view")
        .join("session.json")
}

pub fn normalize_api_url(raw_api_url: &str) -> String {
    let raw_api_url = raw_api_url.trim().trim_end_matches('/');

    if raw_api_url.is_empty() {
        return DEFAULT_API_URL.to_string();
    }

    if raw_api_url.contains("://") {
        return raw_api_url.to_string();
    }

    format!("https://{raw_api_url}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
