//! Application-level configuration loading: default match rules and share link settings.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::game::MatchConfig;

/// Default location on disk where the tracker looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PADEL_TRACKER_CONFIG_PATH";
/// Base of result links when none is configured.
const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:3000";
/// Length of published share identifiers when none is configured.
const DEFAULT_SHARE_ID_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    default_match: MatchConfig,
    share_base_url: String,
    share_id_length: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        share_base_url = %app_config.share_base_url,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document; absent keys take their default.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Rules used when a match is set up without explicit ones.
    pub fn default_match(&self) -> MatchConfig {
        self.default_match
    }

    /// Origin that result links are built on.
    pub fn share_base_url(&self) -> &str {
        &self.share_base_url
    }

    /// Number of characters in a published share identifier.
    pub fn share_id_length(&self) -> usize {
        self.share_id_length
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_match: MatchConfig::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.into(),
            share_id_length: DEFAULT_SHARE_ID_LENGTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    default_match: Option<MatchConfig>,
    share: RawShare,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the `share` section.
struct RawShare {
    base_url: Option<String>,
    id_length: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            default_match: value
                .default_match
                .filter(MatchConfig::is_playable)
                .unwrap_or(defaults.default_match),
            share_base_url: value
                .share
                .base_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.share_base_url),
            share_id_length: value
                .share
                .id_length
                .filter(|length| *length > 0)
                .unwrap_or(defaults.share_id_length),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
