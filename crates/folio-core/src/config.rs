use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    feed::{FeedRequest, MalformedPolicy},
    models::ExclusionSet,
    theme::ThemeMode,
};

/// Main configuration structure
///
/// Loaded once at startup from the config file; CLI flags override
/// individual fields afterwards. Nothing here changes while a page is
/// open.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `{config_dir}/folio/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("folio");

        Ok(config_dir.join("config.toml"))
    }

    /// Build the feed request described by this config
    pub fn feed_request(&self) -> crate::Result<FeedRequest> {
        FeedRequest::new(
            self.feed.username.clone(),
            self.feed.max_count,
            self.feed.excluded_repos.iter().cloned().collect::<ExclusionSet>(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubConfig {
    /// Optional personal access token, raises the rate limit
    #[serde(default)]
    pub token: Option<String>,

    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,

    /// Give up on a request after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    /// Whose repositories to list
    #[serde(default = "default_username")]
    pub username: String,

    /// How many repositories to request
    #[serde(default = "default_max_count")]
    pub max_count: u32,

    /// Repository names never shown on the Projects page
    #[serde(default)]
    pub excluded_repos: Vec<String>,

    #[serde(default)]
    pub malformed_payload: MalformedPolicy,
}

fn default_username() -> String {
    "diegosarina".to_string()
}

fn default_max_count() -> u32 {
    50
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            max_count: default_max_count(),
            excluded_repos: Vec::new(),
            malformed_payload: MalformedPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiConfig {
    /// Initial theme when a page opens
    #[serde(default)]
    pub theme: ThemeMode,
}
