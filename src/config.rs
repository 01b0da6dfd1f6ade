use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sling API access
    pub sling: SlingConfig,

    /// Google Calendar access
    pub calendar: CalendarConfig,

    /// Optional Discord status notifications
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Sync cadence and chain bounds
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlingConfig {
    /// Sling API token; falls back to the SLING_TOKEN environment variable
    #[serde(default)]
    pub api_token: Option<String>,

    /// Sling API base URL
    #[serde(default = "default_sling_base_url")]
    pub base_url: String,
}

impl SlingConfig {
    /// Token from the config file, or from SLING_TOKEN when the file omits it.
    pub fn resolve_token(&self) -> anyhow::Result<String> {
        if let Some(token) = &self.api_token {
            return Ok(token.clone());
        }
        std::env::var("SLING_TOKEN")
            .context("sling.api_token not set and SLING_TOKEN environment variable missing")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Path to Google OAuth client credentials JSON file
    pub credentials_path: String,

    /// Path to store the OAuth token cache
    #[serde(default = "default_token_cache")]
    pub token_cache_path: String,

    /// Calendar that receives shift events (e.g. "primary")
    pub calendar_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Discord webhook URL; falls back to DISCORD_WEBHOOK_URL, disabled if neither is set
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl NotifyConfig {
    pub fn resolve_webhook(&self) -> Option<String> {
        self.webhook_url
            .clone()
            .or_else(|| std::env::var("DISCORD_WEBHOOK_URL").ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between scheduled sync runs
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Minimum pause between consecutive shifts within a run (seconds)
    #[serde(default = "default_throttle")]
    pub throttle_secs: u64,

    /// Hard cap on the number of shifts fetched per run
    #[serde(default = "default_max_chain_len")]
    pub max_chain_len: usize,

    /// Shifts ending past now + this many days are not fetched
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            throttle_secs: default_throttle(),
            max_chain_len: default_max_chain_len(),
            lookahead_days: default_lookahead_days(),
        }
    }
}

fn default_sling_base_url() -> String {
    "https://api.getsling.com/v1".to_string()
}

fn default_token_cache() -> String {
    "calendar_token_cache.json".to_string()
}

fn default_interval() -> u64 {
    86_400 // daily
}

fn default_throttle() -> u64 {
    1
}

fn default_max_chain_len() -> usize {
    100
}

fn default_lookahead_days() -> i64 {
    60
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn example() -> Self {
        Config {
            sling: SlingConfig {
                api_token: Some("your-sling-api-token".to_string()),
                base_url: default_sling_base_url(),
            },
            calendar: CalendarConfig {
                credentials_path: "auth/credentials.json".to_string(),
                token_cache_path: default_token_cache(),
                calendar_id: "primary".to_string(),
            },
            notify: NotifyConfig {
                webhook_url: Some(
                    "https://discord.com/api/webhooks/your-webhook".to_string(),
                ),
            },
            sync: SyncConfig::default(),
        }
    }
}
