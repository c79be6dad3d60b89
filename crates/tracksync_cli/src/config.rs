//! Configuration file support for tracksync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `TRACKSYNC_`)
//! 3. Config file (~/.config/tracksync/config.toml or ./tracksync.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/tracksync/tracksync.db`
//! on Linux (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/tracksync/tracksync.db"  # optional, this is the default
//!
//! [tracker]
//! base_url = "https://api.voluum.com"  # optional, this is the default
//! access_id = "..."   # or TRACKSYNC_ACCESS_ID
//! access_key = "..."  # or TRACKSYNC_ACCESS_KEY
//!
//! [sync]
//! interval_minutes = 5
//! days_back = 1
//! page_size = 1000
//! live_limit = 100
//! campaign_filter = "Mobile"
//! campaign_scope = "active-report"     # or "listing"
//! conversion_key = "click-id-postback" # or "click-id"
//! skip_failed_campaigns = true
//! retention_days = 90                  # 0 disables retention cleanup
//!
//! [backfill]
//! days = 30
//! chunk_days = 7
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use tracksync::sync::{CampaignScope, ConversionKey, FailureMode};
use tracksync::tracker::{Credentials, DEFAULT_BASE_URL};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Tracker API configuration.
    pub tracker: TrackerConfig,
    /// Sync behavior.
    pub sync: SyncSettings,
    /// Backfill defaults.
    pub backfill: BackfillSettings,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL. Supports sqlite:// and postgres:// schemes.
    /// Defaults to `sqlite://~/.local/state/tracksync/tracksync.db` if not
    /// specified.
    pub url: Option<String>,
}

/// Tracker API configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Tracker API host. Defaults to the hosted API.
    pub base_url: Option<String>,
    /// Access id for the credential exchange.
    /// Can also be set via TRACKSYNC_ACCESS_ID.
    pub access_id: Option<String>,
    /// Access key for the credential exchange.
    /// Can also be set via TRACKSYNC_ACCESS_KEY.
    pub access_key: Option<String>,
}

/// Sync behavior settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Minutes between cycles in continuous mode.
    pub interval_minutes: u64,
    /// Incremental window when no cursor exists yet.
    pub days_back: i64,
    /// Page size for the conversions feed.
    pub page_size: u64,
    /// Per-campaign fetch limit for the live feeds.
    pub live_limit: u64,
    /// Campaign-name substring filter; empty syncs everything.
    pub campaign_filter: Option<String>,
    /// Campaign discovery strategy: "active-report" or "listing".
    pub campaign_scope: String,
    /// Conversion dedup policy: "click-id-postback" or "click-id".
    pub conversion_key: String,
    /// Skip campaigns whose fetch fails instead of aborting the cycle.
    pub skip_failed_campaigns: bool,
    /// Delete rows older than this many days after each cycle; 0 disables.
    pub retention_days: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            days_back: 1,
            page_size: 1000,
            live_limit: 100,
            campaign_filter: None,
            campaign_scope: "active-report".to_string(),
            conversion_key: "click-id-postback".to_string(),
            skip_failed_campaigns: true,
            retention_days: 90,
        }
    }
}

/// Backfill defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackfillSettings {
    /// Days of history to backfill.
    pub days: u32,
    /// Width of each backfill chunk in days.
    pub chunk_days: u32,
}

impl Default for BackfillSettings {
    fn default() -> Self {
        Self {
            days: 30,
            chunk_days: 7,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/tracksync/config.toml)
    /// 3. Local config file (./tracksync.toml)
    /// 4. Environment variables with TRACKSYNC_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "tracksync") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("tracksync.toml");
        if local_config.exists() {
            tracing::debug!("loading config from ./tracksync.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("TRACKSYNC")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter enables read-write access and creates the
    /// file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("tracksync.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Get the tracker base URL.
    pub fn tracker_base_url(&self) -> String {
        self.tracker
            .base_url
            .clone()
            .or_else(|| std::env::var("TRACKSYNC_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get the tracker credentials.
    ///
    /// The flat `TRACKSYNC_ACCESS_ID` / `TRACKSYNC_ACCESS_KEY` variables are
    /// honored as fallbacks because snake_case leaf keys are not addressable
    /// through the prefixed environment source.
    pub fn tracker_credentials(&self) -> Credentials {
        let access_id = self
            .tracker
            .access_id
            .clone()
            .or_else(|| std::env::var("TRACKSYNC_ACCESS_ID").ok())
            .unwrap_or_default();
        let access_key = self
            .tracker
            .access_key
            .clone()
            .or_else(|| std::env::var("TRACKSYNC_ACCESS_KEY").ok())
            .unwrap_or_default();
        Credentials::new(access_id, access_key)
    }

    /// Parse the configured campaign discovery strategy.
    pub fn campaign_scope(&self) -> CampaignScope {
        match self.sync.campaign_scope.as_str() {
            "listing" => CampaignScope::Listing,
            "active-report" => CampaignScope::ActiveReport,
            other => {
                tracing::warn!(value = other, "unknown campaign_scope, using active-report");
                CampaignScope::ActiveReport
            }
        }
    }

    /// Parse the configured conversion dedup policy.
    pub fn conversion_key(&self) -> ConversionKey {
        match self.sync.conversion_key.as_str() {
            "click-id" => ConversionKey::ClickId,
            "click-id-postback" => ConversionKey::ClickIdPostback,
            other => {
                tracing::warn!(
                    value = other,
                    "unknown conversion_key, using click-id-postback"
                );
                ConversionKey::ClickIdPostback
            }
        }
    }

    /// Failure mode for campaign-scoped sync loops.
    pub fn failure_mode(&self) -> FailureMode {
        if self.sync.skip_failed_campaigns {
            FailureMode::SkipAndContinue
        } else {
            FailureMode::AbortCycle
        }
    }

    /// Retention period, with 0 meaning disabled.
    pub fn retention_days(&self) -> Option<u32> {
        (self.sync.retention_days > 0).then_some(self.sync.retention_days)
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/tracksync` or
    /// `~/.local/state/tracksync`. On macOS/Windows, falls back to the data
    /// directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tracksync").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.url.is_none());
        assert!(config.tracker.base_url.is_none());
        assert!(config.tracker.access_id.is_none());
        assert_eq!(config.sync.interval_minutes, 5);
        assert_eq!(config.sync.days_back, 1);
        assert_eq!(config.sync.page_size, 1000);
        assert_eq!(config.sync.live_limit, 100);
        assert!(config.sync.skip_failed_campaigns);
        assert_eq!(config.sync.retention_days, 90);
        assert_eq!(config.backfill.days, 30);
        assert_eq!(config.backfill.chunk_days, 7);
    }

    #[test]
    fn test_config_parsing_from_toml() {
        let toml_content = r#"
            [database]
            url = "sqlite:///tmp/test.db"

            [tracker]
            base_url = "https://tracker.example.com"
            access_id = "id-1"
            access_key = "key-1"

            [sync]
            interval_minutes = 10
            days_back = 2
            campaign_filter = "Mobile"
            skip_failed_campaigns = false
            retention_days = 0
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(
            config.database.url,
            Some("sqlite:///tmp/test.db".to_string())
        );
        assert_eq!(config.tracker_base_url(), "https://tracker.example.com");
        assert_eq!(config.sync.interval_minutes, 10);
        assert_eq!(config.sync.days_back, 2);
        assert_eq!(config.sync.campaign_filter, Some("Mobile".to_string()));
        assert_eq!(config.failure_mode(), FailureMode::AbortCycle);
        assert_eq!(config.retention_days(), None);
    }

    #[test]
    fn test_config_partial_override_keeps_defaults() {
        let toml_content = r#"
            [sync]
            interval_minutes = 15
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.sync.interval_minutes, 15);
        assert_eq!(config.sync.page_size, 1000);
        assert!(config.sync.skip_failed_campaigns);
    }

    #[test]
    fn test_campaign_scope_parsing() {
        let mut config = Config::default();
        assert_eq!(config.campaign_scope(), CampaignScope::ActiveReport);

        config.sync.campaign_scope = "listing".to_string();
        assert_eq!(config.campaign_scope(), CampaignScope::Listing);

        config.sync.campaign_scope = "garbage".to_string();
        assert_eq!(config.campaign_scope(), CampaignScope::ActiveReport);
    }

    #[test]
    fn test_conversion_key_parsing() {
        let mut config = Config::default();
        assert_eq!(config.conversion_key(), ConversionKey::ClickIdPostback);

        config.sync.conversion_key = "click-id".to_string();
        assert_eq!(config.conversion_key(), ConversionKey::ClickId);

        config.sync.conversion_key = "garbage".to_string();
        assert_eq!(config.conversion_key(), ConversionKey::ClickIdPostback);
    }

    #[test]
    fn test_database_url_defaults_to_state_dir() {
        let config = Config::default();
        let db_url = config.database_url();

        assert!(db_url.is_some());
        let url = db_url.unwrap();
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("tracksync.db"));
        assert!(url.ends_with("?mode=rwc"));
    }

    #[test]
    fn test_database_url_respects_configured_value() {
        let toml_content = r#"
            [database]
            url = "postgres://localhost/tracksync"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(
            config.database_url(),
            Some("postgres://localhost/tracksync".to_string())
        );
    }

    #[test]
    fn test_retention_zero_disables_cleanup() {
        let mut config = Config::default();
        assert_eq!(config.retention_days(), Some(90));

        config.sync.retention_days = 0;
        assert_eq!(config.retention_days(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let toml_content = r#"
            [sync]
            interval_minutes = 5
            unknown_field = "should be ignored"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.sync.interval_minutes, 5);
    }
}
