//! Application configuration.
//!
//! Every field has a default matching the public bear-sighting sheet, so the
//! binary runs without a config file. A TOML file given with `--config` may
//! override any subset of fields.

use crate::error::ConfigError;
use crate::stats::StatsScope;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Zero-based column position of each record field in a sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub id: usize,
    pub year: usize,
    pub month: usize,
    pub day: usize,
    pub weekday: usize,
    pub time: usize,
    pub location: usize,
    pub address: usize,
    pub description: usize,
    pub sighting_type: usize,
    pub latitude: usize,
    pub longitude: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        // Column A is blank in the sheet; data starts at B.
        Self {
            id: 1,
            year: 2,
            month: 3,
            day: 4,
            weekday: 5,
            time: 6,
            location: 9,
            address: 10,
            description: 11,
            sighting_type: 12,
            latitude: 14,
            longitude: 15,
        }
    }
}

/// Where data rows begin in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RowSkip {
    /// Data starts at a fixed row index; everything above is title and header rows.
    Fixed { offset: usize },
    /// Row 0 is skipped only if it looks like a header (non-numeric latitude cell).
    SniffHeader,
}

impl Default for RowSkip {
    fn default() -> Self {
        RowSkip::Fixed { offset: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub sheet_id: String,
    pub sheet_name: String,
    /// Full feed URL; takes precedence over `sheet_id`/`sheet_name`.
    pub url: Option<String>,
    /// Length in bytes of the non-JSON framing before the payload.
    pub envelope_prefix: usize,
    /// Length in bytes of the non-JSON framing after the payload.
    pub envelope_suffix: usize,
    pub skip: RowSkip,
    pub columns: ColumnMap,
    pub default_year: i32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sheet_id: "1YlsTXib1LEbk_DkQlhIGwstQ4DenSRWeyTBpJsRR-IQ".to_string(),
            sheet_name: "불곰출몰정보".to_string(),
            url: None,
            envelope_prefix: 47,
            envelope_suffix: 2,
            skip: RowSkip::default(),
            columns: ColumnMap::default(),
            default_year: 2025,
            timeout_secs: 15,
            max_retries: 3,
            retry_delay_ms: 500,
        }
    }
}

impl FeedConfig {
    /// Resolves the feed URL, encoding the sheet name into the query string.
    pub fn feed_url(&self) -> Result<Url, ConfigError> {
        if let Some(url) = &self.url {
            return Url::parse(url).map_err(|e| ConfigError::InvalidUrl(e.to_string()));
        }
        let base = format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq",
            self.sheet_id
        );
        Url::parse_with_params(
            &base,
            &[("tqx", "out:json"), ("sheet", self.sheet_name.as_str())],
        )
        .map_err(|e| ConfigError::InvalidUrl(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    /// Trailing window for the recent-activity feed.
    pub recent_days: u32,
    pub stats_scope: StatsScope,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            recent_days: 3,
            stats_scope: StatsScope::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn recent_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.recent_days) * 24 * 60 * 60)
    }
}
