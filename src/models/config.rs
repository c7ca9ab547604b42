//! Application configuration structures.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Crawl session configuration, loaded from a TOML file.
///
/// These parameters select controller and pacing behavior; they never
/// change extraction semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum number of listing pages to visit
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Use humanized pacing (randomized delays, session identity)
    #[serde(default)]
    pub humanize: bool,

    /// Raise renderer verbosity for debugging
    #[serde(default)]
    pub visual_debug: bool,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Fixed delay between requests in plain pacing mode
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Directory for the record snapshot
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
}

impl CrawlConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(AppError::validation("max_pages must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            humanize: false,
            visual_debug: false,
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            output_dir: defaults::output_dir(),
        }
    }
}

/// Counters describing one crawl session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub pages_visited: u32,
    pub candidates_seen: usize,
    pub records_accepted: usize,
    pub records_rejected: usize,
    pub extraction_failures: usize,
    pub navigation_failures: usize,
}

impl CrawlStats {
    /// Start a new stats block at the current time.
    pub fn begin() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            pages_visited: 0,
            candidates_seen: 0,
            records_accepted: 0,
            records_rejected: 0,
            extraction_failures: 0,
            navigation_failures: 0,
        }
    }

    /// Close the stats block at the current time.
    pub fn finish(&mut self) {
        self.end_time = Utc::now();
    }
}

mod defaults {
    pub fn max_pages() -> u32 {
        5
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; harvester/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        750
    }
    pub fn output_dir() -> String {
        "output".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(CrawlConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_pages() {
        let mut config = CrawlConfig::default();
        config.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = CrawlConfig::default();
        config.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: CrawlConfig = toml::from_str("max_pages = 2\nhumanize = true\n").unwrap();
        assert_eq!(config.max_pages, 2);
        assert!(config.humanize);
        assert_eq!(config.timeout_secs, 30);
    }
}
