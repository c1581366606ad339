// src/config.rs
// =============================================================================
// The explicit configuration handed to the run loop.
//
// Every tunable of a run lives here: where to probe, where to report, how
// many attempts, how long to wait between them, where the link files are.
// cli.rs builds one of these from flags and environment variables; tests
// build them directly with struct update syntax over Default.
// =============================================================================

use crate::error::ConfigError;
use crate::probe::BodyMarkers;
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://discord.sjc1.qualtrics.com/jfe/form/";
pub const DEFAULT_ATTEMPTS: usize = 100_000;
pub const DEFAULT_DELAY_MS: u64 = 1_000;
pub const DEFAULT_TESTED_FILE: &str = "tested_links.txt";
pub const DEFAULT_VALID_FILE: &str = "valid_links.txt";
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ID_PREFIX: &str = "SV_";
pub const DEFAULT_ID_LENGTH: usize = 15;

/// Environment variable holding the webhook URL
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Which request sequence decides whether a candidate is a live form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProbePolicy {
    /// One GET, classified by the page body
    #[default]
    Get,
    /// A HEAD existence check first, then the GET body check
    HeadThenGet,
}

#[derive(Debug, Clone)]
pub struct FuzzConfig {
    pub base_url: String,
    /// None means notifications are attempted and fail (logged, not fatal)
    pub webhook_url: Option<String>,
    pub attempts: usize,
    pub delay: Duration,
    pub tested_path: PathBuf,
    pub valid_path: PathBuf,
    pub probe_timeout: Duration,
    pub notify_timeout: Duration,
    pub policy: ProbePolicy,
    pub id_prefix: String,
    pub id_length: usize,
    pub markers: BodyMarkers,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            webhook_url: None,
            attempts: DEFAULT_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            tested_path: PathBuf::from(DEFAULT_TESTED_FILE),
            valid_path: PathBuf::from(DEFAULT_VALID_FILE),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            notify_timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
            policy: ProbePolicy::default(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            id_length: DEFAULT_ID_LENGTH,
            markers: BodyMarkers::default(),
        }
    }
}

impl FuzzConfig {
    /// Rejects settings that would make every request of the run pointless
    ///
    /// Only http and https base URLs are accepted; anything else could never
    /// be probed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if self.id_length == 0 {
            return Err(ConfigError::EmptyIdentifier);
        }

        Ok(())
    }
}
