// src/cli.rs
// =============================================================================
// This file defines the command-line interface using the `clap` crate.
//
// There is a single command: run the probe loop. Every tunable that used to
// be a hard-coded constant is a flag with the old value as its default, and
// the webhook URL can also come from the DISCORD_WEBHOOK_URL environment
// variable.
//
// Cli::into_config() turns the parsed flags into the FuzzConfig the run loop
// takes, so nothing below main.rs ever looks at clap types.
// =============================================================================

use crate::config::{
    FuzzConfig, ProbePolicy, DEFAULT_ATTEMPTS, DEFAULT_BASE_URL, DEFAULT_DELAY_MS,
    DEFAULT_ID_LENGTH, DEFAULT_ID_PREFIX, DEFAULT_NOTIFY_TIMEOUT_SECS,
    DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_TESTED_FILE, DEFAULT_VALID_FILE, WEBHOOK_ENV,
};
use crate::probe::BodyMarkers;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "form-fuzzer",
    version,
    about = "Probe random survey form identifiers and report the ones that exist",
    long_about = "form-fuzzer generates random form identifiers, checks whether each one \
                  resolves to a live survey form, remembers every URL it has tried across \
                  runs, and posts newly found forms to a chat webhook."
)]
pub struct Cli {
    /// Base URL the identifiers are appended to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Webhook that receives a message for every new valid form
    ///
    /// Without it, notifications fail and are logged; the run continues.
    #[arg(long, env = WEBHOOK_ENV, hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Number of identifiers to generate in this run
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Pause between two probes, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// File holding every URL probed so far
    #[arg(long, default_value = DEFAULT_TESTED_FILE)]
    pub tested_file: PathBuf,

    /// File holding every URL confirmed as a live form
    #[arg(long, default_value = DEFAULT_VALID_FILE)]
    pub valid_file: PathBuf,

    /// How a candidate is checked
    #[arg(long, value_enum, default_value_t = ProbePolicy::Get)]
    pub probe: ProbePolicy,

    /// Timeout for each probe request, in seconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Timeout for each webhook request, in seconds
    #[arg(long, default_value_t = DEFAULT_NOTIFY_TIMEOUT_SECS)]
    pub notify_timeout_secs: u64,

    /// Constant prefix of every identifier
    #[arg(long, default_value = DEFAULT_ID_PREFIX)]
    pub prefix: String,

    /// Number of random characters after the prefix
    #[arg(long, default_value_t = DEFAULT_ID_LENGTH)]
    pub id_length: usize,

    /// Text a page must mention to count as the platform's own form
    #[arg(long, default_value = "qualtrics")]
    pub platform_marker: String,

    /// Print the run summary as JSON instead of a sentence
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn into_config(self) -> FuzzConfig {
        FuzzConfig {
            base_url: self.base_url,
            webhook_url: self.webhook_url.filter(|url| !url.trim().is_empty()),
            attempts: self.attempts,
            delay: Duration::from_millis(self.delay_ms),
            tested_path: self.tested_file,
            valid_path: self.valid_file,
            probe_timeout: Duration::from_secs(self.timeout_secs),
            notify_timeout: Duration::from_secs(self.notify_timeout_secs),
            policy: self.probe,
            id_prefix: self.prefix,
            id_length: self.id_length,
            markers: BodyMarkers::for_platform(&self.platform_marker),
        }
    }
}
