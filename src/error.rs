// src/error.rs
// =============================================================================
// Typed errors for the parts of the tool that can fail in more than one way.
//
// The application edge (main.rs, the run loop) works with anyhow::Result and
// attaches context. These enums exist so callers can tell failures apart:
// - StoreError: reading or writing a link file
// - NotifyError: delivering a webhook message (always logged, never fatal)
// - ConfigError: rejected before any request is made
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read link file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write link file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("no webhook URL configured")]
    NotConfigured,

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook responded with HTTP {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("identifier length must be at least 1")]
    EmptyIdentifier,
}
