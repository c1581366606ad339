// src/probe/mod.rs
// =============================================================================
// This module decides whether a candidate URL is a live, accessible form.
//
// Submodules:
// - body: classifies a response (status + page body) using text markers
// - http: the request sequences (GET only, or HEAD then GET)
//
// The run loop only sees the Probe trait, so another classification rule can
// be dropped in without touching the loop.
// =============================================================================

mod body;
mod http;

pub use body::{classify, BodyMarkers};
pub use http::{build_client, Prober};

/// What a probe learned about one candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The page is a real form; carries the page title when there is one
    Valid { title: Option<String> },
    /// The host answered 200 with its "survey not found" page
    NotFound,
    /// Any other answer (non-200 status, or a 200 without form markers)
    Invalid { status: u16 },
    /// The request never produced a usable response (timeout, DNS, TLS...)
    Error { message: String },
}

/// A strategy for classifying a candidate URL
///
/// Implementations never fail and never retry: network trouble is reported
/// as ProbeOutcome::Error and counted as invalid by the caller.
pub trait Probe {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
