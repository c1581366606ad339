// src/probe/http.rs
// =============================================================================
// The request sequences that probe a candidate URL.
//
// Two policies:
// - GetProbe: a single GET, the body decides (see body.rs)
// - HeadThenGetProbe: a lightweight HEAD first (following redirects); only a
//   successful HEAD is followed by the GET body check
//
// Both never propagate errors: a failed request becomes ProbeOutcome::Error
// with a short description of what went wrong.
// =============================================================================

use super::{classify, BodyMarkers, Probe, ProbeOutcome};
use crate::config::ProbePolicy;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("form-fuzzer/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by every probe of a run
///
/// One client means one connection pool; it is cheap to clone.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
}

pub struct GetProbe {
    client: Client,
    markers: BodyMarkers,
}

impl GetProbe {
    pub fn new(client: Client, markers: BodyMarkers) -> Self {
        Self { client, markers }
    }
}

impl Probe for GetProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return categorize_error(e),
        };

        let status = response.status().as_u16();
        debug!("GET {}: status {}", url, status);

        match response.text().await {
            Ok(body) => classify(status, &body, &self.markers),
            Err(e) => categorize_error(e),
        }
    }
}

pub struct HeadThenGetProbe {
    get: GetProbe,
}

impl HeadThenGetProbe {
    pub fn new(client: Client, markers: BodyMarkers) -> Self {
        Self {
            get: GetProbe::new(client, markers),
        }
    }
}

impl Probe for HeadThenGetProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let status = match self.get.client.head(url).send().await {
            Ok(response) => response.status(),
            Err(e) => return categorize_error(e),
        };

        debug!("HEAD {}: status {}", url, status.as_u16());

        if !status.is_success() {
            return ProbeOutcome::Invalid {
                status: status.as_u16(),
            };
        }

        self.get.probe(url).await
    }
}

/// The probe policy chosen at startup
pub enum Prober {
    Get(GetProbe),
    HeadThenGet(HeadThenGetProbe),
}

impl Prober {
    pub fn new(policy: ProbePolicy, client: Client, markers: BodyMarkers) -> Self {
        match policy {
            ProbePolicy::Get => Prober::Get(GetProbe::new(client, markers)),
            ProbePolicy::HeadThenGet => {
                Prober::HeadThenGet(HeadThenGetProbe::new(client, markers))
            }
        }
    }
}

impl Probe for Prober {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self {
            Prober::Get(probe) => probe.probe(url).await,
            Prober::HeadThenGet(probe) => probe.probe(url).await,
        }
    }
}

// Turns a reqwest failure into a short, human-readable outcome
fn categorize_error(error: reqwest::Error) -> ProbeOutcome {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    ProbeOutcome::Error { message }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is Prober an enum and not Box<dyn Probe>?
//    - Probe uses `async fn` in a trait, which is not object safe
//    - An enum keeps dispatch static and still lets main pick at runtime
//
// 2. Does HEAD follow redirects?
//    - Yes, reqwest keeps the HEAD method across 301/302/303 and the
//      client allows up to 5 hops
// -----------------------------------------------------------------------------
