// src/fuzz/run.rs
// =============================================================================
// The fixed-iteration, sequential run loop.
//
// Each iteration handles one candidate:
// 1. Generate an identifier and build its URL
// 2. Skip it (no request, no delay) if it is already in either link set
// 3. Probe it; a valid result goes into the valid set and is notified once
// 4. Record it in the tested set, whatever the outcome
// 5. Wait the configured delay before the next iteration
//
// Probes never overlap: every request is awaited before the loop moves on.
// Progress is only written to disk after the last iteration, so a killed run
// loses what it found.
// =============================================================================

use crate::config::FuzzConfig;
use crate::generator::{candidate_url, IdGenerator};
use crate::notify::{Discovery, Notifier};
use crate::probe::{Probe, ProbeOutcome};
use crate::store;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What one run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub attempts: usize,
    /// URLs probed during this run
    pub tested: usize,
    /// URLs newly confirmed as valid during this run
    pub valid: usize,
    /// Candidates already known from the link sets
    pub skipped: usize,
    pub probe_errors: usize,
    pub notified: usize,
    pub notify_failures: usize,
    pub new_valid_urls: Vec<String>,
}

pub async fn run<G, P, N>(
    config: &FuzzConfig,
    ids: &mut G,
    probe: &P,
    notifier: &N,
) -> Result<RunSummary>
where
    G: IdGenerator,
    P: Probe,
    N: Notifier,
{
    let mut tested = store::load(&config.tested_path).context("loading tested links")?;
    let mut valid = store::load(&config.valid_path).context("loading valid links")?;

    info!(
        "Loaded {} tested and {} valid link(s)",
        tested.len(),
        valid.len()
    );

    let mut summary = RunSummary {
        attempts: config.attempts,
        ..RunSummary::default()
    };

    for attempt in 0..config.attempts {
        let id = ids.next_id();
        let url = candidate_url(&config.base_url, &id);

        if tested.contains(&url) || valid.contains(&url) {
            debug!("Skipping known URL: {}", url);
            summary.skipped += 1;
            continue;
        }

        info!("Testing URL: {}", url);
        let outcome = probe.probe(&url).await;

        match outcome {
            ProbeOutcome::Valid { title } => {
                info!("Valid form: {}", url);
                valid.insert(url.clone());
                summary.valid += 1;
                summary.new_valid_urls.push(url.clone());

                let discovery = Discovery {
                    url: url.clone(),
                    title,
                };
                match notifier.notify(&discovery).await {
                    Ok(()) => summary.notified += 1,
                    Err(e) => {
                        warn!("Failed to send notification for {}: {}", url, e);
                        summary.notify_failures += 1;
                    }
                }
            }
            ProbeOutcome::NotFound => debug!("Survey not found: {}", url),
            ProbeOutcome::Invalid { status } => debug!("Invalid form (HTTP {}): {}", status, url),
            ProbeOutcome::Error { message } => {
                warn!("Error accessing {}: {}", url, message);
                summary.probe_errors += 1;
            }
        }

        tested.insert(url);
        summary.tested += 1;

        if attempt + 1 < config.attempts && !config.delay.is_zero() {
            tokio::time::sleep(config.delay).await;
        }
    }

    if summary.valid > 0 {
        store::save(&config.valid_path, &valid).context("saving valid links")?;
    }
    if summary.tested > 0 {
        store::save(&config.tested_path, &tested).context("saving tested links")?;
    }

    summary.new_valid_urls.sort();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::notify::WebhookNotifier;
    use crate::config::ProbePolicy;
    use crate::probe::{build_client, BodyMarkers, Prober};
    use std::collections::{HashMap, VecDeque};
    use std::fs;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const FORM_PAGE: &str =
        "<html><head><title>Found It</title></head><body>qualtrics survey</body></html>";
    const NOT_FOUND_PAGE: &str = "<html><body>Qualtrics - Survey Not Found</body></html>";

    // Hands out a fixed list of identifiers, in order
    struct ScriptedIds(VecDeque<String>);

    impl ScriptedIds {
        fn new(ids: &[&str]) -> Self {
            Self(ids.iter().map(|s| s.to_string()).collect())
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_id(&mut self) -> String {
            self.0.pop_front().expect("scripted ids exhausted")
        }
    }

    // Answers from a table (NotFound by default) and remembers what it was asked
    #[derive(Default)]
    struct StubProbe {
        answers: HashMap<String, ProbeOutcome>,
        probed: Mutex<Vec<String>>,
    }

    impl Probe for StubProbe {
        async fn probe(&self, url: &str) -> ProbeOutcome {
            self.probed.lock().unwrap().push(url.to_string());
            self.answers
                .get(url)
                .cloned()
                .unwrap_or(ProbeOutcome::NotFound)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Discovery>>,
    }

    impl Notifier for RecordingNotifier {
        async fn notify(&self, discovery: &Discovery) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(discovery.clone());
            Ok(())
        }
    }

    fn config_in(dir: &TempDir, base_url: &str, attempts: usize) -> FuzzConfig {
        FuzzConfig {
            base_url: base_url.to_string(),
            attempts,
            delay: Duration::ZERO,
            tested_path: dir.path().join("tested_links.txt"),
            valid_path: dir.path().join("valid_links.txt"),
            ..FuzzConfig::default()
        }
    }

    fn lines(path: &std::path::Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_all_not_found_end_to_end() {
        let mock_server = MockServer::start().await;
        let webhook = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NOT_FOUND_PAGE))
            .expect(3)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&webhook)
            .await;

        let config = config_in(&dir, &mock_server.uri(), 3);
        let probe = Prober::new(
            ProbePolicy::Get,
            build_client(Duration::from_secs(5)).unwrap(),
            BodyMarkers::default(),
        );
        let notifier =
            WebhookNotifier::new(Some(webhook.uri()), Duration::from_secs(10)).unwrap();
        let mut ids = ScriptedIds::new(&["SV_a", "SV_b", "SV_c"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        assert_eq!(summary.tested, 3);
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.notified, 0);
        assert_eq!(lines(&config.tested_path).len(), 3);
        assert!(!config.valid_path.exists());
    }

    #[tokio::test]
    async fn test_one_valid_end_to_end() {
        let mock_server = MockServer::start().await;
        let webhook = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/SV_live"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FORM_PAGE))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NOT_FOUND_PAGE))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&webhook)
            .await;

        let config = config_in(&dir, &mock_server.uri(), 3);
        let probe = Prober::new(
            ProbePolicy::Get,
            build_client(Duration::from_secs(5)).unwrap(),
            BodyMarkers::default(),
        );
        let notifier = WebhookNotifier::new(
            Some(format!("{}/hook", webhook.uri())),
            Duration::from_secs(10),
        )
        .unwrap();
        let mut ids = ScriptedIds::new(&["SV_dead1", "SV_live", "SV_dead2"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        let live_url = format!("{}/SV_live", mock_server.uri());
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.notified, 1);
        assert_eq!(summary.new_valid_urls, vec![live_url.clone()]);
        assert_eq!(lines(&config.valid_path), vec![live_url.clone()]);
        assert_eq!(lines(&config.tested_path).len(), 3);

        let requests = webhook.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let content = payload["content"].as_str().unwrap();
        assert!(content.contains(&live_url));
        assert!(content.contains("Found It"));
    }

    #[tokio::test]
    async fn test_known_urls_are_never_probed() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "https://forms.example/f/", 4);

        fs::write(&config.tested_path, "https://forms.example/f/SV_old\n").unwrap();
        fs::write(&config.valid_path, "https://forms.example/f/SV_good\n").unwrap();

        let probe = StubProbe::default();
        let notifier = RecordingNotifier::default();
        let mut ids = ScriptedIds::new(&["SV_old", "SV_new", "SV_good", "SV_new"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        // SV_new is probed once; its repeat is skipped as already tested this run
        assert_eq!(
            *probe.probed.lock().unwrap(),
            vec!["https://forms.example/f/SV_new".to_string()]
        );
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.tested, 1);
        assert_eq!(
            lines(&config.tested_path),
            vec![
                "https://forms.example/f/SV_new".to_string(),
                "https://forms.example/f/SV_old".to_string(),
            ]
        );
        // Valid set did not grow, so its file is left as it was
        assert_eq!(
            lines(&config.valid_path),
            vec!["https://forms.example/f/SV_good".to_string()]
        );
    }

    #[tokio::test]
    async fn test_errors_and_invalid_are_tested_but_not_valid() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "https://forms.example/f", 3);

        let mut answers = HashMap::new();
        answers.insert(
            "https://forms.example/f/SV_err".to_string(),
            ProbeOutcome::Error {
                message: "request timed out".to_string(),
            },
        );
        answers.insert(
            "https://forms.example/f/SV_500".to_string(),
            ProbeOutcome::Invalid { status: 500 },
        );
        let probe = StubProbe {
            answers,
            ..StubProbe::default()
        };
        let notifier = RecordingNotifier::default();
        let mut ids = ScriptedIds::new(&["SV_err", "SV_500", "SV_gone"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        assert_eq!(summary.tested, 3);
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.probe_errors, 1);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(lines(&config.tested_path).len(), 3);
        assert!(!config.valid_path.exists());
    }

    #[tokio::test]
    async fn test_valid_result_notifies_exactly_once() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "https://forms.example/f/", 2);
        let live = "https://forms.example/f/SV_live".to_string();

        let mut answers = HashMap::new();
        answers.insert(
            live.clone(),
            ProbeOutcome::Valid {
                title: Some("Signup".to_string()),
            },
        );
        let probe = StubProbe {
            answers,
            ..StubProbe::default()
        };
        let notifier = RecordingNotifier::default();
        // The second SV_live is skipped, so only one notification goes out
        let mut ids = ScriptedIds::new(&["SV_live", "SV_live"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        assert_eq!(summary.valid, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec![Discovery {
                url: live.clone(),
                title: Some("Signup".to_string()),
            }]
        );
        assert_eq!(lines(&config.valid_path), vec![live.clone()]);
        assert_eq!(lines(&config.tested_path), vec![live]);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_abort_run() {
        let dir = TempDir::new().unwrap();
        let webhook = MockServer::start().await;
        let config = config_in(&dir, "https://forms.example/f/", 2);

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&webhook)
            .await;

        let mut answers = HashMap::new();
        for id in ["SV_one", "SV_two"] {
            answers.insert(
                format!("https://forms.example/f/{}", id),
                ProbeOutcome::Valid { title: None },
            );
        }
        let probe = StubProbe {
            answers,
            ..StubProbe::default()
        };
        let notifier =
            WebhookNotifier::new(Some(webhook.uri()), Duration::from_secs(10)).unwrap();
        let mut ids = ScriptedIds::new(&["SV_two", "SV_one"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        assert_eq!(summary.valid, 2);
        assert_eq!(summary.notified, 0);
        assert_eq!(summary.notify_failures, 2);
        assert_eq!(
            summary.new_valid_urls,
            vec![
                "https://forms.example/f/SV_one".to_string(),
                "https://forms.example/f/SV_two".to_string(),
            ]
        );
        assert_eq!(lines(&config.valid_path).len(), 2);
    }

    #[tokio::test]
    async fn test_missing_webhook_is_counted_as_failure() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "https://forms.example/f/", 1);

        let mut answers = HashMap::new();
        answers.insert(
            "https://forms.example/f/SV_x".to_string(),
            ProbeOutcome::Valid { title: None },
        );
        let probe = StubProbe {
            answers,
            ..StubProbe::default()
        };
        let notifier = WebhookNotifier::new(None, Duration::from_secs(10)).unwrap();
        let mut ids = ScriptedIds::new(&["SV_x"]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        assert_eq!(summary.valid, 1);
        assert_eq!(summary.notify_failures, 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "https://forms.example/f/", 0);

        let probe = StubProbe::default();
        let notifier = RecordingNotifier::default();
        let mut ids = ScriptedIds::new(&[]);

        let summary = run(&config, &mut ids, &probe, &notifier).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(!config.tested_path.exists());
        assert!(!config.valid_path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_probes() {
        let dir = TempDir::new().unwrap();
        let config = FuzzConfig {
            delay: Duration::from_secs(1),
            ..config_in(&dir, "https://forms.example/f/", 3)
        };

        let probe = StubProbe::default();
        let notifier = RecordingNotifier::default();
        let mut ids = ScriptedIds::new(&["SV_1", "SV_2", "SV_3"]);

        let started = tokio::time::Instant::now();
        run(&config, &mut ids, &probe, &notifier).await.unwrap();

        // Two gaps between three probes, none after the last
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }
}
