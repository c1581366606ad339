// src/main.rs
// =============================================================================
// This is the entry point of the form-fuzzer CLI.
//
// What happens here:
// 1. Set up logging (RUST_LOG, default "info")
// 2. Parse command-line flags into a FuzzConfig and validate it
// 3. Build the identifier source, the probe and the notifier
// 4. Run the probe loop and print the summary
// 5. Exit with proper code (0 = run completed, 2 = error)
// =============================================================================

mod cli;
mod config;
mod error;
mod fuzz;
mod generator;
mod notify;
mod probe;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use fuzz::RunSummary;
use generator::RandomIds;
use notify::WebhookNotifier;
use probe::Prober;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json;
    let config = cli.into_config();

    config.validate()?;

    if config.webhook_url.is_none() {
        warn!(
            "{} is not set; discoveries will only be logged",
            config::WEBHOOK_ENV
        );
    }

    info!(
        "Probing {} candidate(s) under {} ({:?} policy, {:?} between requests)",
        config.attempts, config.base_url, config.policy, config.delay
    );

    let client = probe::build_client(config.probe_timeout).context("building probe client")?;
    let prober = Prober::new(config.policy, client, config.markers.clone());
    let notifier = WebhookNotifier::new(config.webhook_url.clone(), config.notify_timeout)
        .context("building webhook client")?;
    let mut ids = RandomIds::new(config.id_prefix.clone(), config.id_length);

    let summary = fuzz::run(&config, &mut ids, &prober, &notifier).await?;

    print_summary(&summary, json)
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    for url in &summary.new_valid_urls {
        println!("✅ {}", url);
    }
    println!(
        "\n🎯 Done: {} URLs tested, {} new valid forms found.",
        summary.tested, summary.valid
    );
    if summary.skipped > 0 || summary.probe_errors > 0 || summary.notify_failures > 0 {
        println!(
            "   {} skipped as already known, {} probe errors, {} failed notifications",
            summary.skipped, summary.probe_errors, summary.notify_failures
        );
    }
    Ok(())
}
