//! Sitepulse main entry point
//!
//! Command-line interface for the website content pipeline.

use anyhow::Context;
use clap::Parser;
use sitepulse::config::{load_config_with_fingerprint, RunConfig};
use sitepulse::pipeline::run_pipeline;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Sitepulse: website content pipeline
///
/// Fetches the configured sites under a shared rate limit, extracts the
/// structured content sections, and writes one aggregate summary artifact.
#[derive(Parser, Debug)]
#[command(name = "sitepulse")]
#[command(version = "1.0.0")]
#[command(about = "Website content crawl and summary pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be processed without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, fingerprint) = load_config_with_fingerprint(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!(
        "Configuration loaded successfully (fingerprint: {})",
        fingerprint
    );

    if cli.dry_run {
        handle_dry_run(&config, &fingerprint);
        return Ok(());
    }

    // Ctrl-C stops issuing new fetches; in-flight sites finish first
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Shutdown requested, letting in-flight sites finish");
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }

    let artifact = run_pipeline(&config, shutdown)
        .await
        .context("pipeline run failed")?;

    println!("=== Run Summary ===\n");
    println!(
        "  Sites processed: {} / {}",
        artifact.total_sites, artifact.sites_configured
    );
    println!("  Active: {}", artifact.active_sites);
    println!("  Inactive: {}", artifact.inactive_sites);
    println!("  Case studies found: {}", artifact.total_case_studies);
    if artifact.partial {
        println!("  Note: run was cancelled; artifact covers a partial site set");
    }
    println!("\n✓ Artifact written to: {}", config.output.artifact_path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitepulse=info,warn"),
            1 => EnvFilter::new("sitepulse=debug,info"),
            2 => EnvFilter::new("sitepulse=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the planned run
fn handle_dry_run(config: &RunConfig, fingerprint: &str) {
    println!("=== Sitepulse Dry Run ===\n");

    println!("Rate Limit:");
    println!(
        "  Requests per minute: {}",
        config.rate_limit.requests_per_minute
    );

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Max attempts: {}", config.fetch.max_retries);
    println!("  Retry backoff base: {}ms", config.fetch.retry_backoff_ms);

    println!("\nPipeline:");
    println!("  Workers: {}", config.pipeline.workers);

    println!("\nOutput:");
    println!("  Artifact: {}", config.output.artifact_path.display());
    if let Some(scratch) = &config.scratch {
        println!("  Scratch dir: {}", scratch.dir.display());
    }

    println!("\nSites ({}):", config.sites.urls.len());
    for url in &config.sites.urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid (fingerprint: {})", fingerprint);
}
