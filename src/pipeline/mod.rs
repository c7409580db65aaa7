//! Scheduling shim: bounded fan-out of per-site work and the join barrier
//!
//! One task is spawned per configured site, gated by a semaphore of
//! `workers` permits; each task runs the full fetch → extract → transform
//! chain to completion. A single join barrier collects every terminal
//! record before aggregation starts. The shared request budget is the only
//! mutable state crossing worker boundaries.

use crate::aggregate::{aggregate_and_persist, RunMeta, SummaryArtifact};
use crate::config::{config_fingerprint, RunConfig};
use crate::extract::{extract_content, ExtractedContent};
use crate::fetch::{build_http_client, fetch_site, RequestBudget};
use crate::scratch;
use crate::transform::{transform_site, SiteRecord};
use crate::PipelineError;
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Runs the full per-site chain: fetch → extract → transform
///
/// This is the per-site unit of work an external orchestrator can schedule
/// directly. It never fails: fetch and extraction errors are folded into
/// the returned record, so one site's failure cannot abort its siblings.
///
/// # Arguments
///
/// * `site` - The site URL to process
/// * `config` - The run configuration
/// * `budget` - The shared request budget
/// * `client` - The shared HTTP client
pub async fn process_site(
    site: &Url,
    config: &RunConfig,
    budget: &RequestBudget,
    client: &Client,
) -> SiteRecord {
    tracing::debug!("[{}] Starting site chain", site);

    let fetched = fetch_site(client, budget, site, config).await;

    if let Some(scratch_cfg) = &config.scratch {
        if let Some(body) = &fetched.body {
            scratch::store_raw_body(&scratch_cfg.dir, site, body);
        }
    }

    let extracted = match &fetched.body {
        Some(body) => extract_content(site, body, config),
        None => ExtractedContent::empty(site.clone()),
    };

    let record = transform_site(&fetched, &extracted);

    if let Some(scratch_cfg) = &config.scratch {
        scratch::store_site_record(&scratch_cfg.dir, &record);
    }

    tracing::info!(
        "[{}] Site finished | status: {:?} | case studies: {} | attempts: {}",
        site,
        record.status,
        record.case_study_count,
        record.fetch_attempts
    );

    record
}

/// Runs the whole pipeline: bounded fan-out, join barrier, aggregation
///
/// The shutdown flag stops not-yet-started sites; in-flight sites run to
/// completion and their records are aggregated, with the artifact marked
/// partial when any configured site was skipped.
///
/// # Arguments
///
/// * `config` - The validated run configuration
/// * `shutdown` - Run-level cancellation flag (e.g. set from Ctrl-C)
///
/// # Returns
///
/// * `Ok(SummaryArtifact)` - The persisted artifact
/// * `Err(PipelineError)` - HTTP client construction or artifact persistence failed
pub async fn run_pipeline(
    config: &RunConfig,
    shutdown: Arc<AtomicBool>,
) -> Result<SummaryArtifact, PipelineError> {
    let started_at = Utc::now();
    let fingerprint = config_fingerprint(config);
    let site_count = config.sites.urls.len();

    tracing::info!(
        "Starting run | {} sites | {} req/min | {} workers (fingerprint: {})",
        site_count,
        config.rate_limit.requests_per_minute,
        config.pipeline.workers,
        fingerprint
    );

    let client = build_http_client(config)?;
    let budget = Arc::new(RequestBudget::new(config.rate_limit.requests_per_minute));
    let semaphore = Arc::new(Semaphore::new(config.pipeline.workers));
    let config = Arc::new(config.clone());

    let mut join_set = JoinSet::new();

    for (index, site) in config.sites.urls.iter().cloned().enumerate() {
        let config = Arc::clone(&config);
        let budget = Arc::clone(&budget);
        let semaphore = Arc::clone(&semaphore);
        let shutdown = Arc::clone(&shutdown);
        let client = client.clone();

        join_set.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed during a run
                Err(_) => return None,
            };

            if shutdown.load(Ordering::SeqCst) {
                tracing::info!("[{}] Skipped: shutdown requested", site);
                return None;
            }

            let record = process_site(&site, &config, &budget, &client).await;
            Some((index, record))
        });
    }

    // Join barrier: every site reaches a terminal outcome before aggregation
    let mut slots: Vec<Option<SiteRecord>> = vec![None; site_count];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Some((index, record))) => slots[index] = Some(record),
            Ok(None) => {}
            Err(e) => tracing::error!("Worker task failed: {}", e),
        }
    }

    // Hand records to the aggregator in config order; skipped sites leave gaps
    let records: Vec<SiteRecord> = slots.into_iter().flatten().collect();

    if records.len() < site_count {
        tracing::warn!(
            "Run incomplete: {} of {} sites processed",
            records.len(),
            site_count
        );
    }

    let meta = RunMeta {
        started_at,
        config_fingerprint: fingerprint,
        sites_configured: site_count as u64,
    };

    let artifact = aggregate_and_persist(&records, &config, &meta)?;
    Ok(artifact)
}
