//! The refresh run: load → discover → probe → apply → publish.
//!
//! Every gist interaction is best-effort. A failed load means a cold
//! start, a failed publish is logged and dropped; the run itself never
//! aborts on registry or gateway trouble.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use sublink_gist::GistClient;
use sublink_probe::{HttpFetcher, RetryPolicy, Validator, probe_all};
use sublink_registry::{LifecycleConfig, Registry, discover};

pub struct RefreshArgs {
    pub gist_id: String,
    pub token: String,
    pub registry_file: String,
    pub scan_file: String,
    pub hours: u64,
    pub workers: usize,
    pub retries: u32,
    pub retry_delay_secs: u64,
    pub timeout_secs: u64,
    pub max_failure_days: u64,
}

pub async fn run(args: RefreshArgs) -> anyhow::Result<()> {
    info!(gist_id = %args.gist_id, "refresh run starting");
    let client = GistClient::new(&args.token)?;

    // Prior state. Missing or corrupt means cold start, never an abort.
    let prior = match client.load_file(&args.gist_id, &args.registry_file).await {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, file = %args.registry_file, "failed to load registry, starting cold");
            None
        }
    };
    let config = LifecycleConfig::new(args.max_failure_days);
    let mut registry = Registry::load(prior.as_deref(), config);

    // Discovery: the current scan artifact plus its recent history.
    let scan = match client.load_file(&args.gist_id, &args.scan_file).await {
        Ok(content) => content.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, file = %args.scan_file, "failed to load scan artifact");
            String::new()
        }
    };
    let history = match client
        .history(&args.gist_id, &args.scan_file, args.hours)
        .await
    {
        Ok(snapshots) => snapshots,
        Err(e) => {
            warn!(error = %e, "failed to replay gist history, discovery limited to scan");
            Vec::new()
        }
    };
    let candidates = discover::merge(scan.lines(), history.iter().map(String::as_str));
    registry.absorb(candidates);

    // Probe everything still worth probing, then apply sequentially.
    let now = epoch_secs();
    let urls = registry.selectable_urls(now);
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let validator = Arc::new(Validator::new(
        fetcher,
        RetryPolicy {
            attempts: args.retries,
            delay: Duration::from_secs(args.retry_delay_secs),
        },
    ));
    let results = probe_all(validator, urls, args.workers).await;
    for (url, ok) in &results {
        registry.apply(url, *ok, now);
    }

    // Publish the active list and the registry document.
    let active = registry.active_urls();
    info!(
        active = active.len(),
        total = registry.len(),
        "refresh probing complete"
    );
    if active.is_empty() {
        info!("no active subscriptions, leaving scan artifact untouched");
    } else if let Err(e) = client
        .upload_file(&args.gist_id, &args.scan_file, &active.join("\n"))
        .await
    {
        warn!(error = %e, file = %args.scan_file, "failed to publish active list");
    }

    match registry.to_json() {
        Ok(json) => {
            if let Err(e) = client
                .upload_file(&args.gist_id, &args.registry_file, &json)
                .await
            {
                warn!(error = %e, file = %args.registry_file, "failed to publish registry");
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize registry, skipping publish"),
    }

    info!("refresh run finished");
    Ok(())
}

fn epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
