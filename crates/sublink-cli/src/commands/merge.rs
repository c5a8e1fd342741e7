//! The merge run: upload the fresh scan, replay history, publish the union.

use tracing::{info, warn};

use sublink_gist::GistClient;
use sublink_registry::discover;

pub struct MergeArgs {
    pub gist_id: String,
    pub token: String,
    pub filename: String,
    pub hours: u64,
    pub output: String,
    pub input: Option<String>,
}

pub async fn run(args: MergeArgs) -> anyhow::Result<()> {
    info!(gist_id = %args.gist_id, file = %args.filename, "merge run starting");
    let client = GistClient::new(&args.token)?;

    // Fresh scan results, if a local file was handed to us.
    let scan = match &args.input {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path, error = %e, "failed to read local scan file");
                String::new()
            }
        },
        None => String::new(),
    };
    if !scan.trim().is_empty() {
        if let Err(e) = client
            .upload_file(&args.gist_id, &args.filename, scan.trim())
            .await
        {
            warn!(error = %e, file = %args.filename, "failed to upload scan results");
        }
    }

    // Replay the window and union with the scan.
    let history = match client
        .history(&args.gist_id, &args.filename, args.hours)
        .await
    {
        Ok(snapshots) => snapshots,
        Err(e) => {
            warn!(error = %e, "failed to replay gist history");
            Vec::new()
        }
    };
    let merged = discover::merge(scan.lines(), history.iter().map(String::as_str));
    info!(links = merged.len(), "merged candidate set assembled");

    if merged.is_empty() {
        warn!("no subscription links found, nothing to publish");
        return Ok(());
    }

    let body = merged.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
    if let Err(e) = client.upload_file(&args.gist_id, &args.output, &body).await {
        warn!(error = %e, file = %args.output, "failed to publish merged list");
        return Ok(());
    }

    info!(file = %args.output, "merge run finished");
    Ok(())
}
