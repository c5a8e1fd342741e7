use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sublink",
    about = "sublink — proxy-subscription registry maintenance",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-validate every tracked subscription and republish the registry.
    ///
    /// Loads the registry document from the gist, absorbs newly discovered
    /// URLs from the scan artifact and the recent gist history, probes all
    /// non-expired subscriptions concurrently, applies the results, and
    /// publishes the active list plus the updated registry.
    Refresh {
        /// Gist holding the registry and artifacts
        #[arg(long)]
        gist_id: String,
        /// GitHub token with gist scope
        #[arg(long)]
        token: String,
        /// Registry document filename inside the gist
        #[arg(long, default_value = "subscriptions.json")]
        registry_file: String,
        /// Scan artifact filename (discovery input, active-list output)
        #[arg(long, default_value = "subscribes-scan.txt")]
        scan_file: String,
        /// Hours of gist history to replay for discovery
        #[arg(long, default_value_t = 6)]
        hours: u64,
        /// Maximum concurrent probes
        #[arg(long, default_value_t = 10)]
        workers: usize,
        /// Transport attempts per URL
        #[arg(long, default_value_t = 3)]
        retries: u32,
        /// Seconds to sleep between transport attempts
        #[arg(long, default_value_t = 3)]
        retry_delay_secs: u64,
        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
        /// Days a subscription may keep failing before it is expired
        #[arg(long, default_value_t = 7)]
        max_failure_days: u64,
    },
    /// Merge a fresh scan with recent gist history and publish the union.
    Merge {
        /// Gist holding the scan artifact
        #[arg(long)]
        gist_id: String,
        /// GitHub token with gist scope
        #[arg(long)]
        token: String,
        /// Source filename inside the gist
        #[arg(long, default_value = "subscribes.txt")]
        filename: String,
        /// Hours of gist history to replay
        #[arg(long, default_value_t = 6)]
        hours: u64,
        /// Merged output filename inside the gist
        #[arg(long, default_value = "merged_subscribes.txt")]
        output: String,
        /// Local scan file to upload before merging
        #[arg(long)]
        input: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Refresh {
            gist_id,
            token,
            registry_file,
            scan_file,
            hours,
            workers,
            retries,
            retry_delay_secs,
            timeout_secs,
            max_failure_days,
        } => {
            commands::refresh::run(commands::refresh::RefreshArgs {
                gist_id,
                token,
                registry_file,
                scan_file,
                hours,
                workers,
                retries,
                retry_delay_secs,
                timeout_secs,
                max_failure_days,
            })
            .await
        }
        Commands::Merge {
            gist_id,
            token,
            filename,
            hours,
            output,
            input,
        } => {
            commands::merge::run(commands::merge::MergeArgs {
                gist_id,
                token,
                filename,
                hours,
                output,
                input,
            })
            .await
        }
    }
}
