use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use profile_exporter::{flatten, ExporterConfig, PollOptions, SnapshotClient};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "linkedin2csv",
    about = "Export LinkedIn profiles to CSV via remote extraction snapshots"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Convert one profile URL and write the CSV to disk
    Convert {
        /// Profile URL to export
        url: String,
        /// Output file path
        #[arg(short, long, default_value = "profile.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = ExporterConfig::load()?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            profile_exporter::start_web_server(config).await
        }
        Command::Convert { url, output } => {
            let client = SnapshotClient::new(&config)?;
            let record = client.export(&url, &PollOptions::default()).await?;
            let csv = flatten(&record).to_csv();
            tokio::fs::write(&output, &csv)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("CSV file generated: {}", output.display());
            Ok(())
        }
    }
}
