//! Chunk local documents and upsert them into the search index

use clap::Parser;
use omni_agent::config::IndexConfig;
use omni_agent::ingest;
use omni_agent::search::IndexClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "omni-ingest",
    version,
    about = "Chunk and upsert documents into the search index"
)]
struct Cli {
    /// Target index (defaults to ELASTICSEARCH_INDEX)
    #[arg(long)]
    index: Option<String>,

    /// Directory holding source documents
    #[arg(long, default_value = "docs")]
    docs: PathBuf,

    /// Process documents without writing to the index
    #[arg(long)]
    dry_run: bool,

    /// Corpus tag stored with every chunk, e.g. HR or wiki
    #[arg(long)]
    intent: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omni_agent=info,omni_ingest=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let cli = Cli::parse();

    let mut config = IndexConfig::from_env();
    if let Some(index) = cli.index {
        config.index = index;
    }
    let client = IndexClient::new(&config)?;

    let base = std::env::current_dir()?;
    let docs = if cli.docs.is_absolute() {
        cli.docs
    } else {
        base.join(&cli.docs)
    };

    tracing::info!(
        index = %config.index,
        docs = %docs.display(),
        dry_run = cli.dry_run,
        "Starting ingestion"
    );
    let report = ingest::upsert(&client, &docs, &base, cli.intent.as_deref(), cli.dry_run).await?;

    println!(
        "{} documents, {} chunks, {} uploaded",
        report.documents, report.chunks, report.uploaded
    );
    Ok(())
}
