//! Command-line interface for s3-localize
//!
//! # Usage Examples
//!
//! ```bash
//! # Stream an S3 object to stdout
//! s3-localize s3://my-bucket/data/points.csv
//!
//! # Copy it somewhere instead
//! s3-localize s3://my-bucket/data/points.csv --output ./points.csv
//!
//! # Credentials via a profile, with an explicit region
//! s3-localize s3://my-bucket/report.pdf --profile analytics --region eu-west-1
//!
//! # Assume a role with a tuned retry policy
//! s3-localize s3://my-bucket/big.bin \
//!   --role-arn arn:aws:iam::123456789012:role/reader \
//!   --retry-mode adaptive --max-attempts 5
//!
//! # Local paths work too and are simply normalized
//! s3-localize ./data//points.csv --output /tmp/points.csv
//! ```

use anyhow::Context;
use clap::Parser;
use s3_localize::ClientOpts;
use s3_localize_file::LocalFile;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "s3-localize")]
#[command(about = "Materialize an S3 object (or a local path) as a local file")]
#[command(long_about = None)]
struct Cli {
    /// Local path or s3://bucket/key reference
    path: String,

    /// Copy the materialized file here instead of streaming it to stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// AWS client options
    #[command(flatten)]
    client: ClientOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.client.to_config();

    let file = LocalFile::open(&cli.path, &config)
        .await
        .with_context(|| format!("Failed to resolve {}", cli.path))?;

    match cli.output {
        Some(dest) => {
            tokio::fs::copy(file.path(), &dest)
                .await
                .with_context(|| format!("Failed to copy to {}", dest.display()))?;
            tracing::info!(
                from = %file.path().display(),
                to = %dest.display(),
                "copied materialized file"
            );
        }
        None => {
            let mut reader = tokio::fs::File::open(file.path())
                .await
                .with_context(|| format!("Failed to open {}", file.path().display()))?;
            tokio::io::copy(&mut reader, &mut tokio::io::stdout())
                .await
                .context("Failed to stream file to stdout")?;
        }
    }

    Ok(())
}
