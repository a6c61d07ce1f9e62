//! freshfetch - fetch a JSON resource through the in-memory response cache
//!
//! Runs one query (optionally several times, to show cache hits) and prints
//! each result envelope as JSON.

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use freshfetch::Fetcher;
use freshfetch::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let query = cli.query(config.default_ttl)?;
    let fetcher = Fetcher::with_reqwest(config)?;

    tracing::debug!(key = %query.key, external = query.external, "running query");

    let mut failed = false;
    for _ in 0..cli.repeat.max(1) {
        let result = if cli.stream {
            fetcher.stream::<Value>(query.clone()).await
        } else {
            fetcher.fetch::<Value>(query.clone()).await
        };

        failed = result.error;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    if failed {
        std::process::exit(1);
    }

    Ok(())
}
