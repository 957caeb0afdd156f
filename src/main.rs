use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use stage_identity_rust::{
    extract_urls, format_message, is_site_url, Config, MetadataRecord, StageIdentityEngine,
};

#[derive(Parser)]
#[command(name = "stage-identity")]
#[command(version)]
#[command(about = "Metadata extraction for STAGE movie and show pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the standard search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata for one or more content URLs
    Extract {
        /// Content page URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Print records as JSON instead of formatted messages
        #[arg(long)]
        json: bool,
    },
    /// Read URLs from stdin until "quit"
    Interactive,
    /// Print the effective configuration
    Config {
        /// Save the effective configuration to this path
        #[arg(long)]
        write: Option<PathBuf>,
    },
    /// Serve the HTTP API
    #[cfg(feature = "api")]
    Serve {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before config loading so its messages are kept
    let (filter, filter_handle) = reload::Layer::new(log_filter("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    // Apply the configured level
    filter_handle.reload(log_filter(&config.output.log_level))?;

    config.validate()?;

    match cli.command {
        Commands::Extract { urls, json } => run_extract(&config, urls, json).await?,
        Commands::Interactive => run_interactive(&config).await?,
        Commands::Config { write } => {
            println!("{}", config.summary());
            if let Some(path) = write {
                config.save(&path)?;
            }
        }
        #[cfg(feature = "api")]
        Commands::Serve { port } => {
            let server = stage_identity_rust::api::ApiServer::new(std::sync::Arc::new(config), port);
            server.start().await?;
        }
    }

    Ok(())
}

/// `RUST_LOG` when set, else the crate at `level` and everything else at warn
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stage_identity_rust={},warn", level)))
}

async fn run_extract(config: &Config, urls: Vec<String>, json: bool) -> Result<()> {
    let engine = StageIdentityEngine::new(config);
    let workers = config.performance.max_concurrent_requests.max(1);

    info!("🚀 Extracting {} URL(s) with {} workers", urls.len(), workers);

    let records: Vec<MetadataRecord> = stream::iter(urls.iter())
        .map(|url| engine.get_identity(url))
        .buffered(workers)
        .collect()
        .await;

    let failed = records.iter().filter(|r| !r.success).count();
    for record in &records {
        print_record(config, record, json)?;
    }

    if failed > 0 {
        warn!("⚠️ {} of {} extractions failed", failed, records.len());
    } else {
        info!("🎉 All {} extractions succeeded", records.len());
    }

    Ok(())
}

async fn run_interactive(config: &Config) -> Result<()> {
    let engine = StageIdentityEngine::new(config);
    let domain = &config.fetch.site_domain;

    println!("Paste a {} movie or show link (\"quit\" to exit):", domain);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let urls: Vec<String> = extract_urls(line)
            .into_iter()
            .filter(|url| is_site_url(url, domain))
            .collect();
        if urls.is_empty() {
            println!("❌ No {} content link found", domain);
            continue;
        }

        for url in urls {
            let record = engine.get_identity(&url).await;
            print_record(config, &record, false)?;
        }
    }

    Ok(())
}

fn print_record(config: &Config, record: &MetadataRecord, json: bool) -> Result<()> {
    if !json {
        println!("{}\n", format_message(record));
        return Ok(());
    }

    let rendered = if config.output.pretty_json {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    }
    .map_err(|e| anyhow!("Cannot serialize record for {}: {}", record.url, e))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_uses_configured_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = log_filter("debug").to_string();
        assert!(filter.contains("stage_identity_rust=debug"));
        assert!(filter.contains("warn"));
    }

    #[test]
    fn test_startup_filter_is_reloadable() {
        let (layer, handle) =
            reload::Layer::<_, tracing_subscriber::Registry>::new(log_filter("info"));
        let subscriber = tracing_subscriber::registry().with(layer);
        let current = tracing::subscriber::with_default(subscriber, || {
            warn!("logged before config is read");
            handle.reload(log_filter("trace")).unwrap();
            handle.with_current(|filter| filter.to_string()).unwrap()
        });
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(current.contains("stage_identity_rust=trace"));
        }
    }
}
