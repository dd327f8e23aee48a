//! steamgate
//!
//! Steam Web API tools for Model Context Protocol clients, over stdio.

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use steamgate_core::{DEFAULT_API_BASE_URL, DEFAULT_STORE_BASE_URL, GatewayConfig};
use steamgate_server::{McpHandler, serve};
use steamgate_tool::{Dispatcher, HttpUpstream, catalog};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable
    Pretty,
    /// One JSON object per event
    Json,
}

#[derive(Parser)]
#[command(name = "steamgate")]
#[command(version, about = "Steam Web API tools over the Model Context Protocol (stdio)", long_about = None)]
struct Args {
    /// Steam Web API key
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Web API base URL
    #[arg(long, env = "STEAM_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Storefront base URL
    #[arg(long, env = "STEAM_STORE_BASE_URL", default_value = DEFAULT_STORE_BASE_URL)]
    store_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "STEAMGATE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "STEAMGATE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Print the tool catalog as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("steamgate=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);

    let registry = Arc::new(catalog::registry().context("building tool catalog")?);

    if args.list_tools {
        let listing = serde_json::json!({"tools": registry.schemas()});
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let config = GatewayConfig::from_optional_key(args.api_key)
        .context("a Steam Web API key is required: pass --api-key or set STEAM_API_KEY")?
        .with_api_base_url(args.api_base_url)?
        .with_store_base_url(args.store_base_url)?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let config = Arc::new(config);

    let upstream = HttpUpstream::new(Arc::clone(&config)).context("initializing HTTP client")?;
    let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::new(upstream));
    let handler = Arc::new(McpHandler::new(dispatcher));

    tracing::info!(
        tools = registry.len(),
        api_base_url = config.api_base_url(),
        store_base_url = config.store_base_url(),
        timeout_secs = args.timeout_secs,
        "steamgate serving on stdio"
    );

    serve(handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    tracing::info!("input closed, shutting down");
    Ok(())
}
