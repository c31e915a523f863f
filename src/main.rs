//! Quinta OS - Executive Strategic Intelligence Advisory Core
//!
//! HTTP service that aggregates strategic context (active objectives and
//! recent weak signals) and answers free-text advisory queries, delegating
//! to an external generation capability when one is configured and
//! degrading to a deterministic templated summary when it is not.
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults (template-only advisories)
//! cargo run --release
//!
//! # Run against a custom config
//! QUINTA_CONFIG=/etc/quinta/quinta.toml cargo run --release
//!
//! # Seed the strategic store from a JSON snapshot
//! cargo run --release -- seed --from fixtures/strategic.json
//! ```
//!
//! # Environment Variables
//!
//! - `QUINTA_CONFIG`: Path to the TOML config file
//! - `QUINTA_SERVER_ADDR`: Override the HTTP bind address
//! - `QUINTA_CORS_ORIGINS`: Comma-separated allowed CORS origins (dev only)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use quinta_os::advisor::{AdvisoryResponder, ResponderSettings};
use quinta_os::api::{create_app, AdvisorState};
use quinta_os::config::{self, AdvisorConfig};
use quinta_os::llm::LlmFactory;
use quinta_os::storage::{SledStore, StrategicStore};
use quinta_os::types::{Objective, Signal};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "quinta-os")]
#[command(about = "Quinta OS Executive Strategic Intelligence Advisory Core")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to the TOML config file (overrides the QUINTA_CONFIG search)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Seed the strategic store from a JSON snapshot file.
    /// Objectives and signals are owned by external systems in production;
    /// seeding exists for demos and integration environments.
    Seed {
        /// Path to the JSON snapshot ({ "objectives": [...], "signals": [...] })
        #[arg(long = "from")]
        from: String,
    },
}

/// Snapshot file shape for the `seed` subcommand.
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    objectives: Vec<Objective>,
    #[serde(default)]
    signals: Vec<Signal>,
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Load service configuration
    let advisor_config = match &args.config {
        Some(path) => AdvisorConfig::load_from_file(std::path::Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => AdvisorConfig::load(),
    };
    config::init(advisor_config);
    let cfg = config::get();

    // Subcommand dispatch
    if let Some(SubCommand::Seed { from }) = &args.command {
        return run_seed(from, &cfg.store.path);
    }

    let server_addr = args
        .addr
        .or_else(|| std::env::var("QUINTA_SERVER_ADDR").ok())
        .unwrap_or_else(|| cfg.server.addr.clone());

    info!("Quinta OS advisory core starting");
    info!(deployment = %cfg.deployment.name, addr = %server_addr, "Configuration loaded");

    // Open the strategic store
    let store = Arc::new(
        SledStore::open(&cfg.store.path)
            .with_context(|| format!("Failed to open strategic store at {}", cfg.store.path))?,
    );

    // Construct the optional generation backend
    let backend = LlmFactory::create(&cfg.generation)?;

    let settings = ResponderSettings::from_config(cfg);
    let responder = AdvisoryResponder::new(
        Arc::clone(&store) as Arc<dyn StrategicStore>,
        backend,
        settings.clone(),
    );

    let state = AdvisorState::new(
        responder,
        Arc::clone(&store) as Arc<dyn StrategicStore>,
        settings,
        cfg.deployment.name.clone(),
    );
    let app = create_app(state, cfg.server.auth_token.clone());

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind {server_addr}"))?;
    info!(addr = %server_addr, "HTTP server listening");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("HTTP server received shutdown signal");
        })
        .await;

    match result {
        Ok(()) => {
            info!("Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("HTTP server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

// ============================================================================
// Seed Subcommand
// ============================================================================

/// Load a JSON snapshot into the strategic store.
fn run_seed(from: &str, store_path: &str) -> Result<()> {
    let contents = std::fs::read_to_string(from)
        .with_context(|| format!("Failed to read seed file {from}"))?;
    let seed: SeedFile =
        serde_json::from_str(&contents).with_context(|| format!("Malformed seed file {from}"))?;

    let store = SledStore::open(store_path)
        .with_context(|| format!("Failed to open strategic store at {store_path}"))?;

    for objective in &seed.objectives {
        store.put_objective(objective)?;
    }
    for signal in &seed.signals {
        store.put_signal(signal)?;
    }
    store.flush()?;

    info!(
        objectives = seed.objectives.len(),
        signals = seed.signals.len(),
        store = %store_path,
        "Strategic store seeded"
    );

    Ok(())
}
