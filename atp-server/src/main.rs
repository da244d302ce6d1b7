//! atp-server - Attendance Timetable Planner workflow coordinator
//!
//! Serves the calculator UI: parses recognized timetable text and plans
//! per-subject attendance. Stateless between requests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atp_common::config::{resolve_config, ConfigSource, CONFIG_ENV_VAR};
use atp_server::{build_router, AppState};

/// Command-line arguments for atp-server
#[derive(Parser, Debug)]
#[command(name = "atp-server")]
#[command(about = "Attendance timetable planner HTTP service")]
#[command(version)]
struct Args {
    /// Address to bind (overrides config file)
    #[arg(long, env = "ATP_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "ATP_PORT")]
    port: Option<u16>,

    /// Path to TOML config file (falls back to $ATP_CONFIG, then the per-user file)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) = resolve_config(args.config.as_deref(), CONFIG_ENV_VAR)
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let level = config.logging.level.to_lowercase();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("atp_server={level},atp_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting ATP server (atp-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &source {
        ConfigSource::CommandLine(path) => info!("Config: {} (command line)", path.display()),
        ConfigSource::Environment(path) => {
            info!("Config: {} (from {})", path.display(), CONFIG_ENV_VAR)
        }
        ConfigSource::DefaultFile(path) => info!("Config: {}", path.display()),
        ConfigSource::CompiledDefaults => warn!("No config file found, using compiled defaults"),
    }

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let state = AppState::new(&config);
    info!(
        "Default target {}%, low-confidence threshold {}%, {} extra stopword(s)",
        state.default_target_percent,
        state.low_confidence_threshold,
        state.parser.extra_stopwords.len()
    );
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("atp-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
