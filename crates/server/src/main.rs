use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use scorecard_server::config::ScorecardConfig;
use scorecard_server::{api, factory, telemetry};

/// Scorecard evidence HTTP server.
#[derive(Parser, Debug)]
#[command(name = "scorecard-server", about = "HTTP server for scorecard evidence uploads")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "scorecard.toml")]
    config: PathBuf,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ScorecardConfig::load(&cli.config)?;

    let telemetry_guard = telemetry::init(&config.telemetry);
    if cli.config.exists() {
        info!(path = %cli.config.display(), "configuration loaded");
    } else {
        info!(path = %cli.config.display(), "configuration file not found, using defaults");
    }

    let state = factory::build_app_state(&config)?;
    let app = api::router(state);

    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "scorecard-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    telemetry_guard.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
