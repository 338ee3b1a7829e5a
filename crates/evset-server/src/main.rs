use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use evset_server::app;
use evset_server::config::{self, ServerConfig};
use evset_server::repository::SettingsRepository;
use evset_server::state::AppState;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  evset-server [config.toml]    Start the server (default: config/server.toml)");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("evset=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        other => run_server(other.unwrap_or("config/server.toml")).await,
    }
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        seed_file = config.seed_file.as_deref().unwrap_or("-"),
        fields = config.fields.len(),
        "evset-server starting"
    );

    let repository = match &config.seed_file {
        Some(path) => {
            let groups = config::load_seed(path)?;
            let repo = SettingsRepository::from_groups(groups);
            tracing::info!(path = %path, conditions = repo.len(), "Seed loaded");
            repo
        }
        None => SettingsRepository::new(),
    };

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = AppState::new(config, repository)?;
    let app = app::build_http_app(state);

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(addr = %http_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    Ok(())
}
