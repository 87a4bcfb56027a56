//! itrack-api: REST API server for the itrack issue tracker
//!
//! Serves create/list/update/delete on `/api/issues/{project}` from an
//! in-memory store.

use anyhow::Context;
use clap::Parser;
use itrack_core::{Config, IssueStore};
use std::path::PathBuf;
use std::sync::Arc;

mod payload;
mod routes;

use routes::AppState;

#[derive(Parser)]
#[command(name = "itrack-api")]
#[command(about = "In-memory issue tracker REST API")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "ITRACK_API_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ITRACK_API_PORT")]
    port: Option<u16>,

    /// Print the default config file and exit
    #[arg(long)]
    print_config: bool,
}

fn init_tracing(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", Config::default_with_comments());
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_tracing(&config.log.filter);

    let state = Arc::new(AppState::new(IssueStore::new()));
    let app = routes::router(state, config.cors.enabled);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Starting itrack-api on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
