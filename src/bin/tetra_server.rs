//! `tetra-server`: run the search aggregator HTTP server.
//!
//! Configuration comes from `--config`, else `~/.config/tetra/config.toml`
//! when present, else built-in defaults. `--host` and `--port` override the
//! file. Logging is controlled with `RUST_LOG`.

use std::path::PathBuf;

use clap::Parser;
use tetra::ServerConfig;

#[derive(Parser)]
#[command(name = "tetra-server")]
#[command(about = "Search Wikipedia, Hacker News, Open Library and GitHub in one request")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overriding the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("tetra=info,tetra_search=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.http.host = host;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }

    tracing::info!("tetra-server starting");

    tetra::serve(config).await.map_err(|e| {
        tracing::error!(error = %e, "tetra-server exited with error");
        anyhow::anyhow!("tetra-server failed: {e}")
    })?;

    tracing::info!("tetra-server shut down cleanly");
    Ok(())
}
