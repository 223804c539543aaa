use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use roster_api::config::{AppConfig, DEV_JWT_SECRET};
use roster_api::routes;
use roster_api::state::AppState;
use roster_api::store::memory::MemoryStore;
use roster_api::store::postgres::PgStore;
use roster_api::store::UserStore;

/// User records API server.
#[derive(Debug, Parser)]
#[command(name = "roster-api", version)]
struct Args {
    /// Bind address, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "roster_api=debug,tower_http=info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.security.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set, tokens are signed with the development secret");
    }

    let store: Arc<dyn UserStore> = match config.store.database_url.clone() {
        Some(url) => {
            let store = PgStore::connect(&config.store, &url)
                .await
                .context("connect to postgres")?;
            tracing::info!("using the postgres store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid bind address")?;

    let app = routes::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
