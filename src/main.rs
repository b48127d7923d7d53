use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use devconnector_api::config::AppConfig;
use devconnector_api::database::{
    manager::DatabaseManager, MemoryStore, PgStore, ProfileStore, UserStore,
};
use devconnector_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "devconnector-api", version, about = "Developer profile API server")]
struct Args {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting devconnector-api in {:?} mode", config.environment);

    let (users, profiles) = open_stores(&config).await?;
    let bind_addr = config.bind_addr();
    let state = AppState::new(config, users, profiles).context("failed to build GitHub client")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

async fn open_stores(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn UserStore>, Arc<dyn ProfileStore>)> {
    match config.database.url.as_deref() {
        Some(url) => {
            let pool = DatabaseManager::connect(url, &config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            let store = Arc::new(PgStore::new(pool));
            let users: Arc<dyn UserStore> = store.clone();
            let profiles: Arc<dyn ProfileStore> = store;
            Ok((users, profiles))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let profiles: Arc<dyn ProfileStore> = store;
            Ok((users, profiles))
        }
    }
}
