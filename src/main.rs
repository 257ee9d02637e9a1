//! Fear & Greed index caching proxy
//!
//! A small HTTP service that shields the downstream index API behind a
//! daily-refreshed cache: frontends poll `/api/data` for a rolling 30-day
//! series while the secret vendor credential and rate limits stay
//! server-side.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fngproxy::cache::{FileStore, RecordStore, RedisStore};
use fngproxy::cli::Cli;
use fngproxy::config::ProxyConfig;
use fngproxy::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = ProxyConfig::from_env();
    if cli.redis_url.is_some() {
        config.redis_url = cli.redis_url.clone();
    }

    if config.api_key.is_none() {
        warn!("FNG_API_KEY is not set; data requests will fail until it is configured");
    }

    let store: Arc<dyn RecordStore> = match &config.redis_url {
        Some(url) => {
            info!("using redis store at {url}");
            Arc::new(RedisStore::connect(url).await?)
        }
        None => {
            let store = match &cli.cache_dir {
                Some(dir) => FileStore::with_dir(dir.clone()),
                None => FileStore::new().ok_or("could not determine a cache directory")?,
            };
            info!("using file store");
            Arc::new(store)
        }
    };

    server::serve(AppState::new(config, store), cli.listen_addr()).await
}
