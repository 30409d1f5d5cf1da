//! Pokemon Service - record store over a sharded in-memory cache

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pokemon_service::{
    logging::init_logging,
    seed::load_sample_data,
    server::{serve, shutdown_signal},
    AppState, Config,
};

/// Main entry point for the Pokemon Service.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing (stdout, plus `LOG_FILE` if set)
/// 3. Create the cache and start its expiry janitor
/// 4. Load the sample records
/// 5. Serve HTTP until SIGINT/SIGTERM
/// 6. Stop the janitor within the shutdown grace period
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let _log_guard = init_logging(config.log_file.as_deref())?;

    info!("Starting Pokemon Service");
    info!(
        "Configuration loaded: shards={}, ttl={}s, cleanup_interval={}s, max_size={}MB, max_entry={}B",
        config.shard_count,
        config.ttl_secs,
        config.cleanup_interval_secs,
        config.hard_max_cache_size_mb,
        config.max_entry_size
    );

    let state = AppState::from_config(&config).context("failed to initialize cache")?;
    let cache = state.cache.clone();

    if config.seed_sample_data {
        let loaded = load_sample_data(&cache).context("failed to load sample data")?;
        info!("Loaded {} sample records", loaded);
    }

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    serve(listener, state, shutdown_signal()).await?;

    if tokio::time::timeout(config.shutdown_timeout(), cache.shutdown())
        .await
        .is_err()
    {
        warn!("Janitor did not stop within {:?}", config.shutdown_timeout());
    }

    info!("Server gracefully stopped");
    Ok(())
}
