use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use quote_persistence::{LocalStore, QuoteBackend, RemoteStore};
use quote_server::{
    config::Config, create_routes, game_manager::GameManager, profile_store::ProfileStore,
    quote_store::QuoteStore,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Quotebook server...");

    let config = Config::new();

    // The local store always exists: it holds the profile, and it is the
    // fallback when the remote collection is unreachable.
    let local = match LocalStore::new(&config.data_dir) {
        Ok(local) => local,
        Err(e) => {
            tracing::error!("Failed to open data directory '{}': {}", config.data_dir, e);
            std::process::exit(1);
        }
    };

    let backend: Arc<dyn QuoteBackend> = match &config.remote_url {
        Some(url) => {
            let poll = Duration::from_secs(config.remote_poll_seconds);
            match RemoteStore::connect(url, &config.remote_collection, poll).await {
                Ok(remote) => {
                    info!("Using remote quote collection at {}", url);
                    Arc::new(remote)
                }
                Err(e) => {
                    warn!("Remote quote collection unavailable: {}", e);
                    warn!("Falling back to local storage for this session");
                    Arc::new(local.clone())
                }
            }
        }
        None => {
            info!("Using local quote storage in {}", config.data_dir);
            Arc::new(local.clone())
        }
    };

    let quotes = match QuoteStore::new(backend).await {
        Ok(quotes) => quotes,
        Err(e) => {
            tracing::error!("Failed to load the quote collection: {}", e);
            std::process::exit(1);
        }
    };

    let profiles = Arc::new(ProfileStore::new(local));
    let games = Arc::new(GameManager::new(quotes.clone(), profiles.clone()));

    let routes = create_routes(quotes, profiles, games);

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().unwrap(),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
