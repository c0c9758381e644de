use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spotirec_api::{
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, Cache, CorpusStore, InMemoryCorpusStore,
        PgCorpusStore,
    },
    routes::{create_router, AppState},
    services::providers::SpotifyConnector,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotirec_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let corpus: Arc<dyn CorpusStore> = match &config.corpus_path {
        Some(path) => Arc::new(InMemoryCorpusStore::from_json_file(path).await?),
        None => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            Arc::new(PgCorpusStore::new(pool))
        }
    };

    let songs = corpus.count().await?;
    tracing::info!(store = corpus.name(), songs, "Song corpus ready");

    let mut connector = SpotifyConnector::new(config.spotify_api_url.clone());
    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, writer) = Cache::new(create_redis_client(redis_url)?);
        connector = connector.with_cache(cache, config.history_cache_ttl);
        cache_writer = Some(writer);
        tracing::info!(ttl = config.history_cache_ttl, "Listening history cache enabled");
    }

    let state = AppState::new(Arc::new(connector), corpus);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
