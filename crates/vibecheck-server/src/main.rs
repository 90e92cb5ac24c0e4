mod api;
mod middleware;
mod quota;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vibecheck_analysis::AnalysisBackend;
use vibecheck_scraper::{ProfileResolver, ScraperConfig};

use crate::api::{build_app, AppState};
use crate::quota::QuotaGate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(vibecheck_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let resolver = ProfileResolver::new(ScraperConfig::from_app_config(&config))?;
    let backend = AnalysisBackend::from_app_config(&config)?;
    tracing::info!(
        env = %config.env,
        backend = backend.name(),
        "starting vibecheck server"
    );

    let state = AppState {
        resolver: Arc::new(resolver),
        backend: Arc::new(backend),
        quota: QuotaGate::new(config.daily_free_limit),
        max_posts: config.scraper_max_posts,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
