use common::http_client::HttpClient;
use common::tracing::init_tracing_for;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use weather_service::api_client::OpenWeatherClient;
use weather_service::config::Config;
use weather_service::handlers::AppState;
use weather_service::service::WeatherService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_tracing_for(&config.log_format);

    if config.openweather_api_key.is_empty() {
        warn!("OPENWEATHER_API_KEY is not set; provider requests will be rejected");
    }

    let cancellation_token = CancellationToken::new();

    let http_client = HttpClient::new(config.request_timeout())?;
    let client = OpenWeatherClient::new(
        http_client,
        config.openweather_url.clone(),
        config.openweather_api_key.clone(),
    );
    let service = Arc::new(WeatherService::new(client, config.cache_ttl()));
    let sweeper = service.start_sweeper(config.sweep_interval(), cancellation_token.clone());

    let app = weather_service::router(AppState {
        service: service.clone(),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        ttl_secs = config.cache_ttl_seconds,
        sweep_secs = config.sweep_interval_seconds,
        "Weather service starting on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancellation_token))
        .await?;

    sweeper.shutdown().await;
    info!("Weather service stopped");
    Ok(())
}

async fn shutdown_signal(cancellation_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    // Stops the expiry sweeper
    cancellation_token.cancel();
    warn!("Shutting down gracefully...");
}
