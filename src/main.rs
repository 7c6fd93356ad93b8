use aeo_report_api::analysis_client::AnalysisServiceClient;
use aeo_report_api::config::Config;
use aeo_report_api::handlers::{self, AppState};

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The analysis service client and report engine.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aeo_report_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let client = AnalysisServiceClient::new(
        config.analysis_api_base_url.clone(),
        Duration::from_secs(config.analysis_api_timeout_secs),
    )?;
    tracing::info!(
        "✓ Analysis client initialized: {} (timeout {}s)",
        client.base_url(),
        config.analysis_api_timeout_secs
    );

    let app_state = Arc::new(AppState::new(config.clone(), client));

    // Per-IP rate limiter
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| {
                anyhow::anyhow!("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be non-zero")
            })?,
    );
    tracing::info!(
        "Rate limiting: {} req/s per IP, burst of {}",
        config.rate_limit_per_second,
        config.rate_limit_burst
    );

    let protected_routes = handlers::api_routes().layer(
        ServiceBuilder::new()
            // Analysis payloads are small; 5MB leaves room for archived runs
            .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
