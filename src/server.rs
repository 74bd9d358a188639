use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    handlers::{self, AppState},
    metrics,
    pricing::CostCalculator,
    providers::GeminiClient,
    signals::shutdown_signal,
    static_files,
};

/// Start the token counter server
///
/// This function:
/// 1. Initializes metrics
/// 2. Builds the provider client and pricing table from configuration
/// 3. Creates the Axum application
/// 4. Serves requests until SIGINT/SIGTERM
pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics()?);

    let app_state = build_state(&config)?;
    let app = create_router(app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting token counter on http://{}", addr);
    info!(
        model = %config.provider.model,
        token_counting = ?config.provider.token_counting,
        pricing_models = config.pricing.models.len(),
        pricing_effective = %config.pricing.effective_date,
        "Configuration loaded"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Construct the shared handler state from configuration
pub fn build_state(config: &Config) -> Result<AppState> {
    let http_client = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()?;

    let provider = GeminiClient::new(http_client, &config.provider);
    let calculator = CostCalculator::new(Arc::new(config.pricing.to_table()));

    Ok(AppState {
        provider: Arc::new(provider),
        calculator,
        token_counting: config.provider.token_counting,
    })
}

/// Create the Axum router with all routes and middleware
pub fn create_router(app_state: AppState, metrics_handle: Arc<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/api/prompt", post(handlers::prompt::handle_prompt))
        .route("/api/pricing", get(handlers::pricing::get_pricing))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(app_state);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        .fallback(static_files::serve_static)
        // Prompts are short; 1MB is plenty
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
