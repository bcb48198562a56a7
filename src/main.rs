use todo_search::{
    api::{build_router, AppState},
    config::Config,
    search::SearchService,
    state::create_store,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("todo_search={},tower_http=info", config.observability.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        service = %config.observability.service_name,
        "Starting todo search v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = todo_search::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Initialize storage backend
    tracing::info!("Storage backend: {:?}", config.state.backend);
    let store = create_store(&config.state).await?;

    let search = Arc::new(SearchService::new(store.clone(), config.search.clone()));
    tracing::info!(
        max_per_page = config.search.per_page_limit(),
        highlighting = config.search.enable_highlighting,
        suggestions = config.search.enable_suggestions,
        "Search service initialized"
    );

    let app = build_router(AppState::new(store, search)).layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_secs,
    )));

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Search API: http://{}/v1/todos/search", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
