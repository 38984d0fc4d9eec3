//! excursion-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and
//! the background reminder job.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use excursion_gateway::api;
use excursion_gateway::app_state::AppState;
use excursion_gateway::config::GatewayConfig;
use excursion_gateway::domain::NotificationBus;
use excursion_gateway::jobs;
use excursion_gateway::persistence;
use excursion_gateway::persistence::store::BookingStore;
use excursion_gateway::service::BookingService;
use excursion_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting excursion-gateway");

    // Open the store and ensure the schema exists
    let pool = persistence::connect(&config).await?;
    let store = BookingStore::new(pool);
    store.init_schema().await?;

    // Build domain and service layers
    let notifications = NotificationBus::new(config.notification_bus_capacity);
    let booking_service = Arc::new(BookingService::new(store.clone(), notifications.clone()));

    // Background reminder sweep
    let reminder_job = jobs::reminders::spawn(store, notifications.clone(), &config);

    // Build application state
    let app_state = AppState {
        booking_service,
        notifications,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws/notifications", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    reminder_job.abort();
    Ok(())
}
