use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    config_server::ConfigServer,
    dispatch::dispatch_notification,
    handlers::HandlerRegistry,
    models::response::HealthResponse,
};

pub struct AppState {
    pub config_server: Arc<dyn ConfigServer>,
    pub registry: HandlerRegistry,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/{config_id}", post(handle_push))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(config: &Config, state: Arc<AppState>) -> Result<(), Error> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Notification forwarding server started");

    axum::serve(listener, app).await?;

    Ok(())
}

// Always replies 200 so the transport acknowledges the message instead of
// redelivering it forever; the real outcome rides in the body.
async fn handle_push(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let result = dispatch_notification(
        state.config_server.as_ref(),
        &state.registry,
        &config_id,
        &body,
    )
    .await;

    (StatusCode::OK, result.ack_body())
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "healthy",
        services: state.registry.service_names(),
    };

    (StatusCode::OK, Json(health))
}
