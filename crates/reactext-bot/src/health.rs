//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok` once the context-menu command is registered, `starting` before
    pub status: String,
    pub bot_username: Option<String>,
    pub command_registered: bool,
    pub uptime_secs: u64,
}

/// Shared state behind the health endpoint
#[derive(Clone)]
pub struct HealthState {
    pub start_time: SystemTime,
    pub bot_username: Arc<RwLock<Option<String>>>,
    pub command_registered: Arc<RwLock<bool>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            start_time: SystemTime::now(),
            bot_username: Arc::new(RwLock::new(None)),
            command_registered: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn set_bot_username(&self, username: String) {
        *self.bot_username.write().await = Some(username);
    }

    pub async fn mark_command_registered(&self) {
        *self.command_registered.write().await = true;
    }

    pub async fn status(&self) -> HealthStatus {
        let command_registered = *self.command_registered.read().await;
        HealthStatus {
            status: if command_registered { "ok" } else { "starting" }.to_string(),
            bot_username: self.bot_username.read().await.clone(),
            command_registered,
            uptime_secs: self.start_time.elapsed().unwrap_or_default().as_secs(),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapKey for HealthState {
    type Value = HealthState;
}

async fn health_handler(State(state): State<HealthState>) -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(state.status().await))
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create the health check router
pub fn create_health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start the health check server
pub async fn start_health_server(state: HealthState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
