use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: DatabaseHealth,
    event_bus: String,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Reports database reachability and the NATS connection state. Degraded
/// dependencies yield 503 so orchestrators stop routing traffic here.
pub async fn health_handler(
    State(state): State<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => DatabaseHealth {
            status: "healthy".to_string(),
            error: None,
        },
        Err(e) => DatabaseHealth {
            status: "unhealthy".to_string(),
            error: Some(e.to_string()),
        },
    };

    let event_bus = match state.nats.connection_state() {
        async_nats::connection::State::Connected => "connected".to_string(),
        other => format!("{:?}", other).to_lowercase(),
    };

    let healthy = database.status == "healthy" && event_bus == "connected";
    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        database,
        event_bus,
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}
