//! Notification read API.
//!
//! The pull-side complement to the real-time push: companies list their
//! notifications most-recent-first and mark them read. Writes beyond "mark
//! read" are owned by the pipeline, not this surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use uuid::Uuid;

use crate::domains::matching::models::Notification;
use crate::server::app::AxumAppState;

/// GET /api/companies/:company_id/notifications
pub async fn list_handler(
    State(state): State<AxumAppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, StatusCode> {
    state
        .deps
        .notification_store
        .list_for_company(company_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(company_id = %company_id, error = %e, "failed to list notifications");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// POST /api/notifications/:id/read
pub async fn mark_read_handler(
    State(state): State<AxumAppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    match state.deps.notification_store.mark_read(id).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(notification_id = %id, error = %e, "failed to mark notification read");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
