//! SSE streaming endpoints.
//!
//! GET /api/streams/companies/:company_id - a company's real-time channel
//! GET /api/streams/broadcast            - best-effort all-clients channel
//!
//! Subscribes to StreamHub topics and forwards JSON values as SSE events.
//! The broadcast feed is secondary and non-authoritative; the persisted
//! notification is always the source of truth.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::kernel::stream_hub::{company_topic, StreamHub, BROADCAST_TOPIC};
use crate::server::app::AxumAppState;

/// SSE feed of one company's notifications.
pub async fn company_stream_handler(
    State(state): State<AxumAppState>,
    Path(company_id): Path<Uuid>,
) -> impl IntoResponse {
    stream_for_topic(&state.deps.stream_hub, &company_topic(company_id)).await
}

/// SSE feed of every notification (secondary delivery path).
pub async fn broadcast_stream_handler(State(state): State<AxumAppState>) -> impl IntoResponse {
    stream_for_topic(&state.deps.stream_hub, BROADCAST_TOPIC).await
}

async fn stream_for_topic(
    hub: &StreamHub,
    topic: &str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = hub.subscribe(topic).await;

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message");
                Event::default()
                    .event(event_name)
                    .json_data(&value)
                    .ok()
                    .map(Ok)
            }
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                // A slow client missed n messages; tell it to resync via the
                // read API rather than silently continuing.
                Event::default()
                    .event("lagged")
                    .json_data(&serde_json::json!({ "missed": n }))
                    .ok()
                    .map(Ok)
            }
        }
    });

    Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}
