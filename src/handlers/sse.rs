//! `GET /events`: SSE stream of change events, optionally filtered to one
//! application. Exempt from rate limiting; heartbeats every 30s are
//! delivered by the broker like any other event, so this handler only
//! forwards whatever the subscription yields, framed with
//! `format_sse_event`.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::stream;
use serde::Deserialize;

use hodei_broker::format_sse_event;
use hodei_cluster::ClusterRegistry;
use kernel::ChangeKind;

use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub app_id: Option<String>,
}

/// Decrements the registry's live SSE subscriber count when the stream
/// driving this connection is dropped, however the connection ends.
struct SubscriberGuard(Arc<ClusterRegistry>);

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.0.decrement_sse_subscribers();
    }
}

pub async fn events(State(state): State<AppState>, Query(query): Query<EventsQuery>) -> Response {
    let subscription = state.broker.subscribe().await;
    state.cluster_registry.increment_sse_subscribers();
    let guard = SubscriberGuard(state.cluster_registry.clone());

    let app_filter = query.app_id;
    let byte_stream = stream::unfold((subscription, guard), move |(mut subscription, guard)| {
        let app_filter = app_filter.clone();
        async move {
            loop {
                let event = subscription.recv().await?;
                let matches = match (&app_filter, &event.application_id) {
                    (Some(wanted), Some(actual)) => wanted == actual,
                    (Some(_), None) => matches!(event.kind, ChangeKind::Heartbeat | ChangeKind::Connected),
                    (None, _) => true,
                };
                if matches {
                    let frame = format_sse_event(&event);
                    return Some((Ok::<Bytes, std::io::Error>(Bytes::from(frame)), (subscription, guard)));
                }
            }
        }
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("X-Accel-Buffering", "no")
        .body(Body::from_stream(byte_stream))
        .unwrap()
        .into_response()
}
