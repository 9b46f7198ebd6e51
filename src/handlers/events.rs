use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use serde::Deserialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};
use tokio_stream::StreamExt;

use crate::state::AppState;

// GET /api/events?session=
#[derive(Deserialize)]
pub struct EventsQuery {
    /// Limit session-scoped messages to this session. App-wide messages are
    /// always delivered.
    pub session: Option<String>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifier.subscribe();
    let wanted = query.session;

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(n) => {
            let for_us = match (&n.session_id, &wanted) {
                (Some(from), Some(want)) => from == want,
                _ => true,
            };
            if !for_us {
                return None;
            }
            let data = serde_json::to_string(&n).unwrap_or_default();
            Some(Ok(Event::default().data(data).event("notification")))
        }
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::debug!(skipped, "notification subscriber lagged");
            None
        }
    });

    let keepalive_stream = IntervalStream::new(tokio::time::interval(Duration::from_secs(30)))
        .map(|_| Ok(Event::default().comment("keepalive")));

    Sse::new(StreamExt::merge(live_stream, keepalive_stream))
}
