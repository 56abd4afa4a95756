//! Server-sent progress notifications

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures_util::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::services::ProgressEvent;
use crate::state::AppState;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

pub async fn stream_events(State(state): State<AppState>) -> impl IntoResponse {
    let receiver = state.progress().subscribe();
    let events = BroadcastStream::new(receiver).filter_map(|msg| async move {
        match msg {
            Ok(event) => Some(Ok::<Event, Infallible>(to_sse(&event))),
            Err(err) => {
                tracing::warn!(error = %err, "event subscriber lagged");
                None
            }
        }
    });

    Sse::new(with_ready_event(events)).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

fn with_ready_event<S>(events: S) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: Stream<Item = Result<Event, Infallible>>,
{
    let ready = Event::default().event("ready").data("{}");
    stream::once(async move { Ok::<Event, Infallible>(ready) }).chain(events)
}

fn to_sse(event: &ProgressEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.name()).data(data)
}
