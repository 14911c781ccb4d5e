use axum::{
    extract::State,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures_util::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::pin::Pin;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;

use crate::AppState;

type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

/// SSE endpoint that streams action-result notifications to the browser.
pub async fn handle_events(State(state): State<AppState>) -> Response {
    let rx = state.notifier.subscribe();

    let stream: SseStream = Box::pin(BroadcastStream::new(rx).filter_map(|item| async move {
        match item {
            Ok(notification) => {
                let data = serde_json::to_string(&notification).unwrap_or_default();
                Some(Ok::<_, Infallible>(
                    Event::default().event("notification").data(data),
                ))
            }
            // A lagged receiver just misses transient feedback.
            Err(_) => None,
        }
    }));

    Sse::new(stream)
        .keep_alive(KeepAlive::default().interval(Duration::from_secs(15)))
        .into_response()
}
