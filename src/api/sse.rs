//! Server-Sent Events support

use crate::runtime::StreamEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;

/// Convert a run's event stream to an SSE response
pub fn sse_stream(
    events: impl Stream<Item = StreamEvent> + Send + 'static,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = events.map(|event| Ok(to_axum_event(&event)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

pub fn to_axum_event(event: &StreamEvent) -> Event {
    Event::default()
        .event(event.event_type())
        .data(event.payload().to_string())
}
