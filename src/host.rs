use std::io;

use crossterm::event::{Event, EventStream};
use futures::{Stream, StreamExt};

use crate::{error::Result, window::Window};

/// Terminal events as an async stream.
pub fn terminal_events() -> EventStream {
    EventStream::new()
}

/// Dispatches every event from `events` to `window` in arrival order.
///
/// Returns once the stream ends, or with [`Error::Io`](crate::Error::Io) for the
/// first read error.
pub async fn forward_events<S>(window: &Window, mut events: S) -> Result<()>
where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    while let Some(event) = events.next().await {
        window.dispatch(&event?);
    }
    tracing::debug!("event stream ended");
    Ok(())
}
