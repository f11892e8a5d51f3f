// Server-sent event streaming of dashboard snapshots
use crate::domain::dashboard::Dashboard;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::sync::Arc;
use tokio::sync::watch;

pub type SnapshotReceiver = watch::Receiver<Option<Arc<Dashboard>>>;

/// Serialize one snapshot as a `snapshot` event keyed by its tick.
fn snapshot_event(dashboard: &Dashboard) -> Result<Event, axum::Error> {
    Event::default()
        .event("snapshot")
        .id(dashboard.tick.to_string())
        .json_data(dashboard)
}

/// Current snapshot first, then every published one until the publisher goes away.
pub fn snapshot_events(
    mut rx: SnapshotReceiver,
) -> impl Stream<Item = Result<Event, axum::Error>> + Send + 'static {
    async_stream::stream! {
        let current = rx.borrow_and_update().clone();
        if let Some(dashboard) = current {
            yield snapshot_event(&dashboard);
        }

        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            if let Some(dashboard) = next {
                yield snapshot_event(&dashboard);
            }
        }

        tracing::debug!("Snapshot publisher closed, ending event stream");
    }
}

/// Helper to create an SSE response from a snapshot receiver
pub fn stream_from_receiver(
    rx: SnapshotReceiver,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>> + Send + 'static> {
    Sse::new(snapshot_events(rx)).keep_alive(KeepAlive::default())
}
