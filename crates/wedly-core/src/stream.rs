// ── Reactive guest streams ──
//
// Subscription type for consuming guest-list changes from the book.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::GuestStats;
use crate::store::GuestSnapshot;

/// A subscription to the guest list.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct GuestStream {
    current: GuestSnapshot,
    receiver: watch::Receiver<GuestSnapshot>,
}

impl GuestStream {
    pub(crate) fn new(receiver: watch::Receiver<GuestSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &GuestSnapshot {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> GuestSnapshot {
        self.receiver.borrow().clone()
    }

    /// Stats over the current snapshot.
    pub fn stats(&self) -> GuestStats {
        GuestStats::from_guests(self.current.iter().map(AsRef::as_ref))
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the book has been dropped.
    pub async fn changed(&mut self) -> Option<GuestSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> GuestWatchStream {
        GuestWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then a new one each time the
/// guest list is mutated.
pub struct GuestWatchStream {
    inner: WatchStream<GuestSnapshot>,
}

impl Stream for GuestWatchStream {
    type Item = GuestSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Guest, GuestId};
    use crate::store::GuestCollection;
    use chrono::Utc;
    use futures_util::StreamExt;

    fn guest(id: &str, vip: bool) -> Guest {
        Guest {
            id: GuestId::new(id),
            name: format!("Guest {id}"),
            is_vip: vip,
            group: None,
            attendance_count: 1,
            checked_in: false,
            checked_in_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn changed_updates_current() {
        let col = GuestCollection::new();
        let mut stream = GuestStream::new(col.subscribe());
        assert!(stream.current().is_empty());

        col.upsert(guest("1", true));
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.current().len(), 1);
        assert_eq!(stream.stats().vip_total, 1);
    }

    #[tokio::test]
    async fn into_stream_yields_initial_then_updates() {
        let col = GuestCollection::new();
        col.upsert(guest("1", false));
        let mut stream = GuestStream::new(col.subscribe()).into_stream();

        assert_eq!(stream.next().await.unwrap().len(), 1);
        col.upsert(guest("2", false));
        assert_eq!(stream.next().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn changed_returns_none_after_drop() {
        let col = GuestCollection::new();
        let mut stream = GuestStream::new(col.subscribe());
        drop(col);
        assert!(stream.changed().await.is_none());
    }
}
