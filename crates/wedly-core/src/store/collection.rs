// ── Reactive guest collection ──
//
// Insertion-ordered guest list with push-based change notification via
// `watch` channels. The snapshot held by the channel *is* the storage:
// every mutation runs inside `send_modify`, so readers always see a
// complete list and subscribers are woken once per change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Guest, GuestId, GuestStats};
use crate::requests::GuestFilter;

pub type GuestSnapshot = Arc<Vec<Arc<Guest>>>;

/// Observable, insertion-ordered collection of guests.
///
/// Lookups are linear scans; a wedding guest list is small enough that
/// an index would only add bookkeeping.
pub struct GuestCollection {
    /// Full snapshot, replaced on every mutation.
    snapshot: watch::Sender<GuestSnapshot>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl Default for GuestCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl GuestCollection {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);
        Self { snapshot, version }
    }

    /// Insert or replace a guest. New guests go to the end; existing ones
    /// keep their position. Returns `true` if the id was new.
    pub fn upsert(&self, guest: Guest) -> bool {
        let mut is_new = false;
        self.snapshot.send_modify(|snap| {
            let mut list: Vec<Arc<Guest>> = snap.as_ref().clone();
            match list.iter().position(|g| g.id == guest.id) {
                Some(idx) => list[idx] = Arc::new(guest),
                None => {
                    list.push(Arc::new(guest));
                    is_new = true;
                }
            }
            *snap = Arc::new(list);
        });
        self.bump_version();
        is_new
    }

    /// Remove a guest by id. Returns the removed guest if it existed.
    pub fn remove(&self, id: &GuestId) -> Option<Arc<Guest>> {
        let mut removed = None;
        self.snapshot.send_if_modified(|snap| {
            let Some(idx) = snap.iter().position(|g| g.id == *id) else {
                return false;
            };
            let mut list: Vec<Arc<Guest>> = snap.as_ref().clone();
            removed = Some(list.remove(idx));
            *snap = Arc::new(list);
            true
        });
        if removed.is_some() {
            self.bump_version();
        }
        removed
    }

    /// Replace the whole list, keeping the incoming order.
    pub fn replace_all(&self, guests: Vec<Guest>) {
        let list: Vec<Arc<Guest>> = guests.into_iter().map(Arc::new).collect();
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(list));
        self.bump_version();
    }

    /// Look up a guest by id.
    pub fn get(&self, id: &GuestId) -> Option<Arc<Guest>> {
        self.snapshot.borrow().iter().find(|g| g.id == *id).cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> GuestSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<GuestSnapshot> {
        self.snapshot.subscribe()
    }

    /// Guests matching `filter`, in list order.
    pub fn filter(&self, filter: &GuestFilter) -> Vec<Guest> {
        let snap = self.snapshot();
        snap.iter()
            .filter(|g| filter.matches(g))
            .map(|g| Guest::clone(g))
            .collect()
    }

    /// Attendance counters over the current list.
    pub fn stats(&self) -> GuestStats {
        GuestStats::from_guests(self.snapshot().iter().map(AsRef::as_ref))
    }

    /// Number of mutations applied so far.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
