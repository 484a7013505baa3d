// ── Guest book facade ──
//
// The single entry point for consumers. Owns the reactive guest
// collection and routes every operation to the configured backend,
// keeping the collection in step with what the backend reports.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use secrecy::SecretString;
use tracing::{debug, info};
use url::Url;
use wedly_api::models::{ApiUser, GuestBody, GuestQuery, WishBody};

use crate::backend::{Backend, BackendKind};
use crate::config::BookConfig;
use crate::error::CoreError;
use crate::model::wedding::validate_wedding_config;
use crate::model::{
    CheckInOutcome, Guest, GuestId, GuestStats, Invitation, ScanRecord, WeddingConfig, Wish,
};
use crate::qr;
use crate::requests::{GuestFilter, GuestUpdate, NewGuest, NewWish, validate_party_size};
use crate::store::{GuestCollection, GuestSnapshot, LocalStore, MemoryKv};
use crate::stream::GuestStream;

/// Guest list, check-in, and wedding details behind one handle.
///
/// Cheaply cloneable via `Arc<BookInner>`. The in-memory collection is
/// the client's view of the list; every successful mutation updates it
/// and wakes subscribers.
#[derive(Clone)]
pub struct GuestBook {
    inner: Arc<BookInner>,
}

struct BookInner {
    config: BookConfig,
    backend: Backend,
    guests: GuestCollection,
    /// Check-ins made through a remote backend during this session.
    session_history: Mutex<Vec<ScanRecord>>,
}

impl GuestBook {
    /// Build a book for the configured backend.
    ///
    /// A local store is read immediately; a remote list is fetched on
    /// the first `list()`, `refresh()`, or cache miss.
    pub fn new(config: BookConfig) -> Result<Self, CoreError> {
        let backend = Backend::from_config(&config.backend)?;
        let book = Self::with_backend(config, backend);
        if let Backend::Local(store) = &book.inner.backend {
            book.inner.guests.replace_all(store.load_guests()?);
        }
        debug!(backend = %book.backend_kind(), "guest book opened");
        Ok(book)
    }

    /// A throwaway book backed by process memory.
    pub fn in_memory() -> Self {
        let store = LocalStore::new(Arc::new(MemoryKv::new()));
        Self::with_backend(BookConfig::memory(), Backend::Local(store))
    }

    fn with_backend(config: BookConfig, backend: Backend) -> Self {
        Self {
            inner: Arc::new(BookInner {
                config,
                backend,
                guests: GuestCollection::new(),
                session_history: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &BookConfig {
        &self.inner.config
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.inner.backend.kind()
    }

    /// The reactive collection mirrored from the backend.
    pub fn collection(&self) -> &GuestCollection {
        &self.inner.guests
    }

    pub fn snapshot(&self) -> GuestSnapshot {
        self.inner.guests.snapshot()
    }

    /// Subscribe to guest-list changes.
    pub fn subscribe(&self) -> GuestStream {
        GuestStream::new(self.inner.guests.subscribe())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Reload the whole list from the backend.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let guests = match &self.inner.backend {
            Backend::Remote(api) => api
                .list_guests(&GuestQuery::default())
                .await?
                .into_iter()
                .map(Guest::from)
                .collect(),
            Backend::Local(store) => store.load_guests()?,
        };
        debug!(count = guests.len(), "guest list refreshed");
        self.inner.guests.replace_all(guests);
        Ok(())
    }

    /// Guests matching `filter`, in insertion order.
    ///
    /// An unfiltered remote listing also replaces the cached list.
    pub async fn list(&self, filter: &GuestFilter) -> Result<Vec<Guest>, CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => {
                let guests: Vec<Guest> = api
                    .list_guests(&GuestQuery::from(filter))
                    .await?
                    .into_iter()
                    .map(Guest::from)
                    .collect();
                if filter.is_empty() {
                    self.inner.guests.replace_all(guests.clone());
                }
                Ok(guests.into_iter().filter(|g| filter.matches(g)).collect())
            }
            Backend::Local(_) => {
                self.refresh().await?;
                Ok(self.inner.guests.filter(filter))
            }
        }
    }

    /// Look a guest up by id.
    ///
    /// A miss triggers one refresh before reporting `None`, so guests
    /// added elsewhere since the last listing are still found.
    pub async fn find(&self, id: &GuestId) -> Result<Option<Guest>, CoreError> {
        if let Some(guest) = self.inner.guests.get(id) {
            return Ok(Some(Guest::clone(&guest)));
        }
        debug!(%id, "guest not cached, refreshing");
        self.refresh().await?;
        Ok(self.inner.guests.get(id).map(|g| Guest::clone(&g)))
    }

    /// Like [`find`](Self::find), but a miss is `NotFound`.
    pub async fn get(&self, id: &GuestId) -> Result<Guest, CoreError> {
        self.find(id).await?.ok_or_else(|| CoreError::not_found(id))
    }

    /// Attendance counters over the cached list. Pure, no I/O.
    pub fn stats(&self) -> GuestStats {
        self.inner.guests.stats()
    }

    /// Attendance counters as the backend reports them.
    pub async fn fetch_stats(&self) -> Result<GuestStats, CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => Ok(api.guest_stats().await?.into()),
            Backend::Local(_) => {
                self.refresh().await?;
                Ok(self.stats())
            }
        }
    }

    /// Successful check-ins, oldest first.
    ///
    /// The local store keeps the full history; a remote book only knows
    /// the check-ins made through it since it was opened.
    pub fn scan_history(&self) -> Result<Vec<ScanRecord>, CoreError> {
        match &self.inner.backend {
            Backend::Remote(_) => Ok(self.lock_history().clone()),
            Backend::Local(store) => store.load_history(),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add a guest. The backend assigns the id and creation time.
    pub async fn create(&self, new: NewGuest) -> Result<Guest, CoreError> {
        new.validate()?;

        let guest = match &self.inner.backend {
            Backend::Remote(api) => {
                let created = Guest::from(api.create_guest(&GuestBody::from(&new)).await?);
                self.inner.guests.upsert(created.clone());
                created
            }
            Backend::Local(store) => {
                let guest = Guest {
                    id: GuestId::generate(),
                    name: new.name.trim().to_owned(),
                    is_vip: new.is_vip,
                    group: new.group.filter(|g| !g.trim().is_empty()),
                    attendance_count: new.attendance_count,
                    checked_in: false,
                    checked_in_at: None,
                    created_at: Utc::now(),
                };
                let _guard = store.lock().await;
                let mut guests = store.load_guests()?;
                guests.push(guest.clone());
                self.commit_local(store, guests)?;
                guest
            }
        };

        info!(id = %guest.id, name = %guest.name, vip = guest.is_vip, "guest added");
        Ok(guest)
    }

    /// Apply a partial update to an existing guest.
    pub async fn update(&self, id: &GuestId, update: &GuestUpdate) -> Result<Guest, CoreError> {
        let guest = match &self.inner.backend {
            Backend::Remote(api) => {
                let current = self.get(id).await?;
                let next = update.apply_to(&current)?;
                let saved = Guest::from(
                    api.update_guest(id.as_str(), &GuestBody::from(&next))
                        .await?,
                );
                self.inner.guests.upsert(saved.clone());
                saved
            }
            Backend::Local(store) => {
                let _guard = store.lock().await;
                let mut guests = store.load_guests()?;
                let slot = guests
                    .iter_mut()
                    .find(|g| g.id == *id)
                    .ok_or_else(|| CoreError::not_found(id))?;
                *slot = update.apply_to(slot)?;
                let saved = slot.clone();
                self.commit_local(store, guests)?;
                saved
            }
        };

        debug!(%id, "guest updated");
        Ok(guest)
    }

    /// Remove a guest. A missing id is `NotFound`.
    pub async fn delete(&self, id: &GuestId) -> Result<(), CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => {
                api.delete_guest(id.as_str()).await?;
                self.inner.guests.remove(id);
            }
            Backend::Local(store) => {
                let _guard = store.lock().await;
                let mut guests = store.load_guests()?;
                let before = guests.len();
                guests.retain(|g| g.id != *id);
                if guests.len() == before {
                    return Err(CoreError::not_found(id));
                }
                self.commit_local(store, guests)?;
            }
        }

        info!(%id, "guest removed");
        Ok(())
    }

    /// Mark a guest as arrived.
    ///
    /// A guest who already arrived is reported as
    /// [`CheckInOutcome::AlreadyCheckedIn`] with the record untouched;
    /// no write reaches the backend. `party_size` overrides the stored
    /// attendance count on the first check-in only.
    pub async fn check_in(
        &self,
        id: &GuestId,
        party_size: Option<u32>,
    ) -> Result<CheckInOutcome, CoreError> {
        if let Some(n) = party_size {
            validate_party_size(n)?;
        }

        let outcome = match &self.inner.backend {
            Backend::Remote(api) => {
                let current = self.get(id).await?;
                if current.checked_in {
                    CheckInOutcome::AlreadyCheckedIn(current)
                } else {
                    let envelope = api.check_in_guest(id.as_str(), party_size).await?;
                    let guest = Guest::from(envelope.guest);
                    self.inner.guests.upsert(guest.clone());
                    let scanned_at = guest.checked_in_at.unwrap_or_else(Utc::now);
                    self.lock_history()
                        .push(ScanRecord::for_guest(&guest, scanned_at));
                    CheckInOutcome::Welcomed(guest)
                }
            }
            Backend::Local(store) => {
                let _guard = store.lock().await;
                let mut guests = store.load_guests()?;
                let slot = guests
                    .iter_mut()
                    .find(|g| g.id == *id)
                    .ok_or_else(|| CoreError::not_found(id))?;

                let now = Utc::now();
                if slot.mark_checked_in(now, party_size) {
                    let guest = slot.clone();
                    self.commit_local(store, guests)?;
                    store.append_history(ScanRecord::for_guest(&guest, now))?;
                    CheckInOutcome::Welcomed(guest)
                } else {
                    let guest = slot.clone();
                    self.inner.guests.replace_all(guests);
                    CheckInOutcome::AlreadyCheckedIn(guest)
                }
            }
        };

        match &outcome {
            CheckInOutcome::Welcomed(g) => {
                info!(
                    id = %g.id,
                    name = %g.name,
                    vip = g.is_vip,
                    party = g.attendance_count,
                    "guest checked in"
                );
            }
            CheckInOutcome::AlreadyCheckedIn(g) => {
                info!(id = %g.id, name = %g.name, "guest already checked in");
            }
        }
        Ok(outcome)
    }

    // ── Wedding details ──────────────────────────────────────────────

    pub async fn wedding_config(&self) -> Result<WeddingConfig, CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => Ok(api.wedding_config().await?),
            Backend::Local(store) => store.load_config(),
        }
    }

    /// Validate and save the wedding details, returning what was stored.
    pub async fn update_wedding_config(
        &self,
        config: &WeddingConfig,
    ) -> Result<WeddingConfig, CoreError> {
        validate_wedding_config(config)?;
        let saved = match &self.inner.backend {
            Backend::Remote(api) => api.update_wedding_config(config).await?,
            Backend::Local(store) => {
                let _guard = store.lock().await;
                store.save_config(config)?;
                config.clone()
            }
        };
        info!(bride = %saved.bride, groom = %saved.groom, "wedding details saved");
        Ok(saved)
    }

    /// Everything a guest's personalized invitation page shows.
    pub async fn invitation(&self, id: &GuestId) -> Result<Invitation, CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => Ok(api.invitation(id.as_str()).await?.into()),
            Backend::Local(store) => {
                let guest = self.get(id).await?;
                Ok(Invitation {
                    guest,
                    config: store.load_config()?,
                })
            }
        }
    }

    /// Link to a guest's invitation page, if an invitation site is configured.
    pub fn invitation_link(&self, id: &GuestId) -> Result<Option<Url>, CoreError> {
        let Some(base) = &self.inner.config.invitation_base else {
            return Ok(None);
        };
        qr::invitation_link(base, id)
            .map(Some)
            .map_err(|e| CoreError::Config {
                message: format!("invalid invitation link: {e}"),
            })
    }

    // ── Wishes ───────────────────────────────────────────────────────

    /// Wishes left on the invitation page, oldest first.
    ///
    /// A remote backend without the wishes endpoint has none to show.
    pub async fn wishes(&self) -> Result<Vec<Wish>, CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => match api.list_wishes().await {
                Ok(wishes) => Ok(wishes),
                Err(e) if e.is_not_found() => {
                    debug!("backend has no wishes endpoint");
                    Ok(Vec::new())
                }
                Err(e) => Err(e.into()),
            },
            Backend::Local(store) => store.load_wishes(),
        }
    }

    /// Validate and store a wish, returning it with its id and timestamp.
    pub async fn add_wish(&self, new: &NewWish) -> Result<Wish, CoreError> {
        let new = new.normalized()?;

        let wish = match &self.inner.backend {
            Backend::Remote(api) => {
                let body = WishBody {
                    name: new.name,
                    message: new.message,
                };
                match api.create_wish(&body).await {
                    Ok(wish) => wish,
                    Err(e) if e.is_not_found() => {
                        return Err(CoreError::Unsupported {
                            operation: "guest wishes".into(),
                            backend: BackendKind::Remote.to_string(),
                        });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Backend::Local(store) => {
                let wish = Wish {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: new.name,
                    message: new.message,
                    created_at: Utc::now(),
                };
                let _guard = store.lock().await;
                let mut wishes = store.load_wishes()?;
                wishes.push(wish.clone());
                store.save_wishes(&wishes)?;
                wish
            }
        };

        info!(id = %wish.id, name = %wish.name, "wish added");
        Ok(wish)
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in to the remote backend, returning the issued token.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(SecretString, ApiUser), CoreError> {
        let api = self.remote("login")?;
        let (token, user) = api.login(email, password).await?;
        info!(email = %user.email, "logged in");
        Ok((token, user))
    }

    /// Check that the stored token is still accepted.
    pub async fn verify_session(&self) -> Result<(), CoreError> {
        Ok(self.remote("verify session")?.verify().await?)
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.remote("logout")?.logout();
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn remote(&self, operation: &str) -> Result<&wedly_api::ApiClient, CoreError> {
        match &self.inner.backend {
            Backend::Remote(api) => Ok(api),
            Backend::Local(_) => Err(CoreError::Unsupported {
                operation: operation.into(),
                backend: BackendKind::Local.to_string(),
            }),
        }
    }

    /// Persist a local list and mirror it into the collection.
    fn commit_local(&self, store: &LocalStore, guests: Vec<Guest>) -> Result<(), CoreError> {
        store.save_guests(&guests)?;
        self.inner.guests.replace_all(guests);
        Ok(())
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<ScanRecord>> {
        self.inner
            .session_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn seeded(names: &[(&str, bool)]) -> (GuestBook, Vec<Guest>) {
        let book = GuestBook::in_memory();
        let mut created = Vec::new();
        for (name, vip) in names {
            created.push(book.create(NewGuest::named(*name).vip(*vip)).await.unwrap());
        }
        (book, created)
    }

    #[tokio::test]
    async fn alice_scan_scenario() {
        let (book, guests) = seeded(&[("Alice", true)]).await;
        let alice = &guests[0];

        let payload = qr::decode(&qr::encode(alice)).unwrap();
        assert_eq!(payload.id, alice.id);

        let outcome = book.check_in(&payload.id, None).await.unwrap();
        assert!(outcome.is_welcomed());
        assert!(outcome.guest().checked_in);

        let again = book.check_in(&payload.id, None).await.unwrap();
        assert!(matches!(again, CheckInOutcome::AlreadyCheckedIn(_)));

        let stats = book.stats();
        assert_eq!(stats.checked_in, 1);
        assert_eq!(stats.vip_checked_in, 1);
    }

    #[tokio::test]
    async fn second_check_in_keeps_timestamp_and_party_size() {
        let (book, guests) = seeded(&[("Bob", false)]).await;
        let id = &guests[0].id;

        let first = book.check_in(id, Some(3)).await.unwrap().into_guest();
        let second = book.check_in(id, Some(5)).await.unwrap();

        assert!(!second.is_welcomed());
        assert_eq!(second.guest().checked_in_at, first.checked_in_at);
        assert_eq!(second.guest().attendance_count, 3);
        assert_eq!(book.scan_history().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stats_follow_creates_and_check_ins() {
        let (book, guests) = seeded(&[
            ("A", true),
            ("B", true),
            ("C", true),
            ("D", false),
            ("E", false),
            ("F", false),
            ("G", false),
        ])
        .await;

        // Two of three VIPs plus one regular guest.
        for idx in [0, 2, 5] {
            book.check_in(&guests[idx].id, None).await.unwrap();
        }

        assert_eq!(
            book.stats(),
            GuestStats {
                total: 7,
                checked_in: 3,
                vip_total: 3,
                vip_checked_in: 2,
            }
        );
        assert_eq!(book.fetch_stats().await.unwrap(), book.stats());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (book, _) = seeded(&[("Alice", false)]).await;
        let ghost = GuestId::new("nonexistent-id");

        assert!(matches!(
            book.check_in(&ghost, None).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            book.delete(&ghost).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            book.update(&ghost, &GuestUpdate::default()).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(book.find(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_validates_and_assigns_ids() {
        let book = GuestBook::in_memory();
        assert!(matches!(
            book.create(NewGuest::named("  ")).await,
            Err(CoreError::Validation { .. })
        ));

        let a = book.create(NewGuest::named(" Alice ")).await.unwrap();
        let b = book.create(NewGuest::named("Alice")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Alice");
        assert!(!a.checked_in);
        assert_eq!(a.attendance_count, 1);
    }

    #[tokio::test]
    async fn list_filters_in_insertion_order() {
        let (book, _) = seeded(&[("Malik", false), ("Bob", true), ("alicia", true)]).await;

        let names = |guests: Vec<Guest>| guests.into_iter().map(|g| g.name).collect::<Vec<_>>();
        assert_eq!(
            names(book.list(&GuestFilter::default()).await.unwrap()),
            ["Malik", "Bob", "alicia"]
        );
        assert_eq!(
            names(book.list(&GuestFilter::search("LI")).await.unwrap()),
            ["Malik", "alicia"]
        );
        let vips = GuestFilter {
            search: None,
            vip: Some(true),
        };
        assert_eq!(names(book.list(&vips).await.unwrap()), ["Bob", "alicia"]);
        assert!(book.list(&GuestFilter::search("zzz")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_is_partial_and_validated() {
        let (book, guests) = seeded(&[("Alice", false)]).await;
        let id = &guests[0].id;

        let update = GuestUpdate {
            group: Some("Family".into()),
            attendance_count: Some(4),
            ..GuestUpdate::default()
        };
        let saved = book.update(id, &update).await.unwrap();
        assert_eq!(saved.name, "Alice");
        assert_eq!(saved.group.as_deref(), Some("Family"));
        assert_eq!(saved.attendance_count, 4);

        let bad = GuestUpdate {
            attendance_count: Some(0),
            ..GuestUpdate::default()
        };
        assert!(book.update(id, &bad).await.is_err());
        assert_eq!(book.get(id).await.unwrap().attendance_count, 4);
    }

    #[tokio::test]
    async fn delete_removes_from_collection() {
        let (book, guests) = seeded(&[("Alice", false), ("Bob", false)]).await;
        book.delete(&guests[0].id).await.unwrap();
        assert_eq!(book.snapshot().len(), 1);
        assert_eq!(book.snapshot()[0].name, "Bob");
    }

    #[tokio::test]
    async fn subscribers_see_check_ins() {
        let (book, guests) = seeded(&[("Alice", false)]).await;
        let mut stream = book.subscribe();

        book.check_in(&guests[0].id, None).await.unwrap();
        let snap = stream.changed().await.unwrap();
        assert!(snap[0].checked_in);
    }

    #[tokio::test]
    async fn zero_party_size_is_rejected_before_any_write() {
        let (book, guests) = seeded(&[("Alice", false)]).await;
        assert!(matches!(
            book.check_in(&guests[0].id, Some(0)).await,
            Err(CoreError::Validation { .. })
        ));
        assert!(!book.get(&guests[0].id).await.unwrap().checked_in);
    }

    #[tokio::test]
    async fn wedding_config_defaults_and_validation() {
        let book = GuestBook::in_memory();
        let config = book.wedding_config().await.unwrap();
        assert_eq!(config, WeddingConfig::default());

        let blank = WeddingConfig {
            bride: String::new(),
            ..config.clone()
        };
        assert!(book.update_wedding_config(&blank).await.is_err());

        let renamed = WeddingConfig {
            bride: "Ayu".into(),
            ..config
        };
        book.update_wedding_config(&renamed).await.unwrap();
        assert_eq!(book.wedding_config().await.unwrap().bride, "Ayu");
    }

    #[tokio::test]
    async fn local_invitation_combines_guest_and_config() {
        let (book, guests) = seeded(&[("Alice", true)]).await;
        let invitation = book.invitation(&guests[0].id).await.unwrap();
        assert_eq!(invitation.guest.name, "Alice");
        assert_eq!(invitation.config.groom, "John");
        assert!(book.invitation_link(&guests[0].id).unwrap().is_none());
    }

    #[tokio::test]
    async fn local_wishes_are_validated_and_kept_in_order() {
        let book = GuestBook::in_memory();
        assert!(book.wishes().await.unwrap().is_empty());

        let first = book
            .add_wish(&NewWish::new(" Rina ", "Selamat menempuh hidup baru"))
            .await
            .unwrap();
        assert_eq!(first.name, "Rina");
        book.add_wish(&NewWish::new("Dewi", "Happy wedding day!"))
            .await
            .unwrap();

        let rejected = book.add_wish(&NewWish::new("Budi", "hey")).await;
        assert!(matches!(rejected, Err(CoreError::Validation { .. })));

        let names: Vec<_> = book
            .wishes()
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names, ["Rina", "Dewi"]);
    }

    #[tokio::test]
    async fn auth_is_unsupported_locally() {
        let book = GuestBook::in_memory();
        let password = SecretString::from("pw".to_owned());
        assert!(matches!(
            book.login("a@b.c", &password).await,
            Err(CoreError::Unsupported { .. })
        ));
        assert!(matches!(book.logout(), Err(CoreError::Unsupported { .. })));
    }

    #[tokio::test]
    async fn file_backend_persists_between_books() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guests.json");

        let first = GuestBook::new(BookConfig::local(&path)).unwrap();
        let alice = first.create(NewGuest::named("Alice")).await.unwrap();
        first.check_in(&alice.id, Some(2)).await.unwrap();

        let second = GuestBook::new(BookConfig::local(&path)).unwrap();
        let reloaded = second.get(&alice.id).await.unwrap();
        assert!(reloaded.checked_in);
        assert_eq!(reloaded.attendance_count, 2);
        assert_eq!(second.scan_history().unwrap().len(), 1);
        assert_eq!(second.stats().checked_in, 1);
    }

    #[tokio::test]
    async fn unreadable_guest_list_blocks_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guests.json");

        let book = GuestBook::new(BookConfig::local(&path)).unwrap();
        book.create(NewGuest::named("Ann")).await.unwrap();

        // Someone hand-edits the file and breaks a timestamp.
        let raw = std::fs::read_to_string(&path).unwrap();
        let mut entries: std::collections::BTreeMap<String, String> =
            serde_json::from_str(&raw).unwrap();
        let broken = entries["wedding-guests"].replace("createdAt\":\"", "createdAt\":\"bad-");
        entries.insert("wedding-guests".into(), broken);
        let corrupted = serde_json::to_string(&entries).unwrap();
        std::fs::write(&path, &corrupted).unwrap();

        assert!(matches!(
            book.create(NewGuest::named("Bob")).await,
            Err(CoreError::Storage { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupted);
        assert!(matches!(
            GuestBook::new(BookConfig::local(&path)),
            Err(CoreError::Storage { .. })
        ));
    }
}
