// ── Local guest storage ──
//
// Typed access to the well-known keys of the key-value store.
// Every read-modify-write runs under `lock()` so concurrent tasks in
// one process never interleave a load and a save.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, MutexGuard};

use super::kv::KeyValueStore;
use crate::error::CoreError;
use crate::model::{Guest, ScanRecord, WeddingConfig, Wish};

pub const GUESTS_KEY: &str = "wedding-guests";
pub const SCAN_HISTORY_KEY: &str = "wedding-scan-history";
pub const CONFIG_KEY: &str = "wedding-config";
pub const WISHES_KEY: &str = "wedding-wishes";

pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Hold this guard across a load/save pair.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    // ── Guests ───────────────────────────────────────────────────────

    pub fn load_guests(&self) -> Result<Vec<Guest>, CoreError> {
        Ok(self.read_json(GUESTS_KEY)?.unwrap_or_default())
    }

    pub fn save_guests(&self, guests: &[Guest]) -> Result<(), CoreError> {
        self.write_json(GUESTS_KEY, guests)
    }

    // ── Scan history ─────────────────────────────────────────────────

    pub fn load_history(&self) -> Result<Vec<ScanRecord>, CoreError> {
        Ok(self.read_json(SCAN_HISTORY_KEY)?.unwrap_or_default())
    }

    pub fn append_history(&self, record: ScanRecord) -> Result<(), CoreError> {
        let mut history = self.load_history()?;
        history.push(record);
        self.write_json(SCAN_HISTORY_KEY, &history)
    }

    // ── Wedding config ───────────────────────────────────────────────

    pub fn load_config(&self) -> Result<WeddingConfig, CoreError> {
        Ok(self.read_json(CONFIG_KEY)?.unwrap_or_default())
    }

    pub fn save_config(&self, config: &WeddingConfig) -> Result<(), CoreError> {
        self.write_json(CONFIG_KEY, config)
    }

    // ── Wishes ───────────────────────────────────────────────────────

    pub fn load_wishes(&self) -> Result<Vec<Wish>, CoreError> {
        Ok(self.read_json(WISHES_KEY)?.unwrap_or_default())
    }

    pub fn save_wishes(&self, wishes: &[Wish]) -> Result<(), CoreError> {
        self.write_json(WISHES_KEY, wishes)
    }

    /// Drop every key this store owns.
    pub fn clear(&self) -> Result<(), CoreError> {
        for key in [GUESTS_KEY, SCAN_HISTORY_KEY, CONFIG_KEY, WISHES_KEY] {
            self.kv.remove(key)?;
        }
        Ok(())
    }

    // ── JSON helpers ─────────────────────────────────────────────────

    /// Missing values read as `None`. An unparseable value is a
    /// `Storage` error, so no later save can replace data that was
    /// never read.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CoreError::Storage {
                message: format!("stored {key} is unreadable: {e}"),
            })
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value).map_err(|e| CoreError::Storage {
            message: format!("failed to serialize {key}: {e}"),
        })?;
        self.kv.set(key, raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::GuestId;
    use crate::store::kv::MemoryKv;
    use chrono::Utc;

    fn store() -> (Arc<MemoryKv>, LocalStore) {
        let kv = Arc::new(MemoryKv::new());
        let store = LocalStore::new(kv.clone());
        (kv, store)
    }

    #[test]
    fn empty_store_reads_defaults() {
        let (_, store) = store();
        assert!(store.load_guests().unwrap().is_empty());
        assert!(store.load_history().unwrap().is_empty());
        assert!(store.load_wishes().unwrap().is_empty());
        assert_eq!(store.load_config().unwrap(), WeddingConfig::default());
    }

    #[test]
    fn corrupt_guest_list_is_a_storage_error() {
        let (kv, store) = store();
        kv.set(GUESTS_KEY, "{\"oops\":".into()).unwrap();
        assert!(matches!(
            store.load_guests(),
            Err(CoreError::Storage { .. })
        ));

        // One bad record poisons the whole list rather than vanishing.
        kv.set(
            GUESTS_KEY,
            r#"[{"id":"a","name":"Ann","isVIP":false,"createdAt":"bad-date"}]"#.into(),
        )
        .unwrap();
        match store.load_guests() {
            Err(CoreError::Storage { message }) => assert!(message.contains(GUESTS_KEY)),
            other => panic!("expected Storage error, got: {other:?}"),
        }
    }

    #[test]
    fn history_appends_in_order() {
        let (_, store) = store();
        let guest = Guest {
            id: GuestId::new("g1"),
            name: "Alice".into(),
            is_vip: true,
            group: None,
            attendance_count: 1,
            checked_in: true,
            checked_in_at: Some(Utc::now()),
            created_at: Utc::now(),
        };
        store
            .append_history(ScanRecord::for_guest(&guest, Utc::now()))
            .unwrap();
        store
            .append_history(ScanRecord::for_guest(&guest, Utc::now()))
            .unwrap();

        let history = store.load_history().unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].scanned_at <= history[1].scanned_at);
        assert!(history[0].is_vip);
    }

    #[test]
    fn clear_removes_every_key() {
        let (kv, store) = store();
        store.save_config(&WeddingConfig::default()).unwrap();
        store.save_guests(&[]).unwrap();
        store.save_wishes(&[]).unwrap();
        store.clear().unwrap();
        assert!(kv.get(CONFIG_KEY).unwrap().is_none());
        assert!(kv.get(GUESTS_KEY).unwrap().is_none());
        assert!(kv.get(WISHES_KEY).unwrap().is_none());
    }
}
