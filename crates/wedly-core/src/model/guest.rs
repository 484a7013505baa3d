// ── Guest domain types ──
//
// The guest record, its identifier, derived attendance stats, and the
// scan-history entry appended on every successful check-in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── GuestId ─────────────────────────────────────────────────────────

/// Stable, unique identifier of a guest.
///
/// Remote backends hand out their own ids; the local store mints UUIDs.
/// Either way the id is opaque text to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random id (local store).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GuestId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for GuestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GuestId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── Guest ───────────────────────────────────────────────────────────

/// An invitee tracked for attendance.
///
/// A guest is either never checked in (`checked_in == false`,
/// `checked_in_at == None`) or checked in exactly once. There is no
/// transition back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    /// Display and reporting only; has no effect on check-in.
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Party size, always at least 1.
    #[serde(default = "default_party_size")]
    pub attendance_count: u32,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

pub(crate) fn default_party_size() -> u32 {
    1
}

impl Guest {
    /// Case-insensitive substring match on the guest's name.
    pub fn name_matches(&self, needle: &str) -> bool {
        let needle = needle.trim();
        needle.is_empty() || self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Apply the one-way check-in transition.
    ///
    /// Returns `false` and leaves the record untouched if the guest has
    /// already arrived.
    pub fn mark_checked_in(&mut self, at: DateTime<Utc>, party_size: Option<u32>) -> bool {
        if self.checked_in {
            return false;
        }
        self.checked_in = true;
        self.checked_in_at = Some(at);
        if let Some(n) = party_size {
            self.attendance_count = n;
        }
        true
    }
}

// ── Timestamps ──────────────────────────────────────────────────────
//
// RFC 3339 strings on the REST wire; epoch milliseconds in data written
// by older local stores. Both are accepted on read, RFC 3339 is written.

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(DateTime<Utc>),
    Millis(i64),
}

impl RawTimestamp {
    fn resolve<E: serde::de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            Self::Text(dt) => Ok(dt),
            Self::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {ms}"))),
        }
    }
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?.resolve()
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawTimestamp>::deserialize(deserializer)?
        .map(RawTimestamp::resolve)
        .transpose()
}

// ── GuestStats ──────────────────────────────────────────────────────

/// Attendance counters, always derived from the current guest list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    pub total: u32,
    pub checked_in: u32,
    pub vip_total: u32,
    pub vip_checked_in: u32,
}

impl GuestStats {
    /// Single pass over the list.
    pub fn from_guests<'a>(guests: impl IntoIterator<Item = &'a Guest>) -> Self {
        guests.into_iter().fold(Self::default(), |mut acc, g| {
            acc.total += 1;
            if g.checked_in {
                acc.checked_in += 1;
            }
            if g.is_vip {
                acc.vip_total += 1;
                if g.checked_in {
                    acc.vip_checked_in += 1;
                }
            }
            acc
        })
    }

    /// Guests still expected.
    pub fn pending(&self) -> u32 {
        self.total.saturating_sub(self.checked_in)
    }
}

// ── ScanRecord ──────────────────────────────────────────────────────

/// History entry appended on every successful check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub guest_id: GuestId,
    pub guest_name: String,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    #[serde(deserialize_with = "timestamp")]
    pub scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    pub fn for_guest(guest: &Guest, scanned_at: DateTime<Utc>) -> Self {
        Self {
            guest_id: guest.id.clone(),
            guest_name: guest.name.clone(),
            is_vip: guest.is_vip,
            scanned_at,
        }
    }
}

// ── CheckInOutcome ──────────────────────────────────────────────────

/// Result of asking the store to check a guest in.
///
/// `AlreadyCheckedIn` is not an error: the guest is known and present,
/// and no write took place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The guest arrived just now.
    Welcomed(Guest),
    /// The guest had arrived earlier; the record is returned unchanged.
    AlreadyCheckedIn(Guest),
}

impl CheckInOutcome {
    pub fn guest(&self) -> &Guest {
        match self {
            Self::Welcomed(g) | Self::AlreadyCheckedIn(g) => g,
        }
    }

    pub fn into_guest(self) -> Guest {
        match self {
            Self::Welcomed(g) | Self::AlreadyCheckedIn(g) => g,
        }
    }

    pub fn is_welcomed(&self) -> bool {
        matches!(self, Self::Welcomed(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn guest(name: &str, vip: bool, checked_in: bool) -> Guest {
        Guest {
            id: GuestId::generate(),
            name: name.into(),
            is_vip: vip,
            group: None,
            attendance_count: 1,
            checked_in,
            checked_in_at: checked_in.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stats_count_vip_and_arrivals() {
        let guests = [
            guest("a", true, true),
            guest("b", true, false),
            guest("c", false, true),
            guest("d", false, false),
            guest("e", false, false),
        ];
        let stats = GuestStats::from_guests(&guests);
        assert_eq!(
            stats,
            GuestStats {
                total: 5,
                checked_in: 2,
                vip_total: 2,
                vip_checked_in: 1,
            }
        );
        assert_eq!(stats.pending(), 3);
    }

    #[test]
    fn check_in_is_one_way() {
        let mut g = guest("Alice", false, false);
        let first = Utc::now();
        assert!(g.mark_checked_in(first, Some(3)));
        assert_eq!(g.attendance_count, 3);

        assert!(!g.mark_checked_in(first + chrono::Duration::minutes(5), Some(9)));
        assert_eq!(g.checked_in_at, Some(first));
        assert_eq!(g.attendance_count, 3);
    }

    #[test]
    fn name_match_ignores_case() {
        let g = guest("Alice Wonderland", false, false);
        assert!(g.name_matches("wONDER"));
        assert!(g.name_matches(""));
        assert!(!g.name_matches("bob"));
    }

    #[test]
    fn reads_epoch_millis_from_older_local_data() {
        let g: Guest = serde_json::from_value(json!({
            "id": "x1",
            "name": "Budi",
            "isVIP": true,
            "createdAt": 1_700_000_000_000_i64,
            "checkedIn": true,
            "checkedInAt": 1_700_000_360_000_i64
        }))
        .unwrap();

        assert_eq!(g.created_at.timestamp(), 1_700_000_000);
        assert_eq!(g.checked_in_at.unwrap().timestamp(), 1_700_000_360);
        assert_eq!(g.attendance_count, 1);
    }

    #[test]
    fn null_checked_in_at_reads_as_none() {
        let g: Guest = serde_json::from_value(json!({
            "id": "x2",
            "name": "Citra",
            "isVIP": false,
            "createdAt": "2024-12-01T09:00:00Z",
            "checkedIn": false,
            "checkedInAt": null
        }))
        .unwrap();
        assert!(g.checked_in_at.is_none());
    }
}
