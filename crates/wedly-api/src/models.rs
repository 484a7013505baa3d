// Wire types for the wedding REST API
//
// Every response is wrapped in a `{ success, data, meta, error }`
// envelope. Field names on the wire are camelCase, with the odd
// `isVIP` spelling inherited from the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Envelope ────────────────────────────────────────────────────────

/// Standard response envelope.
///
/// `data` is present when `success` is true; `error` carries the
/// backend's structured failure otherwise.
#[derive(Debug, Deserialize)]
pub struct BaseResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<serde_json::Value>>,
}

// ── Guests ──────────────────────────────────────────────────────────

/// A guest record as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGuest {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default = "default_attendance")]
    pub attendance_count: u32,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_attendance() -> u32 {
    1
}

/// Ids are strings, but some backends hand out numeric primary keys.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Body for `POST /guests` and `PUT /guests/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestBody {
    pub name: String,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub attendance_count: u32,
}

/// Body for `POST /guests/{id}/check-in`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGuestStats {
    pub total: u32,
    pub checked_in: u32,
    pub vip_total: u32,
    pub vip_checked_in: u32,
}

/// `data` of the single-guest endpoints. Check-in also refreshes stats.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestEnvelope {
    pub guest: ApiGuest,
    #[serde(default)]
    pub stats: Option<ApiGuestStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestList {
    #[serde(default)]
    pub guests: Vec<ApiGuest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Query parameters accepted by `GET /guests`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GuestQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "isVIP", skip_serializing_if = "Option::is_none")]
    pub is_vip: Option<bool>,
}

// ── Wedding config ──────────────────────────────────────────────────

/// The wedding-details record behind `/config` and invitation pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeddingConfig {
    pub bride: String,
    pub groom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bride_parents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groom_parents: Option<String>,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub our_story: Option<Vec<StoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<BankAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
}

impl Default for WeddingConfig {
    fn default() -> Self {
        Self {
            bride: "Sarah".into(),
            groom: "John".into(),
            bride_parents: None,
            groom_parents: None,
            date: "2024-12-31".into(),
            time: "18:00".into(),
            venue: "Grand Ballroom, Fairmont Jakarta".into(),
            message: "We are delighted to invite you to our wedding celebration!".into(),
            maps_url: None,
            countdown_date: None,
            music_url: None,
            our_story: None,
            bank_account: None,
            quote: None,
        }
    }
}

/// One entry of the couple's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryEntry {
    pub date: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Bank-transfer gift details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

/// A quoted verse: `text` is the source, `content` the quote itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigEnvelope {
    pub config: WeddingConfig,
}

/// `data` of `GET /invitation/{guestId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationData {
    pub guest: ApiGuest,
    pub config: WeddingConfig,
}

// ── Wishes ──────────────────────────────────────────────────────────

/// A message left by a guest on the invitation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /wishes`.
#[derive(Debug, Clone, Serialize)]
pub struct WishBody {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WishList {
    #[serde(default)]
    pub wishes: Vec<Wish>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WishEnvelope {
    pub wish: Wish,
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: ApiUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: i64,
    pub email: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn guest_accepts_numeric_id_and_defaults() {
        let guest: ApiGuest = serde_json::from_value(json!({
            "id": 42,
            "name": "Budi",
            "isVIP": false,
            "createdAt": "2024-06-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(guest.id, "42");
        assert_eq!(guest.attendance_count, 1);
        assert!(!guest.checked_in);
        assert!(guest.checked_in_at.is_none());
        assert!(guest.group.is_none());
    }

    #[test]
    fn guest_body_uses_backend_field_names() {
        let body = GuestBody {
            name: "Alice".into(),
            is_vip: true,
            group: None,
            attendance_count: 2,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Alice", "isVIP": true, "attendanceCount": 2 })
        );
    }

    #[test]
    fn empty_check_in_body_serializes_to_empty_object() {
        let value = serde_json::to_value(CheckInBody::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn wedding_config_round_trips_optional_sections() {
        let raw = json!({
            "bride": "Ayu",
            "groom": "Dimas",
            "date": "2025-02-14",
            "time": "10:00",
            "venue": "Bali",
            "message": "Join us",
            "bankAccount": {
                "bankName": "BCA",
                "accountNumber": "123",
                "accountName": "Ayu"
            },
            "ourStory": [
                { "date": "2019", "title": "Met", "description": "At campus" }
            ]
        });
        let cfg: WeddingConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(cfg.bank_account.as_ref().unwrap().bank_name, "BCA");
        assert_eq!(cfg.our_story.as_ref().unwrap().len(), 1);
        assert_eq!(serde_json::to_value(&cfg).unwrap(), raw);
    }
}
