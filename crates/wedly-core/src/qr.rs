// ── QR payload codec ──
//
// A guest is projected to `{id, name, vip, ts}`, serialized as compact
// JSON, and base64-encoded so the text is safe to embed in a QR image.
// Decoding is the schema-checked inverse: every failure collapses into
// the single `InvalidPayload` outcome.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::model::{Guest, GuestId};

/// Scanned text could not be turned into a [`QrPayload`].
///
/// Deliberately carries no detail: malformed base64, bad JSON, and
/// missing or mistyped fields all mean "try scanning again".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid QR payload")]
pub struct InvalidPayload;

/// The compact guest projection embedded in a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub id: GuestId,
    pub name: String,
    pub vip: bool,
    /// Loose freshness marker: the guest's creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<PayloadStamp>,
}

/// `ts` as written by the different client generations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadStamp {
    /// RFC 3339 text (current encoder).
    Text(String),
    /// Epoch milliseconds (older local-storage client).
    Millis(i64),
}

impl QrPayload {
    pub fn from_guest(guest: &Guest) -> Self {
        Self {
            id: guest.id.clone(),
            name: guest.name.clone(),
            vip: guest.is_vip,
            ts: Some(PayloadStamp::Text(
                guest
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
        }
    }
}

/// Encode a guest into the text embedded in its QR code.
///
/// Deterministic: the same guest fields always give the same string.
pub fn encode(guest: &Guest) -> String {
    encode_payload(&QrPayload::from_guest(guest))
}

/// Encode an already-projected payload.
pub fn encode_payload(payload: &QrPayload) -> String {
    // Serializing a struct of strings and bools into a Vec cannot fail.
    let json = serde_json::to_vec(payload).unwrap_or_default();
    STANDARD.encode(json)
}

/// Decode scanned code text back into a payload.
///
/// Surrounding whitespace is ignored (hardware scanners often append a
/// line ending). `id` and `name` must be present, non-empty strings and
/// `vip` must be a boolean.
pub fn decode(text: &str) -> Result<QrPayload, InvalidPayload> {
    let text = text.trim();
    if text.is_empty() {
        debug!("rejecting empty QR text");
        return Err(InvalidPayload);
    }

    let bytes = STANDARD.decode(text).map_err(|e| {
        debug!(error = %e, "QR text is not base64");
        InvalidPayload
    })?;

    let payload: QrPayload = serde_json::from_slice(&bytes).map_err(|e| {
        debug!(error = %e, "QR payload failed schema check");
        InvalidPayload
    })?;

    if payload.id.as_str().trim().is_empty() || payload.name.trim().is_empty() {
        debug!("QR payload has an empty id or name");
        return Err(InvalidPayload);
    }

    Ok(payload)
}

/// URL of a guest's personalized invitation page: `{base}/invitation/{id}`.
pub fn invitation_link(base: &Url, id: &GuestId) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/invitation/{id}"))
}
