// ── Wedding details, invitations, and wishes ──
//
// The config record is shared verbatim with the REST wire format, so
// the types are re-exported from `wedly-api` rather than mirrored.

use serde::{Deserialize, Serialize};

pub use wedly_api::models::{BankAccount, Quote, StoryEntry, WeddingConfig, Wish};

use super::guest::Guest;
use crate::error::CoreError;

/// Everything a personalized invitation page renders for one guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub guest: Guest,
    pub config: WeddingConfig,
}

/// Check the required fields of a wedding config before saving it.
pub fn validate_wedding_config(config: &WeddingConfig) -> Result<(), CoreError> {
    let required = [
        ("bride", &config.bride),
        ("groom", &config.groom),
        ("date", &config.date),
        ("time", &config.time),
        ("venue", &config.venue),
        ("message", &config.message),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(CoreError::Validation {
                field: field.into(),
                reason: "is required".into(),
            });
        }
    }
    Ok(())
}
