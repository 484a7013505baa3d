// ── Typed mutation requests ──
//
// Inputs to `GuestBook::create` and `GuestBook::update`, validated
// before any backend sees them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::Guest;
use crate::model::guest::default_party_size;

/// A guest to be added to the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    pub name: String,
    #[serde(rename = "isVIP", default)]
    pub is_vip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default = "default_party_size")]
    pub attendance_count: u32,
}

impl NewGuest {
    /// A regular guest with a party size of one.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_vip: false,
            group: None,
            attendance_count: default_party_size(),
        }
    }

    #[must_use]
    pub fn vip(mut self, is_vip: bool) -> Self {
        self.is_vip = is_vip;
        self
    }

    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn party_size(mut self, n: u32) -> Self {
        self.attendance_count = n;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        validate_party_size(self.attendance_count)
    }
}

/// Partial update: `None` fields keep their current value.
///
/// `group: Some("")` clears the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "isVIP", skip_serializing_if = "Option::is_none")]
    pub is_vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_count: Option<u32>,
}

impl GuestUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.is_vip.is_none()
            && self.group.is_none()
            && self.attendance_count.is_none()
    }

    /// Merge onto `current`, returning the validated result.
    ///
    /// Check-in state and timestamps are never touched.
    pub fn apply_to(&self, current: &Guest) -> Result<Guest, CoreError> {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name.clone_from(name);
        }
        if let Some(vip) = self.is_vip {
            next.is_vip = vip;
        }
        if let Some(group) = &self.group {
            next.group = (!group.trim().is_empty()).then(|| group.clone());
        }
        if let Some(n) = self.attendance_count {
            next.attendance_count = n;
        }

        validate_name(&next.name)?;
        validate_party_size(next.attendance_count)?;
        Ok(next)
    }
}

// ── Listing filter ──────────────────────────────────────────────────

/// Narrowing applied by `GuestBook::list`. The default matches everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestFilter {
    /// Case-insensitive substring of the guest's name.
    pub search: Option<String>,
    /// Keep only VIP (`Some(true)`) or only regular (`Some(false)`) guests.
    pub vip: Option<bool>,
}

impl GuestFilter {
    pub fn search(needle: impl Into<String>) -> Self {
        Self {
            search: Some(needle.into()),
            vip: None,
        }
    }

    /// Search text with surrounding whitespace removed, if any is left.
    pub fn needle(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.needle().is_none() && self.vip.is_none()
    }

    pub fn matches(&self, guest: &Guest) -> bool {
        self.needle().is_none_or(|n| guest.name_matches(n))
            && self.vip.is_none_or(|vip| guest.is_vip == vip)
    }
}

// ── Wishes ──────────────────────────────────────────────────────────

/// A message for the couple, left from the invitation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWish {
    pub name: String,
    pub message: String,
}

impl NewWish {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Trim both fields and check their lengths in characters.
    pub fn normalized(&self) -> Result<Self, CoreError> {
        let name = self.name.trim();
        let message = self.message.trim();
        validate_length("name", name, 2, 100)?;
        validate_length("message", message, 5, 500)?;
        Ok(Self::new(name, message))
    }
}

// ── Field validation ────────────────────────────────────────────────

pub(crate) fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be empty"));
    }
    Ok(())
}

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len < min {
        return Err(CoreError::validation(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    if len > max {
        return Err(CoreError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_party_size(n: u32) -> Result<(), CoreError> {
    if n < 1 {
        return Err(CoreError::validation(
            "attendance_count",
            "must be at least 1",
        ));
    }
    Ok(())
}
