// ── Scan session ──
//
// Client-side state machine for QR check-in. The session never touches
// a backend itself: it decodes code text, takes lookup and check-in
// results from its caller, and publishes every state through a `watch`
// channel so a UI can render it.
//
//   Idle ─start─▶ Scanning ─detect─▶ Processing ─resolve─▶ Verifying
//                    │                    │                   │ confirm
//                    ▼                    ▼                   ▼
//               InvalidPayload     GuestNotFound /        CheckingIn ─complete─▶ Welcomed /
//                                  AlreadyCheckedIn                              AlreadyCheckedIn /
//                                                                                CheckInFailed
//
// `Scanning → Processing` is the only way in, so a second detection
// arriving while one is being handled is dropped.

mod driver;

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tokio::sync::watch;
use tracing::debug;

pub use driver::{CodeSource, ScanDriver};

use crate::error::CoreError;
use crate::model::{CheckInOutcome, Guest, GuestId};
use crate::qr::{self, QrPayload};
use crate::requests::validate_party_size;

// ── ScanState ───────────────────────────────────────────────────────

/// Where the scanner is in the check-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(tag = "state", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScanState {
    Idle,
    Scanning,
    /// A code was decoded and its guest is being looked up.
    Processing { payload: QrPayload },
    /// Guest found and not yet arrived; waiting for the operator.
    Verifying { guest: Guest, party_size: u32 },
    CheckingIn { guest: Guest, party_size: u32 },
    Welcomed { guest: Guest },
    AlreadyCheckedIn { guest: Guest },
    InvalidPayload,
    GuestNotFound { id: GuestId },
    CheckInFailed { message: String },
    /// The camera or scanner itself failed, not the scanned code.
    SourceFailed { message: String },
}

/// Colour family a UI should use for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

impl ScanState {
    /// Stable kebab-case name, e.g. `already-checked-in`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// A finished scan: the next step is `reset()` or `retry()`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Welcomed { .. }
                | Self::AlreadyCheckedIn { .. }
                | Self::InvalidPayload
                | Self::GuestNotFound { .. }
                | Self::CheckInFailed { .. }
                | Self::SourceFailed { .. }
        )
    }

    /// Guest attached to this state, if any.
    pub fn guest(&self) -> Option<&Guest> {
        match self {
            Self::Verifying { guest, .. }
            | Self::CheckingIn { guest, .. }
            | Self::Welcomed { guest }
            | Self::AlreadyCheckedIn { guest } => Some(guest),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Idle => "Ready to scan",
            Self::Scanning => "Scanning",
            Self::Processing { .. } => "Processing",
            Self::Verifying { .. } => "Verify guest",
            Self::CheckingIn { .. } => "Checking in",
            Self::Welcomed { .. } => "Welcome!",
            Self::AlreadyCheckedIn { .. } => "Already checked in",
            Self::InvalidPayload => "Invalid code",
            Self::GuestNotFound { .. } => "Guest not found",
            Self::CheckInFailed { .. } => "Check-in failed",
            Self::SourceFailed { .. } => "Scanner unavailable",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Start the scanner to check guests in",
            Self::Scanning => "Point the scanner at a guest's QR code",
            Self::Processing { .. } => "Reading the scanned code",
            Self::Verifying { .. } => "Confirm the guest details and party size",
            Self::CheckingIn { .. } => "Recording the arrival",
            Self::Welcomed { .. } => "Guest checked in successfully",
            Self::AlreadyCheckedIn { .. } => "This guest has already arrived",
            Self::InvalidPayload => "Invalid QR code format",
            Self::GuestNotFound { .. } => "Guest not found in system",
            Self::CheckInFailed { .. } => "The arrival could not be recorded, try again",
            Self::SourceFailed { .. } => "Could not access the scanner, check the device",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Idle => Tone::Neutral,
            Self::Scanning
            | Self::Processing { .. }
            | Self::Verifying { .. }
            | Self::CheckingIn { .. } => Tone::Info,
            Self::Welcomed { .. } => Tone::Success,
            Self::AlreadyCheckedIn { .. } => Tone::Warning,
            Self::InvalidPayload
            | Self::GuestNotFound { .. }
            | Self::CheckInFailed { .. }
            | Self::SourceFailed { .. } => Tone::Danger,
        }
    }
}

/// What happened to a piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Decoded; the session moved to `Processing`.
    Accepted(QrPayload),
    /// Not a guest code; the session moved to `InvalidPayload`.
    Rejected,
    /// Arrived while the session was not scanning; ignored.
    Dropped,
}

// ── ScanSession ─────────────────────────────────────────────────────

/// Observable scan state machine.
pub struct ScanSession {
    state: watch::Sender<ScanState>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ScanState::Idle);
        Self { state }
    }

    /// Current state (cloned).
    pub fn state(&self) -> ScanState {
        self.state.borrow().clone()
    }

    /// Watch the session state; intermediate states may be coalesced.
    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.subscribe()
    }

    /// `Idle` or any finished state → `Scanning`.
    pub fn start(&self) -> Result<(), CoreError> {
        self.transition("start scanning", |s| {
            (matches!(s, ScanState::Idle) || s.is_terminal()).then_some((ScanState::Scanning, ()))
        })
    }

    /// Feed scanned text in.
    ///
    /// Only a `Scanning` session accepts it. Anything arriving while a
    /// previous code is still being handled is `Dropped`.
    pub fn detect(&self, text: &str) -> Detection {
        let mut detection = Detection::Dropped;
        self.state.send_if_modified(|state| {
            if !matches!(state, ScanState::Scanning) {
                debug!(state = state.name(), "detection dropped");
                return false;
            }
            match qr::decode(text) {
                Ok(payload) => {
                    debug!(id = %payload.id, "code accepted");
                    detection = Detection::Accepted(payload.clone());
                    *state = ScanState::Processing { payload };
                }
                Err(_) => {
                    detection = Detection::Rejected;
                    *state = ScanState::InvalidPayload;
                }
            }
            true
        });
        detection
    }

    /// Hand in the lookup result for the payload being processed.
    pub fn resolve(&self, lookup: Option<Guest>) -> Result<(), CoreError> {
        self.transition("resolve a guest", move |s| {
            let ScanState::Processing { payload } = s else {
                return None;
            };
            let next = match lookup {
                None => ScanState::GuestNotFound {
                    id: payload.id.clone(),
                },
                Some(guest) if guest.checked_in => ScanState::AlreadyCheckedIn { guest },
                Some(guest) => ScanState::Verifying {
                    party_size: guest.attendance_count,
                    guest,
                },
            };
            Some((next, ()))
        })
    }

    /// The lookup itself failed (network, storage).
    pub fn lookup_failed(&self, message: impl Into<String>) -> Result<(), CoreError> {
        let message = message.into();
        self.transition("report a failed lookup", move |s| {
            matches!(s, ScanState::Processing { .. })
                .then_some((ScanState::CheckInFailed { message }, ()))
        })
    }

    /// Change the party size while verifying.
    pub fn adjust_party_size(&self, n: u32) -> Result<(), CoreError> {
        validate_party_size(n)?;
        self.transition("change the party size", |s| match s {
            ScanState::Verifying { guest, .. } => Some((
                ScanState::Verifying {
                    guest: guest.clone(),
                    party_size: n,
                },
                (),
            )),
            _ => None,
        })
    }

    /// Accept the verified guest; returns what to check in.
    pub fn confirm(&self) -> Result<(GuestId, u32), CoreError> {
        self.transition("confirm a check-in", |s| match s {
            ScanState::Verifying { guest, party_size } => Some((
                ScanState::CheckingIn {
                    guest: guest.clone(),
                    party_size: *party_size,
                },
                (guest.id.clone(), *party_size),
            )),
            _ => None,
        })
    }

    /// Abandon verification or stop scanning.
    pub fn cancel(&self) -> Result<(), CoreError> {
        self.transition("cancel", |s| {
            matches!(s, ScanState::Verifying { .. } | ScanState::Scanning)
                .then_some((ScanState::Idle, ()))
        })
    }

    /// Hand in the check-in result for the guest being checked in.
    pub fn complete(&self, result: Result<CheckInOutcome, CoreError>) -> Result<(), CoreError> {
        self.transition("complete a check-in", move |s| {
            let ScanState::CheckingIn { guest, .. } = s else {
                return None;
            };
            let next = match result {
                Ok(CheckInOutcome::Welcomed(guest)) => ScanState::Welcomed { guest },
                Ok(CheckInOutcome::AlreadyCheckedIn(guest)) => {
                    ScanState::AlreadyCheckedIn { guest }
                }
                Err(CoreError::NotFound { .. }) => ScanState::GuestNotFound {
                    id: guest.id.clone(),
                },
                Err(e) => ScanState::CheckInFailed {
                    message: e.to_string(),
                },
            };
            Some((next, ()))
        })
    }

    /// The code source broke (camera denied, scanner unplugged).
    pub fn source_failed(&self, message: impl Into<String>) -> Result<(), CoreError> {
        let message = message.into();
        self.transition("report a scanner failure", move |s| {
            matches!(s, ScanState::Idle | ScanState::Scanning)
                .then_some((ScanState::SourceFailed { message }, ()))
        })
    }

    /// "Scan next": finished state → `Idle`.
    pub fn reset(&self) -> Result<(), CoreError> {
        self.transition("reset", |s| {
            (s.is_terminal() || matches!(s, ScanState::Idle)).then_some((ScanState::Idle, ()))
        })
    }

    /// Finished state → `Scanning` in one step.
    pub fn retry(&self) -> Result<(), CoreError> {
        self.transition("retry", |s| {
            s.is_terminal().then_some((ScanState::Scanning, ()))
        })
    }

    /// Apply `step` atomically; `None` means the action is not allowed
    /// in the current state.
    fn transition<T>(
        &self,
        action: &str,
        step: impl FnOnce(&ScanState) -> Option<(ScanState, T)>,
    ) -> Result<T, CoreError> {
        let mut output = None;
        let mut from = "";
        self.state.send_if_modified(|state| {
            from = state.name();
            let Some((next, value)) = step(state) else {
                return false;
            };
            debug!(from, to = next.name(), action, "scan transition");
            *state = next;
            output = Some(value);
            true
        });
        output.ok_or_else(|| CoreError::InvalidTransition {
            action: action.into(),
            state: from.into(),
        })
    }
}
