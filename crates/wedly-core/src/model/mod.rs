// ── Domain model ──
//
// Canonical types shared by every backend and by UI consumers.

pub mod guest;
pub mod wedding;

pub use guest::{CheckInOutcome, Guest, GuestId, GuestStats, ScanRecord};
pub use wedding::{BankAccount, Invitation, Quote, StoryEntry, WeddingConfig, Wish};
