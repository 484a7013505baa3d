//! Guest store, QR payload codec, and check-in scanning for wedly.
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the wedly workspace:
//!
//! - **[`GuestBook`]**: Central facade over the guest list. Routes CRUD,
//!   check-in, wedding details, and auth to either the REST API
//!   (`wedly-api`) or a local key-value file, and mirrors every change
//!   into an observable [`GuestCollection`].
//!
//! - **[`qr`]**: Encodes a guest into the base64 text embedded in its QR
//!   code and decodes scanned text back, rejecting anything malformed with
//!   [`InvalidPayload`](qr::InvalidPayload).
//!
//! - **[`ScanSession`]**: The check-in state machine (idle, scanning,
//!   processing, verifying, result) published through a `watch` channel.
//!   [`ScanDriver`] runs it against a `GuestBook`.
//!
//! - **[`GuestStream`]**: Subscription handle vended by the book. Exposes
//!   `current()` / `latest()` / `changed()` for reactive rendering.
//!
//! - **Domain model** ([`model`]): `Guest`, `GuestStats`, `ScanRecord`,
//!   `CheckInOutcome`, `WeddingConfig`, `Invitation`, `Wish`.

pub mod backend;
pub mod book;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod qr;
pub mod requests;
pub mod scan;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::BackendKind;
pub use book::GuestBook;
pub use config::{BackendConfig, BookConfig, TlsVerification};
pub use error::CoreError;
pub use qr::{InvalidPayload, QrPayload};
pub use requests::{GuestFilter, GuestUpdate, NewGuest, NewWish};
pub use scan::{CodeSource, Detection, ScanDriver, ScanSession, ScanState, Tone};
pub use store::GuestCollection;
pub use stream::GuestStream;

pub use model::{
    BankAccount, CheckInOutcome, Guest, GuestId, GuestStats, Invitation, Quote, ScanRecord,
    StoryEntry, WeddingConfig, Wish,
};

// Auth types surface through `GuestBook::login`.
pub use wedly_api::DEFAULT_BASE_URL;
pub use wedly_api::models::ApiUser;
