// ── Guest storage ──
//
// The reactive in-memory collection plus the local persistence layer.

pub mod collection;
pub mod kv;
pub mod local;

pub use collection::{GuestCollection, GuestSnapshot};
pub use kv::{FileKv, KeyValueStore, MemoryKv};
pub use local::LocalStore;
