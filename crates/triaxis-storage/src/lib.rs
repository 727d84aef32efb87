//! Persistence backend for stored readings.
//!
//! The server core consumes storage only through the [`ReadingBackend`]
//! trait: append one stamped reading, or fetch the full history
//! most-recent-first. [`store::ReadingStore`] is the sled-backed
//! implementation; tests substitute their own.
//!
//! The backend is the sole shared mutable resource in the system.
//! Implementations must be safe under concurrent `store`/`fetch_all`
//! from arbitrarily many sessions and read-after-write consistent for
//! a single append followed by a fetch from any session.

pub mod store;

use triaxis_types::{Reading, Result};

pub use store::ReadingStore;

/// Abstract append-only reading store.
///
/// `store` assigns the record's surrogate identity; its order is
/// storage commit order, not origination time. The core never updates
/// or deletes.
pub trait ReadingBackend: Send + Sync {
    /// Appends one reading with its capture stamp.
    fn store(&self, x: i32, y: i32, z: i32, date: &str, time: &str) -> Result<()>;

    /// Returns every stored reading, most-recent-first.
    fn fetch_all(&self) -> Result<Vec<Reading>>;
}
