//! Sled-backed reading store.
//!
//! Readings live in one `readings` tree keyed by a monotonic `u64`
//! from [`sled::Db::generate_id`], big-endian so sled's lexicographic
//! key order is insertion order. The key is the record's surrogate
//! identity and reflects commit order; `fetch_all` walks the tree in
//! reverse for most-recent-first. Values are JSON-serialized
//! [`StoredReading`] rows.

use std::path::Path;

use serde::{Deserialize, Serialize};

use triaxis_types::{Reading, Result, TriaxisError};

use crate::ReadingBackend;

/// Tree holding all stored readings.
const READINGS_TREE: &str = "readings";

// ---------------------------------------------------------------------------
// StoredReading
// ---------------------------------------------------------------------------

/// On-disk row: one reading plus its capture stamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredReading {
    x: i32,
    y: i32,
    z: i32,
    date: String,
    time: String,
}

// ---------------------------------------------------------------------------
// ReadingStore
// ---------------------------------------------------------------------------

/// Append-only reading store backed by sled.
///
/// Cheap to share behind an `Arc`; sled serializes concurrent access
/// internally, and an append is visible to any subsequent fetch.
pub struct ReadingStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl ReadingStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TriaxisError::Backend`] if the database cannot be
    /// opened.
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path).map_err(|e| TriaxisError::Backend {
            reason: format!("failed to open reading store: {e}"),
        })?;
        let tree = db.open_tree(READINGS_TREE).map_err(|e| TriaxisError::Backend {
            reason: format!("failed to open tree '{READINGS_TREE}': {e}"),
        })?;
        Ok(Self { db, tree })
    }

    /// Flushes all pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.tree.flush().map_err(|e| TriaxisError::Backend {
            reason: format!("failed to flush reading store: {e}"),
        })?;
        Ok(())
    }

    /// Number of stored readings.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the store holds no readings.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl ReadingBackend for ReadingStore {
    fn store(&self, x: i32, y: i32, z: i32, date: &str, time: &str) -> Result<()> {
        let row = StoredReading {
            x,
            y,
            z,
            date: date.to_string(),
            time: time.to_string(),
        };
        let value = serde_json::to_vec(&row).map_err(|e| TriaxisError::Backend {
            reason: format!("failed to serialize reading: {e}"),
        })?;

        let id = self.db.generate_id().map_err(|e| TriaxisError::Backend {
            reason: format!("failed to allocate record id: {e}"),
        })?;

        self.tree
            .insert(id.to_be_bytes(), value)
            .map_err(|e| TriaxisError::Backend {
                reason: format!("failed to store reading: {e}"),
            })?;
        Ok(())
    }

    fn fetch_all(&self) -> Result<Vec<Reading>> {
        let mut readings = Vec::with_capacity(self.tree.len());
        for entry in self.tree.iter().rev() {
            let (_, value) = entry.map_err(|e| TriaxisError::Backend {
                reason: format!("failed to read stored reading: {e}"),
            })?;
            let row: StoredReading =
                serde_json::from_slice(&value).map_err(|e| TriaxisError::Backend {
                    reason: format!("corrupt stored reading: {e}"),
                })?;
            readings.push(Reading::historical(row.x, row.y, row.z, row.date, row.time));
        }
        Ok(readings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn open_scratch() -> (tempfile::TempDir, ReadingStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ReadingStore::open(dir.path()).expect("open store");
        (dir, store)
    }

    #[test]
    fn empty_store_fetches_nothing() -> Result<()> {
        let (_dir, store) = open_scratch();
        assert!(store.is_empty());
        assert!(store.fetch_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn store_then_fetch_is_most_recent_first() -> Result<()> {
        let (_dir, store) = open_scratch();
        store.store(1, 1, 1, "2024-01-01", "10:00:00")?;
        store.store(2, 2, 2, "2024-01-01", "10:00:01")?;
        store.store(3, 3, 3, "2024-01-01", "10:00:02")?;

        let readings = store.fetch_all()?;
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].x, 3, "latest append comes first");
        assert_eq!(readings[2].x, 1);
        Ok(())
    }

    #[test]
    fn fetched_readings_are_stamped() -> Result<()> {
        let (_dir, store) = open_scratch();
        store.store(7, 8, 9, "2024-06-15", "12:30:00")?;

        let readings = store.fetch_all()?;
        let capture = readings[0]
            .captured_at
            .as_ref()
            .expect("stored readings must carry a capture stamp");
        assert_eq!(capture.date, "2024-06-15");
        assert_eq!(capture.time, "12:30:00");
        Ok(())
    }

    #[test]
    fn read_after_write_is_consistent() -> Result<()> {
        let (_dir, store) = open_scratch();
        for n in 0..10 {
            store.store(n, 0, 0, "2024-01-01", "10:00:00")?;
            assert_eq!(store.fetch_all()?.len(), (n + 1) as usize);
        }
        Ok(())
    }

    #[test]
    fn concurrent_appends_lose_nothing() -> Result<()> {
        let (_dir, store) = open_scratch();
        let store = Arc::new(store);

        let threads = 4;
        let per_thread = 50;
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..per_thread {
                        store
                            .store(t, n, 0, "2024-01-01", "10:00:00")
                            .expect("concurrent store");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        assert_eq!(store.fetch_all()?.len(), (threads * per_thread) as usize);
        Ok(())
    }

    #[test]
    fn persists_across_reopen() -> Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = ReadingStore::open(dir.path())?;
            store.store(1, 2, 3, "2024-01-01", "10:00:00")?;
            store.flush()?;
        }
        let store = ReadingStore::open(dir.path())?;
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_all()?[0].x, 1);
        Ok(())
    }
}
