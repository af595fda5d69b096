//! Atomic per-record storage.
//!
//! The platform persists sessions in a managed document store; this crate
//! only relies on one property of it: a mutation is a single atomic
//! read-modify-write against one record. [`Store`] captures exactly that
//! contract, and [`MemoryStore`] provides the mutex-guarded in-process
//! implementation used by tests and local play.

use crate::error::GameError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Atomic key-value record storage.
///
/// Two concurrent mutations of the same record are serialized by the store,
/// not by game logic; the loser of a race re-reads state the winner already
/// committed (e.g. a second `join` finds the session no longer `Waiting`).
pub trait Store<T>: Send + Sync {
    /// Inserts a new record, failing with [`GameError::Conflict`] if the key
    /// is already present.
    fn insert(&self, key: &str, value: T) -> Result<(), GameError>;

    /// Reads a snapshot of the record, if present.
    fn read(&self, key: &str) -> Result<Option<T>, GameError>;

    /// Atomically applies `f` to the record and commits the result.
    ///
    /// If `f` returns an error, nothing is committed — the record keeps the
    /// state it had before the call. Fails [`GameError::NotFound`] if the
    /// key is absent.
    fn update<U>(
        &self,
        key: &str,
        f: impl FnOnce(&mut T) -> Result<U, GameError>,
    ) -> Result<U, GameError>;
}

/// In-process [`Store`] backed by a mutex-guarded map.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Arc<Mutex<HashMap<String, T>>>,
}

impl<T> MemoryStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Clone + Send> Store<T> for MemoryStore<T> {
    fn insert(&self, key: &str, value: T) -> Result<(), GameError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(key) {
            warn!(key, "insert rejected, record exists");
            return Err(GameError::Conflict(format!("record {key} already exists")));
        }
        records.insert(key.to_string(), value);
        debug!(key, "record inserted");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<T>, GameError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(key).cloned())
    }

    fn update<U>(
        &self,
        key: &str,
        f: impl FnOnce(&mut T) -> Result<U, GameError>,
    ) -> Result<U, GameError> {
        let mut records = self.records.lock().unwrap();
        let current = records
            .get(key)
            .ok_or_else(|| GameError::NotFound(format!("record {key}")))?;

        // Mutate a copy so a failed transition leaves the record untouched.
        let mut draft = current.clone();
        let out = f(&mut draft)?;
        records.insert(key.to_string(), draft);
        debug!(key, "record updated");
        Ok(out)
    }
}
