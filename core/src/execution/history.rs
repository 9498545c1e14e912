//! Visualization history
//!
//! Keeps the most recent generated traces for quick recall, newest first,
//! mirrored into a key-value store after every change. Restoring is
//! forgiving: a missing, unreadable or foreign blob yields an empty history
//! and a warning rather than an error, since losing recall history must
//! never stop the application from starting.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};
use crate::trace::ProblemTrace;

/// Storage key of the persisted history
pub const HISTORY_KEY: &str = "algorithmVisualizerHistory";

/// Number of entries retained
pub const DEFAULT_CAPACITY: usize = 10;

/// Layout version written into the persisted blob
pub const HISTORY_FORMAT_VERSION: u32 = 1;

/// Category recorded when a trace names none
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to encode history: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist history: {0}")]
    Storage(#[from] StorageError),
}

/// A previously generated trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Display title
    pub title: String,

    /// Query text the user submitted
    #[serde(alias = "query")]
    pub original_query: String,

    /// The trace itself
    #[serde(alias = "data")]
    pub trace: ProblemTrace,

    /// When the trace was generated
    pub timestamp: DateTime<Utc>,

    /// Category shown in the history panel
    pub category: String,
}

impl HistoryEntry {
    /// Entry for a freshly generated trace, filling blank metadata from the query
    pub fn new(query: &str, trace: ProblemTrace) -> Self {
        let title = match trace.title.trim() {
            "" => query.trim().to_owned(),
            title => title.to_owned(),
        };
        let category = match trace.category.trim() {
            "" => DEFAULT_CATEGORY.to_owned(),
            category => category.to_owned(),
        };
        Self {
            title,
            original_query: query.to_owned(),
            trace,
            timestamp: Utc::now(),
            category,
        }
    }
}

/// Persisted form
#[derive(Debug, Serialize, Deserialize)]
struct HistoryBlob {
    version: u32,
    entries: Vec<HistoryEntry>,
}

/// Bounded newest-first list of past traces
#[derive(Debug)]
pub struct HistoryCache<S: KeyValueStore> {
    /// Entries, most recent first
    entries: Vec<HistoryEntry>,

    /// Backing store
    store: S,

    /// Key under which the blob is stored
    key: String,

    /// Maximum number of entries retained
    capacity: usize,
}

impl<S: KeyValueStore> HistoryCache<S> {
    /// Empty cache that overwrites whatever the store holds on first record
    pub fn new(store: S, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            store,
            key: key.into(),
            capacity,
        }
    }

    /// Load the persisted history, falling back to empty on any failure
    pub fn restore(store: S, key: impl Into<String>, capacity: usize) -> Self {
        let mut cache = Self::new(store, key, capacity);
        cache.entries = cache.read_persisted();
        cache.entries.truncate(capacity);
        info!("Restored {} history entries", cache.entries.len());
        cache
    }

    fn read_persisted(&self) -> Vec<HistoryEntry> {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Could not read history: {err}");
                return Vec::new();
            }
        };

        match decode_blob(&text) {
            Ok(entries) => entries,
            Err(reason) => {
                warn!("Discarding persisted history: {reason}");
                Vec::new()
            }
        }
    }

    /// Prepend an entry and persist
    ///
    /// The in-memory list is always updated; an error only reports that the
    /// persisted mirror is now behind.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        debug!("Recording history entry '{}'", entry.title);
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.persist()
    }

    /// Trace stored at `index`; the entry stays in history
    pub fn select(&self, index: usize) -> Option<Arc<ProblemTrace>> {
        self.entries
            .get(index)
            .map(|entry| Arc::new(entry.trace.clone()))
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and the persisted blob
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        self.store.remove(&self.key)?;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<(), HistoryError> {
        let blob = HistoryBlob {
            version: HISTORY_FORMAT_VERSION,
            entries: self.entries.clone(),
        };
        let text = serde_json::to_string(&blob)?;
        self.store.set(&self.key, &text)?;
        Ok(())
    }
}

/// Accepts the versioned blob and the older bare-array layout
fn decode_blob(text: &str) -> Result<Vec<HistoryEntry>, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;

    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| e.to_string());
    }

    let blob: HistoryBlob = serde_json::from_value(value).map_err(|e| e.to_string())?;
    if blob.version != HISTORY_FORMAT_VERSION {
        return Err(format!("unsupported history version {}", blob.version));
    }
    Ok(blob.entries)
}
