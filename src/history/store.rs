// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! File-backed history store: append-only, capped at the most recent 50 entries

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum number of entries kept on disk
pub const MAX_ENTRIES: usize = 50;

/// Maximum number of entries returned by a read
pub const READ_LIMIT: usize = 20;

/// One persisted generation record. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub prompt: String,
    pub timestamp: String,
    pub user_id: String,
}

/// Store for past generations, persisted as a JSON array in one file.
///
/// Writers are serialized behind a mutex and the file is replaced atomically
/// (temp file + rename), so concurrent appends cannot lose updates and
/// readers never observe a partial file.
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, truncating the log to the most recent
    /// [`MAX_ENTRIES`]. Returns the entry that was written.
    pub async fn append(&self, prompt: &str, user_id: &str) -> Result<HistoryEntry> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_all().await?;

        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            user_id: user_id.to_string(),
        };
        entries.push(entry.clone());

        if entries.len() > MAX_ENTRIES {
            let excess = entries.len() - MAX_ENTRIES;
            entries.drain(..excess);
        }

        self.persist(&entries)?;
        debug!("History entry {} saved ({} on disk)", entry.id, entries.len());

        Ok(entry)
    }

    /// Read history, optionally filtered to an exact `user_id` match.
    ///
    /// Returns the last [`READ_LIMIT`] of the (filtered) log in insertion
    /// order. I/O and parse failures degrade to an empty result.
    pub async fn read(&self, user_id: Option<&str>) -> Result<Vec<HistoryEntry>> {
        let entries = match self.load_all().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error loading history: {}", e);
                return Ok(Vec::new());
            }
        };

        let filtered: Vec<HistoryEntry> = match user_id {
            Some(user) => entries.into_iter().filter(|e| e.user_id == user).collect(),
            None => entries,
        };

        let skip = filtered.len().saturating_sub(READ_LIMIT);
        Ok(filtered.into_iter().skip(skip).collect())
    }

    /// Number of entries currently on disk
    pub async fn len(&self) -> usize {
        self.load_all().await.map(|e| e.len()).unwrap_or(0)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Load the whole log. A missing file is an empty log; a corrupt file is
    /// an error so an append never clobbers data it could not read.
    async fn load_all(&self) -> Result<Vec<HistoryEntry>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Rewrite the backing file in full, atomically.
    fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
