use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::LookupResult;

pub const DEFAULT_CAPACITY: usize = 25;

/// Past lookup results, most recent first, bounded to `capacity`.
///
/// When backed by a file, every mutation rewrites the whole snapshot so the
/// file always equals the in-memory list.
#[derive(Debug)]
pub struct HistoryCache {
    path: Option<PathBuf>,
    capacity: usize,
    entries: Vec<LookupResult>,
}

impl HistoryCache {
    /// Read the snapshot at `path`. Absent or unreadable files yield an empty cache.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let capacity = capacity.max(1);
        let mut entries = read_snapshot(&path);

        if entries.len() > capacity {
            info!(
                "history snapshot has {} entries, trimming to {}",
                entries.len(),
                capacity
            );
            entries.truncate(capacity);
        }

        Self {
            path: Some(path),
            capacity,
            entries,
        }
    }

    /// A cache that is never written to disk.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            path: None,
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Default snapshot location: `<data_dir>/repasse/historico.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("repasse")
            .join("historico.json")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn all(&self) -> &[LookupResult] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&LookupResult> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert at the front, trim to capacity, persist.
    ///
    /// The in-memory list is updated even if the write fails.
    pub fn prepend(&mut self, entry: LookupResult) -> Result<(), CoreError> {
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.save()
    }

    /// Drop every entry and persist the empty snapshot.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let data = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| CoreError::Persistence(format!("Failed to serialize history: {}", e)))?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| {
            CoreError::Persistence(format!("Failed to create history directory: {}", e))
        })?;

        // Write to a sibling temp file, then rename over the snapshot
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| CoreError::Persistence(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(&data)
            .map_err(|e| CoreError::Persistence(format!("Failed to write history: {}", e)))?;
        tmp.persist(path)
            .map_err(|e| CoreError::Persistence(format!("Failed to replace history: {}", e)))?;

        debug!("history saved: {} entries to {:?}", self.entries.len(), path);
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> Vec<LookupResult> {
    if !path.exists() {
        debug!("no history snapshot at {:?}", path);
        return Vec::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read history {:?}: {}", path, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<LookupResult>>(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Discarding malformed history {:?}: {}", path, e);
            Vec::new()
        }
    }
}
