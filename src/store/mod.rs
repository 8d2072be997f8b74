//! Entry Store
//!
//! The single authoritative cache from canonical file path to `Entry`. At
//! most one live entry exists per physical file at any time; every buffer
//! read and write goes through the store, and external change notifications
//! are absorbed here. Views hold only a path and re-resolve their entry on
//! every access, because a refresh replaces the buffer wholesale.

mod entry;
mod watch;

pub use entry::{Entry, WatchToken};
pub use watch::{ChangeKind, Debouncer, FileChange};

use std::collections::hash_map::Entry as Slot;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{ByteRange, Format};

/// Store and session errors surfaced to the host
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no data loaded for {0}: the file is missing or was deleted")]
    Deleted(PathBuf),

    #[error("write of {len} bytes at offset {offset} exceeds the {buffer_len}-byte buffer")]
    OutOfRange {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed hex input: {0:?}")]
    MalformedInput(String),
}

/// Cache of open entries, keyed by canonical file path
#[derive(Debug)]
pub struct EntryStore {
    entries: HashMap<PathBuf, Entry>,
    default_format: Format,
    invalidations: Vec<PathBuf>,
    next_watch: u64,
}

impl EntryStore {
    /// Create an empty store. `default_format` is captured into each entry
    /// at first open and stays sticky until explicitly changed.
    pub fn new(default_format: Format) -> Self {
        Self {
            entries: HashMap::new(),
            default_format,
            invalidations: Vec::new(),
            next_watch: 0,
        }
    }

    /// Resolve the entry for a path, loading the file on first access.
    ///
    /// An unreadable path yields an entry with `is_deleted` set rather than
    /// an error; callers check the flag before touching `data`.
    pub fn resolve(&mut self, path: &Path) -> &mut Entry {
        let key = canonical(path);
        match self.entries.entry(key) {
            Slot::Occupied(slot) => slot.into_mut(),
            Slot::Vacant(slot) => {
                let watch = WatchToken(self.next_watch);
                self.next_watch += 1;
                let entry = match fs::read(slot.key()) {
                    Ok(data) => {
                        tracing::debug!(path = %slot.key().display(), len = data.len(), "loaded entry");
                        Entry::loaded(data, self.default_format, watch)
                    }
                    Err(err) => {
                        tracing::warn!(path = %slot.key().display(), %err, "unreadable path, entry marked deleted");
                        Entry::missing(self.default_format, watch)
                    }
                };
                slot.insert(entry)
            }
        }
    }

    /// Entry for a path, if one is cached
    pub fn get(&self, path: &Path) -> Option<&Entry> {
        self.entries.get(&canonical(path))
    }

    /// Overwrite one byte. Bounds-checked; see [`EntryStore::write_bytes`].
    pub fn write_byte(&mut self, path: &Path, offset: usize, value: u8) -> Result<(), StoreError> {
        self.write_bytes(path, offset, &[value])
    }

    /// Overwrite bytes in place starting at `offset`.
    ///
    /// The whole write must fit inside the buffer, otherwise nothing is
    /// mutated. On success the entry is dirty and the affected range joins
    /// its decorations.
    pub fn write_bytes(
        &mut self,
        path: &Path,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        {
            let entry = self.resolve(path);
            let Some(data) = entry.data.as_mut() else {
                return Err(StoreError::Deleted(canonical(path)));
            };
            if bytes.is_empty() {
                return Ok(());
            }
            let buffer_len = data.len();
            let end = offset
                .checked_add(bytes.len())
                .filter(|end| *end <= buffer_len)
                .ok_or(StoreError::OutOfRange {
                    offset,
                    len: bytes.len(),
                    buffer_len,
                })?;
            data[offset..end].copy_from_slice(bytes);
            entry.is_dirty = true;
            entry.decorations.push(ByteRange::spanning(offset, bytes.len()));
        }
        self.invalidate(path);
        Ok(())
    }

    /// Absorb a coalesced external change notification.
    ///
    /// A modified or created file is re-read from disk; unsaved edits are
    /// overwritten and stale decorations dropped. The sticky format
    /// survives. A deleted file keeps its entry with the flag set so the
    /// view can say so instead of crashing.
    pub fn on_external_change(&mut self, path: &Path, kind: ChangeKind) {
        let key = canonical(path);
        let Some(entry) = self.entries.get_mut(&key) else {
            return;
        };
        match kind {
            ChangeKind::Modified | ChangeKind::Created => match fs::read(&key) {
                Ok(data) => {
                    tracing::debug!(path = %key.display(), len = data.len(), "reloaded after external change");
                    entry.data = Some(data);
                    entry.is_dirty = false;
                    entry.is_deleted = false;
                    entry.decorations.clear();
                }
                Err(err) => {
                    tracing::warn!(path = %key.display(), %err, "reload failed, entry marked deleted");
                    entry.data = None;
                    entry.is_dirty = false;
                    entry.is_deleted = true;
                    entry.decorations.clear();
                }
            },
            ChangeKind::Deleted => {
                tracing::debug!(path = %key.display(), "backing file deleted");
                entry.data = None;
                entry.is_dirty = false;
                entry.is_deleted = true;
                entry.decorations.clear();
            }
        }
        self.push_invalidation(key);
    }

    /// Write the entry's buffer back to its path.
    ///
    /// Success clears the dirty flag and decorations. Failure leaves the
    /// entry dirty so no edit is silently lost.
    pub fn persist(&mut self, path: &Path) -> Result<(), StoreError> {
        let key = canonical(path);
        let Some(entry) = self.entries.get_mut(&key) else {
            return Err(StoreError::Deleted(key));
        };
        let Some(data) = entry.data.as_deref() else {
            return Err(StoreError::Deleted(key));
        };
        fs::write(&key, data).map_err(|source| StoreError::WriteFailure {
            path: key.clone(),
            source,
        })?;
        tracing::info!(path = %key.display(), len = data.len(), "persisted buffer");
        entry.is_dirty = false;
        entry.decorations.clear();
        Ok(())
    }

    /// Write the entry's buffer to another path, leaving dirty state alone
    pub fn export(&mut self, path: &Path, target: &Path) -> Result<(), StoreError> {
        let key = canonical(path);
        let Some(entry) = self.entries.get(&key) else {
            return Err(StoreError::Deleted(key));
        };
        let Some(data) = entry.data.as_deref() else {
            return Err(StoreError::Deleted(key));
        };
        fs::write(target, data).map_err(|source| StoreError::WriteFailure {
            path: target.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %key.display(), target = %target.display(), "exported buffer");
        Ok(())
    }

    /// Drop the entry for a closed view. Returns the watch registration for
    /// the host to unsubscribe. Outstanding entry references are stale
    /// after this; callers re-resolve.
    pub fn release(&mut self, path: &Path) -> Option<WatchToken> {
        let key = canonical(path);
        self.invalidations.retain(|p| *p != key);
        self.entries.remove(&key).and_then(|entry| entry.watch)
    }

    /// Mark a path's rendered view as stale
    pub fn invalidate(&mut self, path: &Path) {
        let key = canonical(path);
        self.push_invalidation(key);
    }

    /// Paths whose rendered views went stale since the last call
    pub fn take_invalidations(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.invalidations)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_invalidation(&mut self, key: PathBuf) {
        if !self.invalidations.contains(&key) {
            self.invalidations.push(key);
        }
    }
}

/// Canonical identity of a path, so aliases share one entry. Paths that do
/// not exist yet keep their given form.
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
