//! Entry State
//!
//! Cached in-memory state for one open hex view: the byte buffer, dirty and
//! deleted flags, the sticky display format, and the modified-byte ranges.

use crate::core::{ByteRange, Format};

/// Opaque handle for the host's file-watch registration. The store hands
/// one out per entry; the host maps it to whatever its watcher needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchToken(pub u64);

/// Cached state for one open file
#[derive(Debug)]
pub struct Entry {
    /// The byte buffer. `None` exactly when `is_deleted` is set.
    pub data: Option<Vec<u8>>,
    /// True once any byte has been edited and not yet saved
    pub is_dirty: bool,
    /// True when the backing file cannot be read
    pub is_deleted: bool,
    /// Display format in force for this file, sticky across re-renders
    /// until explicitly changed
    pub format: Format,
    /// Locally modified byte ranges, in edit order
    pub decorations: Vec<ByteRange>,
    /// Watch registration for the backing path
    pub watch: Option<WatchToken>,
}

impl Entry {
    /// Entry for a successfully read file
    pub(crate) fn loaded(data: Vec<u8>, format: Format, watch: WatchToken) -> Self {
        Self {
            data: Some(data),
            is_dirty: false,
            is_deleted: false,
            format,
            decorations: Vec::new(),
            watch: Some(watch),
        }
    }

    /// Entry for a path that could not be read
    pub(crate) fn missing(format: Format, watch: WatchToken) -> Self {
        Self {
            data: None,
            is_dirty: false,
            is_deleted: true,
            format,
            decorations: Vec::new(),
            watch: Some(watch),
        }
    }

    /// Buffer length, zero when no data is loaded
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// True when no data is loaded or the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
