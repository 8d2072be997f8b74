//! Session Facade
//!
//! The host-facing surface of the crate. A `Session` ties together the
//! entry store, the layout engine and the renderer: the host hands it
//! paths, text positions and edit input, and drains render invalidations
//! to know which views to refresh. All coordinate math is bound to the
//! sticky format of the file in question.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app::Settings;
use crate::core::{
    inspect, ByteRange, Format, FormatChange, FormatError, Inspection, Layout, LineSpan, Position,
};
use crate::render;
use crate::store::{ChangeKind, Debouncer, EntryStore, StoreError, WatchToken};

/// One hex-view session over any number of open files
#[derive(Debug)]
pub struct Session {
    store: EntryStore,
    debouncer: Debouncer,
}

impl Session {
    /// Create a session with the configured format defaults
    pub fn new(settings: &Settings) -> Self {
        let format = settings.format();
        let format = match format.validate() {
            Ok(()) => format,
            Err(err) => {
                tracing::warn!(%err, "configured format is invalid, falling back to defaults");
                Format::default()
            }
        };
        Self {
            store: EntryStore::new(format),
            debouncer: Debouncer::new(Duration::from_millis(settings.debounce_ms)),
        }
    }

    /// The full dump text for a file's current buffer and sticky format
    pub fn render(&mut self, path: &Path) -> Result<String, StoreError> {
        let entry = self.store.resolve(path);
        let format = entry.format;
        let Some(data) = entry.data.as_deref() else {
            return Err(StoreError::Deleted(path.to_path_buf()));
        };
        Ok(render::render(data, &format))
    }

    /// Byte offset under a text position, or `None` outside the data
    /// regions or past the end of the buffer
    pub fn offset_for_position(&mut self, path: &Path, position: Position) -> Option<usize> {
        let entry = self.store.resolve(path);
        let len = entry.data.as_ref()?.len();
        let offset = Layout::new(&entry.format).offset_at(position)?;
        (offset < len).then_some(offset)
    }

    /// Text position of a byte offset, or `None` past the end of the buffer
    pub fn position_for_offset(
        &mut self,
        path: &Path,
        offset: usize,
        ascii: bool,
    ) -> Option<Position> {
        let entry = self.store.resolve(path);
        let len = entry.data.as_ref()?.len();
        (offset < len).then(|| Layout::new(&entry.format).position_at(offset, ascii))
    }

    /// Per-line highlight regions for a byte range, in the hex grid or the
    /// ASCII column
    pub fn spans_for(&mut self, path: &Path, range: ByteRange, ascii: bool) -> Vec<LineSpan> {
        let entry = self.store.resolve(path);
        Layout::new(&entry.format).ranges_for(range, ascii)
    }

    /// Highlight regions for every locally modified byte range
    pub fn decoration_spans(&mut self, path: &Path, ascii: bool) -> Vec<LineSpan> {
        let entry = self.store.resolve(path);
        let layout = Layout::new(&entry.format);
        entry
            .decorations
            .iter()
            .flat_map(|range| layout.ranges_for(*range, ascii))
            .collect()
    }

    /// Overwrite bytes at an offset
    pub fn edit(&mut self, path: &Path, offset: usize, bytes: &[u8]) -> Result<(), StoreError> {
        self.store.write_bytes(path, offset, bytes)
    }

    /// Parse user hex input and overwrite bytes at an offset. Malformed
    /// input is rejected before any buffer mutation.
    pub fn edit_hex(&mut self, path: &Path, offset: usize, input: &str) -> Result<(), StoreError> {
        let bytes = parse_hex(input)?;
        self.store.write_bytes(path, offset, &bytes)
    }

    /// Write the buffer back to its file
    pub fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        self.store.persist(path)
    }

    /// Write the buffer to another file, leaving dirty state alone
    pub fn export(&mut self, path: &Path, target: &Path) -> Result<(), StoreError> {
        self.store.export(path, target)
    }

    /// Change one field of a file's sticky format
    pub fn toggle_format(&mut self, path: &Path, change: FormatChange) -> Result<(), FormatError> {
        let entry = self.store.resolve(path);
        entry.format = entry.format.apply(change)?;
        self.store.invalidate(path);
        Ok(())
    }

    /// The bytes under a rendered-text selection, endpoints inclusive, in
    /// either data region
    pub fn selection_bytes(
        &mut self,
        path: &Path,
        anchor: Position,
        cursor: Position,
    ) -> Option<Vec<u8>> {
        let start = self.offset_for_position(path, anchor)?;
        let end = self.offset_for_position(path, cursor)?;
        let (start, end) = ByteRange::new(start, end).normalized();
        let entry = self.store.resolve(path);
        entry
            .data
            .as_ref()
            .and_then(|data| data.get(start..=end))
            .map(<[u8]>::to_vec)
    }

    /// Scalar values readable at an offset, in the file's byte order
    pub fn inspect(&mut self, path: &Path, offset: usize) -> Option<Inspection> {
        let entry = self.store.resolve(path);
        let little_endian = entry.format.little_endian;
        inspect(entry.data.as_deref()?, offset, little_endian)
    }

    /// Record a raw watch notification; it is coalesced and applied on the
    /// next `pump` after the debounce window
    pub fn notify_change(&mut self, path: &Path, kind: ChangeKind, now: Instant) {
        self.debouncer.push(path.to_path_buf(), kind, now);
    }

    /// Apply the external changes whose debounce window has elapsed.
    /// Returns how many entries were refreshed.
    pub fn pump(&mut self, now: Instant) -> usize {
        let ready = self.debouncer.poll(now);
        let count = ready.len();
        for change in ready {
            self.store.on_external_change(&change.path, change.kind);
        }
        count
    }

    /// Earliest instant at which `pump` has work to do
    pub fn next_pump(&self) -> Option<Instant> {
        self.debouncer.next_ready()
    }

    /// Drop the entry for a closed view; the returned token is the watch
    /// registration for the host to unsubscribe
    pub fn release(&mut self, path: &Path) -> Option<WatchToken> {
        self.store.release(path)
    }

    /// Paths whose rendered views went stale since the last call
    pub fn take_invalidations(&mut self) -> Vec<PathBuf> {
        self.store.take_invalidations()
    }

    /// Direct access to the underlying store
    pub fn store(&mut self) -> &mut EntryStore {
        &mut self.store
    }
}

/// Parse user hex input into bytes: optional `0x` prefix, whitespace
/// between digit pairs allowed, an even number of digits required
pub fn parse_hex(input: &str) -> Result<Vec<u8>, StoreError> {
    let malformed = || StoreError::MalformedInput(input.trim().to_string());
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() || digits.len() % 2 != 0 {
        return Err(malformed());
    }
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(malformed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_plain() {
        assert_eq!(parse_hex("deadBEEF").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_parse_hex_with_prefix_and_spaces() {
        assert_eq!(parse_hex("0xDE AD").unwrap(), vec![0xDE, 0xAD]);
        assert_eq!(parse_hex("  de ad be ef  ").unwrap().len(), 4);
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert!(matches!(parse_hex(""), Err(StoreError::MalformedInput(_))));
        assert!(matches!(parse_hex("f"), Err(StoreError::MalformedInput(_))));
        assert!(matches!(parse_hex("zz"), Err(StoreError::MalformedInput(_))));
        assert!(matches!(parse_hex("0x"), Err(StoreError::MalformedInput(_))));
    }
}
