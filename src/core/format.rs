//! Display Format
//!
//! An immutable snapshot of the parameters controlling how bytes map to
//! rendered text and how multi-byte values are decoded. Layout and render
//! functions always receive a `Format` value explicitly, never ambient
//! configuration, so one render can never mix stale and updated settings.

use serde::{Deserialize, Serialize};

/// Display/encoding parameters for one hex view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// Hex digits per rendered group: 2, 4, 8 or 16 (1/2/4/8 bytes)
    pub nibbles: u8,
    /// Radix of the group numerals: 2, 8, 10 or 16
    pub radix: u8,
    /// Byte order within a group, also used for numeric decoding
    pub little_endian: bool,
    /// Bytes per rendered line; must be a positive multiple of the group size
    pub width: usize,
    /// Render digits in upper case
    pub uppercase: bool,
    /// Render the column-index header line
    pub show_offset: bool,
    /// Render the left address gutter
    pub show_address: bool,
    /// Render the trailing ASCII column
    pub show_ascii: bool,
    /// Cap on rendered content, in bytes
    pub size_display: usize,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            nibbles: 2,
            radix: 16,
            little_endian: false,
            width: 16,
            uppercase: false,
            show_offset: true,
            show_address: true,
            show_ascii: true,
            size_display: 1024 * 1024,
        }
    }
}

impl Format {
    /// Bytes per rendered group
    pub fn group_size(&self) -> usize {
        self.nibbles as usize / 2
    }

    /// Groups per rendered line
    pub fn groups(&self) -> usize {
        self.width / self.group_size()
    }

    /// Check the field invariants
    pub fn validate(&self) -> Result<(), FormatError> {
        if !matches!(self.nibbles, 2 | 4 | 8 | 16) {
            return Err(FormatError::Nibbles(self.nibbles));
        }
        if !matches!(self.radix, 2 | 8 | 10 | 16) {
            return Err(FormatError::Radix(self.radix));
        }
        if self.width == 0 || self.width % self.group_size() != 0 {
            return Err(FormatError::Width {
                width: self.width,
                group_size: self.group_size(),
            });
        }
        Ok(())
    }

    /// Return a copy with one field changed, re-validated
    pub fn apply(&self, change: FormatChange) -> Result<Format, FormatError> {
        let mut next = *self;
        match change {
            FormatChange::Nibbles(n) => next.nibbles = n,
            FormatChange::Radix(r) => next.radix = r,
            FormatChange::LittleEndian(le) => next.little_endian = le,
            FormatChange::Width(w) => next.width = w,
            FormatChange::Uppercase(u) => next.uppercase = u,
            FormatChange::ShowOffset(s) => next.show_offset = s,
            FormatChange::ShowAddress(s) => next.show_address = s,
            FormatChange::ShowAscii(s) => next.show_ascii = s,
            FormatChange::SizeDisplay(n) => next.size_display = n,
        }
        next.validate()?;
        Ok(next)
    }
}

/// A single-field change to a sticky format, driven by host toggle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatChange {
    Nibbles(u8),
    Radix(u8),
    LittleEndian(bool),
    Width(usize),
    Uppercase(bool),
    ShowOffset(bool),
    ShowAddress(bool),
    ShowAscii(bool),
    SizeDisplay(usize),
}

/// Invalid format parameters
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("nibbles must be 2, 4, 8 or 16, got {0}")]
    Nibbles(u8),

    #[error("radix must be 2, 8, 10 or 16, got {0}")]
    Radix(u8),

    #[error("width {width} is not a positive multiple of the {group_size}-byte group size")]
    Width { width: usize, group_size: usize },
}
