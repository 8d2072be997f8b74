//! Layout and Coordinate Engine
//!
//! Pure conversion between file byte offsets and positions in the rendered
//! dump text, in both directions, for both the hex grid and the optional
//! ASCII column. All column boundaries are derived from a `Format` exactly
//! once per `Layout` value, so every query against the same `Layout` agrees
//! on where the gutter, the grid and the ASCII column sit.

use serde::{Deserialize, Serialize};

use super::format::Format;

/// Width of the address gutter: 8 hex digits plus ": "
pub const ADDRESS_WIDTH: usize = 10;

/// A position in the rendered text, zero-based. Line 0 is the header line
/// when the format renders one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line index
    pub line: usize,
    /// Column index
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An inclusive range of byte offsets, used for selections and for
/// modified-byte highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    /// First byte offset
    pub start: usize,
    /// Last byte offset, inclusive
    pub end: usize,
}

impl ByteRange {
    /// Create a new range
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range covering `len` bytes starting at `start`. `len` must be > 0.
    pub fn spanning(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len - 1,
        }
    }

    /// Endpoints in ascending order
    pub fn normalized(&self) -> (usize, usize) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Number of bytes covered
    pub fn len(&self) -> usize {
        let (start, end) = self.normalized();
        end - start + 1
    }

    /// Inclusive ranges always cover at least one byte
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check whether an offset falls inside the range
    pub fn contains(&self, offset: usize) -> bool {
        let (start, end) = self.normalized();
        offset >= start && offset <= end
    }
}

/// One rectangular highlight region on a single rendered line.
/// `end_col` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

/// Column boundaries and conversion math derived from one `Format`
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    width: usize,
    group_size: usize,
    group_digits: usize,
    little_endian: bool,
    hex_radix: bool,
    show_ascii: bool,
    first_line: usize,
    first_byte_col: usize,
    last_byte_col: usize,
    first_ascii_col: usize,
    last_ascii_col: usize,
}

impl Layout {
    /// Derive the column constants for a format
    pub fn new(format: &Format) -> Self {
        let group_size = format.group_size();
        let groups = format.groups();
        let group_digits = group_digits(format.radix, group_size);
        let first_byte_col = if format.show_address { ADDRESS_WIDTH } else { 0 };
        // The hex region includes the separator column after the last group,
        // so its last column is one past the final digit.
        let last_byte_col = first_byte_col + groups * (group_digits + 1) - 1;
        // One-byte groups get a wider gap before the ASCII column than all
        // grouped modes. The renderer reproduces the same asymmetry.
        let ascii_gap = if format.nibbles == 2 { 4 } else { 2 };
        let first_ascii_col = last_byte_col + ascii_gap;
        Self {
            width: format.width,
            group_size,
            group_digits,
            little_endian: format.little_endian,
            hex_radix: format.radix == 16,
            show_ascii: format.show_ascii,
            first_line: if format.show_offset { 1 } else { 0 },
            first_byte_col,
            last_byte_col,
            first_ascii_col,
            last_ascii_col: first_ascii_col + format.width,
        }
    }

    /// Bytes per rendered line
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bytes per group
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Digits of one group numeral; the renderer pads to exactly this width
    pub fn group_digits(&self) -> usize {
        self.group_digits
    }

    /// First line carrying data (line 0 is the header when shown)
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// First column of the hex grid
    pub fn first_byte_col(&self) -> usize {
        self.first_byte_col
    }

    /// Last column of the hex grid region
    pub fn last_byte_col(&self) -> usize {
        self.last_byte_col
    }

    /// First column of the ASCII column
    pub fn first_ascii_col(&self) -> usize {
        self.first_ascii_col
    }

    /// One past the last ASCII column
    pub fn last_ascii_col(&self) -> usize {
        self.last_ascii_col
    }

    /// Map a text position to a byte offset.
    ///
    /// Returns `None` for positions outside any data region: the header
    /// line, the address gutter, the gap between the hex grid and the ASCII
    /// column, and anything right of the ASCII column.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        if position.line < self.first_line || position.column < self.first_byte_col {
            return None;
        }
        let line_start = (position.line - self.first_line) * self.width;
        if position.column <= self.last_byte_col {
            let rel = position.column - self.first_byte_col;
            let group = rel / (self.group_digits + 1);
            let byte = self.byte_within_group(rel % (self.group_digits + 1));
            Some(line_start + group * self.group_size + byte)
        } else if self.show_ascii
            && position.column >= self.first_ascii_col
            && position.column < self.last_ascii_col
        {
            Some(line_start + (position.column - self.first_ascii_col))
        } else {
            None
        }
    }

    /// Map a byte offset to its text position, in the ASCII column or at the
    /// first digit of its numeral in the hex grid
    pub fn position_at(&self, offset: usize, ascii: bool) -> Position {
        let line = self.first_line + offset / self.width;
        let byte = offset % self.width;
        let column = if ascii {
            self.first_ascii_col + byte
        } else {
            let group = byte / self.group_size;
            self.first_byte_col + group * (self.group_digits + 1) + self.digit_slot(byte % self.group_size)
        };
        Position::new(line, column)
    }

    /// Expand a byte range into one rectangular region per rendered line,
    /// clipping the first and last lines to the range boundary and interior
    /// lines to the full column span of the region
    pub fn ranges_for(&self, range: ByteRange, ascii: bool) -> Vec<LineSpan> {
        let (start, end) = range.normalized();
        let start_pos = self.position_at(start, ascii);
        let end_pos = self.position_at(end, ascii);
        // One byte is two digit columns wide in the hex grid, one in ASCII.
        let cell = if ascii { 1 } else { 2 };
        let (region_first, region_last) = if ascii {
            (self.first_ascii_col, self.last_ascii_col)
        } else {
            (self.first_byte_col, self.last_byte_col)
        };

        let mut spans = Vec::with_capacity(end_pos.line - start_pos.line + 1);
        for line in start_pos.line..=end_pos.line {
            let mut lo = if line == start_pos.line {
                start_pos.column
            } else {
                region_first
            };
            let mut hi = if line == end_pos.line {
                end_pos.column + cell
            } else {
                region_last
            };
            // Mirrored byte order can invert the column pair within a group.
            if lo >= hi {
                let swapped = hi - cell;
                hi = lo + cell;
                lo = swapped;
            }
            spans.push(LineSpan {
                line,
                start_col: lo,
                end_col: hi,
            });
        }
        spans
    }

    /// Byte index within a group for a column remainder inside that group.
    ///
    /// Byte order inside a group is only meaningful for hex rendering of
    /// multi-byte groups; other radices print one numeral per group, so the
    /// whole group resolves to its first byte.
    fn byte_within_group(&self, rel: usize) -> usize {
        if !self.hex_radix || self.group_size == 1 {
            return 0;
        }
        // The separator column after the last digit clamps to the last slot.
        let slot = rel.min(self.group_digits - 1) / 2;
        if self.little_endian {
            self.group_size - slot - 1
        } else {
            slot
        }
    }

    /// First digit column, relative to the group start, of a byte's numeral
    fn digit_slot(&self, byte_in_group: usize) -> usize {
        if !self.hex_radix {
            return 0;
        }
        let slot = if self.little_endian && self.group_size > 1 {
            self.group_size - byte_in_group - 1
        } else {
            byte_in_group
        };
        slot * 2
    }
}

/// Digits needed to print one group's value in the given radix
pub(crate) fn group_digits(radix: u8, group_size: usize) -> usize {
    // Decimal digits of 256^n - 1, indexed by byte count. Short final
    // groups pass counts between the configured sizes.
    const DECIMAL: [usize; 9] = [0, 3, 5, 8, 10, 13, 15, 17, 20];
    let bits = group_size * 8;
    match radix {
        2 => bits,
        8 => bits.div_ceil(3),
        10 => DECIMAL[group_size],
        _ => bits / 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(nibbles: u8) -> Format {
        Format {
            nibbles,
            ..Default::default()
        }
    }

    #[test]
    fn test_byte_range_normalized() {
        assert_eq!(ByteRange::new(5, 2).normalized(), (2, 5));
        assert_eq!(ByteRange::new(2, 5).len(), 4);
        assert_eq!(ByteRange::spanning(3, 2), ByteRange::new(3, 4));
        assert!(ByteRange::new(2, 5).contains(5));
        assert!(!ByteRange::new(2, 5).contains(6));
    }

    #[test]
    fn test_default_columns() {
        // width 16, 1-byte groups, address and ASCII on
        let layout = Layout::new(&Format::default());
        assert_eq!(layout.first_line(), 1);
        assert_eq!(layout.first_byte_col(), 10);
        assert_eq!(layout.last_byte_col(), 10 + 16 * 3 - 1);
        assert_eq!(layout.first_ascii_col(), layout.last_byte_col() + 4);
        assert_eq!(layout.last_ascii_col(), layout.first_ascii_col() + 16);
    }

    #[test]
    fn test_wider_groups_use_narrow_ascii_gap() {
        let layout = Layout::new(&format(4));
        assert_eq!(layout.first_ascii_col(), layout.last_byte_col() + 2);
    }

    #[test]
    fn test_offset_zero_maps_below_header_after_gutter() {
        let layout = Layout::new(&Format::default());
        assert_eq!(layout.position_at(0, false), Position::new(1, 10));
        assert_eq!(layout.position_at(16, false), Position::new(2, 10));
        assert_eq!(
            layout.position_at(15, true),
            Position::new(1, layout.first_ascii_col() + 15)
        );
    }

    #[test]
    fn test_header_and_gutter_have_no_mapping() {
        let layout = Layout::new(&Format::default());
        assert_eq!(layout.offset_at(Position::new(0, 10)), None);
        assert_eq!(layout.offset_at(Position::new(1, 0)), None);
        assert_eq!(layout.offset_at(Position::new(1, 9)), None);
    }

    #[test]
    fn test_gap_between_grid_and_ascii_has_no_mapping() {
        let layout = Layout::new(&Format::default());
        for column in layout.last_byte_col() + 1..layout.first_ascii_col() {
            assert_eq!(layout.offset_at(Position::new(1, column)), None);
        }
        assert_eq!(
            layout.offset_at(Position::new(1, layout.last_ascii_col())),
            None
        );
    }

    #[test]
    fn test_ascii_disabled_has_no_ascii_mapping() {
        let layout = Layout::new(&Format {
            show_ascii: false,
            ..Default::default()
        });
        let column = layout.first_ascii_col();
        assert_eq!(layout.offset_at(Position::new(1, column)), None);
    }

    #[test]
    fn test_round_trip_all_group_sizes() {
        for nibbles in [2u8, 4, 8, 16] {
            for little_endian in [false, true] {
                for show_address in [false, true] {
                    let fmt = Format {
                        nibbles,
                        little_endian,
                        show_address,
                        ..Default::default()
                    };
                    let layout = Layout::new(&fmt);
                    for offset in 0..fmt.width * 4 {
                        assert_eq!(
                            layout.offset_at(layout.position_at(offset, false)),
                            Some(offset),
                            "hex round trip failed for nibbles={nibbles} le={little_endian} offset={offset}"
                        );
                        assert_eq!(
                            layout.offset_at(layout.position_at(offset, true)),
                            Some(offset),
                            "ascii round trip failed for nibbles={nibbles} le={little_endian} offset={offset}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_monotonic_within_line_big_endian() {
        for nibbles in [2u8, 4, 8, 16] {
            let layout = Layout::new(&format(nibbles));
            let mut previous = 0;
            for column in layout.first_byte_col()..=layout.last_byte_col() {
                let offset = layout
                    .offset_at(Position::new(1, column))
                    .expect("hex region column must map");
                assert!(
                    offset >= previous,
                    "offset decreased at column {column} for nibbles={nibbles}"
                );
                previous = offset;
            }
        }
    }

    #[test]
    fn test_separator_column_clamps_to_preceding_group() {
        // 4-byte groups: the space after "00112233" still resolves inside
        // the group, to its last byte
        let layout = Layout::new(&format(8));
        let separator = layout.first_byte_col() + layout.group_digits();
        assert_eq!(layout.offset_at(Position::new(1, separator)), Some(3));
    }

    #[test]
    fn test_little_endian_mirrors_bytes_within_group() {
        let layout = Layout::new(&Format {
            nibbles: 8,
            little_endian: true,
            ..Default::default()
        });
        // Byte 0 of the line renders as the last digit pair of group 0
        assert_eq!(
            layout.position_at(0, false),
            Position::new(1, layout.first_byte_col() + 6)
        );
        assert_eq!(
            layout.position_at(3, false),
            Position::new(1, layout.first_byte_col())
        );
        // And the first digit pair of group 0 is byte 3
        assert_eq!(
            layout.offset_at(Position::new(1, layout.first_byte_col())),
            Some(3)
        );
    }

    #[test]
    fn test_little_endian_is_noop_for_single_byte_groups() {
        let be = Layout::new(&Format::default());
        let le = Layout::new(&Format {
            little_endian: true,
            ..Default::default()
        });
        for offset in 0..32 {
            assert_eq!(le.position_at(offset, false), be.position_at(offset, false));
        }
    }

    #[test]
    fn test_non_hex_radix_resolves_whole_group() {
        // Decimal rendering prints one numeral per group; any digit of the
        // numeral resolves to the group's first byte
        let layout = Layout::new(&Format {
            nibbles: 4,
            radix: 10,
            ..Default::default()
        });
        let group_width = layout.group_digits() + 1;
        for digit in 0..layout.group_digits() {
            assert_eq!(
                layout.offset_at(Position::new(1, layout.first_byte_col() + digit)),
                Some(0)
            );
            assert_eq!(
                layout.offset_at(Position::new(1, layout.first_byte_col() + group_width + digit)),
                Some(2)
            );
        }
        // position_at agrees: both bytes of a group map to its first column
        assert_eq!(
            layout.position_at(0, false),
            layout.position_at(1, false)
        );
    }

    #[test]
    fn test_group_digit_counts() {
        assert_eq!(group_digits(16, 1), 2);
        assert_eq!(group_digits(16, 4), 8);
        assert_eq!(group_digits(2, 1), 8);
        assert_eq!(group_digits(2, 8), 64);
        assert_eq!(group_digits(8, 1), 3);
        assert_eq!(group_digits(8, 2), 6);
        assert_eq!(group_digits(10, 1), 3);
        assert_eq!(group_digits(10, 2), 5);
        assert_eq!(group_digits(10, 3), 8);
        assert_eq!(group_digits(10, 4), 10);
        assert_eq!(group_digits(10, 7), 17);
        assert_eq!(group_digits(10, 8), 20);
    }

    #[test]
    fn test_ranges_single_line() {
        let layout = Layout::new(&Format::default());
        let spans = layout.ranges_for(ByteRange::new(1, 3), false);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].line, 1);
        assert_eq!(spans[0].start_col, 13);
        // last byte starts at col 10 + 3*3 = 19, plus the two-digit cell
        assert_eq!(spans[0].end_col, 21);
    }

    #[test]
    fn test_ranges_multi_line_clip_to_grid() {
        let layout = Layout::new(&Format::default());
        let spans = layout.ranges_for(ByteRange::new(8, 40), false);
        assert_eq!(spans.len(), 3);
        // Interior lines span the whole grid region
        assert_eq!(spans[1].start_col, layout.first_byte_col());
        assert_eq!(spans[1].end_col, layout.last_byte_col());
        for span in &spans {
            assert!(span.start_col >= layout.first_byte_col());
            assert!(span.end_col <= layout.last_byte_col() + 1);
            assert!(span.start_col < span.end_col);
        }
    }

    #[test]
    fn test_ranges_ascii_clip_to_column() {
        let layout = Layout::new(&Format::default());
        let spans = layout.ranges_for(ByteRange::new(0, 47), true);
        assert_eq!(spans.len(), 3);
        for span in &spans {
            assert!(span.start_col >= layout.first_ascii_col());
            assert!(span.end_col <= layout.last_ascii_col());
        }
        // Last line is clipped to the final selected byte
        assert_eq!(spans[2].end_col, layout.first_ascii_col() + 16);
    }

    #[test]
    fn test_ranges_normalize_reversed_selection() {
        let layout = Layout::new(&Format::default());
        assert_eq!(
            layout.ranges_for(ByteRange::new(3, 1), false),
            layout.ranges_for(ByteRange::new(1, 3), false)
        );
    }

    #[test]
    fn test_ranges_little_endian_group_interior() {
        // Bytes 0..=1 of a 4-byte LE group render in reverse column order;
        // the span must still be a well-formed rectangle inside the grid
        let layout = Layout::new(&Format {
            nibbles: 8,
            little_endian: true,
            ..Default::default()
        });
        let spans = layout.ranges_for(ByteRange::new(0, 1), false);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].start_col < spans[0].end_col);
        assert!(spans[0].start_col >= layout.first_byte_col());
        assert!(spans[0].end_col <= layout.last_byte_col() + 1);
    }
}
