//! Dump Text Rendering
//!
//! Synthesizes the literal hex-dump text for a byte buffer: optional header
//! line, address gutter, grouped numerals, and the trailing ASCII column.
//! Every column comes from the same `Layout` value the coordinate engine
//! uses, so rendered text and offset math cannot drift apart.

use std::fmt::Write;

use crate::core::{group_digits, Format, Layout};

/// Fixed line appended when content is cut at the display cap
pub const TRUNCATION_TRAILER: &str = "(remaining bytes not shown)";

/// Render the dump text for a buffer. Content beyond the format's
/// `size_display` cap is dropped and the fixed trailer line is appended.
pub fn render(data: &[u8], format: &Format) -> String {
    let layout = Layout::new(format);
    let shown = data.len().min(format.size_display);
    let lines = shown.div_ceil(format.width.max(1)) + 2;
    let mut out = String::with_capacity(lines * (layout.last_ascii_col() + 1));

    if format.show_offset {
        out.push_str(&header_line(format, &layout));
        out.push('\n');
    }
    for (row, bytes) in data[..shown].chunks(format.width).enumerate() {
        out.push_str(&dump_line(format, &layout, row * format.width, bytes));
        out.push('\n');
    }
    if shown < data.len() {
        out.push_str(TRUNCATION_TRAILER);
        out.push('\n');
    }
    out
}

/// Header with the byte indices of each column, grouped like the data
fn header_line(format: &Format, layout: &Layout) -> String {
    let mut line = String::with_capacity(layout.last_byte_col() + 1);
    if format.show_address {
        line.push_str("  Offset: ");
    }
    for group_start in (0..format.width).step_by(layout.group_size()) {
        let mut label = String::new();
        for byte in group_start..group_start + layout.group_size() {
            let _ = write!(label, "{byte:02X}");
        }
        // Right-aligned in the group's numeral field, like the digits below
        let _ = write!(line, "{label:>width$} ", width = layout.group_digits());
    }
    line.truncate(line.trim_end().len());
    line
}

/// One rendered line: gutter, grouped numerals, gap, ASCII column
fn dump_line(format: &Format, layout: &Layout, address: usize, bytes: &[u8]) -> String {
    let mut line = String::with_capacity(layout.last_ascii_col() + 1);
    if format.show_address {
        if format.uppercase {
            let _ = write!(line, "{address:08X}: ");
        } else {
            let _ = write!(line, "{address:08x}: ");
        }
    }
    for group in bytes.chunks(layout.group_size()) {
        push_group(&mut line, format, layout, group);
        line.push(' ');
    }
    if format.show_ascii {
        // Pad to the ASCII column; the gap is wider in 1-byte-group mode.
        // A space byte is real ASCII content, so no trailing trim here.
        while line.len() < layout.first_ascii_col() {
            line.push(' ');
        }
        for &byte in bytes {
            line.push(if (0x20..=0x7E).contains(&byte) {
                byte as char
            } else {
                '.'
            });
        }
    } else {
        line.truncate(line.trim_end().len());
    }
    line
}

/// One group numeral, padded to the layout's fixed digit width
fn push_group(line: &mut String, format: &Format, layout: &Layout, group: &[u8]) {
    let group_size = layout.group_size();
    if format.radix == 16 {
        // Two digits per byte, in display order. A short final group leaves
        // its missing digit slots blank.
        for slot in 0..group_size {
            let index = if format.little_endian && group_size > 1 {
                group_size - slot - 1
            } else {
                slot
            };
            match group.get(index) {
                Some(byte) if format.uppercase => {
                    let _ = write!(line, "{byte:02X}");
                }
                Some(byte) => {
                    let _ = write!(line, "{byte:02x}");
                }
                None => line.push_str("  "),
            }
        }
        return;
    }

    // Other radices print the group as one numeral. A short final group
    // decodes only the bytes present, right-aligned in the field.
    let value = decode_group(group, format.little_endian);
    let digits = if group.len() == group_size {
        layout.group_digits()
    } else {
        group_digits(format.radix, group.len())
    };
    let numeral = match format.radix {
        2 => format!("{value:0digits$b}"),
        8 => format!("{value:0digits$o}"),
        _ => format!("{value:0digits$}"),
    };
    let _ = write!(line, "{numeral:>width$}", width = layout.group_digits());
}

/// Group value in the configured byte order
fn decode_group(group: &[u8], little_endian: bool) -> u64 {
    let mut value = 0u64;
    if little_endian {
        for &byte in group.iter().rev() {
            value = (value << 8) | u64::from(byte);
        }
    } else {
        for &byte in group {
            value = (value << 8) | u64::from(byte);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_render_default_format() {
        let data: Vec<u8> = (0..18).collect();
        let text = render(&data, &Format::default());
        let lines = lines(&text);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  Offset: 00 01 02"));
        assert!(lines[1].starts_with("00000000: 00 01 02 03"));
        assert!(lines[2].starts_with("00000010: 10 11"));
    }

    #[test]
    fn test_ascii_column_starts_at_layout_column() {
        let format = Format::default();
        let layout = Layout::new(&format);
        let data: Vec<u8> = (0x41..0x51).collect();
        let text = render(&data, &format);
        let row = lines(&text)[1];
        assert_eq!(&row[layout.first_ascii_col()..], "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn test_nonprintable_bytes_render_as_dots() {
        let format = Format::default();
        let layout = Layout::new(&format);
        let text = render(&[0x00, 0x41, 0x7F, 0x20], &format);
        let row = lines(&text)[1];
        assert_eq!(&row[layout.first_ascii_col()..], ".A. ");
    }

    #[test]
    fn test_digits_align_with_positions() {
        // The first digit of every byte's numeral sits exactly where the
        // layout says the byte is
        for nibbles in [2u8, 4, 8, 16] {
            for little_endian in [false, true] {
                let format = Format {
                    nibbles,
                    little_endian,
                    ..Default::default()
                };
                let layout = Layout::new(&format);
                let data: Vec<u8> = (0..32).map(|b| b | 0x40).collect();
                let text = render(&data, &format);
                let rows = text.lines().skip(1).collect::<Vec<_>>();
                for (offset, byte) in data.iter().enumerate() {
                    let Position { line, column } = layout.position_at(offset, false);
                    let row = rows[line - 1];
                    let digits = &row[column..column + 2];
                    let expected = format!("{byte:02x}");
                    assert_eq!(
                        digits, expected,
                        "byte {offset} misplaced for nibbles={nibbles} le={little_endian}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_uppercase_digits() {
        let format = Format {
            uppercase: true,
            show_offset: false,
            ..Default::default()
        };
        let text = render(&[0xAB, 0xCD], &format);
        assert!(lines(&text)[0].starts_with("00000000: AB CD"));
    }

    #[test]
    fn test_no_address_gutter() {
        let format = Format {
            show_address: false,
            show_offset: false,
            ..Default::default()
        };
        let text = render(&[0xDE, 0xAD], &format);
        assert!(lines(&text)[0].starts_with("de ad"));
    }

    #[test]
    fn test_little_endian_reverses_group_bytes() {
        let format = Format {
            nibbles: 8,
            little_endian: true,
            show_offset: false,
            show_address: false,
            show_ascii: false,
            ..Default::default()
        };
        let text = render(&[0x01, 0x02, 0x03, 0x04], &format);
        assert_eq!(lines(&text)[0], "04030201");
    }

    #[test]
    fn test_short_final_group_leaves_blank_slots() {
        let format = Format {
            nibbles: 8,
            show_offset: false,
            show_address: false,
            ..Default::default()
        };
        let layout = Layout::new(&format);
        let text = render(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE], &format);
        let row = lines(&text)[0];
        assert!(row.starts_with("aabbccdd ee"));
        // The lone byte of the second group keeps the ASCII column in place
        assert_eq!(row.len(), layout.first_ascii_col() + 5);
    }

    #[test]
    fn test_decimal_groups() {
        let format = Format {
            nibbles: 4,
            radix: 10,
            show_offset: false,
            show_address: false,
            show_ascii: false,
            ..Default::default()
        };
        // 0x0102 = 258, 0xFFFF = 65535, both padded to five digits
        let text = render(&[0x01, 0x02, 0xFF, 0xFF], &format);
        assert_eq!(lines(&text)[0], "00258 65535");
    }

    #[test]
    fn test_decimal_short_final_group_keeps_field_width() {
        let format = Format {
            nibbles: 8,
            radix: 10,
            show_offset: false,
            show_address: false,
            ..Default::default()
        };
        let layout = Layout::new(&format);
        // One full 4-byte group and a 1-byte remainder
        let text = render(&[0, 0, 0, 1, 7], &format);
        let row = lines(&text)[0];
        assert!(row.starts_with("0000000001        007"));
        // The remainder's narrower numeral must not push the ASCII column
        assert_eq!(&row[layout.first_ascii_col()..], ".....");
    }

    #[test]
    fn test_binary_groups_little_endian() {
        let format = Format {
            radix: 2,
            little_endian: true,
            show_offset: false,
            show_address: false,
            show_ascii: false,
            ..Default::default()
        };
        // Single-byte groups: endianness has no visible effect
        let text = render(&[0b1010_0001, 0xFF], &format);
        assert_eq!(lines(&text)[0], "10100001 11111111");
    }

    #[test]
    fn test_truncation_trailer() {
        let format = Format {
            size_display: 16,
            ..Default::default()
        };
        let data = [0u8; 64];
        let text = render(&data, &format);
        let lines = lines(&text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], TRUNCATION_TRAILER);

        let text = render(&data[..16], &format);
        assert!(!text.contains(TRUNCATION_TRAILER));
    }

    #[test]
    fn test_header_aligns_with_group_columns() {
        let format = Format {
            nibbles: 4,
            ..Default::default()
        };
        let layout = Layout::new(&format);
        let text = render(&[0u8; 16], &format);
        let header = lines(&text)[0];
        // Each group label ends where the group's numeral field ends
        let group_width = layout.group_digits() + 1;
        for group in 0..format.groups() {
            let start = layout.first_byte_col() + group * group_width;
            let label = &header[start..start + layout.group_digits()];
            let first = group * layout.group_size();
            assert_eq!(label, format!("{:02X}{:02X}", first, first + 1));
        }
    }

    #[test]
    fn test_empty_buffer_renders_header_only() {
        let text = render(&[], &Format::default());
        assert_eq!(lines(&text).len(), 1);

        let format = Format {
            show_offset: false,
            ..Default::default()
        };
        assert_eq!(render(&[], &format), "");
    }
}
