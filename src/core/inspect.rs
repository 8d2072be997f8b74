//! Scalar value decoding
//!
//! Decodes the fixed-width integer and float values readable at a byte
//! offset, honoring the view's byte order. Only the decoding lives here;
//! how the values are presented is the host's concern.

/// The scalar values readable at one byte offset. Wider fields are `None`
/// when fewer bytes than their width remain in the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inspection {
    pub int8: i8,
    pub uint8: u8,
    pub int16: Option<i16>,
    pub uint16: Option<u16>,
    pub int32: Option<i32>,
    pub uint32: Option<u32>,
    pub int64: Option<i64>,
    pub uint64: Option<u64>,
    pub float32: Option<f32>,
    pub float64: Option<f64>,
}

/// Decode the values at `offset`, or `None` when the offset is past the end
/// of the buffer
pub fn inspect(data: &[u8], offset: usize, little_endian: bool) -> Option<Inspection> {
    let tail = data.get(offset..)?;
    let first = *tail.first()?;

    let b2 = read::<2>(tail);
    let b4 = read::<4>(tail);
    let b8 = read::<8>(tail);

    Some(Inspection {
        int8: first as i8,
        uint8: first,
        int16: b2.map(|b| order(b, little_endian, i16::from_le_bytes, i16::from_be_bytes)),
        uint16: b2.map(|b| order(b, little_endian, u16::from_le_bytes, u16::from_be_bytes)),
        int32: b4.map(|b| order(b, little_endian, i32::from_le_bytes, i32::from_be_bytes)),
        uint32: b4.map(|b| order(b, little_endian, u32::from_le_bytes, u32::from_be_bytes)),
        int64: b8.map(|b| order(b, little_endian, i64::from_le_bytes, i64::from_be_bytes)),
        uint64: b8.map(|b| order(b, little_endian, u64::from_le_bytes, u64::from_be_bytes)),
        float32: b4.map(|b| order(b, little_endian, f32::from_le_bytes, f32::from_be_bytes)),
        float64: b8.map(|b| order(b, little_endian, f64::from_le_bytes, f64::from_be_bytes)),
    })
}

fn read<const N: usize>(tail: &[u8]) -> Option<[u8; N]> {
    tail.get(..N).map(|slice| {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(slice);
        bytes
    })
}

fn order<T, const N: usize>(
    bytes: [u8; N],
    little_endian: bool,
    le: fn([u8; N]) -> T,
    be: fn([u8; N]) -> T,
) -> T {
    if little_endian {
        le(bytes)
    } else {
        be(bytes)
    }
}
