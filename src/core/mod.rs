//! Core Coordinate Model
//!
//! Format-driven, side-effect-free building blocks of the hex view:
//! - Display format snapshot and validation
//! - Layout/coordinate engine converting byte offsets to rendered text
//!   positions and back
//! - Scalar value decoding at an offset
//!
//! Everything here is deterministic: the same format and inputs always
//! produce the same columns, offsets and values.

mod format;
mod inspect;
mod layout;

pub use format::{Format, FormatChange, FormatError};
pub use inspect::{inspect, Inspection};
pub use layout::{ByteRange, Layout, LineSpan, Position, ADDRESS_WIDTH};

pub(crate) use layout::group_digits;
