//! Hexview Library
//!
//! An editable, navigable hex-dump view engine for binary files. The crate
//! keeps a bidirectional mapping between byte offsets in the underlying
//! file and character positions in the rendered dump text, and owns the
//! in-memory editable buffer behind each open view:
//!
//! - `core`: display format, layout/coordinate engine, value decoding
//! - `render`: dump text synthesis
//! - `store`: entry cache, in-place edits, external-change absorption
//! - `session`: host-facing facade tying the pieces together
//! - `app`: process configuration

pub mod app;
pub mod core;
pub mod render;
pub mod session;
pub mod store;

pub use crate::core::{ByteRange, Format, FormatChange, Layout, LineSpan, Position};
pub use crate::session::Session;
pub use crate::store::{ChangeKind, EntryStore, StoreError};
