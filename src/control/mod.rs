//! Control-file parsing and writing.
//!
//! Debian-style control paragraphs are the wire format of feeds, status
//! databases and extracted control files. The parser honors a field mask so
//! each consumer reads only the fields it cares about; the writer emits the
//! two fixed-order record forms.

pub(crate) mod format;
pub(crate) mod parse;

pub use format::{format_package, format_status};
pub use parse::{parse_feed, parse_package, parse_status_db, FieldMask};
