mod bytes;
mod decode;
mod document;
mod error;
mod trailer;
mod value;

/// Binary decode entry points and limits.
pub use decode::{DecodeOptions, MAX_DEPTH_CEILING, decode, decode_nested, decode_nested_with, decode_with};
/// File and buffer readers with XML fallback.
pub use document::{read_document, read_file};
/// Lowercase hex rendering of byte payloads.
pub use bytes::to_hex;
/// Error and result aliases.
pub use error::{PlistError, Result};
/// Trailer layout and magic check.
pub use trailer::{MAGIC, Trailer, check_magic};
/// Decoded value types.
pub use value::{APPLE_EPOCH_OFFSET, Date, Dictionary, Value, ValueSet};
