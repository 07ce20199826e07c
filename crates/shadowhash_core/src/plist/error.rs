use thiserror::Error;

/// Crate-local result type for plist reading.
pub type Result<T> = std::result::Result<T, PlistError>;

/// Errors produced while reading and decoding property lists.
#[derive(Debug, Error)]
pub enum PlistError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Leading eight bytes are not `bplist00`.
	#[error("not a binary plist (magic={magic:?})")]
	NotBinaryFormat {
		/// First up-to-8 bytes of the buffer.
		magic: Vec<u8>,
	},
	/// Buffer cannot hold the fixed 32-byte trailer.
	#[error("file is too short ({len} bytes)")]
	TooShort {
		/// Total buffer length.
		len: usize,
	},
	/// Trailer carries an unusable integer width.
	#[error("invalid trailer: {field}={value}")]
	InvalidTrailer {
		/// Trailer field name.
		field: &'static str,
		/// Offending value.
		value: u64,
	},
	/// Offset table does not fit between the header and the trailer.
	#[error("offset table out of range: offset={offset}, count={count}, entry_size={entry_size}, limit={limit}")]
	OffsetTableOutOfRange {
		/// Declared table start.
		offset: u64,
		/// Declared number of entries.
		count: u64,
		/// Declared entry width in bytes.
		entry_size: u8,
		/// First byte of the trailer.
		limit: usize,
	},
	/// Object reference does not name an offset table entry.
	#[error("object index {index} out of range (objects={count})")]
	ObjectIndexOutOfRange {
		/// Referenced object number.
		index: u64,
		/// Number of objects in the table.
		count: usize,
	},
	/// Offset table entry points outside the object area.
	#[error("object {index} offset {offset} out of range (limit={limit})")]
	ObjectOffsetOutOfRange {
		/// Object number.
		index: usize,
		/// Declared byte offset.
		offset: u64,
		/// First byte past the object area.
		limit: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Marker byte names no known object type.
	#[error("invalid object marker 0x{marker:02x} at offset {at}")]
	InvalidMarker {
		/// Raw marker byte.
		marker: u8,
		/// Byte offset of the marker.
		at: usize,
	},
	/// Integer object width is not 1, 2, 4, or 8 bytes.
	#[error("invalid integer width {width} at offset {at}")]
	InvalidIntegerWidth {
		/// Decoded width in bytes.
		width: u64,
		/// Byte offset of the marker.
		at: usize,
	},
	/// Real object width is not 4 or 8 bytes.
	#[error("invalid real width exponent {exponent} at offset {at}")]
	InvalidRealWidth {
		/// Width exponent taken from the marker.
		exponent: u64,
		/// Byte offset of the marker.
		at: usize,
	},
	/// UID object is wider than 8 bytes.
	#[error("invalid uid width {width} at offset {at}")]
	InvalidUidWidth {
		/// Width in bytes.
		width: usize,
		/// Byte offset of the marker.
		at: usize,
	},
	/// Extended size is not a non-negative integer object.
	#[error("invalid size object at offset {at}")]
	InvalidSizeObject {
		/// Byte offset of the size object marker.
		at: usize,
	},
	/// UTF-16 string payload is not valid UTF-16.
	#[error("invalid utf-16 string at offset {at}")]
	InvalidUtf16 {
		/// Byte offset of the string marker.
		at: usize,
	},
	/// Decoder nesting exceeded the configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Decoder materialized more objects than permitted.
	#[error("decode object budget exceeded (max={max_objects})")]
	ObjectBudgetExceeded {
		/// Configured object ceiling.
		max_objects: usize,
	},
	/// Decoder copied more data and string payload than permitted.
	#[error("decode byte budget exceeded (max={max_bytes})")]
	ByteBudgetExceeded {
		/// Configured payload byte ceiling.
		max_bytes: usize,
	},
	/// Nested decode was requested for a value that is not `Data`.
	#[error("expected data value, got {got}")]
	NotData {
		/// Kind label of the offending value.
		got: &'static str,
	},
	/// XML fallback parser rejected the document.
	#[error("xml plist: {0}")]
	Xml(#[from] ::plist::Error),
}

impl PlistError {
	/// Return `true` for structural violations of the binary format.
	pub fn is_malformed(&self) -> bool {
		matches!(
			self,
			Self::TooShort { .. }
				| Self::InvalidTrailer { .. }
				| Self::OffsetTableOutOfRange { .. }
				| Self::ObjectIndexOutOfRange { .. }
				| Self::ObjectOffsetOutOfRange { .. }
				| Self::UnexpectedEof { .. }
				| Self::InvalidMarker { .. }
				| Self::InvalidIntegerWidth { .. }
				| Self::InvalidRealWidth { .. }
				| Self::InvalidUidWidth { .. }
				| Self::InvalidSizeObject { .. }
				| Self::InvalidUtf16 { .. }
				| Self::DepthExceeded { .. }
				| Self::ObjectBudgetExceeded { .. }
				| Self::ByteBudgetExceeded { .. }
		)
	}
}
