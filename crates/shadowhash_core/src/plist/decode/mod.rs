use tracing::{debug, trace};

use crate::plist::bytes::Cursor;
use crate::plist::trailer::Trailer;
use crate::plist::value::{Date, Dictionary, Value, ValueSet};
use crate::plist::{PlistError, Result};

const TAG_SIMPLE: u8 = 0x0;
const TAG_INT: u8 = 0x1;
const TAG_REAL: u8 = 0x2;
const TAG_DATE: u8 = 0x3;
const TAG_DATA: u8 = 0x4;
const TAG_ASCII: u8 = 0x5;
const TAG_UTF16: u8 = 0x6;
const TAG_UID: u8 = 0x8;
const TAG_ARRAY: u8 = 0xA;
const TAG_SET: u8 = 0xC;
const TAG_DICT: u8 = 0xD;

// Low nibble value meaning "size follows as an integer object".
const EXTENDED: u8 = 0xF;

/// Upper bound applied to [`DecodeOptions::max_depth`] regardless of the configured value.
pub const MAX_DEPTH_CEILING: u32 = 1024;

/// Resource limits applied while decoding untrusted input.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum container and size-object nesting depth, clamped to [`MAX_DEPTH_CEILING`].
	pub max_depth: u32,
	/// Maximum number of objects materialized by one decode call.
	///
	/// Shared sub-objects are decoded once per reference, so this bounds the work done on
	/// documents that reuse the same container many times.
	pub max_objects: usize,
	/// Maximum total payload bytes copied out of data and string objects by one decode call.
	///
	/// A single large blob referenced many times is copied once per reference; this caps the sum.
	pub max_bytes: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 128,
			max_objects: 1 << 20,
			max_bytes: 1 << 26,
		}
	}
}

/// Decode a `bplist00` buffer into its top-level value using default limits.
pub fn decode(bytes: &[u8]) -> Result<Value> {
	decode_with(bytes, &DecodeOptions::default())
}

/// Decode a `bplist00` buffer into its top-level value.
pub fn decode_with(bytes: &[u8], opt: &DecodeOptions) -> Result<Value> {
	let trailer = Trailer::parse(bytes)?;
	let offsets = trailer.read_offsets(bytes)?;
	debug!(
		objects = trailer.num_objects,
		top = trailer.top_object,
		offset_int_size = trailer.offset_int_size,
		object_ref_size = trailer.object_ref_size,
		"decoding binary plist"
	);

	let ctx = Context {
		bytes: &bytes[..bytes.len() - Trailer::SIZE],
		offsets,
		ref_size: usize::from(trailer.object_ref_size),
		max_depth: opt.max_depth.min(MAX_DEPTH_CEILING),
		opt,
	};
	let mut budget = Budget::default();
	ctx.object(trailer.top_object, 0, &mut budget)
}

/// Decode the bytes of a `Data` value as an embedded binary plist.
pub fn decode_nested(value: &Value) -> Result<Value> {
	decode_nested_with(value, &DecodeOptions::default())
}

/// Decode the bytes of a `Data` value as an embedded binary plist with explicit limits.
pub fn decode_nested_with(value: &Value, opt: &DecodeOptions) -> Result<Value> {
	let bytes = value.as_data().ok_or(PlistError::NotData { got: value.kind() })?;
	decode_with(bytes, opt)
}

// Immutable per-call state: object area, offset table, and reference width.
struct Context<'a> {
	bytes: &'a [u8],
	offsets: Vec<usize>,
	ref_size: usize,
	max_depth: u32,
	opt: &'a DecodeOptions,
}

#[derive(Default)]
struct Budget {
	decoded: usize,
	bytes: usize,
}

impl Context<'_> {
	fn object(&self, index: u64, depth: u32, budget: &mut Budget) -> Result<Value> {
		let offset = usize::try_from(index)
			.ok()
			.and_then(|slot| self.offsets.get(slot))
			.copied()
			.ok_or(PlistError::ObjectIndexOutOfRange {
				index,
				count: self.offsets.len(),
			})?;
		let mut cursor = Cursor::at(self.bytes, offset);
		self.read_object(&mut cursor, depth, budget)
	}

	fn read_object(&self, cursor: &mut Cursor<'_>, depth: u32, budget: &mut Budget) -> Result<Value> {
		if depth >= self.max_depth {
			return Err(PlistError::DepthExceeded {
				max_depth: self.max_depth,
			});
		}
		budget.decoded += 1;
		if budget.decoded > self.opt.max_objects {
			return Err(PlistError::ObjectBudgetExceeded {
				max_objects: self.opt.max_objects,
			});
		}

		let at = cursor.pos();
		let marker = cursor.read_u8()?;
		let tag = marker >> 4;
		let extra = marker & 0x0F;

		match tag {
			TAG_SIMPLE => match extra {
				0x0 => Ok(Value::Null),
				0x8 => Ok(Value::Bool(false)),
				0x9 => Ok(Value::Bool(true)),
				EXTENDED => {
					trace!(at, "fill byte");
					Ok(Value::Null)
				}
				_ => Err(PlistError::InvalidMarker { marker, at }),
			},
			TAG_INT => {
				let exponent = self.extended(cursor, extra, depth, budget)?;
				read_integer(cursor, exponent, at).map(Value::Integer)
			}
			TAG_REAL => {
				let exponent = self.extended(cursor, extra, depth, budget)?;
				match exponent {
					2 => Ok(Value::from(f64::from(cursor.read_f32_be()?))),
					3 => Ok(Value::from(cursor.read_f64_be()?)),
					_ => Err(PlistError::InvalidRealWidth { exponent, at }),
				}
			}
			TAG_DATE if extra == 0x3 => Ok(Value::Date(Date::from_absolute(cursor.read_f64_be()?))),
			TAG_DATA => {
				let len = self.length(cursor, extra, depth, budget)?;
				let raw = cursor.read_exact(len)?;
				self.charge(budget, raw.len())?;
				Ok(Value::Data(raw.to_vec()))
			}
			TAG_ASCII => {
				let len = self.length(cursor, extra, depth, budget)?;
				let raw = cursor.read_exact(len)?;
				self.charge(budget, raw.len())?;
				Ok(Value::String(raw.iter().copied().map(char::from).collect()))
			}
			TAG_UTF16 => {
				let len = self.length(cursor, extra, depth, budget)?;
				let need = len.checked_mul(2).ok_or(PlistError::UnexpectedEof {
					at: cursor.pos(),
					need: usize::MAX,
					rem: cursor.remaining(),
				})?;
				let raw = cursor.read_exact(need)?;
				self.charge(budget, raw.len())?;
				let units: Vec<u16> = raw.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
				String::from_utf16(&units).map(Value::String).map_err(|_| PlistError::InvalidUtf16 { at })
			}
			TAG_UID => {
				let width = usize::from(extra) + 1;
				if width > 8 {
					return Err(PlistError::InvalidUidWidth { width, at });
				}
				Ok(Value::Uid(cursor.read_uint_be(width)?))
			}
			TAG_ARRAY => {
				let count = self.length(cursor, extra, depth, budget)?;
				let refs = self.read_refs(cursor, count)?;
				let items = refs.into_iter().map(|index| self.object(index, depth + 1, budget)).collect::<Result<Vec<_>>>()?;
				Ok(Value::Array(items))
			}
			TAG_SET => {
				let count = self.length(cursor, extra, depth, budget)?;
				let refs = self.read_refs(cursor, count)?;
				let mut set = ValueSet::new();
				for index in refs {
					set.insert(self.object(index, depth + 1, budget)?);
				}
				Ok(Value::Set(set))
			}
			TAG_DICT => {
				let count = self.length(cursor, extra, depth, budget)?;
				let keys = self.read_refs(cursor, count)?;
				let values = self.read_refs(cursor, count)?;
				let mut dict = Dictionary::with_capacity(count);
				for (key, value) in keys.into_iter().zip(values) {
					let key = self.object(key, depth + 1, budget)?;
					let value = self.object(value, depth + 1, budget)?;
					dict.insert(key, value);
				}
				Ok(Value::Dictionary(dict))
			}
			_ => Err(PlistError::InvalidMarker { marker, at }),
		}
	}

	fn charge(&self, budget: &mut Budget, len: usize) -> Result<()> {
		budget.bytes = budget.bytes.saturating_add(len);
		if budget.bytes > self.opt.max_bytes {
			return Err(PlistError::ByteBudgetExceeded {
				max_bytes: self.opt.max_bytes,
			});
		}
		Ok(())
	}

	/// Resolve a marker's low nibble, reading the following integer object when it is `0xF`.
	fn extended(&self, cursor: &mut Cursor<'_>, extra: u8, depth: u32, budget: &mut Budget) -> Result<u64> {
		if extra != EXTENDED {
			return Ok(u64::from(extra));
		}

		let at = cursor.pos();
		match self.read_object(cursor, depth + 1, budget)? {
			Value::Integer(size) if size >= 0 => Ok(size as u64),
			_ => Err(PlistError::InvalidSizeObject { at }),
		}
	}

	fn length(&self, cursor: &mut Cursor<'_>, extra: u8, depth: u32, budget: &mut Budget) -> Result<usize> {
		let size = self.extended(cursor, extra, depth, budget)?;
		usize::try_from(size).map_err(|_| PlistError::UnexpectedEof {
			at: cursor.pos(),
			need: usize::MAX,
			rem: cursor.remaining(),
		})
	}

	fn read_refs(&self, cursor: &mut Cursor<'_>, count: usize) -> Result<Vec<u64>> {
		let need = count.checked_mul(self.ref_size).ok_or(PlistError::UnexpectedEof {
			at: cursor.pos(),
			need: usize::MAX,
			rem: cursor.remaining(),
		})?;
		if need > cursor.remaining() {
			return Err(PlistError::UnexpectedEof {
				at: cursor.pos(),
				need,
				rem: cursor.remaining(),
			});
		}
		(0..count).map(|_| cursor.read_uint_be(self.ref_size)).collect()
	}
}

fn read_integer(cursor: &mut Cursor<'_>, exponent: u64, at: usize) -> Result<i64> {
	match exponent {
		0 => Ok(cursor.read_uint_be(1)? as i64),
		1 => Ok(cursor.read_uint_be(2)? as i64),
		2 => Ok(cursor.read_uint_be(4)? as i64),
		3 => cursor.read_i64_be(),
		_ => Err(PlistError::InvalidIntegerWidth {
			width: 1_u64.checked_shl(u32::try_from(exponent).unwrap_or(u32::MAX)).unwrap_or(u64::MAX),
			at,
		}),
	}
}
