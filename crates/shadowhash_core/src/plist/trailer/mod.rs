use crate::plist::bytes::Cursor;
use crate::plist::{PlistError, Result};

/// Magic and version prefix of binary property lists.
pub const MAGIC: &[u8; 8] = b"bplist00";

/// Parsed fixed-size `bplist00` trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
	/// Width in bytes of each offset table entry.
	pub offset_int_size: u8,
	/// Width in bytes of each object reference inside containers.
	pub object_ref_size: u8,
	/// Number of objects in the offset table.
	pub num_objects: u64,
	/// Object number of the document root.
	pub top_object: u64,
	/// Absolute byte offset of the offset table.
	pub offset_table_offset: u64,
}

impl Trailer {
	/// Trailer size in bytes.
	pub const SIZE: usize = 32;

	/// Check the magic and parse the trailer from the end of `bytes`.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		check_magic(bytes)?;
		if bytes.len() < Self::SIZE {
			return Err(PlistError::TooShort { len: bytes.len() });
		}

		let mut cursor = Cursor::at(bytes, bytes.len() - Self::SIZE);
		let _reserved = cursor.read_exact(6)?;
		let offset_int_size = cursor.read_u8()?;
		let object_ref_size = cursor.read_u8()?;
		let num_objects = cursor.read_u64_be()?;
		let top_object = cursor.read_u64_be()?;
		let offset_table_offset = cursor.read_u64_be()?;

		if !(1..=8).contains(&offset_int_size) {
			return Err(PlistError::InvalidTrailer {
				field: "offset_int_size",
				value: u64::from(offset_int_size),
			});
		}
		if !(1..=8).contains(&object_ref_size) {
			return Err(PlistError::InvalidTrailer {
				field: "object_ref_size",
				value: u64::from(object_ref_size),
			});
		}
		if top_object >= num_objects {
			return Err(PlistError::ObjectIndexOutOfRange {
				index: top_object,
				count: usize::try_from(num_objects).unwrap_or(usize::MAX),
			});
		}

		Ok(Self {
			offset_int_size,
			object_ref_size,
			num_objects,
			top_object,
			offset_table_offset,
		})
	}

	/// Read the offset table described by this trailer.
	///
	/// The table must sit between the magic and the trailer, and every entry must point into that same region.
	pub fn read_offsets(&self, bytes: &[u8]) -> Result<Vec<usize>> {
		let limit = bytes.len().saturating_sub(Self::SIZE);
		let entry_size = usize::from(self.offset_int_size);
		let out_of_range = || PlistError::OffsetTableOutOfRange {
			offset: self.offset_table_offset,
			count: self.num_objects,
			entry_size: self.offset_int_size,
			limit,
		};

		let start = usize::try_from(self.offset_table_offset).map_err(|_| out_of_range())?;
		let count = usize::try_from(self.num_objects).map_err(|_| out_of_range())?;
		let table_len = count.checked_mul(entry_size).ok_or_else(out_of_range)?;
		let end = start.checked_add(table_len).ok_or_else(out_of_range)?;
		if start < MAGIC.len() || end > limit {
			return Err(out_of_range());
		}

		let mut cursor = Cursor::at(bytes, start);
		let mut offsets = Vec::with_capacity(count);
		for index in 0..count {
			let offset = cursor.read_uint_be(entry_size)?;
			let object_offset = usize::try_from(offset)
				.ok()
				.filter(|value| (MAGIC.len()..limit).contains(value))
				.ok_or(PlistError::ObjectOffsetOutOfRange { index, offset, limit })?;
			offsets.push(object_offset);
		}

		Ok(offsets)
	}
}

/// Fail with `NotBinaryFormat` unless `bytes` starts with `bplist00`.
pub fn check_magic(bytes: &[u8]) -> Result<()> {
	if bytes.starts_with(MAGIC) {
		return Ok(());
	}
	let magic = bytes.iter().take(MAGIC.len()).copied().collect();
	Err(PlistError::NotBinaryFormat { magic })
}
