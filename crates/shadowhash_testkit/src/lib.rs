//! Shared test helpers for workspace crates.
//!
//! [`BplistBuilder`] lays out raw `bplist00` objects, the offset table, and the trailer so tests can
//! describe exact wire bytes, including malformed ones.

use std::io::Write;

/// Assembles a binary plist from raw object encodings.
///
/// Objects are numbered in insertion order. Helper methods encode common object kinds; [`Self::raw`]
/// accepts arbitrary bytes.
#[derive(Debug, Clone)]
pub struct BplistBuilder {
	objects: Vec<Vec<u8>>,
	ref_size: u8,
}

impl Default for BplistBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl BplistBuilder {
	/// Builder with one-byte object references.
	pub fn new() -> Self {
		Self {
			objects: Vec::new(),
			ref_size: 1,
		}
	}

	/// Builder with `ref_size`-byte object references.
	pub fn with_ref_size(ref_size: u8) -> Self {
		Self {
			objects: Vec::new(),
			ref_size,
		}
	}

	/// Append a raw object encoding and return its object number.
	pub fn raw(&mut self, bytes: impl Into<Vec<u8>>) -> u64 {
		self.objects.push(bytes.into());
		(self.objects.len() - 1) as u64
	}

	/// Null object.
	pub fn null(&mut self) -> u64 {
		self.raw([0x00])
	}

	/// Boolean object.
	pub fn bool(&mut self, value: bool) -> u64 {
		self.raw([if value { 0x09 } else { 0x08 }])
	}

	/// Integer object in its narrowest encoding.
	pub fn int(&mut self, value: i64) -> u64 {
		self.raw(int_bytes(value))
	}

	/// Double-precision real object.
	pub fn real(&mut self, value: f64) -> u64 {
		let mut out = vec![0x23];
		out.extend_from_slice(&value.to_be_bytes());
		self.raw(out)
	}

	/// Date object, in seconds since 2001-01-01T00:00:00Z.
	pub fn date(&mut self, absolute: f64) -> u64 {
		let mut out = vec![0x33];
		out.extend_from_slice(&absolute.to_be_bytes());
		self.raw(out)
	}

	/// Data object.
	pub fn data(&mut self, bytes: &[u8]) -> u64 {
		let mut out = marker(0x4, bytes.len());
		out.extend_from_slice(bytes);
		self.raw(out)
	}

	/// Single-byte string object; `text` must be Latin-1.
	pub fn ascii(&mut self, text: &str) -> u64 {
		let bytes: Vec<u8> = text.chars().map(|ch| ch as u8).collect();
		let mut out = marker(0x5, bytes.len());
		out.extend_from_slice(&bytes);
		self.raw(out)
	}

	/// UTF-16BE string object.
	pub fn utf16(&mut self, text: &str) -> u64 {
		let units: Vec<u16> = text.encode_utf16().collect();
		let mut out = marker(0x6, units.len());
		for unit in units {
			out.extend_from_slice(&unit.to_be_bytes());
		}
		self.raw(out)
	}

	/// UID object using `width` bytes (1..=16).
	pub fn uid(&mut self, value: u64, width: usize) -> u64 {
		let mut out = vec![0x80 | (width as u8 - 1)];
		let be = value.to_be_bytes();
		if width >= 8 {
			out.extend(std::iter::repeat_n(0, width - 8));
			out.extend_from_slice(&be);
		} else {
			out.extend_from_slice(&be[8 - width..]);
		}
		self.raw(out)
	}

	/// Array object referencing `items`.
	pub fn array(&mut self, items: &[u64]) -> u64 {
		let mut out = marker(0xA, items.len());
		self.push_refs(&mut out, items);
		self.raw(out)
	}

	/// Set object referencing `items`.
	pub fn set(&mut self, items: &[u64]) -> u64 {
		let mut out = marker(0xC, items.len());
		self.push_refs(&mut out, items);
		self.raw(out)
	}

	/// Dictionary object; `keys` and `values` are paired by position.
	pub fn dict(&mut self, keys: &[u64], values: &[u64]) -> u64 {
		assert_eq!(keys.len(), values.len(), "dictionary keys and values must pair up");
		let mut out = marker(0xD, keys.len());
		self.push_refs(&mut out, keys);
		self.push_refs(&mut out, values);
		self.raw(out)
	}

	/// Dictionary object with string keys.
	pub fn dict_str(&mut self, entries: &[(&str, u64)]) -> u64 {
		let keys: Vec<u64> = entries.iter().map(|(key, _)| self.ascii(key)).collect();
		let values: Vec<u64> = entries.iter().map(|(_, value)| *value).collect();
		self.dict(&keys, &values)
	}

	/// Lay out all objects with `root` as the top-level object.
	pub fn build(&self, root: u64) -> Vec<u8> {
		let mut out = b"bplist00".to_vec();
		let mut offsets = Vec::with_capacity(self.objects.len());
		for object in &self.objects {
			offsets.push(out.len() as u64);
			out.extend_from_slice(object);
		}

		let offset_table_offset = out.len() as u64;
		let offset_int_size = width_for(offset_table_offset);
		for offset in &offsets {
			out.extend_from_slice(&offset.to_be_bytes()[8 - offset_int_size..]);
		}

		out.extend_from_slice(&[0; 6]);
		out.push(offset_int_size as u8);
		out.push(self.ref_size);
		out.extend_from_slice(&(self.objects.len() as u64).to_be_bytes());
		out.extend_from_slice(&root.to_be_bytes());
		out.extend_from_slice(&offset_table_offset.to_be_bytes());
		out
	}

	fn push_refs(&self, out: &mut Vec<u8>, refs: &[u64]) {
		let width = usize::from(self.ref_size);
		for item in refs {
			out.extend_from_slice(&item.to_be_bytes()[8 - width..]);
		}
	}
}

/// Marker byte for `tag` with `len`, spilling lengths of 15 and above into a trailing integer object.
pub fn marker(tag: u8, len: usize) -> Vec<u8> {
	if len < 15 {
		return vec![(tag << 4) | len as u8];
	}
	let mut out = vec![(tag << 4) | 0x0F];
	out.extend(int_bytes(len as i64));
	out
}

/// Narrowest integer object encoding: 1/2/4 bytes for non-negative values, 8 bytes otherwise.
pub fn int_bytes(value: i64) -> Vec<u8> {
	let mut out = Vec::with_capacity(9);
	match value {
		0..=0xFF => {
			out.push(0x10);
			out.push(value as u8);
		}
		0x100..=0xFFFF => {
			out.push(0x11);
			out.extend_from_slice(&(value as u16).to_be_bytes());
		}
		0x1_0000..=0xFFFF_FFFF => {
			out.push(0x12);
			out.extend_from_slice(&(value as u32).to_be_bytes());
		}
		_ => {
			out.push(0x13);
			out.extend_from_slice(&value.to_be_bytes());
		}
	}
	out
}

/// Account fields of a macOS user plist fixture.
#[derive(Debug, Clone)]
pub struct AccountFixture {
	/// `name` array value, omitted when `None`.
	pub name: Option<String>,
	/// `uid` array value, omitted when `None`.
	pub uid: Option<String>,
	/// `gid` array value, omitted when `None`.
	pub gid: Option<String>,
	/// `shell` array value, omitted when `None`.
	pub shell: Option<String>,
	/// `realname` array values, omitted when empty.
	pub realname: Vec<String>,
	/// `hint` array values, omitted when empty.
	pub hint: Vec<String>,
	/// PBKDF2 salt.
	pub salt: Vec<u8>,
	/// PBKDF2 derived key bytes.
	pub entropy: Vec<u8>,
	/// PBKDF2 iteration count.
	pub iterations: i64,
}

impl Default for AccountFixture {
	fn default() -> Self {
		Self {
			name: None,
			uid: None,
			gid: None,
			shell: None,
			realname: Vec::new(),
			hint: Vec::new(),
			salt: vec![0xAA, 0xBB],
			entropy: vec![0x01; 64],
			iterations: 41000,
		}
	}
}

impl AccountFixture {
	/// Encode the embedded `ShadowHashData` plist.
	pub fn shadow_hash_data(&self) -> Vec<u8> {
		let mut inner = BplistBuilder::new();
		let salt = inner.data(&self.salt);
		let entropy = inner.data(&self.entropy);
		let iterations = inner.int(self.iterations);
		let params = inner.dict_str(&[("entropy", entropy), ("iterations", iterations), ("salt", salt)]);
		let root = inner.dict_str(&[("SALTED-SHA512-PBKDF2", params)]);
		inner.build(root)
	}

	/// Encode the full account plist.
	pub fn build(&self) -> Vec<u8> {
		let mut outer = BplistBuilder::with_ref_size(2);
		let mut entries = Vec::new();

		let blob = outer.data(&self.shadow_hash_data());
		let shadow = outer.array(&[blob]);
		entries.push(("ShadowHashData", shadow));

		for (key, value) in [("name", &self.name), ("uid", &self.uid), ("gid", &self.gid), ("shell", &self.shell)] {
			if let Some(value) = value {
				let item = outer.ascii(value);
				entries.push((key, outer.array(&[item])));
			}
		}
		for (key, values) in [("realname", &self.realname), ("hint", &self.hint)] {
			if !values.is_empty() {
				let items: Vec<u64> = values.iter().map(|value| outer.ascii(value)).collect();
				entries.push((key, outer.array(&items)));
			}
		}

		let root = outer.dict_str(&entries);
		outer.build(root)
	}
}

/// Write `bytes` into a named temporary file.
pub fn temp_file(bytes: &[u8]) -> tempfile::NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(".plist").tempfile().expect("temp file is created");
	file.write_all(bytes).expect("temp file is written");
	file.flush().expect("temp file is flushed");
	file
}

fn width_for(max: u64) -> usize {
	match max {
		0..=0xFF => 1,
		0x100..=0xFFFF => 2,
		0x1_0000..=0xFFFF_FFFF => 4,
		_ => 8,
	}
}
