use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;

/// Seconds between the Unix epoch and the Apple reference date (2001-01-01T00:00:00Z).
pub const APPLE_EPOCH_OFFSET: i64 = 978_307_200;

/// Decoded property-list value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
	/// Explicit null (and fill bytes, which carry no value).
	Null,
	/// Boolean.
	Bool(bool),
	/// Signed integer of up to 64 bits.
	Integer(i64),
	/// Single- or double-precision real, widened to `f64`.
	Real(OrderedFloat<f64>),
	/// Absolute time.
	Date(Date),
	/// Opaque byte blob.
	Data(Vec<u8>),
	/// Latin-1 or UTF-16 text.
	String(String),
	/// Keyed-archiver object reference.
	Uid(u64),
	/// Ordered sequence.
	Array(Vec<Value>),
	/// Deduplicated collection.
	Set(ValueSet),
	/// Key/value mapping with arbitrary value keys.
	Dictionary(Dictionary),
}

impl Value {
	/// Stable lowercase label for the value kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Integer(_) => "integer",
			Self::Real(_) => "real",
			Self::Date(_) => "date",
			Self::Data(_) => "data",
			Self::String(_) => "string",
			Self::Uid(_) => "uid",
			Self::Array(_) => "array",
			Self::Set(_) => "set",
			Self::Dictionary(_) => "dictionary",
		}
	}

	/// Return the boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Return the integer payload.
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Self::Integer(value) => Some(*value),
			_ => None,
		}
	}

	/// Return the real payload.
	pub fn as_real(&self) -> Option<f64> {
		match self {
			Self::Real(value) => Some(value.into_inner()),
			_ => None,
		}
	}

	/// Return the date payload.
	pub fn as_date(&self) -> Option<Date> {
		match self {
			Self::Date(value) => Some(*value),
			_ => None,
		}
	}

	/// Return the byte blob payload.
	pub fn as_data(&self) -> Option<&[u8]> {
		match self {
			Self::Data(value) => Some(value),
			_ => None,
		}
	}

	/// Return the string payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Return the UID payload.
	pub fn as_uid(&self) -> Option<u64> {
		match self {
			Self::Uid(value) => Some(*value),
			_ => None,
		}
	}

	/// Return array elements.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Return set members.
	pub fn as_set(&self) -> Option<&ValueSet> {
		match self {
			Self::Set(items) => Some(items),
			_ => None,
		}
	}

	/// Return the dictionary payload.
	pub fn as_dictionary(&self) -> Option<&Dictionary> {
		match self {
			Self::Dictionary(dict) => Some(dict),
			_ => None,
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Real(OrderedFloat(value))
	}
}

/// Point in time stored as seconds relative to the Apple reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
	/// Seconds since 2001-01-01T00:00:00Z.
	pub absolute_time: OrderedFloat<f64>,
}

impl Date {
	/// Build from seconds since the Apple reference date.
	pub fn from_absolute(seconds: f64) -> Self {
		Self {
			absolute_time: OrderedFloat(seconds),
		}
	}

	/// Build from seconds since the Unix epoch.
	pub fn from_unix_seconds(seconds: f64) -> Self {
		Self::from_absolute(seconds - APPLE_EPOCH_OFFSET as f64)
	}

	/// Seconds since the Unix epoch.
	pub fn unix_seconds(self) -> f64 {
		self.absolute_time.into_inner() + APPLE_EPOCH_OFFSET as f64
	}

	/// Convert to a UTC timestamp, or `None` when out of the representable range.
	pub fn to_datetime(self) -> Option<DateTime<Utc>> {
		let seconds = self.unix_seconds();
		if !seconds.is_finite() {
			return None;
		}
		let whole = seconds.floor();
		let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
		DateTime::from_timestamp(whole as i64, nanos)
	}
}

/// Insertion-ordered dictionary keyed by structural value equality.
///
/// Re-inserting an existing key keeps its original position and replaces the value.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
	entries: Vec<(Value, Value)>,
	index: HashMap<Value, usize>,
}

impl Dictionary {
	/// Create an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty dictionary with room for `capacity` pairs.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
			index: HashMap::with_capacity(capacity),
		}
	}

	/// Insert a pair, returning the replaced value for duplicate keys.
	pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
		if let Some(&slot) = self.index.get(&key) {
			return Some(std::mem::replace(&mut self.entries[slot].1, value));
		}
		self.index.insert(key.clone(), self.entries.len());
		self.entries.push((key, value));
		None
	}

	/// Look up a string key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.get_value(&Value::String(key.to_owned()))
	}

	/// Look up an arbitrary key.
	pub fn get_value(&self, key: &Value) -> Option<&Value> {
		self.index.get(key).map(|slot| &self.entries[*slot].1)
	}

	/// Number of pairs.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when there are no pairs.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate pairs in encoded order.
	pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
		self.entries.iter().map(|(key, value)| (key, value))
	}
}

impl PartialEq for Dictionary {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|(key, value)| other.get_value(key) == Some(value))
	}
}

impl Eq for Dictionary {}

impl Hash for Dictionary {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_usize(self.len());
		state.write_u64(unordered_digest(self.iter()));
	}
}

impl FromIterator<(Value, Value)> for Dictionary {
	fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
		let mut dict = Self::new();
		for (key, value) in iter {
			dict.insert(key, value);
		}
		dict
	}
}

/// Deduplicated value collection; iteration follows first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
	items: Vec<Value>,
	index: HashSet<Value>,
}

impl ValueSet {
	/// Create an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value, returning `false` when an equal value is already present.
	pub fn insert(&mut self, value: Value) -> bool {
		if self.index.contains(&value) {
			return false;
		}
		self.index.insert(value.clone());
		self.items.push(value);
		true
	}

	/// Return `true` when an equal value is present.
	pub fn contains(&self, value: &Value) -> bool {
		self.index.contains(value)
	}

	/// Number of distinct members.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Return `true` when there are no members.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Iterate members in first-occurrence order.
	pub fn iter(&self) -> impl Iterator<Item = &Value> {
		self.items.iter()
	}
}

impl PartialEq for ValueSet {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|item| other.contains(item))
	}
}

impl Eq for ValueSet {}

impl Hash for ValueSet {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_usize(self.len());
		state.write_u64(unordered_digest(self.iter()));
	}
}

impl FromIterator<Value> for ValueSet {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		let mut set = Self::new();
		for item in iter {
			set.insert(item);
		}
		set
	}
}

// Order-independent combination of per-item hashes.
fn unordered_digest<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
	items.fold(0_u64, |acc, item| {
		let mut hasher = DefaultHasher::new();
		item.hash(&mut hasher);
		acc.wrapping_add(hasher.finish())
	})
}

#[cfg(test)]
mod tests;
