use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::plist::value::{Date, Dictionary, Value};
use crate::plist::{DecodeOptions, PlistError, Result, decode_with};

/// Read a property-list file, falling back to XML when it is not `bplist00`.
pub fn read_file(path: impl AsRef<Path>, opt: &DecodeOptions) -> Result<Value> {
	let bytes = fs::read(path)?;
	read_document(&bytes, opt)
}

/// Decode a binary plist, or parse it as XML when the binary magic is absent.
///
/// Only a magic mismatch triggers the fallback; malformed binary input is reported as is.
pub fn read_document(bytes: &[u8], opt: &DecodeOptions) -> Result<Value> {
	match decode_with(bytes, opt) {
		Err(PlistError::NotBinaryFormat { .. }) => {
			debug!(len = bytes.len(), "binary magic absent, parsing as xml plist");
			let value = ::plist::Value::from_reader_xml(io::Cursor::new(bytes))?;
			Ok(from_xml_value(&value))
		}
		other => other,
	}
}

fn from_xml_value(value: &::plist::Value) -> Value {
	match value {
		::plist::Value::Boolean(item) => Value::Bool(*item),
		// Values above `i64::MAX` keep their bit pattern, as an 8-byte binary integer would.
		::plist::Value::Integer(item) => Value::Integer(item.as_signed().or_else(|| item.as_unsigned().map(|raw| raw as i64)).unwrap_or_default()),
		::plist::Value::Real(item) => Value::from(*item),
		::plist::Value::Date(item) => Value::Date(Date::from_unix_seconds(unix_seconds(SystemTime::from(*item)))),
		::plist::Value::Data(item) => Value::Data(item.clone()),
		::plist::Value::String(item) => Value::String(item.clone()),
		::plist::Value::Uid(item) => Value::Uid(item.get()),
		::plist::Value::Array(items) => Value::Array(items.iter().map(from_xml_value).collect()),
		::plist::Value::Dictionary(items) => {
			let dict: Dictionary = items.iter().map(|(key, item)| (Value::from(key.as_str()), from_xml_value(item))).collect();
			Value::Dictionary(dict)
		}
		_ => Value::Null,
	}
}

fn unix_seconds(time: SystemTime) -> f64 {
	match time.duration_since(UNIX_EPOCH) {
		Ok(after) => after.as_secs_f64(),
		Err(before) => -before.duration().as_secs_f64(),
	}
}
