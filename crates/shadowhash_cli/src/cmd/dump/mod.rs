use std::path::Path;

use serde_json::{Map, Value as JsonValue, json};
use shadowhash::plist::{DecodeOptions, Value, read_file, to_hex};

use crate::cmd::Failure;

/// Print the decoded document as pretty JSON.
pub fn run(path: &Path, opt: &DecodeOptions) -> Result<(), Failure> {
	let value = read_file(path, opt)?;
	println!("{}", serde_json::to_string_pretty(&value_to_json_value(&value))?);
	Ok(())
}

/// Map a decoded plist value onto JSON.
///
/// Data becomes lowercase hex, dates RFC 3339 (or Unix seconds when out of range), and UIDs
/// `{"uid": n}`. Dictionaries with non-string keys become arrays of `[key, value]` pairs.
pub(crate) fn value_to_json_value(value: &Value) -> JsonValue {
	match value {
		Value::Null => JsonValue::Null,
		Value::Bool(v) => json!(v),
		Value::Integer(v) => json!(v),
		Value::Real(v) => json!(v.into_inner()),
		Value::Date(v) => match v.to_datetime() {
			Some(utc) => json!(utc.to_rfc3339()),
			None => json!(v.unix_seconds()),
		},
		Value::Data(v) => json!(to_hex(v)),
		Value::String(v) => json!(v),
		Value::Uid(v) => json!({ "uid": v }),
		Value::Array(items) => JsonValue::Array(items.iter().map(value_to_json_value).collect()),
		Value::Set(items) => JsonValue::Array(items.iter().map(value_to_json_value).collect()),
		Value::Dictionary(dict) => {
			if dict.iter().all(|(key, _)| key.as_str().is_some()) {
				let mut out = Map::new();
				for (key, item) in dict.iter() {
					if let Some(key) = key.as_str() {
						out.insert(key.to_owned(), value_to_json_value(item));
					}
				}
				JsonValue::Object(out)
			} else {
				JsonValue::Array(
					dict.iter()
						.map(|(key, item)| JsonValue::Array(vec![value_to_json_value(key), value_to_json_value(item)]))
						.collect(),
				)
			}
		}
	}
}

#[cfg(test)]
mod tests;
