use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::plist::{DecodeOptions, Dictionary, Value, decode_nested_with, read_file, to_hex};
use crate::shadow::{ExtractError, Result};

/// Top-level key holding the embedded password-verifier plist.
pub const SHADOW_HASH_DATA_KEY: &str = "ShadowHashData";
/// Embedded key holding PBKDF2-SHA512 parameters.
pub const PBKDF2_KEY: &str = "SALTED-SHA512-PBKDF2";
/// Fallback for a missing `uid`.
pub const DEFAULT_UID: &str = "500";
/// Fallback for a missing `gid`.
pub const DEFAULT_GID: &str = "500";
/// Fallback for a missing `shell`.
pub const DEFAULT_SHELL: &str = "bash";
/// Fallback for a missing `name`.
pub const DEFAULT_NAME: &str = "user";
/// Hex digits of a 64-byte PBKDF2-SHA512 derived key.
pub const ENTROPY_HEX_LEN: usize = 128;

/// Hash parameters and account fields extracted from one account plist.
///
/// `Display` renders the `$pbkdf2-hmac-sha512$` line consumed by password auditing tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowHash {
	/// Account short name.
	pub name: String,
	/// PBKDF2 iteration count.
	pub iterations: i64,
	/// Lowercase hex salt.
	pub salt: String,
	/// Lowercase hex derived key, limited to [`ENTROPY_HEX_LEN`] digits.
	pub entropy: String,
	/// Numeric user id as stored.
	pub uid: String,
	/// Numeric group id as stored.
	pub gid: String,
	/// Real name and password hint values, comma separated.
	pub hints: String,
	/// Login shell.
	pub shell: String,
	/// Source file name.
	pub path: String,
}

impl fmt::Display for ShadowHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}:$pbkdf2-hmac-sha512${}.{}.{}:{}:{}:{}:{}:{}",
			self.name, self.iterations, self.salt, self.entropy, self.uid, self.gid, self.hints, self.shell, self.path
		)
	}
}

/// Extract the hash record from an account plist on disk using default decode limits.
pub fn extract_file(path: impl AsRef<Path>) -> Result<ShadowHash> {
	extract_file_with(path, &DecodeOptions::default())
}

/// Extract the hash record from an account plist on disk.
pub fn extract_file_with(path: impl AsRef<Path>, opt: &DecodeOptions) -> Result<ShadowHash> {
	let path = path.as_ref();
	let root = read_file(path, opt)?;
	extract_document(&root, &path.display().to_string(), opt)
}

/// Extract the hash record from an already decoded account plist.
///
/// The embedded `ShadowHashData` blob is always decoded as a binary plist.
pub fn extract_document(root: &Value, path: &str, opt: &DecodeOptions) -> Result<ShadowHash> {
	let outer = root.as_dictionary().ok_or(ExtractError::MissingShadowHashData)?;
	let blob = outer
		.get(SHADOW_HASH_DATA_KEY)
		.and_then(Value::as_array)
		.and_then(<[Value]>::first)
		.filter(|item| item.as_data().is_some())
		.ok_or(ExtractError::MissingShadowHashData)?;

	let inner = decode_nested_with(blob, opt)?;
	let params = inner
		.as_dictionary()
		.and_then(|dict| dict.get(PBKDF2_KEY))
		.and_then(Value::as_dictionary)
		.ok_or(ExtractError::MissingPbkdf2)?;

	let salt = required(params, "salt", "data", Value::as_data)?;
	let entropy = required(params, "entropy", "data", Value::as_data)?;
	let iterations = required(params, "iterations", "integer", Value::as_integer)?;

	let mut entropy = to_hex(entropy);
	entropy.truncate(ENTROPY_HEX_LEN);

	let hints = hints_field(all_text(outer, "realname")?, all_text(outer, "hint")?);
	let record = ShadowHash {
		name: first_text(outer, "name", DEFAULT_NAME)?,
		iterations,
		salt: to_hex(salt),
		entropy,
		uid: first_text(outer, "uid", DEFAULT_UID)?,
		gid: first_text(outer, "gid", DEFAULT_GID)?,
		hints,
		shell: first_text(outer, "shell", DEFAULT_SHELL)?,
		path: path.to_owned(),
	};
	debug!(path, name = %record.name, iterations, "extracted pbkdf2 parameters");
	Ok(record)
}

fn required<'a, T>(dict: &'a Dictionary, field: &'static str, expected: &'static str, get: impl Fn(&'a Value) -> Option<T>) -> Result<T> {
	let value = dict.get(field).ok_or(ExtractError::MissingField { field })?;
	get(value).ok_or(ExtractError::FieldType {
		field,
		expected,
		got: value.kind(),
	})
}

// Account fields are arrays; the first element wins and an absent or empty array takes the default.
fn first_text(dict: &Dictionary, field: &'static str, default: &str) -> Result<String> {
	match dict.get(field) {
		None => Ok(default.to_owned()),
		Some(Value::Array(items)) => items.first().map_or_else(|| Ok(default.to_owned()), |item| text(field, item)),
		Some(item) => text(field, item),
	}
}

// Real names then hints, comma separated; an account with neither still yields a lone separator.
fn hints_field(mut realname: Vec<String>, hint: Vec<String>) -> String {
	realname.extend(hint);
	if realname.is_empty() {
		return ",".to_owned();
	}
	realname.join(",")
}

fn all_text(dict: &Dictionary, field: &'static str) -> Result<Vec<String>> {
	match dict.get(field) {
		None => Ok(Vec::new()),
		Some(Value::Array(items)) => items.iter().map(|item| text(field, item)).collect(),
		Some(item) => Ok(vec![text(field, item)?]),
	}
}

fn text(field: &'static str, value: &Value) -> Result<String> {
	match value {
		Value::String(item) => Ok(item.clone()),
		Value::Integer(item) => Ok(item.to_string()),
		Value::Real(item) => Ok(item.to_string()),
		Value::Bool(item) => Ok(item.to_string()),
		Value::Uid(item) => Ok(item.to_string()),
		other => Err(ExtractError::FieldType {
			field,
			expected: "string",
			got: other.kind(),
		}),
	}
}
