use thiserror::Error;

use crate::plist::PlistError;

/// Crate-local result type for hash extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Per-file extraction failures.
#[derive(Debug, Error)]
pub enum ExtractError {
	/// File could not be read.
	#[error("{0}")]
	Io(#[from] std::io::Error),
	/// Input is neither a binary nor an XML property list.
	#[error("not a plist file")]
	NotAPlist,
	/// Property list decoding failed.
	#[error("{0}")]
	Decode(PlistError),
	/// Top-level dictionary has no `ShadowHashData` blob.
	#[error("could not find ShadowHashData")]
	MissingShadowHashData,
	/// Embedded plist has no `SALTED-SHA512-PBKDF2` dictionary.
	#[error("does not contain SALTED-SHA512-PBKDF2")]
	MissingPbkdf2,
	/// Required field is absent.
	#[error("missing field {field}")]
	MissingField {
		/// Field key.
		field: &'static str,
	},
	/// Field is present with the wrong value kind.
	#[error("field {field}: expected {expected}, got {got}")]
	FieldType {
		/// Field key.
		field: &'static str,
		/// Expected value kind.
		expected: &'static str,
		/// Actual value kind.
		got: &'static str,
	},
}

impl From<PlistError> for ExtractError {
	fn from(err: PlistError) -> Self {
		match err {
			PlistError::Io(err) => Self::Io(err),
			PlistError::Xml(_) => Self::NotAPlist,
			other => Self::Decode(other),
		}
	}
}
