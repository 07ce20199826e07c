mod error;
mod extract;

/// Error and result aliases.
pub use error::{ExtractError, Result};
/// Extraction entry points and the rendered hash record.
pub use extract::{
	DEFAULT_GID, DEFAULT_NAME, DEFAULT_SHELL, DEFAULT_UID, ENTROPY_HEX_LEN, PBKDF2_KEY, SHADOW_HASH_DATA_KEY, ShadowHash, extract_document, extract_file,
	extract_file_with,
};
