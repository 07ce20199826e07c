use std::path::{Path, PathBuf};

use shadowhash::plist::{DecodeOptions, PlistError};
use shadowhash::shadow::ExtractError;
use thiserror::Error;

/// Decoded-document JSON dump.
pub mod dump;
/// Hash line and JSON record extraction.
pub mod extract;

/// Output selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// `$pbkdf2-hmac-sha512$` lines.
	Line,
	/// One JSON record per file.
	Json,
	/// Decoded plist as JSON.
	Dump,
}

/// Failure for a single input file.
#[derive(Debug, Error)]
pub enum Failure {
	/// Hash extraction failed.
	#[error(transparent)]
	Extract(#[from] ExtractError),
	/// Plist reading failed.
	#[error(transparent)]
	Plist(#[from] PlistError),
	/// JSON rendering failed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}

/// Process every path in order, reporting failures on stderr; returns the number of failed files.
pub fn run(paths: &[PathBuf], mode: Mode, opt: &DecodeOptions) -> usize {
	let mut failed = 0;
	for path in paths {
		if let Err(err) = run_one(path, mode, opt) {
			eprintln!("{}: {err}", path.display());
			failed += 1;
		}
	}
	failed
}

fn run_one(path: &Path, mode: Mode, opt: &DecodeOptions) -> Result<(), Failure> {
	match mode {
		Mode::Line => extract::print_line(path, opt),
		Mode::Json => extract::print_json(path, opt),
		Mode::Dump => dump::run(path, opt),
	}
}

#[cfg(test)]
mod tests;
