use std::path::Path;

use shadowhash::plist::DecodeOptions;
use shadowhash::shadow::extract_file_with;

use crate::cmd::Failure;

/// Print the crackable hash line for one account plist.
pub fn print_line(path: &Path, opt: &DecodeOptions) -> Result<(), Failure> {
	let record = extract_file_with(path, opt)?;
	println!("{record}");
	Ok(())
}

/// Print the extracted record as a single-line JSON object.
pub fn print_json(path: &Path, opt: &DecodeOptions) -> Result<(), Failure> {
	let record = extract_file_with(path, opt)?;
	println!("{}", serde_json::to_string(&record)?);
	Ok(())
}
