use shadowhash::plist::PlistError;
use shadowhash::shadow::ExtractError;

use crate::cmd::Failure;

#[test]
fn extract_failure_message_is_passed_through() {
	let failure = Failure::from(ExtractError::MissingShadowHashData);
	assert!(matches!(failure, Failure::Extract(ExtractError::MissingShadowHashData)));
	assert_eq!(failure.to_string(), "could not find ShadowHashData");
}

#[test]
fn plist_failure_message_is_passed_through() {
	let failure = Failure::from(PlistError::TooShort { len: 8 });
	assert_eq!(failure.to_string(), PlistError::TooShort { len: 8 }.to_string());
}

#[test]
fn json_failure_is_prefixed() {
	let err = serde_json::from_str::<serde_json::Value>("{").expect_err("unterminated object");
	let expected = format!("json: {err}");
	let failure = Failure::from(err);
	assert_eq!(failure.to_string(), expected);
	assert!(std::error::Error::source(&failure).is_some());
}
