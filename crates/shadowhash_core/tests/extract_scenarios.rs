#![allow(missing_docs)]

use shadowhash::plist::{DecodeOptions, PlistError, Value, decode, decode_nested, read_file};
use shadowhash::shadow::{ENTROPY_HEX_LEN, ExtractError, extract_file};
use shadowhash_testkit::{AccountFixture, temp_file};

#[test]
fn account_plist_round_trips_through_both_decodes() {
	let fixture = AccountFixture {
		name: Some("alice".to_owned()),
		uid: Some("501".to_owned()),
		..AccountFixture::default()
	};
	let outer = decode(&fixture.build()).expect("outer decodes");
	let dict = outer.as_dictionary().expect("outer is a dictionary");

	let blob = dict
		.get("ShadowHashData")
		.and_then(Value::as_array)
		.and_then(<[Value]>::first)
		.expect("ShadowHashData blob");
	let inner = decode_nested(blob).expect("inner decodes");
	let params = inner
		.as_dictionary()
		.and_then(|item| item.get("SALTED-SHA512-PBKDF2"))
		.and_then(Value::as_dictionary)
		.expect("pbkdf2 parameters");

	assert_eq!(params.get("iterations"), Some(&Value::Integer(41000)));
	assert_eq!(params.get("salt").and_then(Value::as_data), Some(&[0xAA_u8, 0xBB][..]));
	assert_eq!(params.get("entropy").and_then(Value::as_data).map(<[u8]>::len), Some(64));
}

#[test]
fn extracts_hash_line_from_disk() {
	let fixture = AccountFixture {
		name: Some("alice".to_owned()),
		uid: Some("501".to_owned()),
		..AccountFixture::default()
	};
	let file = temp_file(&fixture.build());
	let path = file.path().display().to_string();

	let line = extract_file(file.path()).expect("extract succeeds").to_string();
	assert_eq!(line, format!("alice:$pbkdf2-hmac-sha512$41000.aabb.{}:501:500:,:bash:{path}", "01".repeat(64)));
}

#[test]
fn oversized_entropy_keeps_first_sixty_four_bytes() {
	let fixture = AccountFixture {
		entropy: (0..=127).collect(),
		..AccountFixture::default()
	};
	let file = temp_file(&fixture.build());
	let record = extract_file(file.path()).expect("extract succeeds");

	let expected: String = (0..64_u8).map(|byte| format!("{byte:02x}")).collect();
	assert_eq!(record.entropy.len(), ENTROPY_HEX_LEN);
	assert_eq!(record.entropy, expected);
}

#[test]
fn unreadable_path_is_io_failure() {
	let err = extract_file("/nonexistent/shadowhash/user.plist").expect_err("path does not exist");
	assert!(matches!(err, ExtractError::Io(_)));

	let err = read_file("/nonexistent/shadowhash/user.plist", &DecodeOptions::default()).expect_err("path does not exist");
	assert!(matches!(err, PlistError::Io(_)));
}

#[test]
fn corrupt_binary_is_decode_failure() {
	let mut bytes = AccountFixture::default().build();
	let len = bytes.len();
	bytes[len - 26] = 0;
	let file = temp_file(&bytes);

	let err = extract_file(file.path()).expect_err("zero offset width");
	assert!(matches!(err, ExtractError::Decode(PlistError::InvalidTrailer { .. })), "unexpected error: {err}");
}
