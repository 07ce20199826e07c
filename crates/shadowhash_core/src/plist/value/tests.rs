use std::collections::HashSet;

use crate::plist::{APPLE_EPOCH_OFFSET, Date, Dictionary, Value, ValueSet};

#[test]
fn dictionary_keeps_encoded_order() {
	let dict: Dictionary = [(Value::from("zeta"), Value::from(1)), (Value::from("alpha"), Value::from(2))].into_iter().collect();
	let keys: Vec<&str> = dict.iter().filter_map(|(key, _)| key.as_str()).collect();
	assert_eq!(keys, vec!["zeta", "alpha"]);
	assert_eq!(dict.get("alpha"), Some(&Value::Integer(2)));
	assert_eq!(dict.get("missing"), None);
}

#[test]
fn duplicate_key_keeps_position_and_last_value() {
	let mut dict = Dictionary::new();
	assert_eq!(dict.insert(Value::from("a"), Value::from(1)), None);
	dict.insert(Value::from("b"), Value::from(2));
	assert_eq!(dict.insert(Value::from("a"), Value::from(3)), Some(Value::Integer(1)));

	assert_eq!(dict.len(), 2);
	let first = dict.iter().next().expect("dictionary has entries");
	assert_eq!(first, (&Value::from("a"), &Value::Integer(3)));
}

#[test]
fn dictionary_equality_ignores_order() {
	let left: Dictionary = [(Value::from("a"), Value::from(1)), (Value::from("b"), Value::from(2))].into_iter().collect();
	let right: Dictionary = [(Value::from("b"), Value::from(2)), (Value::from("a"), Value::from(1))].into_iter().collect();
	assert_eq!(left, right);

	let mut hashes = HashSet::new();
	hashes.insert(Value::Dictionary(left));
	assert!(hashes.contains(&Value::Dictionary(right)), "equal dictionaries must hash equally");
}

#[test]
fn non_string_keys_are_supported() {
	let mut dict = Dictionary::new();
	dict.insert(Value::Uid(7), Value::from("seven"));
	dict.insert(Value::Integer(7), Value::from("integer seven"));
	assert_eq!(dict.len(), 2, "uid and integer keys are distinct");
	assert_eq!(dict.get_value(&Value::Uid(7)), Some(&Value::from("seven")));
	assert_eq!(dict.get_value(&Value::Integer(7)), Some(&Value::from("integer seven")));
}

#[test]
fn set_deduplicates_structurally() {
	let set: ValueSet = [Value::from(4), Value::from("x"), Value::from(4), Value::from(0.5), Value::from(0.5)].into_iter().collect();
	assert_eq!(set.len(), 3);
	assert!(set.contains(&Value::from("x")));

	let reordered: ValueSet = [Value::from(0.5), Value::from("x"), Value::from(4)].into_iter().collect();
	assert_eq!(set, reordered);
}

#[test]
fn date_converts_from_reference_epoch() {
	let date = Date::from_absolute(0.0);
	assert_eq!(date.unix_seconds(), APPLE_EPOCH_OFFSET as f64);
	let utc = date.to_datetime().expect("reference date is representable");
	assert_eq!(utc.timestamp(), 978_307_200);
	assert_eq!(utc.timestamp_subsec_nanos(), 0);

	assert_eq!(Date::from_unix_seconds(978_307_200.0), date);
	assert_eq!(Date::from_absolute(f64::NAN).to_datetime(), None);
}

#[test]
fn accessors_match_kind() {
	let value = Value::Data(vec![1, 2]);
	assert_eq!(value.kind(), "data");
	assert_eq!(value.as_data(), Some(&[1_u8, 2][..]));
	assert_eq!(value.as_str(), None);
	assert_eq!(Value::Uid(3).as_uid(), Some(3));
	assert_eq!(Value::Uid(3).as_integer(), None);
}
