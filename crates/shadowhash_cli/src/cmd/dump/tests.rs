use serde_json::json;
use shadowhash::plist::{Date, Dictionary, Value, ValueSet};

use crate::cmd::dump::value_to_json_value;

#[test]
fn scalars_map_to_json() {
	assert_eq!(value_to_json_value(&Value::Null), json!(null));
	assert_eq!(value_to_json_value(&Value::Bool(true)), json!(true));
	assert_eq!(value_to_json_value(&Value::Integer(-3)), json!(-3));
	assert_eq!(value_to_json_value(&Value::from(0.25)), json!(0.25));
	assert_eq!(value_to_json_value(&Value::Data(vec![0x00, 0xAB])), json!("00ab"));
	assert_eq!(value_to_json_value(&Value::Uid(4)), json!({ "uid": 4 }));
}

#[test]
fn dates_render_as_rfc3339() {
	let value = Value::Date(Date::from_absolute(0.0));
	assert_eq!(value_to_json_value(&value), json!("2001-01-01T00:00:00+00:00"));
}

#[test]
fn string_keyed_dictionaries_become_objects() {
	let dict: Dictionary = [
		(Value::from("name"), Value::Array(vec![Value::from("alice")])),
		(Value::from("uid"), Value::Array(vec![Value::from("501")])),
	]
	.into_iter()
	.collect();
	assert_eq!(value_to_json_value(&Value::Dictionary(dict)), json!({ "name": ["alice"], "uid": ["501"] }));
}

#[test]
fn other_keys_become_pairs() {
	let dict: Dictionary = [(Value::Uid(1), Value::from("one"))].into_iter().collect();
	assert_eq!(value_to_json_value(&Value::Dictionary(dict)), json!([[{ "uid": 1 }, "one"]]));
}

#[test]
fn sets_become_arrays() {
	let set: ValueSet = [Value::from(1), Value::from(1), Value::from(2)].into_iter().collect();
	assert_eq!(value_to_json_value(&Value::Set(set)), json!([1, 2]));
}
