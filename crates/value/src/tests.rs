use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn insert_replaces_in_place() {
	let mut rec = record! { "x" => 1_i64, "y" => 2_i64 };
	let old = rec.insert("x", Value::from(5_i64));
	assert_eq!(old, Some(Value::Int(1)));
	assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["x", "y"]);
	assert_eq!(rec.len(), 2);
}

#[test]
fn record_equality_ignores_order() {
	let a = record! { "x" => 1_i64, "y" => "b" };
	let b = record! { "y" => "b", "x" => 1_i64 };
	assert_eq!(a, b);
	assert_ne!(a, record! { "x" => 1_i64 });
}

#[test]
fn remove_keeps_remaining_order() {
	let mut rec = record! { "a" => 1_i64, "b" => 2_i64, "c" => 3_i64 };
	assert_eq!(rec.remove("b"), Some(Value::Int(2)));
	assert_eq!(rec.remove("missing"), None);
	assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["a", "c"]);
}

#[test]
fn merge_descends_into_nested_records() {
	let mut rec = record! { "marker" => record! { "size" => 3_i64, "color" => "red" } };
	rec.merge(record! { "marker" => record! { "size" => 10_i64 }, "mode" => "lines" });

	let marker = rec.get("marker").and_then(|v| v.as_record().ok()).cloned();
	assert_eq!(marker, Some(record! { "size" => 10_i64, "color" => "red" }));
	assert_eq!(rec.get("mode"), Some(&Value::string("lines")));
}

#[test]
fn record_mut_replaces_scalars() {
	let mut rec = record! { "title" => "plain" };
	rec.record_mut("title").insert("text", Value::from("nested"));
	assert_eq!(rec.get("title"), Some(&Value::Record(record! { "text" => "nested" })));
}

#[test]
fn numeric_arrays_share_a_type() {
	assert_eq!(Value::from(vec![1_i64]).get_type(), ValueType::NumericArray);
	assert_eq!(Value::from(vec![1.0]).get_type(), ValueType::NumericArray);
	assert_eq!(Value::StringList(vec![]).get_type(), ValueType::List);
	assert_eq!(Value::List(vec![]).get_type(), ValueType::List);
	assert_ne!(Value::Int(1).get_type(), Value::Float(1.0).get_type());
}

#[test]
fn same_as_compares_numbers_across_element_types() {
	assert!(Value::from(vec![1_i64, 2]).same_as(&Value::from(vec![1.0, 2.0])));
	assert!(!Value::from(vec![1_i64, 2]).same_as(&Value::from(vec![1.0, 2.5])));
	assert!(Value::from(vec![f64::NAN]).same_as(&Value::from(vec![f64::NAN])));
	assert!(!Value::from(vec![1.0]).same_as(&Value::from(vec![1.0, 1.0])));
}

#[test]
fn same_as_matches_string_lists_and_lists() {
	let strings = Value::StringList(vec!["a".into(), "b".into()]);
	let list = Value::List(vec![Value::string("a"), Value::string("b")]);
	assert!(strings.same_as(&list));
	assert!(!strings.same_as(&Value::List(vec![Value::string("a"), Value::Nothing])));
}

#[test]
fn as_numbers_accepts_nullable_lists() {
	let list = Value::List(vec![Value::Int(1), Value::Nothing, Value::Float(2.5)]);
	let nums = list.as_numbers().expect("numeric list");
	assert_eq!(nums.len(), 3);
	assert_eq!(nums[0], 1.0);
	assert!(nums[1].is_nan());
	assert_eq!(nums[2], 2.5);

	let err = Value::string("x").as_numbers().unwrap_err();
	assert_eq!(err.got(), ValueType::String);
	assert_eq!(err.to_string(), "expected numeric array, got string");
}

#[test]
fn element_reads_sequences() {
	let vals = Value::StringList(vec!["a".into(), "b".into()]);
	assert_eq!(vals.seq_len(), Some(2));
	assert_eq!(vals.element(1), Some(Value::string("b")));
	assert_eq!(vals.element(2), None);
	assert_eq!(Value::Int(3).seq_len(), None);
}

#[test]
fn serializes_as_plain_json() {
	let rec = record! {
		"x" => vec![1_i64, 2],
		"name" => "trace",
		"visible" => true,
		"extra" => Value::Nothing,
		"marker" => record! { "size" => 2.5 },
	};
	let json = serde_json::to_value(&rec).expect("serializable");
	assert_eq!(
		json,
		serde_json::json!({
			"x": [1, 2],
			"name": "trace",
			"visible": true,
			"extra": null,
			"marker": { "size": 2.5 },
		})
	);
}

#[test]
fn display_summarises_sequences() {
	let rec = Value::Record(record! { "x" => vec![1.0, 2.0], "mode" => "markers" });
	assert_eq!(rec.to_string(), "{x: float[2], mode: markers}");
}

proptest! {
	#[test]
	fn same_as_is_reflexive_for_float_arrays(vals in proptest::collection::vec(any::<f64>(), 0..64)) {
		let value = Value::from(vals);
		prop_assert!(value.same_as(&value.clone()));
	}

	#[test]
	fn int_arrays_equal_their_float_widening(vals in proptest::collection::vec(-1_000_000_i64..1_000_000, 0..64)) {
		let widened: Vec<f64> = vals.iter().map(|v| *v as f64).collect();
		prop_assert!(Value::from(vals).same_as(&Value::from(widened)));
	}
}
