//! Serializing then deserializing with the same format restores every attribute.

use athanor_core::{AttributeDescriptor, Instance, ModelClass, Value, ValueType};
use athanor_serializers::prelude::*;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use std::sync::Arc;

static RECORD: Lazy<Arc<ModelClass>> = Lazy::new(|| {
	ModelClass::builder("RoundTripRecord")
		.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
		.attribute(AttributeDescriptor::column("label", ValueType::Text).supports_all(true))
		.attribute(AttributeDescriptor::column("score", ValueType::Float).supports_all(true))
		.attribute(AttributeDescriptor::column("active", ValueType::Boolean).supports_all(true))
		.attribute(AttributeDescriptor::column("joined", ValueType::Date).supports_all(true))
		.attribute(AttributeDescriptor::column("seen", ValueType::DateTime).supports_all(true))
		.attribute(AttributeDescriptor::column("price", ValueType::Decimal).supports_all(true))
		.attribute(AttributeDescriptor::column("uptime", ValueType::Interval).supports_all(true))
		.build()
		.unwrap()
});

#[derive(Debug, Clone)]
struct Sample {
	id: i64,
	label: String,
	score: f64,
	active: bool,
	joined: NaiveDate,
	seen: NaiveDateTime,
	price: Decimal,
	uptime: TimeDelta,
}

/// Labels never equal the CSV null text and are never empty; those two
/// values read back as null (see `test_csv_null_text_collapses_to_null`).
fn sample() -> impl Strategy<Value = Sample> {
	(
		any::<i64>(),
		"[a-z][a-z ]{0,15}",
		-1.0e6f64..1.0e6,
		any::<bool>(),
		(1900i32..2100, 1u32..=12, 1u32..=28),
		(0u32..24, 0u32..60, 0u32..60),
		(-1_000_000i64..1_000_000, 0u32..4),
		-86_400i64..86_400,
	)
		.prop_map(|(id, label, score, active, (y, m, d), (hh, mm, ss), (units, scale), uptime)| {
			let joined = NaiveDate::from_ymd_opt(y, m, d).unwrap();
			Sample {
				id,
				label,
				score,
				active,
				joined,
				seen: joined.and_hms_opt(hh, mm, ss).unwrap(),
				price: Decimal::new(units, scale),
				uptime: TimeDelta::seconds(uptime),
			}
		})
}

fn instance(sample: &Sample) -> Instance {
	let values: [(&str, Value); 8] = [
		("id", sample.id.into()),
		("label", sample.label.as_str().into()),
		("score", sample.score.into()),
		("active", sample.active.into()),
		("joined", sample.joined.into()),
		("seen", sample.seen.into()),
		("price", sample.price.into()),
		("uptime", sample.uptime.into()),
	];
	values
		.into_iter()
		.fold(Instance::new(Arc::clone(&RECORD)), |instance, (name, value)| {
			instance.with(name, value).unwrap()
		})
}

/// Decimals leave JSON and YAML as floats; compare by value.
fn normalized(instance: &Instance) -> Vec<Value> {
	instance
		.values()
		.values()
		.map(|value| match value {
			Value::Decimal(d) => Value::Decimal(d.normalize()),
			other => other.clone(),
		})
		.collect()
}

proptest! {
	#[test]
	fn prop_json_round_trip(sample in sample()) {
		let original = instance(&sample);
		let text = original.to_json(&SerializeOptions::default()).unwrap();
		let restored = RECORD.new_from_json(text, &DeserializeOptions::default()).unwrap();
		prop_assert_eq!(normalized(&restored), normalized(&original));
	}

	#[test]
	fn prop_yaml_round_trip(sample in sample()) {
		let original = instance(&sample);
		let text = original.to_yaml(&SerializeOptions::default()).unwrap();
		let restored = RECORD.new_from_yaml(text, &DeserializeOptions::default()).unwrap();
		prop_assert_eq!(normalized(&restored), normalized(&original));
	}

	#[test]
	fn prop_csv_round_trip(sample in sample()) {
		let original = instance(&sample);
		let options = CsvOptions::default().include_header(true);
		let text = original.to_csv(&options).unwrap();
		let restored = RECORD.new_from_csv(text, &options).unwrap();
		prop_assert_eq!(normalized(&restored), normalized(&original));
	}

	#[test]
	fn prop_dict_round_trip(sample in sample()) {
		let original = instance(&sample);
		let dict = original.to_dict(&SerializeOptions::default()).unwrap();
		let restored = RECORD.new_from_dict(dict, &DeserializeOptions::default()).unwrap();
		prop_assert_eq!(restored, original);
	}
}

static NOTE: Lazy<Arc<ModelClass>> = Lazy::new(|| {
	ModelClass::builder("RoundTripNote")
		.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
		.attribute(AttributeDescriptor::column("note", ValueType::Text).supports_all(true))
		.build()
		.unwrap()
});

fn note(text: &str) -> Instance {
	Instance::new(Arc::clone(&NOTE))
		.with("id", 1)
		.unwrap()
		.with("note", text)
		.unwrap()
}

#[rstest]
#[case("", "1|None\r\n")]
#[case("None", "1|None\r\n")]
fn test_csv_null_text_collapses_to_null(#[case] text: &str, #[case] expected_row: &str) {
	let options = CsvOptions::default();
	let row = note(text).get_csv_data(&options).unwrap();
	assert_eq!(row, expected_row);

	let restored = NOTE.new_from_csv(row, &options).unwrap();
	assert_eq!(restored.get("note"), Some(&Value::Null));
	assert_eq!(restored.get("id"), Some(&Value::Int(1)));
}

#[rstest]
fn test_csv_null_text_is_configurable() {
	let options = CsvOptions::default().dialect(CsvDialect::default().null_text("NULL"));
	let row = note("None").get_csv_data(&options).unwrap();
	assert_eq!(row, "1|None\r\n");

	let restored = NOTE.new_from_csv(row, &options).unwrap();
	assert_eq!(restored.get("note"), Some(&Value::from("None")));
}

#[rstest]
#[case("")]
#[case("None")]
fn test_json_keeps_text_that_csv_reads_as_null(#[case] text: &str) {
	let original = note(text);
	let json = original.to_json(&SerializeOptions::default()).unwrap();
	let restored = NOTE.new_from_json(json, &DeserializeOptions::default()).unwrap();
	assert_eq!(restored, original);
}
