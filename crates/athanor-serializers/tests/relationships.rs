//! Related objects: nesting limits, CSV rejection and nested construction.

use athanor_core::{
	AttributeDescriptor, Error, Format, Instance, ModelClass, ModelRegistry, SerializationError, Value,
	ValueType,
};
use athanor_serializers::prelude::*;
use once_cell::sync::Lazy;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

struct Shop {
	order: Arc<ModelClass>,
	line: Arc<ModelClass>,
	customer: Arc<ModelClass>,
}

static SHOP: Lazy<Shop> = Lazy::new(|| {
	let customer = ModelClass::builder("RelCustomer")
		.attribute(AttributeDescriptor::column("name", ValueType::Text).supports_all(true))
		.build()
		.unwrap();
	let line = ModelClass::builder("RelOrderLine")
		.attribute(AttributeDescriptor::column("sku", ValueType::Text).supports_all(true))
		.attribute(AttributeDescriptor::column("quantity", ValueType::Integer).supports_all(true))
		.build()
		.unwrap();
	let order = ModelClass::builder("RelOrder")
		.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
		.attribute(
			AttributeDescriptor::relationship("lines", "RelOrderLine")
				.many()
				.supports_all(true),
		)
		.attribute(AttributeDescriptor::relationship("customer", "RelCustomer").supports_all(true))
		.build()
		.unwrap();
	let registry = ModelRegistry::global();
	registry.register(Arc::clone(&customer));
	registry.register(Arc::clone(&line));
	registry.register(Arc::clone(&order));
	Shop {
		order,
		line,
		customer,
	}
});

fn sample_order() -> Instance {
	let line = Instance::new(Arc::clone(&SHOP.line))
		.with("sku", "LAMP-1")
		.unwrap()
		.with("quantity", 2)
		.unwrap();
	let customer = Instance::new(Arc::clone(&SHOP.customer))
		.with("name", "Ada")
		.unwrap();
	Instance::new(Arc::clone(&SHOP.order))
		.with("id", 10)
		.unwrap()
		.with("lines", Value::List(vec![Value::from(line)]))
		.unwrap()
		.with("customer", customer)
		.unwrap()
}

fn parse(text: &str) -> serde_json::Value {
	serde_json::from_str(text).unwrap()
}

#[rstest]
fn test_related_objects_omitted_by_default() {
	let text = sample_order().to_json(&SerializeOptions::default()).unwrap();
	assert_eq!(parse(&text), json!({"id": 10}));
}

#[rstest]
fn test_related_objects_included_up_to_max_nesting() {
	let text = sample_order()
		.to_json(&SerializeOptions::new().max_nesting(1))
		.unwrap();
	assert_eq!(
		parse(&text),
		json!({
			"id": 10,
			"lines": [{"sku": "LAMP-1", "quantity": 2}],
			"customer": {"name": "Ada"}
		})
	);
}

#[rstest]
fn test_null_relationship_is_null() {
	let order = Instance::new(Arc::clone(&SHOP.order)).with("id", 1).unwrap();
	let dict = order.to_dict(&SerializeOptions::default()).unwrap();
	assert_eq!(dict.get("customer"), Some(&Value::Null));
	assert!(!dict.contains_key("lines"));
}

#[rstest]
fn test_relationship_unsupported_in_csv() {
	let err = sample_order().to_csv(&CsvOptions::default()).unwrap_err();
	assert!(matches!(
		err,
		Error::Serialization(SerializationError::Unsupported { ref attribute, format: Format::Csv, .. })
			if attribute == "lines" || attribute == "customer"
	));
	assert!(sample_order().to_json(&SerializeOptions::default()).is_ok());
}

#[rstest]
fn test_nested_records_become_instances() {
	let order = SHOP
		.order
		.new_from_json(
			r#"{"id": 3, "lines": [{"sku": "A", "quantity": "4"}], "customer": {"name": "Grace"}}"#,
			&DeserializeOptions::default(),
		)
		.unwrap();

	let lines = order.get("lines").and_then(Value::as_list).unwrap();
	let line = lines[0].as_instance().unwrap();
	assert_eq!(line.class().name(), "RelOrderLine");
	assert_eq!(line.get("quantity"), Some(&Value::Int(4)));

	let customer = order.get("customer").and_then(Value::as_instance).unwrap();
	assert_eq!(customer.get("name"), Some(&Value::from("Grace")));
}

#[rstest]
fn test_round_trip_with_nesting() {
	let original = sample_order();
	let text = original.to_yaml(&SerializeOptions::new().max_nesting(1)).unwrap();
	let restored = SHOP
		.order
		.new_from_yaml(text.as_str(), &DeserializeOptions::default())
		.unwrap();
	assert_eq!(restored, original);
}
