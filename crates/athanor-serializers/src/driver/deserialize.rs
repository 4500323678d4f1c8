use crate::codecs::{self, json, yaml};
use crate::dispatch::{Converted, deserialize_default};
use crate::input::Input;
use crate::options::{CsvOptions, DeserializeOptions};
use athanor_core::{
	AttributeDescriptor, AttributeKind, DeserializationError, Direction, Format, Instance, Map, Model,
	ModelClass, ModelRegistry, Result, TableRow, Value,
};

/// Decode JSON or YAML `input` into the record it carries.
pub fn read_record(input: Input<'_>, format: Format) -> Result<Map> {
	let text = input.read_to_string()?;
	let value = match format {
		Format::Json => json::decode(&text)?,
		Format::Yaml => yaml::decode(&text)?,
		Format::Csv | Format::Dict => {
			return Err(DeserializationError::Parse {
				format,
				message: "only JSON and YAML records are decoded from a mapping".to_string(),
			}
			.into());
		}
	};
	Ok(codecs::into_record(value, format)?)
}

/// Decode a CSV record of `class`'s inbound columns.
pub fn read_csv_record(class: &ModelClass, input: Input<'_>, options: &CsvOptions) -> Result<Map> {
	let table = class.get_serialization_config(Format::Csv, Direction::Inbound, options.config_set.as_deref())?;
	if table.is_empty() {
		return Err(no_deserializable_attributes(class, Format::Csv).into());
	}
	let columns: Vec<String> = table.rows().iter().map(|row| row.display_name.clone()).collect();
	let text = input.read_to_string()?;
	Ok(codecs::csv::read_record(&text, &columns, &options.dialect)?)
}

/// Convert `record` into `(attribute, value)` assignments for `class`.
///
/// Nothing is assigned here, so a failure on any attribute leaves the target
/// untouched.
pub fn deserialize_record(
	class: &ModelClass,
	record: Map,
	format: Format,
	options: &DeserializeOptions,
) -> Result<Vec<(String, Value)>> {
	let table = class.get_serialization_config(format, Direction::Inbound, options.config_set.as_deref())?;
	if table.is_empty() {
		return Err(no_deserializable_attributes(class, format).into());
	}

	let extra: Vec<String> = record
		.keys()
		.filter(|key| table.row_for_key(key).is_none())
		.cloned()
		.collect();
	if !extra.is_empty() {
		if options.strict {
			return Err(DeserializationError::ExtraKeys {
				model: class.name().to_string(),
				format,
				keys: extra,
			}
			.into());
		}
		tracing::warn!(
			model = class.name(),
			format = %format,
			keys = ?extra,
			"ignoring keys with no deserializable attribute"
		);
	}

	let mut record = record;
	let mut assignments = Vec::with_capacity(record.len());
	for row in table.rows() {
		let Some(raw) = record.swap_remove(&row.display_name) else {
			continue;
		};
		let Some(descriptor) = class.attribute(&row.attribute) else {
			continue;
		};
		let value = deserialize_value(descriptor, row, raw, format, options)?;
		tracing::trace!(
			model = class.name(),
			attribute = %row.attribute,
			format = %format,
			"deserialized attribute"
		);
		assignments.push((row.attribute.clone(), value));
	}
	Ok(assignments)
}

/// Deserialize `record` and assign the results to `model`.
pub fn apply_record<M: Model + ?Sized>(
	model: &mut M,
	record: Map,
	format: Format,
	options: &DeserializeOptions,
) -> Result<()> {
	let class = model.model_class();
	for (attribute, value) in deserialize_record(&class, record, format, options)? {
		model.set_attribute(&attribute, value)?;
	}
	Ok(())
}

fn deserialize_value(
	descriptor: &AttributeDescriptor,
	row: &TableRow,
	raw: Value,
	format: Format,
	options: &DeserializeOptions,
) -> Result<Value> {
	if let Some(hook) = &row.on_deserialize {
		return hook
			.call(&raw)
			.map_err(|e| value_error(descriptor, row, format, &raw, e.to_string()).into());
	}

	match descriptor.kind() {
		AttributeKind::Relationship { target, many } => {
			if format == Format::Csv {
				return Err(unsupported(descriptor, row, format).into());
			}
			deserialize_related(descriptor, row, target, *many, raw, format, options)
		}
		AttributeKind::Column(value_type) | AttributeKind::Hybrid(value_type) => {
			match deserialize_default(value_type, format, raw.clone()) {
				Ok(Converted::Value(value)) => Ok(value),
				Ok(Converted::Unsupported) => Err(unsupported(descriptor, row, format).into()),
				Err(e) => Err(value_error(descriptor, row, format, &raw, e.to_string()).into()),
			}
		}
	}
}

fn deserialize_related(
	descriptor: &AttributeDescriptor,
	row: &TableRow,
	target: &str,
	many: bool,
	raw: Value,
	format: Format,
	options: &DeserializeOptions,
) -> Result<Value> {
	let expected = || format!("expected a mapping for a {target} instance");
	match raw {
		Value::Null | Value::Instance(_) => Ok(raw),
		Value::Map(map) => related_instance(target, map, format, options).map(Value::from),
		Value::List(items) if many => items
			.into_iter()
			.map(|item| match item {
				Value::Map(map) => related_instance(target, map, format, options).map(Value::from),
				Value::Instance(_) => Ok(item),
				other => Err(value_error(descriptor, row, format, &other, expected()).into()),
			})
			.collect::<Result<Vec<_>>>()
			.map(Value::List),
		other => Err(value_error(descriptor, row, format, &other, expected()).into()),
	}
}

fn related_instance(
	target: &str,
	record: Map,
	format: Format,
	options: &DeserializeOptions,
) -> Result<Instance> {
	let class = ModelRegistry::global().require(target)?;
	let mut instance = Instance::new(class);
	apply_record(&mut instance, record, format, options)?;
	Ok(instance)
}

fn no_deserializable_attributes(class: &ModelClass, format: Format) -> DeserializationError {
	DeserializationError::NoDeserializableAttributes {
		model: class.name().to_string(),
		format,
	}
}

fn unsupported(descriptor: &AttributeDescriptor, row: &TableRow, format: Format) -> DeserializationError {
	DeserializationError::Unsupported {
		attribute: row.attribute.clone(),
		format,
		value_type: descriptor.type_name(),
	}
}

fn value_error(
	descriptor: &AttributeDescriptor,
	row: &TableRow,
	format: Format,
	raw: &Value,
	message: String,
) -> DeserializationError {
	DeserializationError::Value {
		attribute: row.attribute.clone(),
		format,
		value: raw.describe(),
		target_type: descriptor.type_name(),
		message,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use athanor_core::{AttributeConfiguration, Error, ValueType};
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	fn config(name: &str) -> AttributeConfiguration {
		AttributeConfiguration::new(name).unwrap()
	}

	#[fixture]
	fn account() -> Arc<ModelClass> {
		ModelClass::builder("DriverAccount")
			.column("id", ValueType::Integer)
			.column("joined", ValueType::Date)
			.column("notes", ValueType::Json)
			.serialization([
				config("id").supports_all(true),
				config("joined").supports_all(true).with_display_name("joined_on"),
				config("notes").supports_all(true),
			])
			.build()
			.unwrap()
	}

	fn record(entries: &[(&str, Value)]) -> Map {
		entries
			.iter()
			.map(|(key, value)| (key.to_string(), value.clone()))
			.collect()
	}

	#[rstest]
	fn test_coerces_by_display_name(account: Arc<ModelClass>) {
		let assignments = deserialize_record(
			&account,
			record(&[("id", Value::from("12")), ("joined_on", Value::from("2024-02-29"))]),
			Format::Json,
			&DeserializeOptions::default(),
		)
		.unwrap();
		assert_eq!(assignments[0], ("id".to_string(), Value::Int(12)));
		assert_eq!(assignments[1].0, "joined");
		assert_eq!(assignments[1].1.to_string(), "2024-02-29");
	}

	#[rstest]
	fn test_bad_value_names_attribute_and_type(account: Arc<ModelClass>) {
		let err = deserialize_record(
			&account,
			record(&[("id", Value::from("twelve"))]),
			Format::Yaml,
			&DeserializeOptions::default(),
		)
		.unwrap_err();
		match err {
			Error::Deserialization(DeserializationError::Value {
				attribute,
				value,
				target_type,
				..
			}) => {
				assert_eq!(attribute, "id");
				assert_eq!(value, "\"twelve\"");
				assert_eq!(target_type, "integer");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_extra_keys(account: Arc<ModelClass>) {
		let input = record(&[("id", Value::Int(1)), ("joined", Value::from("2024-01-01"))]);
		let err = deserialize_record(&account, input.clone(), Format::Json, &DeserializeOptions::default())
			.unwrap_err();
		assert!(matches!(
			err,
			Error::Deserialization(DeserializationError::ExtraKeys { ref keys, .. }) if keys == &["joined"]
		));

		let lenient = DeserializeOptions::new().strict(false);
		let assignments = deserialize_record(&account, input, Format::Json, &lenient).unwrap();
		assert_eq!(assignments, vec![("id".to_string(), Value::Int(1))]);
	}

	#[rstest]
	fn test_mapping_rejected_for_csv(account: Arc<ModelClass>) {
		let err = deserialize_record(
			&account,
			record(&[("notes", Value::from("{}"))]),
			Format::Csv,
			&DeserializeOptions::default(),
		)
		.unwrap_err();
		assert!(matches!(
			err,
			Error::Deserialization(DeserializationError::Unsupported { ref attribute, .. }) if attribute == "notes"
		));
	}

	#[rstest]
	fn test_failed_update_leaves_instance_untouched(account: Arc<ModelClass>) {
		let mut instance = Instance::new(account).with("id", 1).unwrap();
		let result = apply_record(
			&mut instance,
			record(&[("id", Value::Int(2)), ("joined_on", Value::from("not a date"))]),
			Format::Dict,
			&DeserializeOptions::default(),
		);
		assert!(result.is_err());
		assert_eq!(instance.get("id"), Some(&Value::Int(1)));
	}

	#[rstest]
	fn test_read_record_rejects_csv() {
		assert!(read_record(Input::from("id\n1"), Format::Csv).is_err());
	}
}
