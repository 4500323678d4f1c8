use super::Mode;
use crate::codecs::csv::render_field;
use crate::dispatch::{Converted, serialize_default};
use crate::options::{CsvOptions, SerializeOptions};
use athanor_core::{
	AttributeDescriptor, AttributeKind, Direction, Format, Map, Model, ModelClass, Result,
	SerializationError, TableRow, Value,
};

/// Serialize the outbound-eligible attributes of `model` for `format`.
///
/// Keys are display names in table order. Related objects are included as
/// nested records while `options.current_nesting` stays below
/// `options.max_nesting`, and omitted beyond it.
pub fn serialize_record<M: Model + ?Sized>(
	model: &M,
	format: Format,
	options: &SerializeOptions,
) -> Result<Map> {
	serialize_fields(model, format, options, Mode::Configured)
}

/// Serialize every attribute of `model` regardless of its support flags.
///
/// Hooks are still applied. Values whose type the format cannot represent are
/// passed through unconverted.
pub fn dump_record<M: Model + ?Sized>(
	model: &M,
	format: Format,
	options: &SerializeOptions,
) -> Result<Map> {
	serialize_fields(model, format, options, Mode::Dump)
}

/// Header and data fields of `model`'s CSV row.
pub fn csv_rows<M: Model + ?Sized>(
	model: &M,
	options: &CsvOptions,
	dump: bool,
) -> Result<(Vec<String>, Vec<String>)> {
	let serialize_options = SerializeOptions {
		config_set: options.config_set.clone(),
		..SerializeOptions::default()
	};
	let mode = if dump { Mode::Dump } else { Mode::Configured };
	let record = serialize_fields(model, Format::Csv, &serialize_options, mode)?;
	let header = record.keys().cloned().collect();
	let fields = record
		.values()
		.map(|value| render_field(value, &options.dialect))
		.collect();
	Ok((header, fields))
}

fn serialize_fields<M: Model + ?Sized>(
	model: &M,
	format: Format,
	options: &SerializeOptions,
	mode: Mode,
) -> Result<Map> {
	if options.current_nesting > options.max_nesting {
		return Err(SerializationError::MaximumNestingExceeded {
			current: options.current_nesting,
			max: options.max_nesting,
		}
		.into());
	}

	let class = model.model_class();
	let set = class.serialization_config(options.config_set.as_deref())?;
	let table = match mode {
		Mode::Configured => set.table(format, Direction::Outbound),
		Mode::Dump => set.full_table(format, Direction::Outbound),
	};
	if table.is_empty() {
		return Err(SerializationError::NoSerializableAttributes {
			model: class.name().to_string(),
			format,
		}
		.into());
	}

	let mut record = Map::with_capacity(table.len());
	for row in table.rows() {
		let Some(descriptor) = class.attribute(&row.attribute) else {
			continue;
		};
		let value = model.get_attribute(&row.attribute).unwrap_or_default();
		if let Some(converted) = serialize_value(&class, descriptor, row, value, format, options, mode)? {
			tracing::trace!(
				model = class.name(),
				attribute = %row.attribute,
				format = %format,
				"serialized attribute"
			);
			record.insert(row.display_name.clone(), converted);
		}
	}
	Ok(record)
}

/// The serialized form of one attribute, or `None` when it is omitted.
fn serialize_value(
	class: &ModelClass,
	descriptor: &AttributeDescriptor,
	row: &TableRow,
	value: Value,
	format: Format,
	options: &SerializeOptions,
	mode: Mode,
) -> Result<Option<Value>> {
	if let Some(hook) = &row.on_serialize {
		return hook
			.call(&value)
			.map(Some)
			.map_err(|e| value_error(row, format, &value, e.to_string()).into());
	}

	match descriptor.kind() {
		AttributeKind::Relationship { target, .. } => {
			serialize_related(class, row, target, value, format, options, mode)
		}
		AttributeKind::Column(value_type) | AttributeKind::Hybrid(value_type) => {
			match serialize_default(value_type, format, value.clone()) {
				Ok(Converted::Value(converted)) => Ok(Some(converted)),
				Ok(Converted::Unsupported) if mode == Mode::Dump => Ok(Some(value)),
				Ok(Converted::Unsupported) => Err(SerializationError::Unsupported {
					attribute: row.attribute.clone(),
					format,
					value_type: value_type.to_string(),
				}
				.into()),
				Err(e) => Err(value_error(row, format, &value, e.to_string()).into()),
			}
		}
	}
}

fn serialize_related(
	class: &ModelClass,
	row: &TableRow,
	target: &str,
	value: Value,
	format: Format,
	options: &SerializeOptions,
	mode: Mode,
) -> Result<Option<Value>> {
	if format == Format::Csv {
		if mode == Mode::Dump {
			return Ok(Some(value));
		}
		let value_type = class
			.attribute(&row.attribute)
			.map_or_else(|| target.to_string(), AttributeDescriptor::type_name);
		return Err(SerializationError::Unsupported {
			attribute: row.attribute.clone(),
			format,
			value_type,
		}
		.into());
	}

	if value.is_null() {
		return Ok(Some(Value::Null));
	}
	if options.current_nesting >= options.max_nesting {
		if value.holds_instances() {
			tracing::warn!(
				model = class.name(),
				attribute = %row.attribute,
				max_nesting = options.max_nesting,
				"omitting related objects beyond the maximum nesting depth"
			);
		}
		return Ok(None);
	}

	let nested = options.nested();
	match &value {
		Value::Instance(instance) => {
			serialize_fields(instance.as_ref(), format, &nested, mode).map(|record| Some(Value::Map(record)))
		}
		Value::List(items) => items
			.iter()
			.map(|item| match item {
				Value::Instance(instance) => {
					serialize_fields(instance.as_ref(), format, &nested, mode).map(Value::Map)
				}
				Value::Null => Ok(Value::Null),
				other => Err(value_error(row, format, other, format!("expected a {target} instance")).into()),
			})
			.collect::<Result<Vec<_>>>()
			.map(|items| Some(Value::List(items))),
		other => Err(value_error(row, format, other, format!("expected a {target} instance")).into()),
	}
}

fn value_error(row: &TableRow, format: Format, value: &Value, message: String) -> SerializationError {
	SerializationError::Value {
		attribute: row.attribute.clone(),
		format,
		value: value.describe(),
		message,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use athanor_core::{AttributeConfiguration, AttributeDescriptor, Error, Hook, Instance, ValueType};
	use rstest::rstest;
	use std::sync::Arc;

	fn config(name: &str) -> AttributeConfiguration {
		AttributeConfiguration::new(name).unwrap()
	}

	fn gadget() -> Arc<ModelClass> {
		ModelClass::builder("DriverGadget")
			.column("id", ValueType::Integer)
			.column("tags", ValueType::Set)
			.column("hidden", ValueType::Text)
			.serialization([
				config("id").supports_all(true).with_display_name("key"),
				config("tags").supports_all(true),
			])
			.build()
			.unwrap()
	}

	#[rstest]
	fn test_display_names_and_flags() {
		let gadget = Instance::new(gadget())
			.with("id", 3)
			.unwrap()
			.with("hidden", "x")
			.unwrap();
		let record = serialize_record(&gadget, Format::Dict, &SerializeOptions::default()).unwrap();
		assert_eq!(record.keys().collect::<Vec<_>>(), vec!["key", "tags"]);
		assert_eq!(record["key"], Value::Int(3));
	}

	#[rstest]
	fn test_dump_includes_everything() {
		let gadget = Instance::new(gadget())
			.with("tags", Value::List(vec![Value::from("a")]))
			.unwrap();
		let record = dump_record(&gadget, Format::Csv, &SerializeOptions::default()).unwrap();
		assert_eq!(record.len(), 3);
		assert_eq!(record["tags"], Value::List(vec![Value::from("a")]));
	}

	#[rstest]
	fn test_unsupported_collection_in_csv() {
		let gadget = Instance::new(gadget())
			.with("tags", Value::List(vec![Value::from("a")]))
			.unwrap();
		let err = csv_rows(&gadget, &CsvOptions::default(), false).unwrap_err();
		assert!(matches!(
			err,
			Error::Serialization(SerializationError::Unsupported { ref attribute, format: Format::Csv, .. })
				if attribute == "tags"
		));
	}

	#[rstest]
	fn test_inconsistent_nesting() {
		let gadget = Instance::new(gadget());
		let options = SerializeOptions::new().current_nesting(2).max_nesting(1);
		let err = serialize_record(&gadget, Format::Json, &options).unwrap_err();
		assert!(matches!(
			err,
			Error::Serialization(SerializationError::MaximumNestingExceeded { current: 2, max: 1 })
		));
	}

	#[rstest]
	fn test_nesting_at_usize_max_omits_related() {
		let part = ModelClass::builder("DriverPart")
			.attribute(AttributeDescriptor::column("sku", ValueType::Text).supports_all(true))
			.build()
			.unwrap();
		let assembly = ModelClass::builder("DriverAssembly")
			.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
			.attribute(AttributeDescriptor::relationship("part", "DriverPart").supports_all(true))
			.build()
			.unwrap();
		let child = Instance::new(part).with("sku", "P-1").unwrap();
		let instance = Instance::new(assembly)
			.with("id", 1)
			.unwrap()
			.with("part", child)
			.unwrap();

		let options = SerializeOptions::new()
			.current_nesting(usize::MAX)
			.max_nesting(usize::MAX);
		let record = serialize_record(&instance, Format::Json, &options).unwrap();
		assert_eq!(record.keys().collect::<Vec<_>>(), vec!["id"]);
		assert_eq!(options.nested().current_nesting, usize::MAX);
	}

	#[rstest]
	fn test_hook_failure_names_attribute_and_value() {
		let class = ModelClass::builder("DriverHooked")
			.attribute(
				AttributeDescriptor::column("code", ValueType::Text)
					.supports_json(true)
					.on_serialize(Hook::new(|_| Err("rejected".into()))),
			)
			.build()
			.unwrap();
		let instance = Instance::new(class).with("code", "abc").unwrap();
		let err = serialize_record(&instance, Format::Json, &SerializeOptions::default()).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Attribute 'code': could not serialize \"abc\" to json: rejected"
		);
	}
}
