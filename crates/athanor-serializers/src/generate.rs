//! Generating model classes from one serialized record.
//!
//! Each key becomes a column whose type is inferred from its value. The
//! generated attributes are enabled in both directions for every format
//! unless a serialization registry is supplied.

use crate::codecs::csv;
use crate::dispatch::{parse_date, parse_datetime, parse_time};
use crate::driver;
use crate::input::Input;
use crate::options::CsvDialect;
use athanor_core::{
	AttributeConfiguration, DeserializationError, Format, Map, ModelClass, ModelRegistry, Result,
	SerializationRegistry, Value, ValueType,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// How a generated class is typed, keyed and registered.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
	/// Name of the primary key column; must be one of the record's keys.
	pub primary_key: String,
	pub table_name: Option<String>,
	/// Leave out keys holding lists or mappings.
	pub skip_nested: bool,
	/// Type values with no inferable type as text instead of failing.
	pub default_to_str: bool,
	/// Explicit column types by key, bypassing inference.
	pub type_mapping: IndexMap<String, ValueType>,
	/// Serialization registry of the class; all generated columns fully enabled if unset.
	pub serialization: Option<SerializationRegistry>,
	/// Add the class to the global model registry.
	pub register: bool,
}

impl GenerateOptions {
	pub fn new(primary_key: impl Into<String>) -> Self {
		Self {
			primary_key: primary_key.into(),
			table_name: None,
			skip_nested: true,
			default_to_str: false,
			type_mapping: IndexMap::new(),
			serialization: None,
			register: false,
		}
	}

	pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
		self.table_name = Some(table_name.into());
		self
	}

	pub fn skip_nested(mut self, skip_nested: bool) -> Self {
		self.skip_nested = skip_nested;
		self
	}

	pub fn default_to_str(mut self, default_to_str: bool) -> Self {
		self.default_to_str = default_to_str;
		self
	}

	pub fn type_mapping(mut self, key: impl Into<String>, value_type: ValueType) -> Self {
		self.type_mapping.insert(key.into(), value_type);
		self
	}

	pub fn serialization(mut self, registry: SerializationRegistry) -> Self {
		self.serialization = Some(registry);
		self
	}

	pub fn register(mut self, register: bool) -> Self {
		self.register = register;
		self
	}
}

/// Generate a class named `name` from a dict record.
///
/// # Examples
///
/// ```
/// use athanor_core::{Map, Value, ValueType};
/// use athanor_serializers::{GenerateOptions, generate_model_from_dict};
///
/// let record = Map::from([
/// 	("id".to_string(), Value::Int(1)),
/// 	("joined".to_string(), Value::from("2024-03-01")),
/// ]);
/// let class = generate_model_from_dict("Member", &record, &GenerateOptions::new("id")).unwrap();
/// assert_eq!(class.attribute("joined").unwrap().value_type(), Some(&ValueType::Date));
/// ```
pub fn generate_model_from_dict(
	name: &str,
	record: &Map,
	options: &GenerateOptions,
) -> Result<Arc<ModelClass>> {
	if record.is_empty() {
		return Err(DeserializationError::EmptyInput { format: Format::Dict }.into());
	}

	let mut builder = ModelClass::builder(name).primary_key(options.primary_key.clone());
	if let Some(table_name) = &options.table_name {
		builder = builder.table_name(table_name.clone());
	}

	let mut enabled = Vec::with_capacity(record.len());
	for (key, value) in record {
		let Some(value_type) = column_type(key, value, options)? else {
			tracing::debug!(model = name, key = %key, "skipping nested value");
			continue;
		};
		builder = builder.column(key.clone(), value_type);
		enabled.push(AttributeConfiguration::new(key.clone())?.supports_all(true));
	}

	let registry = match &options.serialization {
		Some(registry) => registry.clone(),
		None => SerializationRegistry::list(enabled),
	};
	let class = builder.registry(registry).build()?;
	if options.register {
		ModelRegistry::global().register(Arc::clone(&class));
	}
	Ok(class)
}

/// Generate a class from a JSON object (or the first object of a JSON array).
pub fn generate_model_from_json<'a>(
	name: &str,
	input: impl Into<Input<'a>>,
	options: &GenerateOptions,
) -> Result<Arc<ModelClass>> {
	let record = driver::read_record(input.into(), Format::Json)?;
	generate_model_from_dict(name, &record, options)
}

/// Generate a class from a YAML mapping (or the first mapping of a YAML sequence).
pub fn generate_model_from_yaml<'a>(
	name: &str,
	input: impl Into<Input<'a>>,
	options: &GenerateOptions,
) -> Result<Arc<ModelClass>> {
	let record = driver::read_record(input.into(), Format::Yaml)?;
	generate_model_from_dict(name, &record, options)
}

/// Generate a class from CSV with a header line; the first data line is sampled.
pub fn generate_model_from_csv<'a>(
	name: &str,
	input: impl Into<Input<'a>>,
	dialect: &CsvDialect,
	options: &GenerateOptions,
) -> Result<Arc<ModelClass>> {
	let text = input.into().read_to_string()?;
	let record = csv::read_headed_record(&text, dialect)?;
	generate_model_from_dict(name, &record, options)
}

fn column_type(key: &str, value: &Value, options: &GenerateOptions) -> Result<Option<ValueType>> {
	if let Some(value_type) = options.type_mapping.get(key) {
		return Ok(Some(value_type.clone()));
	}
	let inferred = match value {
		Value::List(_) | Value::Map(_) | Value::Instance(_) if options.skip_nested => return Ok(None),
		Value::List(_) if options.default_to_str => Some(ValueType::Text),
		Value::Map(_) if options.default_to_str => Some(ValueType::Text),
		Value::Text(text) => Some(infer_text(text)),
		other => ValueType::infer(other),
	};
	match inferred {
		Some(value_type) => Ok(Some(value_type)),
		None if options.default_to_str => Ok(Some(ValueType::Text)),
		None => Err(DeserializationError::UnsupportedValueType {
			key: key.to_string(),
			value: value.describe(),
		}
		.into()),
	}
}

/// Column type for a text sample, recognizing numbers and ISO-8601 temporals.
///
/// Numbers only count when they print back unchanged, so codes such as
/// `"02134"` stay text.
fn infer_text(text: &str) -> ValueType {
	let trimmed = text.trim();
	let numeric = !has_leading_zero(trimmed);
	if numeric && trimmed.parse::<i64>().is_ok_and(|i| i.to_string() == trimmed) {
		ValueType::Integer
	} else if numeric
		&& trimmed.bytes().any(|b| b.is_ascii_digit())
		&& trimmed.parse::<f64>().is_ok_and(f64::is_finite)
	{
		ValueType::Float
	} else if parse_time(trimmed).is_some() {
		ValueType::Time
	} else if parse_date(trimmed).is_some() {
		ValueType::Date
	} else if parse_datetime(trimmed).is_some() {
		ValueType::DateTime
	} else {
		ValueType::Text
	}
}

/// A zero followed by another digit at the start of the integer part.
fn has_leading_zero(text: &str) -> bool {
	let digits = text.strip_prefix(['-', '+']).unwrap_or(text).as_bytes();
	matches!(digits, [b'0', next, ..] if next.is_ascii_digit())
}

#[cfg(test)]
mod tests {
	use super::*;
	use athanor_core::{Direction, Error};
	use rstest::rstest;

	#[rstest]
	#[case("42", ValueType::Integer)]
	#[case("4.5", ValueType::Float)]
	#[case("12:30:00", ValueType::Time)]
	#[case("2024-03-01", ValueType::Date)]
	#[case("2024-03-01T12:30:00", ValueType::DateTime)]
	#[case("-17", ValueType::Integer)]
	#[case("0", ValueType::Integer)]
	#[case("0.25", ValueType::Float)]
	#[case("02134", ValueType::Text)]
	#[case("007.5", ValueType::Text)]
	#[case("09:15", ValueType::Time)]
	#[case("nan", ValueType::Text)]
	#[case("widget", ValueType::Text)]
	fn test_infer_text(#[case] text: &str, #[case] expected: ValueType) {
		assert_eq!(infer_text(text), expected);
	}

	#[rstest]
	fn test_nested_values_skipped_by_default() {
		let record = Map::from([
			("id".to_string(), Value::Int(1)),
			("tags".to_string(), Value::List(vec![Value::from("a")])),
		]);
		let class = generate_model_from_dict("GeneratedSkip", &record, &GenerateOptions::new("id")).unwrap();
		assert!(class.has_attribute("id"));
		assert!(!class.has_attribute("tags"));

		let class = generate_model_from_dict(
			"GeneratedKeep",
			&record,
			&GenerateOptions::new("id").skip_nested(false),
		)
		.unwrap();
		assert_eq!(class.attribute("tags").unwrap().value_type(), Some(&ValueType::List));
	}

	#[rstest]
	fn test_null_needs_default_to_str() {
		let record = Map::from([("id".to_string(), Value::Int(1)), ("note".to_string(), Value::Null)]);
		let err = generate_model_from_dict("GeneratedNull", &record, &GenerateOptions::new("id")).unwrap_err();
		assert!(matches!(
			err,
			Error::Deserialization(DeserializationError::UnsupportedValueType { ref key, .. }) if key == "note"
		));

		let class = generate_model_from_dict(
			"GeneratedNullText",
			&record,
			&GenerateOptions::new("id").default_to_str(true),
		)
		.unwrap();
		assert_eq!(class.attribute("note").unwrap().value_type(), Some(&ValueType::Text));
	}

	#[rstest]
	fn test_generated_columns_fully_enabled() {
		let record = Map::from([("id".to_string(), Value::Int(1))]);
		let class = generate_model_from_dict("GeneratedEnabled", &record, &GenerateOptions::new("id")).unwrap();
		for format in Format::ALL {
			for direction in [Direction::Inbound, Direction::Outbound] {
				assert!(class.does_support_serialization("id", format, direction, None).unwrap());
			}
		}
	}

	#[rstest]
	fn test_primary_key_must_exist() {
		let record = Map::from([("id".to_string(), Value::Int(1))]);
		let err = generate_model_from_dict("GeneratedNoKey", &record, &GenerateOptions::new("uuid")).unwrap_err();
		assert!(err.is_configuration_error());
	}

	#[rstest]
	fn test_type_mapping_overrides_inference() {
		let record = Map::from([("id".to_string(), Value::from("7"))]);
		let options = GenerateOptions::new("id").type_mapping("id", ValueType::Text);
		let class = generate_model_from_dict("GeneratedMapped", &record, &options).unwrap();
		assert_eq!(class.attribute("id").unwrap().value_type(), Some(&ValueType::Text));
	}

	#[rstest]
	fn test_empty_record() {
		let err = generate_model_from_dict("GeneratedEmpty", &Map::new(), &GenerateOptions::new("id")).unwrap_err();
		assert!(err.is_deserialization_error());
	}

	#[rstest]
	fn test_zip_codes_keep_leading_zeros() {
		let class = generate_model_from_csv(
			"GeneratedZip",
			"id|zip\n1|02134\n",
			&CsvDialect::default(),
			&GenerateOptions::new("id"),
		)
		.unwrap();
		assert_eq!(class.attribute("zip").unwrap().value_type(), Some(&ValueType::Text));
	}

	#[rstest]
	fn test_from_csv() {
		let class = generate_model_from_csv(
			"GeneratedCsv",
			"id|name|price\n1|lamp|9.5\n",
			&CsvDialect::default(),
			&GenerateOptions::new("id"),
		)
		.unwrap();
		let types: Vec<_> = class.attributes().map(|a| a.value_type().cloned()).collect();
		assert_eq!(
			types,
			vec![Some(ValueType::Integer), Some(ValueType::Text), Some(ValueType::Float)]
		);
	}
}
