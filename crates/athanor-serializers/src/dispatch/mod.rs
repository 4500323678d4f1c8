//! Default value conversions by type category and format.
//!
//! When an attribute configuration has no hook for the target format, the
//! driver asks the dispatcher for the default conversion of the value's
//! [`TypeCategory`]. The tables below are the single source of those
//! defaults; a row with [`Conversion::Unsupported`] means the category cannot
//! be represented in that format at all.

mod deserializers;
mod serializers;

use athanor_core::{Format, TypeCategory, Value, ValueType};
use thiserror::Error;

pub use deserializers::{parse_date, parse_datetime, parse_time};

/// Why a default conversion rejected a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl ConversionError {
	pub(crate) fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}
}

/// Signature of a default serializer.
pub type SerializeFn = fn(&Value) -> Result<Value, ConversionError>;

/// Signature of a default deserializer; receives the attribute's declared type.
pub type DeserializeFn = fn(&Value, &ValueType) -> Result<Value, ConversionError>;

/// Default behavior for one (category, format) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion<F> {
	/// Pass the value through unchanged.
	Identity,
	/// Apply a conversion function.
	Convert(F),
	/// The category cannot be represented in the format.
	Unsupported,
}

impl<F> Conversion<F> {
	pub fn is_supported(&self) -> bool {
		!matches!(self, Conversion::Unsupported)
	}
}

use Conversion::{Convert, Identity, Unsupported};

/// Serializers per category, in `Format::ALL` order (csv, json, yaml, dict).
static SERIALIZERS: &[(TypeCategory, [Conversion<SerializeFn>; 4])] = &[
	(
		TypeCategory::Null,
		[Convert(serializers::null_to_empty_text), Identity, Identity, Identity],
	),
	(TypeCategory::Boolean, [Identity, Identity, Identity, Identity]),
	(TypeCategory::Integer, [Identity, Identity, Identity, Identity]),
	(TypeCategory::Float, [Identity, Identity, Identity, Identity]),
	(
		TypeCategory::Decimal,
		[
			Convert(serializers::to_text),
			Convert(serializers::decimal_to_float),
			Convert(serializers::decimal_to_float),
			Identity,
		],
	),
	(TypeCategory::Text, [Identity, Identity, Identity, Identity]),
	(
		TypeCategory::Date,
		[
			Convert(serializers::to_iso_text),
			Convert(serializers::to_iso_text),
			Convert(serializers::to_iso_text),
			Identity,
		],
	),
	(
		TypeCategory::Time,
		[
			Convert(serializers::to_iso_text),
			Convert(serializers::to_iso_text),
			Convert(serializers::to_iso_text),
			Identity,
		],
	),
	(
		TypeCategory::DateTime,
		[
			Convert(serializers::to_iso_text),
			Convert(serializers::to_iso_text),
			Convert(serializers::to_iso_text),
			Identity,
		],
	),
	(
		TypeCategory::Interval,
		[
			Convert(serializers::interval_to_seconds),
			Convert(serializers::interval_to_seconds),
			Convert(serializers::interval_to_seconds),
			Convert(serializers::interval_to_seconds),
		],
	),
	(
		TypeCategory::Binary,
		[
			Convert(serializers::bytes_to_base64),
			Convert(serializers::bytes_to_base64),
			Convert(serializers::bytes_to_base64),
			Identity,
		],
	),
	(
		TypeCategory::Enumeration,
		[
			Convert(serializers::to_text),
			Convert(serializers::to_text),
			Convert(serializers::to_text),
			Identity,
		],
	),
	(
		TypeCategory::Uuid,
		[
			Convert(serializers::to_text),
			Convert(serializers::to_text),
			Convert(serializers::to_text),
			Identity,
		],
	),
	(TypeCategory::Mapping, [Unsupported, Identity, Identity, Identity]),
	(TypeCategory::Sequence, [Unsupported, Identity, Identity, Identity]),
	(
		TypeCategory::Set,
		[
			Unsupported,
			Convert(serializers::to_unique_list),
			Convert(serializers::to_unique_list),
			Identity,
		],
	),
	(
		TypeCategory::Tuple,
		[
			Unsupported,
			Convert(serializers::to_list),
			Convert(serializers::to_list),
			Identity,
		],
	),
	(TypeCategory::Exotic, [Unsupported, Unsupported, Unsupported, Unsupported]),
];

/// Deserializers per category, in `Format::ALL` order (csv, json, yaml, dict).
static DESERIALIZERS: &[(TypeCategory, [Conversion<DeserializeFn>; 4])] = &[
	(TypeCategory::Null, [Identity, Identity, Identity, Identity]),
	(
		TypeCategory::Boolean,
		[
			Convert(deserializers::to_bool),
			Convert(deserializers::to_bool),
			Convert(deserializers::to_bool),
			Convert(deserializers::to_bool),
		],
	),
	(
		TypeCategory::Integer,
		[
			Convert(deserializers::to_integer),
			Convert(deserializers::to_integer),
			Convert(deserializers::to_integer),
			Convert(deserializers::to_integer),
		],
	),
	(
		TypeCategory::Float,
		[
			Convert(deserializers::to_float),
			Convert(deserializers::to_float),
			Convert(deserializers::to_float),
			Convert(deserializers::to_float),
		],
	),
	(
		TypeCategory::Decimal,
		[
			Convert(deserializers::to_decimal),
			Convert(deserializers::to_decimal),
			Convert(deserializers::to_decimal),
			Convert(deserializers::to_decimal),
		],
	),
	(
		TypeCategory::Text,
		[
			Convert(deserializers::to_text),
			Convert(deserializers::to_text),
			Convert(deserializers::to_text),
			Convert(deserializers::to_text),
		],
	),
	(
		TypeCategory::Date,
		[
			Convert(deserializers::to_date),
			Convert(deserializers::to_date),
			Convert(deserializers::to_date),
			Convert(deserializers::to_date),
		],
	),
	(
		TypeCategory::Time,
		[
			Convert(deserializers::to_time),
			Convert(deserializers::to_time),
			Convert(deserializers::to_time),
			Convert(deserializers::to_time),
		],
	),
	(
		TypeCategory::DateTime,
		[
			Convert(deserializers::to_datetime),
			Convert(deserializers::to_datetime),
			Convert(deserializers::to_datetime),
			Convert(deserializers::to_datetime),
		],
	),
	(
		TypeCategory::Interval,
		[
			Convert(deserializers::to_interval),
			Convert(deserializers::to_interval),
			Convert(deserializers::to_interval),
			Convert(deserializers::to_interval),
		],
	),
	(
		TypeCategory::Binary,
		[
			Convert(deserializers::to_bytes),
			Convert(deserializers::to_bytes),
			Convert(deserializers::to_bytes),
			Convert(deserializers::to_bytes),
		],
	),
	(
		TypeCategory::Enumeration,
		[
			Convert(deserializers::to_member),
			Convert(deserializers::to_member),
			Convert(deserializers::to_member),
			Convert(deserializers::to_member),
		],
	),
	(
		TypeCategory::Uuid,
		[
			Convert(deserializers::to_uuid),
			Convert(deserializers::to_uuid),
			Convert(deserializers::to_uuid),
			Convert(deserializers::to_uuid),
		],
	),
	(
		TypeCategory::Mapping,
		[
			Unsupported,
			Convert(deserializers::to_mapping),
			Convert(deserializers::to_mapping),
			Convert(deserializers::to_mapping),
		],
	),
	(
		TypeCategory::Sequence,
		[
			Unsupported,
			Convert(deserializers::to_list),
			Convert(deserializers::to_list),
			Convert(deserializers::to_list),
		],
	),
	(
		TypeCategory::Set,
		[
			Unsupported,
			Convert(deserializers::to_set),
			Convert(deserializers::to_set),
			Convert(deserializers::to_set),
		],
	),
	(
		TypeCategory::Tuple,
		[
			Unsupported,
			Convert(deserializers::to_list),
			Convert(deserializers::to_list),
			Convert(deserializers::to_list),
		],
	),
	(TypeCategory::Exotic, [Unsupported, Unsupported, Unsupported, Unsupported]),
];

fn format_index(format: Format) -> usize {
	match format {
		Format::Csv => 0,
		Format::Json => 1,
		Format::Yaml => 2,
		Format::Dict => 3,
	}
}

/// Default serializer for `category` in `format`.
pub fn default_serializer(category: TypeCategory, format: Format) -> Conversion<SerializeFn> {
	SERIALIZERS
		.iter()
		.find(|(c, _)| *c == category)
		.map_or(Unsupported, |(_, row)| row[format_index(format)])
}

/// Default deserializer for `category` in `format`.
pub fn default_deserializer(category: TypeCategory, format: Format) -> Conversion<DeserializeFn> {
	DESERIALIZERS
		.iter()
		.find(|(c, _)| *c == category)
		.map_or(Unsupported, |(_, row)| row[format_index(format)])
}

/// Whether values of `value_type` can be written to `format` by default.
pub fn supports_serialization(value_type: &ValueType, format: Format) -> bool {
	default_serializer(value_type.category(), format).is_supported()
}

/// Whether values of `value_type` can be read from `format` by default.
pub fn supports_deserialization(value_type: &ValueType, format: Format) -> bool {
	matches!(value_type, ValueType::Any) || default_deserializer(value_type.category(), format).is_supported()
}

/// Outcome of applying a default conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
	Value(Value),
	Unsupported,
}

/// Apply the default serializer for a value held by an attribute of `value_type`.
pub fn serialize_default(
	value_type: &ValueType,
	format: Format,
	value: Value,
) -> Result<Converted, ConversionError> {
	match default_serializer(value_type.category_for(&value), format) {
		Identity => Ok(Converted::Value(value)),
		Convert(convert) => convert(&value).map(Converted::Value),
		Unsupported => Ok(Converted::Unsupported),
	}
}

/// Apply the default deserializer, coercing `value` to `value_type`.
///
/// Nulls pass through. An empty CSV field is null for every type but text.
pub fn deserialize_default(
	value_type: &ValueType,
	format: Format,
	value: Value,
) -> Result<Converted, ConversionError> {
	let category = value_type.category();
	if !default_deserializer(category, format).is_supported() && !matches!(value_type, ValueType::Any) {
		return Ok(Converted::Unsupported);
	}
	if value.is_null() || matches!(value_type, ValueType::Any) {
		return Ok(Converted::Value(value));
	}
	if format == Format::Csv && category != TypeCategory::Text && value.as_str() == Some("") {
		return Ok(Converted::Value(Value::Null));
	}
	match default_deserializer(category, format) {
		Identity => Ok(Converted::Value(value)),
		Convert(convert) => convert(&value, value_type).map(Converted::Value),
		Unsupported => Ok(Converted::Unsupported),
	}
}
