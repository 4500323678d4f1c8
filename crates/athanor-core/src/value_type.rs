//! Declared attribute types and the categories the format dispatcher keys on.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The native type of a column or computed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
	Boolean,
	Integer,
	Float,
	Decimal,
	Text,
	Date,
	Time,
	DateTime,
	/// A signed time delta.
	Interval,
	Binary,
	/// A closed set of named members.
	Enumeration(Vec<String>),
	Uuid,
	/// A free-form mapping (JSON document, key/value store).
	Json,
	List,
	/// An unordered collection without duplicates.
	Set,
	/// A fixed-length ordered collection.
	Tuple,
	/// A database-proprietary type no format can represent.
	Unsupported(String),
	/// No declared type; the category is taken from the value itself.
	Any,
}

/// Payload-free classification used as the dispatcher's table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
	Null,
	Boolean,
	Integer,
	Float,
	Decimal,
	Text,
	Date,
	Time,
	DateTime,
	Interval,
	Binary,
	Enumeration,
	Uuid,
	Mapping,
	Sequence,
	Set,
	Tuple,
	Exotic,
}

impl ValueType {
	/// Dispatcher category for this declared type.
	pub fn category(&self) -> TypeCategory {
		match self {
			ValueType::Boolean => TypeCategory::Boolean,
			ValueType::Integer => TypeCategory::Integer,
			ValueType::Float => TypeCategory::Float,
			ValueType::Decimal => TypeCategory::Decimal,
			ValueType::Text | ValueType::Any => TypeCategory::Text,
			ValueType::Date => TypeCategory::Date,
			ValueType::Time => TypeCategory::Time,
			ValueType::DateTime => TypeCategory::DateTime,
			ValueType::Interval => TypeCategory::Interval,
			ValueType::Binary => TypeCategory::Binary,
			ValueType::Enumeration(_) => TypeCategory::Enumeration,
			ValueType::Uuid => TypeCategory::Uuid,
			ValueType::Json => TypeCategory::Mapping,
			ValueType::List => TypeCategory::Sequence,
			ValueType::Set => TypeCategory::Set,
			ValueType::Tuple => TypeCategory::Tuple,
			ValueType::Unsupported(_) => TypeCategory::Exotic,
		}
	}

	/// Category used when converting `value` held by an attribute of this type.
	///
	/// Null always dispatches as [`TypeCategory::Null`]; `Any` follows the value.
	pub fn category_for(&self, value: &Value) -> TypeCategory {
		match (self, value) {
			(_, Value::Null) => TypeCategory::Null,
			(ValueType::Any, value) => TypeCategory::of(value),
			(declared, _) => declared.category(),
		}
	}

	/// Infer a declared type from a sample value.
	///
	/// Returns `None` for nulls and related instances, which carry no column type.
	pub fn infer(value: &Value) -> Option<ValueType> {
		Some(match value {
			Value::Null | Value::Instance(_) => return None,
			Value::Bool(_) => ValueType::Boolean,
			Value::Int(_) => ValueType::Integer,
			Value::Float(_) => ValueType::Float,
			Value::Decimal(_) => ValueType::Decimal,
			Value::Text(_) => ValueType::Text,
			Value::Bytes(_) => ValueType::Binary,
			Value::Date(_) => ValueType::Date,
			Value::Time(_) => ValueType::Time,
			Value::DateTime(_) => ValueType::DateTime,
			Value::Duration(_) => ValueType::Interval,
			Value::Uuid(_) => ValueType::Uuid,
			Value::List(_) => ValueType::List,
			Value::Map(_) => ValueType::Json,
		})
	}

	/// Human readable type name.
	pub fn name(&self) -> &str {
		match self {
			ValueType::Boolean => "boolean",
			ValueType::Integer => "integer",
			ValueType::Float => "float",
			ValueType::Decimal => "decimal",
			ValueType::Text => "text",
			ValueType::Date => "date",
			ValueType::Time => "time",
			ValueType::DateTime => "datetime",
			ValueType::Interval => "interval",
			ValueType::Binary => "binary",
			ValueType::Enumeration(_) => "enumeration",
			ValueType::Uuid => "uuid",
			ValueType::Json => "json",
			ValueType::List => "list",
			ValueType::Set => "set",
			ValueType::Tuple => "tuple",
			ValueType::Unsupported(name) => name,
			ValueType::Any => "any",
		}
	}
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl TypeCategory {
	/// Category of a runtime value.
	pub fn of(value: &Value) -> TypeCategory {
		match value {
			Value::Null => TypeCategory::Null,
			Value::Bool(_) => TypeCategory::Boolean,
			Value::Int(_) => TypeCategory::Integer,
			Value::Float(_) => TypeCategory::Float,
			Value::Decimal(_) => TypeCategory::Decimal,
			Value::Text(_) => TypeCategory::Text,
			Value::Bytes(_) => TypeCategory::Binary,
			Value::Date(_) => TypeCategory::Date,
			Value::Time(_) => TypeCategory::Time,
			Value::DateTime(_) => TypeCategory::DateTime,
			Value::Duration(_) => TypeCategory::Interval,
			Value::Uuid(_) => TypeCategory::Uuid,
			Value::List(_) => TypeCategory::Sequence,
			Value::Map(_) | Value::Instance(_) => TypeCategory::Mapping,
		}
	}

	/// Whether values of this category are collections.
	pub fn is_collection(&self) -> bool {
		matches!(
			self,
			TypeCategory::Mapping | TypeCategory::Sequence | TypeCategory::Set | TypeCategory::Tuple
		)
	}
}
