//! Error types for attribute serialization.
//!
//! Every failure raised while configuring, serializing or deserializing a
//! model is an [`Error`]. The three families mirror the phases of the
//! pipeline: [`ConfigurationError`] for developer-facing misconfiguration,
//! [`SerializationError`] for outbound conversion and
//! [`DeserializationError`] for inbound parsing and coercion.

use crate::format::Format;
use thiserror::Error;

/// Top-level error for all Athanor operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// Misconfigured attribute, configuration set or model.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// Failure while producing a serialized representation.
	#[error(transparent)]
	Serialization(#[from] SerializationError),

	/// Failure while consuming a serialized representation.
	#[error(transparent)]
	Deserialization(#[from] DeserializationError),

	/// A format name that is not one of csv, json, yaml or dict.
	#[error("Invalid format: '{0}' is not one of csv, json, yaml, dict")]
	InvalidFormat(String),
}

impl Error {
	/// Returns true for configuration errors.
	pub fn is_configuration_error(&self) -> bool {
		matches!(self, Error::Configuration(_))
	}

	/// Returns true for serialization errors.
	pub fn is_serialization_error(&self) -> bool {
		matches!(self, Error::Serialization(_))
	}

	/// Returns true for deserialization errors.
	pub fn is_deserialization_error(&self) -> bool {
		matches!(self, Error::Deserialization(_))
	}

	/// Returns the attribute this error is about, if any.
	pub fn attribute(&self) -> Option<&str> {
		match self {
			Error::Configuration(e) => e.attribute(),
			Error::Serialization(e) => e.attribute(),
			Error::Deserialization(e) => e.attribute(),
			Error::InvalidFormat(_) => None,
		}
	}
}

/// Result type alias for Athanor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Developer-facing misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
	/// An attribute configuration was constructed without a name.
	#[error("Attribute configuration is missing a name")]
	MissingName,

	/// A `supports_<format>` value was neither a bool nor an (inbound, outbound) pair.
	#[error(
		"Attribute '{attribute}': {field} expects a bool or an (inbound, outbound) pair, found {found} entries"
	)]
	InvalidSupportArity {
		attribute: String,
		field: String,
		found: usize,
	},

	/// A configuration mapping could not be coerced into a record.
	#[error("Attribute '{attribute}': {message}")]
	Malformed { attribute: String, message: String },

	/// A configuration references an attribute the model does not have.
	#[error("Model '{model}' has no attribute '{attribute}'")]
	UnknownAttribute { model: String, attribute: String },

	/// A model name that is not present in the registry.
	#[error("Model '{0}' is not registered")]
	UnknownModel(String),

	/// The model uses named configuration sets and none was selected.
	#[error("Model '{model}' defines named configuration sets but none was selected")]
	ConfigSetRequired { model: String },

	/// A configuration set was requested from a model that has none.
	#[error("Model '{model}' does not define configuration sets but '{config_set}' was requested")]
	ConfigSetsNotDefined { model: String, config_set: String },

	/// The requested configuration set does not exist.
	#[error("Model '{model}' has no configuration set '{config_set}'")]
	UnknownConfigSet { model: String, config_set: String },
}

impl ConfigurationError {
	/// Returns the attribute this error is about, if any.
	pub fn attribute(&self) -> Option<&str> {
		match self {
			ConfigurationError::InvalidSupportArity { attribute, .. }
			| ConfigurationError::Malformed { attribute, .. }
			| ConfigurationError::UnknownAttribute { attribute, .. } => Some(attribute),
			_ => None,
		}
	}
}

/// Failure while producing a serialized representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SerializationError {
	/// No attribute is outbound-eligible for the format.
	#[error("Model '{model}' has no attributes serializable to {format}")]
	NoSerializableAttributes { model: String, format: Format },

	/// The attribute's type cannot be represented in the format.
	#[error("Attribute '{attribute}' of type {value_type} cannot be serialized to {format}")]
	Unsupported {
		attribute: String,
		format: Format,
		value_type: String,
	},

	/// The starting nesting depth already exceeds the maximum.
	#[error("Current nesting depth {current} exceeds the maximum nesting depth {max}")]
	MaximumNestingExceeded { current: usize, max: usize },

	/// A hook or default converter failed on a value.
	#[error("Attribute '{attribute}': could not serialize {value} to {format}: {message}")]
	Value {
		attribute: String,
		format: Format,
		value: String,
		message: String,
	},

	/// The text codec rejected the assembled output.
	#[error("Could not encode {format} output: {message}")]
	Encode { format: Format, message: String },
}

impl SerializationError {
	/// Returns the attribute this error is about, if any.
	pub fn attribute(&self) -> Option<&str> {
		match self {
			SerializationError::Unsupported { attribute, .. }
			| SerializationError::Value { attribute, .. } => Some(attribute),
			_ => None,
		}
	}
}

/// Failure while consuming a serialized representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DeserializationError {
	/// Malformed JSON or YAML text.
	#[error("Could not parse {format} input: {message}")]
	Parse { format: Format, message: String },

	/// CSV input whose shape does not match the expected columns.
	#[error("CSV structure mismatch: {0}")]
	CsvStructure(String),

	/// The input carried no data.
	#[error("{format} input is empty")]
	EmptyInput { format: Format },

	/// The input did not decode to a mapping.
	#[error("{format} input must be a mapping, found {found}")]
	NotAMapping { format: Format, found: String },

	/// No attribute is inbound-eligible for the format.
	#[error("Model '{model}' has no attributes deserializable from {format}")]
	NoDeserializableAttributes { model: String, format: Format },

	/// Strict mode rejected keys that map to no inbound-eligible attribute.
	#[error("Model '{model}' received unexpected keys from {format}: {}", .keys.join(", "))]
	ExtraKeys {
		model: String,
		format: Format,
		keys: Vec<String>,
	},

	/// A raw value could not be coerced to the attribute's type.
	#[error(
		"Attribute '{attribute}': could not deserialize {value} from {format} as {target_type}: {message}"
	)]
	Value {
		attribute: String,
		format: Format,
		value: String,
		target_type: String,
		message: String,
	},

	/// The attribute's type cannot be read from the format.
	#[error("Attribute '{attribute}' of type {value_type} cannot be deserialized from {format}")]
	Unsupported {
		attribute: String,
		format: Format,
		value_type: String,
	},

	/// A value whose type cannot be mapped to a column while generating a model.
	#[error("Key '{key}': cannot infer a column type for {value}")]
	UnsupportedValueType { key: String, value: String },

	/// Reading the input failed.
	#[error("Could not read input: {0}")]
	Io(String),
}

impl DeserializationError {
	/// Returns the attribute this error is about, if any.
	pub fn attribute(&self) -> Option<&str> {
		match self {
			DeserializationError::Value { attribute, .. }
			| DeserializationError::Unsupported { attribute, .. } => Some(attribute),
			DeserializationError::UnsupportedValueType { key, .. } => Some(key),
			_ => None,
		}
	}
}

impl From<std::io::Error> for DeserializationError {
	fn from(err: std::io::Error) -> Self {
		DeserializationError::Io(err.to_string())
	}
}
