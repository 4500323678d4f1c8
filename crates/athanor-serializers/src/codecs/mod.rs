//! Text codecs for the JSON, YAML and CSV formats.
//!
//! The codecs only move between text and [`Value`]s. Deciding which
//! attributes appear, and how each value is converted, is the driver's job.

pub mod csv;
pub mod json;
pub mod yaml;

use athanor_core::{DeserializationError, Format, Map, Value};

/// The single record carried by decoded JSON or YAML input.
///
/// A top-level list contributes its first element.
pub(crate) fn into_record(value: Value, format: Format) -> Result<Map, DeserializationError> {
	let value = match value {
		Value::List(items) => items
			.into_iter()
			.next()
			.ok_or(DeserializationError::EmptyInput { format })?,
		other => other,
	};
	match value {
		Value::Map(map) if map.is_empty() => Err(DeserializationError::EmptyInput { format }),
		Value::Map(map) => Ok(map),
		Value::Null => Err(DeserializationError::EmptyInput { format }),
		other => Err(DeserializationError::NotAMapping {
			format,
			found: other.kind().to_string(),
		}),
	}
}
