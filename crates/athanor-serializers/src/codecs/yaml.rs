use athanor_core::{DeserializationError, Format, Map, SerializationError, Value};

/// Encode a record as a YAML mapping, keys in order.
pub fn encode(record: &Map) -> Result<String, SerializationError> {
	serde_yaml::to_string(record).map_err(|e| SerializationError::Encode {
		format: Format::Yaml,
		message: e.to_string(),
	})
}

/// Decode YAML text into a [`Value`].
pub fn decode(text: &str) -> Result<Value, DeserializationError> {
	if text.trim().is_empty() {
		return Err(DeserializationError::EmptyInput { format: Format::Yaml });
	}
	serde_yaml::from_str(text).map_err(|e| DeserializationError::Parse {
		format: Format::Yaml,
		message: e.to_string(),
	})
}
