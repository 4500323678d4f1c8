use athanor_core::{DeserializationError, Format, Map, SerializationError, Value};

/// Encode a record as a JSON object, keys in order.
pub fn encode(record: &Map) -> Result<String, SerializationError> {
	serde_json::to_string(record).map_err(|e| SerializationError::Encode {
		format: Format::Json,
		message: e.to_string(),
	})
}

/// Decode JSON text into a [`Value`].
pub fn decode(text: &str) -> Result<Value, DeserializationError> {
	let text = text.trim();
	if text.is_empty() {
		return Err(DeserializationError::EmptyInput { format: Format::Json });
	}
	serde_json::from_str(text).map_err(|e| DeserializationError::Parse {
		format: Format::Json,
		message: e.to_string(),
	})
}
