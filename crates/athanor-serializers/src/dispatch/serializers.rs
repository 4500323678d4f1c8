use super::ConversionError;
use athanor_core::Value;
use athanor_core::value::total_seconds;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

pub(super) fn null_to_empty_text(_: &Value) -> Result<Value, ConversionError> {
	Ok(Value::Text(String::new()))
}

pub(super) fn to_text(value: &Value) -> Result<Value, ConversionError> {
	Ok(Value::Text(value.to_string()))
}

pub(super) fn to_iso_text(value: &Value) -> Result<Value, ConversionError> {
	match value {
		Value::Date(_) | Value::Time(_) | Value::DateTime(_) => Ok(Value::Text(value.to_string())),
		Value::Text(_) => Ok(value.clone()),
		other => Err(ConversionError::new(format!(
			"expected a date or time, found {}",
			other.kind()
		))),
	}
}

/// Nearest float to the decimal's exact value.
pub(super) fn decimal_to_float(value: &Value) -> Result<Value, ConversionError> {
	match value {
		Value::Decimal(d) => d
			.to_string()
			.parse::<f64>()
			.map(Value::Float)
			.map_err(|_| ConversionError::new(format!("{d} does not fit a float"))),
		Value::Int(_) | Value::Float(_) => Ok(value.clone()),
		other => Err(ConversionError::new(format!("expected a decimal, found {}", other.kind()))),
	}
}

pub(super) fn interval_to_seconds(value: &Value) -> Result<Value, ConversionError> {
	match value {
		Value::Duration(delta) => Ok(Value::Float(total_seconds(delta))),
		Value::Int(_) | Value::Float(_) => Ok(value.clone()),
		other => Err(ConversionError::new(format!(
			"expected a time delta, found {}",
			other.kind()
		))),
	}
}

pub(super) fn bytes_to_base64(value: &Value) -> Result<Value, ConversionError> {
	match value {
		Value::Bytes(bytes) => Ok(Value::Text(STANDARD.encode(bytes))),
		Value::Text(_) => Ok(value.clone()),
		other => Err(ConversionError::new(format!("expected bytes, found {}", other.kind()))),
	}
}

pub(super) fn to_list(value: &Value) -> Result<Value, ConversionError> {
	match value {
		Value::List(_) => Ok(value.clone()),
		other => Err(ConversionError::new(format!(
			"expected a collection, found {}",
			other.kind()
		))),
	}
}

/// Ordered list without duplicates; the first occurrence wins.
pub(super) fn to_unique_list(value: &Value) -> Result<Value, ConversionError> {
	match value {
		Value::List(items) => {
			let mut unique: Vec<Value> = Vec::with_capacity(items.len());
			for item in items {
				if !unique.contains(item) {
					unique.push(item.clone());
				}
			}
			Ok(Value::List(unique))
		}
		other => to_list(other),
	}
}
