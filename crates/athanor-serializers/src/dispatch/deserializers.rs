use super::ConversionError;
use athanor_core::value::delta_from_seconds;
use athanor_core::{Value, ValueType};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

const DATETIME_FORMATS: [&str; 4] = [
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Parse an ISO-8601 date and time; offsets are normalized to UTC.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
	let text = text.trim();
	DATETIME_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
		.or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
}

/// Parse an ISO-8601 date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Parse an ISO-8601 time of day.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
	let text = text.trim();
	TIME_FORMATS
		.iter()
		.find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

fn mismatch(value: &Value, target: &ValueType) -> ConversionError {
	ConversionError::new(format!("cannot convert {} to {target}", value.kind()))
}

pub(super) fn to_bool(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Bool(_) => Ok(value.clone()),
		Value::Int(0) => Ok(Value::Bool(false)),
		Value::Int(1) => Ok(Value::Bool(true)),
		Value::Text(text) => match text.trim().to_lowercase().as_str() {
			"true" | "t" | "yes" | "y" | "1" | "on" => Ok(Value::Bool(true)),
			"false" | "f" | "no" | "n" | "0" | "off" => Ok(Value::Bool(false)),
			_ => Err(ConversionError::new(format!("'{text}' is not a boolean"))),
		},
		other => Err(mismatch(other, target)),
	}
}

fn float_to_integer(x: f64) -> Result<i64, ConversionError> {
	if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
		Ok(x as i64)
	} else {
		Err(ConversionError::new(format!("{x} is not a whole number")))
	}
}

pub(super) fn to_integer(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Int(_) => Ok(value.clone()),
		Value::Float(x) => float_to_integer(*x).map(Value::Int),
		Value::Decimal(d) if d.fract().is_zero() => d
			.to_i64()
			.map(Value::Int)
			.ok_or_else(|| ConversionError::new(format!("{d} does not fit an integer"))),
		Value::Text(text) => {
			let text = text.trim();
			match text.parse::<i64>() {
				Ok(i) => Ok(Value::Int(i)),
				Err(err) => match text.parse::<f64>() {
					Ok(x) => float_to_integer(x).map(Value::Int),
					Err(_) => Err(ConversionError::new(err.to_string())),
				},
			}
		}
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_float(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Float(_) => Ok(value.clone()),
		Value::Int(i) => Ok(Value::Float(*i as f64)),
		Value::Decimal(d) => d
			.to_f64()
			.map(Value::Float)
			.ok_or_else(|| ConversionError::new(format!("{d} does not fit a float"))),
		Value::Text(text) => text
			.trim()
			.parse::<f64>()
			.map(Value::Float)
			.map_err(|err| ConversionError::new(err.to_string())),
		other => Err(mismatch(other, target)),
	}
}

fn parse_decimal(text: &str) -> Result<Decimal, ConversionError> {
	let text = text.trim();
	text.parse::<Decimal>()
		.or_else(|_| Decimal::from_scientific(text))
		.map_err(|err| ConversionError::new(err.to_string()))
}

pub(super) fn to_decimal(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Decimal(_) => Ok(value.clone()),
		Value::Int(i) => Ok(Value::Decimal(Decimal::from(*i))),
		Value::Float(x) => parse_decimal(&x.to_string()).map(Value::Decimal),
		Value::Text(text) => parse_decimal(text).map(Value::Decimal),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_text(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Text(_) => Ok(value.clone()),
		Value::List(_) | Value::Map(_) | Value::Instance(_) => Err(mismatch(value, target)),
		other => Ok(Value::Text(other.to_string())),
	}
}

pub(super) fn to_date(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Date(_) => Ok(value.clone()),
		Value::DateTime(dt) => Ok(Value::Date(dt.date())),
		Value::Text(text) => parse_date(text)
			.or_else(|| parse_datetime(text).map(|dt| dt.date()))
			.map(Value::Date)
			.ok_or_else(|| ConversionError::new(format!("'{text}' is not an ISO-8601 date"))),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_time(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Time(_) => Ok(value.clone()),
		Value::DateTime(dt) => Ok(Value::Time(dt.time())),
		Value::Text(text) => parse_time(text)
			.or_else(|| parse_datetime(text).map(|dt| dt.time()))
			.map(Value::Time)
			.ok_or_else(|| ConversionError::new(format!("'{text}' is not an ISO-8601 time"))),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_datetime(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::DateTime(_) => Ok(value.clone()),
		Value::Date(date) => Ok(Value::DateTime(date.and_time(NaiveTime::MIN))),
		Value::Int(seconds) => DateTime::from_timestamp(*seconds, 0)
			.map(|dt| Value::DateTime(dt.naive_utc()))
			.ok_or_else(|| ConversionError::new(format!("{seconds} is out of range for a timestamp"))),
		Value::Text(text) => parse_datetime(text)
			.or_else(|| parse_date(text).map(|date| date.and_time(NaiveTime::MIN)))
			.map(Value::DateTime)
			.ok_or_else(|| ConversionError::new(format!("'{text}' is not an ISO-8601 datetime"))),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_interval(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	let seconds = match value {
		Value::Duration(_) => return Ok(value.clone()),
		Value::Int(i) => *i as f64,
		Value::Float(x) => *x,
		Value::Text(text) => text
			.trim()
			.parse::<f64>()
			.map_err(|err| ConversionError::new(err.to_string()))?,
		other => return Err(mismatch(other, target)),
	};
	delta_from_seconds(seconds)
		.map(Value::Duration)
		.ok_or_else(|| ConversionError::new(format!("{seconds} seconds is out of range")))
}

pub(super) fn to_bytes(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Bytes(_) => Ok(value.clone()),
		Value::Text(text) => STANDARD
			.decode(text.trim())
			.map(Value::Bytes)
			.map_err(|err| ConversionError::new(format!("invalid base64: {err}"))),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_member(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	let text = match value {
		Value::Text(text) => text.clone(),
		Value::Int(_) | Value::Bool(_) => value.to_string(),
		other => return Err(mismatch(other, target)),
	};
	match target {
		ValueType::Enumeration(members) if !members.is_empty() && !members.contains(&text) => {
			Err(ConversionError::new(format!(
				"'{text}' is not one of {}",
				members.join(", ")
			)))
		}
		_ => Ok(Value::Text(text)),
	}
}

pub(super) fn to_uuid(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Uuid(_) => Ok(value.clone()),
		Value::Text(text) => Uuid::parse_str(text.trim())
			.map(Value::Uuid)
			.map_err(|err| ConversionError::new(err.to_string())),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_mapping(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::Map(_) => Ok(value.clone()),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_list(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
	match value {
		Value::List(_) => Ok(value.clone()),
		other => Err(mismatch(other, target)),
	}
}

pub(super) fn to_set(value: &Value, target: &ValueType) -> Result<Value, ConversionError> {
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
		other => Err(mismatch(other, target)),
	}
}
