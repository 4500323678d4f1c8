//! Dynamically typed attribute values.
//!
//! [`Value`] is what flows between a model and the format codecs: attribute
//! getters produce it, hooks and default converters transform it, and the
//! JSON/YAML/CSV codecs encode and decode it. It implements `Serialize` and
//! `Deserialize` directly so it plugs into any serde data format.

use crate::model::Instance;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Ordered string-keyed mapping of values.
pub type Map = IndexMap<String, Value>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Decimal(Decimal),
	Text(String),
	Bytes(Vec<u8>),
	Date(NaiveDate),
	Time(NaiveTime),
	DateTime(NaiveDateTime),
	Duration(TimeDelta),
	Uuid(Uuid),
	List(Vec<Value>),
	Map(Map),
	/// A related model instance reached through a relationship attribute.
	Instance(Box<Instance>),
}

impl Value {
	/// Short name of the value's variant, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "boolean",
			Value::Int(_) => "integer",
			Value::Float(_) => "float",
			Value::Decimal(_) => "decimal",
			Value::Text(_) => "text",
			Value::Bytes(_) => "binary",
			Value::Date(_) => "date",
			Value::Time(_) => "time",
			Value::DateTime(_) => "datetime",
			Value::Duration(_) => "interval",
			Value::Uuid(_) => "uuid",
			Value::List(_) => "list",
			Value::Map(_) => "mapping",
			Value::Instance(_) => "instance",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float(f) => Some(*f),
			Value::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&Map> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_instance(&self) -> Option<&Instance> {
		match self {
			Value::Instance(instance) => Some(instance),
			_ => None,
		}
	}

	/// Whether this value is a related instance or a list holding one.
	pub fn holds_instances(&self) -> bool {
		match self {
			Value::Instance(_) => true,
			Value::List(items) => items.iter().any(Value::holds_instances),
			_ => false,
		}
	}

	/// Rendering used to quote a raw value inside error messages.
	pub fn describe(&self) -> String {
		match self {
			Value::Text(s) => format!("{s:?}"),
			other => other.to_string(),
		}
	}
}

/// Signed total seconds of a time delta, including the fractional part.
pub fn total_seconds(delta: &TimeDelta) -> f64 {
	delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1_000_000_000.0
}

/// Time delta from a signed number of seconds.
pub fn delta_from_seconds(seconds: f64) -> Option<TimeDelta> {
	if !seconds.is_finite() {
		return None;
	}
	let whole = seconds.trunc();
	let nanos = ((seconds - whole) * 1_000_000_000.0).round() as i64;
	TimeDelta::try_seconds(whole as i64)?.checked_add(&TimeDelta::nanoseconds(nanos))
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Int(i) => write!(f, "{i}"),
			Value::Float(x) => write!(f, "{x}"),
			Value::Decimal(d) => write!(f, "{d}"),
			Value::Text(s) => f.write_str(s),
			Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
			Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
			Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
			Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
			Value::Duration(d) => write!(f, "{}", total_seconds(d)),
			Value::Uuid(u) => write!(f, "{u}"),
			Value::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", item.describe())?;
				}
				f.write_str("]")
			}
			Value::Map(map) => {
				f.write_str("{")?;
				for (i, (key, item)) in map.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{key:?}: {}", item.describe())?;
				}
				f.write_str("}")
			}
			Value::Instance(instance) => write!(f, "<{} instance>", instance.class().name()),
		}
	}
}

macro_rules! impl_from {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Value::$variant(value.into())
				}
			}
		)*
	};
}

impl_from! {
	bool => Bool,
	i64 => Int,
	i32 => Int,
	u32 => Int,
	f64 => Float,
	Decimal => Decimal,
	String => Text,
	&str => Text,
	Vec<u8> => Bytes,
	NaiveDate => Date,
	NaiveTime => Time,
	NaiveDateTime => DateTime,
	TimeDelta => Duration,
	Uuid => Uuid,
	Vec<Value> => List,
	Map => Map,
}

impl From<Instance> for Value {
	fn from(instance: Instance) -> Self {
		Value::Instance(Box::new(instance))
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Value::Text(s),
			serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(map) => {
				Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Null => serializer.serialize_none(),
			Value::Bool(b) => serializer.serialize_bool(*b),
			Value::Int(i) => serializer.serialize_i64(*i),
			Value::Float(x) => serializer.serialize_f64(*x),
			Value::Decimal(d) => serializer.collect_str(d),
			Value::Text(s) => serializer.serialize_str(s),
			Value::Bytes(b) => serializer.serialize_bytes(b),
			Value::Date(_) | Value::Time(_) | Value::DateTime(_) | Value::Uuid(_) => {
				serializer.collect_str(self)
			}
			Value::Duration(d) => serializer.serialize_f64(total_seconds(d)),
			Value::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Value::Map(map) => serialize_map(serializer, map.iter()),
			Value::Instance(instance) => serialize_map(serializer, instance.values().iter()),
		}
	}
}

fn serialize_map<'a, S: Serializer>(
	serializer: S,
	entries: impl ExactSizeIterator<Item = (&'a String, &'a Value)>,
) -> Result<S::Ok, S::Error> {
	let mut map = serializer.serialize_map(Some(entries.len()))?;
	for (key, value) in entries {
		map.serialize_entry(key, value)?;
	}
	map.end()
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(ValueVisitor)
	}
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
	type Value = Value;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any value")
	}

	fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
		Ok(Value::Bool(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
		Ok(Value::Int(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
		Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
		Ok(Value::Float(v))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
		Ok(Value::Text(v.to_string()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
		Ok(Value::Text(v))
	}

	fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
		Ok(Value::Bytes(v.to_vec()))
	}

	fn visit_none<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
		Value::deserialize(deserializer)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element()? {
			items.push(item);
		}
		Ok(Value::List(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
		let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
		while let Some((key, value)) = access.next_entry::<MapKey, Value>()? {
			map.insert(key.0, value);
		}
		Ok(Value::Map(map))
	}
}

/// Mapping key that accepts scalar keys of any type (YAML allows `1: x`).
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct KeyVisitor;

		impl<'de> Visitor<'de> for KeyVisitor {
			type Value = MapKey;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a scalar mapping key")
			}

			fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
				Ok(MapKey(v.to_string()))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
				Ok(MapKey(v.to_string()))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
				Ok(MapKey(v.to_string()))
			}

			fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
				Ok(MapKey(v.to_string()))
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
				Ok(MapKey(v.to_string()))
			}

			fn visit_unit<E: de::Error>(self) -> Result<MapKey, E> {
				Ok(MapKey("null".to_string()))
			}
		}

		deserializer.deserialize_any(KeyVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_json_round_trip_preserves_order() {
		let value: Value = serde_json::from_str(r#"{"b": 1, "a": [true, null, 2.5]}"#).unwrap();
		let map = value.as_map().unwrap();
		assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
		assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"b":1,"a":[true,null,2.5]}"#);
	}

	#[rstest]
	fn test_yaml_numeric_keys_become_strings() {
		let value: Value = serde_yaml::from_str("1: one\nname: two\n").unwrap();
		let map = value.as_map().unwrap();
		assert_eq!(map.get("1"), Some(&Value::from("one")));
		assert_eq!(map.get("name"), Some(&Value::from("two")));
	}

	#[rstest]
	fn test_temporal_values_serialize_as_iso_strings() {
		let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
		let datetime = date.and_hms_opt(13, 5, 0).unwrap();
		assert_eq!(serde_json::to_string(&Value::from(date)).unwrap(), "\"2024-02-29\"");
		assert_eq!(
			serde_json::to_string(&Value::from(datetime)).unwrap(),
			"\"2024-02-29T13:05:00\""
		);
	}

	#[rstest]
	#[case(90.5)]
	#[case(-3600.25)]
	#[case(0.0)]
	fn test_seconds_conversion(#[case] seconds: f64) {
		let delta = delta_from_seconds(seconds).unwrap();
		assert!((total_seconds(&delta) - seconds).abs() < 1e-9);
	}

	#[rstest]
	fn test_describe_quotes_text_only() {
		assert_eq!(Value::from("abc").describe(), "\"abc\"");
		assert_eq!(Value::from(12).describe(), "12");
		assert_eq!(Value::from(Some(false)).describe(), "false");
		assert_eq!(Value::from(None::<i64>).describe(), "null");
	}

	#[rstest]
	fn test_from_json_value() {
		let value = Value::from(serde_json::json!({"id": 7, "ratio": 0.5, "tags": ["a"]}));
		let map = value.as_map().unwrap();
		assert_eq!(map["id"], Value::Int(7));
		assert_eq!(map["ratio"], Value::Float(0.5));
		assert_eq!(map["tags"], Value::List(vec![Value::from("a")]));
	}
}
