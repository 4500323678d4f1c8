//! Serialization formats and per-format support flags.

use crate::error::{ConfigurationError, Error};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A representation a model can be converted to or from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
	/// One flat, delimited row.
	Csv,
	/// JSON text.
	Json,
	/// YAML text.
	Yaml,
	/// An ordered mapping of native values.
	Dict,
}

impl Format {
	/// Every format, in declaration order.
	pub const ALL: [Format; 4] = [Format::Csv, Format::Json, Format::Yaml, Format::Dict];

	/// Lowercase name of the format.
	pub fn as_str(&self) -> &'static str {
		match self {
			Format::Csv => "csv",
			Format::Json => "json",
			Format::Yaml => "yaml",
			Format::Dict => "dict",
		}
	}

	/// Name of the configuration field that carries this format's support flags.
	pub fn support_field(&self) -> &'static str {
		match self {
			Format::Csv => "supports_csv",
			Format::Json => "supports_json",
			Format::Yaml => "supports_yaml",
			Format::Dict => "supports_dict",
		}
	}

	/// Whether the format is rendered to text.
	pub fn is_textual(&self) -> bool {
		!matches!(self, Format::Dict)
	}

	/// Detect a textual format from a file extension.
	///
	/// # Examples
	///
	/// ```
	/// use athanor_core::Format;
	///
	/// assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
	/// assert_eq!(Format::from_extension("txt"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"csv" => Some(Format::Csv),
			"json" => Some(Format::Json),
			"yaml" | "yml" => Some(Format::Yaml),
			_ => None,
		}
	}

	/// Detect a textual format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Format {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"csv" => Ok(Format::Csv),
			"json" => Ok(Format::Json),
			"yaml" | "yml" => Ok(Format::Yaml),
			"dict" => Ok(Format::Dict),
			_ => Err(Error::InvalidFormat(s.to_string())),
		}
	}
}

/// Which way data flows through a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Deserialization: external representation into the model.
	Inbound,
	/// Serialization: model into the external representation.
	Outbound,
}

/// Inbound/outbound eligibility of an attribute for one format.
///
/// A single boolean sets both directions:
///
/// ```
/// use athanor_core::FormatSupport;
///
/// assert_eq!(FormatSupport::from(true), FormatSupport::from((true, true)));
/// assert_eq!(FormatSupport::from(false), FormatSupport::NONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatSupport {
	/// Eligible for deserialization.
	pub inbound: bool,
	/// Eligible for serialization.
	pub outbound: bool,
}

impl FormatSupport {
	/// Neither direction.
	pub const NONE: FormatSupport = FormatSupport::new(false, false);
	/// Both directions.
	pub const BOTH: FormatSupport = FormatSupport::new(true, true);

	pub const fn new(inbound: bool, outbound: bool) -> Self {
		Self { inbound, outbound }
	}

	/// Eligibility for the given direction.
	pub fn allows(&self, direction: Direction) -> bool {
		match direction {
			Direction::Inbound => self.inbound,
			Direction::Outbound => self.outbound,
		}
	}

	/// Build from a slice of flags, which must hold exactly one or two entries.
	pub fn from_flags(attribute: &str, field: &str, flags: &[bool]) -> Result<Self, ConfigurationError> {
		match flags {
			[both] => Ok(Self::from(*both)),
			[inbound, outbound] => Ok(Self::new(*inbound, *outbound)),
			_ => Err(ConfigurationError::InvalidSupportArity {
				attribute: attribute.to_string(),
				field: field.to_string(),
				found: flags.len(),
			}),
		}
	}

	/// Coerce a loosely typed configuration value (bool, null or array of bools).
	pub fn from_json(
		attribute: &str,
		field: &str,
		value: &serde_json::Value,
	) -> Result<Self, ConfigurationError> {
		match value {
			serde_json::Value::Null => Ok(Self::NONE),
			serde_json::Value::Bool(b) => Ok(Self::from(*b)),
			serde_json::Value::Array(items) => {
				let flags = items
					.iter()
					.map(|item| item.as_bool())
					.collect::<Option<Vec<_>>>()
					.ok_or_else(|| ConfigurationError::Malformed {
						attribute: attribute.to_string(),
						message: format!("{field} must contain booleans"),
					})?;
				if flags.len() != 2 {
					return Err(ConfigurationError::InvalidSupportArity {
						attribute: attribute.to_string(),
						field: field.to_string(),
						found: flags.len(),
					});
				}
				Self::from_flags(attribute, field, &flags)
			}
			other => Err(ConfigurationError::Malformed {
				attribute: attribute.to_string(),
				message: format!("{field} expects a bool or an (inbound, outbound) pair, found {other}"),
			}),
		}
	}
}

impl From<bool> for FormatSupport {
	fn from(value: bool) -> Self {
		Self::new(value, value)
	}
}

impl From<(bool, bool)> for FormatSupport {
	fn from((inbound, outbound): (bool, bool)) -> Self {
		Self::new(inbound, outbound)
	}
}

impl From<FormatSupport> for (bool, bool) {
	fn from(support: FormatSupport) -> Self {
		(support.inbound, support.outbound)
	}
}

impl Serialize for FormatSupport {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		(self.inbound, self.outbound).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for FormatSupport {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct SupportVisitor;

		impl<'de> Visitor<'de> for SupportVisitor {
			type Value = FormatSupport;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a bool or an [inbound, outbound] pair of bools")
			}

			fn visit_bool<E: de::Error>(self, v: bool) -> Result<FormatSupport, E> {
				Ok(FormatSupport::from(v))
			}

			fn visit_unit<E: de::Error>(self) -> Result<FormatSupport, E> {
				Ok(FormatSupport::NONE)
			}

			fn visit_none<E: de::Error>(self) -> Result<FormatSupport, E> {
				Ok(FormatSupport::NONE)
			}

			fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FormatSupport, A::Error> {
				let mut flags = Vec::with_capacity(2);
				while let Some(flag) = seq.next_element::<bool>()? {
					flags.push(flag);
				}
				if flags.len() != 2 {
					return Err(de::Error::invalid_length(flags.len(), &self));
				}
				Ok(FormatSupport::new(flags[0], flags[1]))
			}
		}

		deserializer.deserialize_any(SupportVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("csv", Format::Csv)]
	#[case("JSON", Format::Json)]
	#[case("yml", Format::Yaml)]
	#[case(" dict ", Format::Dict)]
	fn test_format_from_str(#[case] input: &str, #[case] expected: Format) {
		assert_eq!(input.parse::<Format>().unwrap(), expected);
	}

	#[rstest]
	fn test_invalid_format_name() {
		let err = "xml".parse::<Format>().unwrap_err();
		assert!(matches!(err, Error::InvalidFormat(ref name) if name == "xml"));
	}

	#[rstest]
	fn test_format_from_path() {
		assert_eq!(Format::from_path(Path::new("data/widgets.CSV")), Some(Format::Csv));
		assert_eq!(Format::from_path(Path::new("data/widgets")), None);
	}

	#[rstest]
	fn test_support_serde_accepts_bool_and_pair() {
		let single: FormatSupport = serde_json::from_str("true").unwrap();
		let pair: FormatSupport = serde_json::from_str("[true, false]").unwrap();
		assert_eq!(single, FormatSupport::BOTH);
		assert_eq!(pair, FormatSupport::new(true, false));
	}

	#[rstest]
	fn test_support_serde_rejects_wrong_arity() {
		let result = serde_json::from_str::<FormatSupport>("[true, false, true]");
		assert!(result.is_err());
	}

	#[rstest]
	fn test_support_from_json_arity_error_names_attribute() {
		let err = FormatSupport::from_json("id", "supports_csv", &serde_json::json!([true]))
			.unwrap_err();
		assert_eq!(
			err,
			ConfigurationError::InvalidSupportArity {
				attribute: "id".to_string(),
				field: "supports_csv".to_string(),
				found: 1,
			}
		);
	}

	#[rstest]
	fn test_allows_by_direction() {
		let support = FormatSupport::new(true, false);
		assert!(support.allows(Direction::Inbound));
		assert!(!support.allows(Direction::Outbound));
	}

	proptest! {
		#[test]
		fn prop_single_bool_equals_pair(flag in any::<bool>()) {
			prop_assert_eq!(FormatSupport::from(flag), FormatSupport::from((flag, flag)));
			let from_json = FormatSupport::from_json("a", "supports_json", &serde_json::Value::Bool(flag)).unwrap();
			let from_pair = FormatSupport::from_json("a", "supports_json", &serde_json::json!([flag, flag])).unwrap();
			prop_assert_eq!(from_json, from_pair);
		}
	}
}
