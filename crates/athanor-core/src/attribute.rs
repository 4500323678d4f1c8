//! The per-attribute serialization configuration record.

use crate::error::ConfigurationError;
use crate::format::{Direction, Format, FormatSupport};
use crate::hooks::{FormatHook, Hook};
use serde::{Deserialize, Serialize};

/// How one attribute takes part in each serialization format.
///
/// Support flags default to disabled in both directions. Hooks are stored as
/// given and only narrowed to a single callable once a format is known.
///
/// # Examples
///
/// ```
/// use athanor_core::{AttributeConfiguration, Direction, Format};
///
/// let config = AttributeConfiguration::new("id")
/// 	.unwrap()
/// 	.supports_csv(true)
/// 	.supports_json((false, true))
/// 	.with_csv_sequence(1);
///
/// assert!(config.supports(Format::Csv, Direction::Inbound));
/// assert!(!config.supports(Format::Json, Direction::Inbound));
/// assert_eq!(config.display_name(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct AttributeConfiguration {
	name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	display_name: Option<String>,
	supports_csv: FormatSupport,
	supports_json: FormatSupport,
	supports_yaml: FormatSupport,
	supports_dict: FormatSupport,
	#[serde(skip_serializing_if = "Option::is_none")]
	csv_sequence: Option<u32>,
	#[serde(skip)]
	on_serialize: Option<FormatHook>,
	#[serde(skip)]
	on_deserialize: Option<FormatHook>,
}

impl AttributeConfiguration {
	/// A record for `name` with every format disabled.
	pub fn new(name: impl Into<String>) -> Result<Self, ConfigurationError> {
		let name = name.into();
		if name.trim().is_empty() {
			return Err(ConfigurationError::MissingName);
		}
		Ok(Self::disabled(name))
	}

	/// Record for a name already validated by its owner.
	pub(crate) fn disabled(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			display_name: None,
			supports_csv: FormatSupport::NONE,
			supports_json: FormatSupport::NONE,
			supports_yaml: FormatSupport::NONE,
			supports_dict: FormatSupport::NONE,
			csv_sequence: None,
			on_serialize: None,
			on_deserialize: None,
		}
	}

	/// Coerce a plain mapping whose keys are record field names.
	///
	/// Support fields accept a bool or an `[inbound, outbound]` pair;
	/// `csv_sequence` must be a non-negative integer. Hooks cannot be
	/// expressed in a mapping and are left unset.
	pub fn from_mapping(
		mapping: &serde_json::Map<String, serde_json::Value>,
	) -> Result<Self, ConfigurationError> {
		let name = match mapping.get("name") {
			Some(serde_json::Value::String(name)) => name.clone(),
			_ => return Err(ConfigurationError::MissingName),
		};
		let mut config = Self::new(name)?;

		for (key, value) in mapping {
			let malformed = |message: String| ConfigurationError::Malformed {
				attribute: config.name.clone(),
				message,
			};
			match key.as_str() {
				"name" => {}
				"display_name" => {
					config.display_name = match value {
						serde_json::Value::Null => None,
						serde_json::Value::String(s) => Some(s.clone()),
						other => return Err(malformed(format!("display_name must be a string, found {other}"))),
					};
				}
				"supports_csv" | "supports_json" | "supports_yaml" | "supports_dict" => {
					let support = FormatSupport::from_json(&config.name, key, value)?;
					match key.as_str() {
						"supports_csv" => config.supports_csv = support,
						"supports_json" => config.supports_json = support,
						"supports_yaml" => config.supports_yaml = support,
						_ => config.supports_dict = support,
					}
				}
				"csv_sequence" => {
					config.csv_sequence = match value {
						serde_json::Value::Null => None,
						serde_json::Value::Number(n) => {
							let seq = n
								.as_u64()
								.and_then(|n| u32::try_from(n).ok())
								.ok_or_else(|| {
									malformed(format!("csv_sequence must be a non-negative integer, found {n}"))
								})?;
							Some(seq)
						}
						other => {
							return Err(malformed(format!(
								"csv_sequence must be a non-negative integer, found {other}"
							)));
						}
					};
				}
				"on_serialize" | "on_deserialize" if value.is_null() => {}
				other => {
					return Err(malformed(format!("unexpected configuration key '{other}'")));
				}
			}
		}
		Ok(config)
	}

	/// The record as a plain mapping (hooks are omitted).
	pub fn to_mapping(&self) -> serde_json::Map<String, serde_json::Value> {
		match serde_json::to_value(self) {
			Ok(serde_json::Value::Object(map)) => map,
			_ => serde_json::Map::new(),
		}
	}

	pub fn supports_csv(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_csv = support.into();
		self
	}

	pub fn supports_json(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_json = support.into();
		self
	}

	pub fn supports_yaml(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_yaml = support.into();
		self
	}

	pub fn supports_dict(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_dict = support.into();
		self
	}

	/// Set the same support for every format.
	pub fn supports_all(self, support: impl Into<FormatSupport>) -> Self {
		let support = support.into();
		self.supports_csv(support)
			.supports_json(support)
			.supports_yaml(support)
			.supports_dict(support)
	}

	/// Set support for one format.
	pub fn with_support(mut self, format: Format, support: impl Into<FormatSupport>) -> Self {
		*self.support_mut(format) = support.into();
		self
	}

	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = Some(display_name.into());
		self
	}

	pub fn with_csv_sequence(mut self, sequence: u32) -> Self {
		self.csv_sequence = Some(sequence);
		self
	}

	pub fn on_serialize(mut self, hook: impl Into<FormatHook>) -> Self {
		self.on_serialize = Some(hook.into());
		self
	}

	pub fn on_deserialize(mut self, hook: impl Into<FormatHook>) -> Self {
		self.on_deserialize = Some(hook.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Key or column name used in the external representation.
	pub fn display_name(&self) -> &str {
		self.display_name.as_deref().unwrap_or(&self.name)
	}

	/// The display name override, if one was set.
	pub fn explicit_display_name(&self) -> Option<&str> {
		self.display_name.as_deref()
	}

	/// Whether `name` is this attribute's name or display name.
	pub fn answers_to(&self, name: &str) -> bool {
		self.name == name || self.display_name.as_deref() == Some(name)
	}

	pub fn support(&self, format: Format) -> FormatSupport {
		match format {
			Format::Csv => self.supports_csv,
			Format::Json => self.supports_json,
			Format::Yaml => self.supports_yaml,
			Format::Dict => self.supports_dict,
		}
	}

	fn support_mut(&mut self, format: Format) -> &mut FormatSupport {
		match format {
			Format::Csv => &mut self.supports_csv,
			Format::Json => &mut self.supports_json,
			Format::Yaml => &mut self.supports_yaml,
			Format::Dict => &mut self.supports_dict,
		}
	}

	pub fn supports(&self, format: Format, direction: Direction) -> bool {
		self.support(format).allows(direction)
	}

	pub fn csv_sequence(&self) -> Option<u32> {
		self.csv_sequence
	}

	pub fn serializer(&self) -> Option<&FormatHook> {
		self.on_serialize.as_ref()
	}

	pub fn deserializer(&self) -> Option<&FormatHook> {
		self.on_deserialize.as_ref()
	}

	/// The `on_serialize` callable for `format`, if any.
	pub fn serialize_hook(&self, format: Format) -> Option<&Hook> {
		self.on_serialize.as_ref()?.for_format(format)
	}

	/// The `on_deserialize` callable for `format`, if any.
	pub fn deserialize_hook(&self, format: Format) -> Option<&Hook> {
		self.on_deserialize.as_ref()?.for_format(format)
	}

	/// A copy with the fields set in `patch` replaced.
	pub fn patched(&self, patch: AttributePatch) -> Self {
		let mut config = self.clone();
		if let Some(support) = patch.supports_csv {
			config.supports_csv = support;
		}
		if let Some(support) = patch.supports_json {
			config.supports_json = support;
		}
		if let Some(support) = patch.supports_yaml {
			config.supports_yaml = support;
		}
		if let Some(support) = patch.supports_dict {
			config.supports_dict = support;
		}
		if let Some(display_name) = patch.display_name {
			config.display_name = display_name;
		}
		if let Some(sequence) = patch.csv_sequence {
			config.csv_sequence = sequence;
		}
		if let Some(hook) = patch.on_serialize {
			config.on_serialize = hook;
		}
		if let Some(hook) = patch.on_deserialize {
			config.on_deserialize = hook;
		}
		config
	}
}

impl TryFrom<serde_json::Value> for AttributeConfiguration {
	type Error = ConfigurationError;

	fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
		match value {
			serde_json::Value::Object(map) => Self::from_mapping(&map),
			_ => Err(ConfigurationError::MissingName),
		}
	}
}

/// A field-wise update of an [`AttributeConfiguration`].
///
/// Fields left as `None` keep their current value. Optional fields take an
/// inner `Option` so they can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributePatch {
	pub supports_csv: Option<FormatSupport>,
	pub supports_json: Option<FormatSupport>,
	pub supports_yaml: Option<FormatSupport>,
	pub supports_dict: Option<FormatSupport>,
	pub display_name: Option<Option<String>>,
	pub csv_sequence: Option<Option<u32>>,
	pub on_serialize: Option<Option<FormatHook>>,
	pub on_deserialize: Option<Option<FormatHook>>,
}

impl AttributePatch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn supports_csv(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_csv = Some(support.into());
		self
	}

	pub fn supports_json(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_json = Some(support.into());
		self
	}

	pub fn supports_yaml(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_yaml = Some(support.into());
		self
	}

	pub fn supports_dict(mut self, support: impl Into<FormatSupport>) -> Self {
		self.supports_dict = Some(support.into());
		self
	}

	pub fn display_name(mut self, display_name: Option<String>) -> Self {
		self.display_name = Some(display_name);
		self
	}

	pub fn csv_sequence(mut self, sequence: Option<u32>) -> Self {
		self.csv_sequence = Some(sequence);
		self
	}

	pub fn on_serialize(mut self, hook: Option<FormatHook>) -> Self {
		self.on_serialize = Some(hook);
		self
	}

	pub fn on_deserialize(mut self, hook: Option<FormatHook>) -> Self {
		self.on_deserialize = Some(hook);
		self
	}
}
