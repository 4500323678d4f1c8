//! Class-level serialization registries described in a settings document.
//!
//! A settings document maps model names to either a list of attribute
//! configuration entries or to named configuration sets:
//!
//! ```yaml
//! models:
//!   User:
//!     - name: id
//!       supports_json: true
//!     - name: password
//!       supports_json: [true, false]
//!   Invoice:
//!     admin:
//!       - name: total
//!         supports_csv: true
//! ```
//!
//! Entries are kept as mappings and coerced into attribute configurations
//! when a class resolves its registry.

use crate::error::{Result, SettingsError};
use crate::format::SettingsFormat;
use athanor_core::{ConfigEntry, ModelRegistry, SerializationRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the path of the settings file.
pub const SETTINGS_ENV_VAR: &str = "ATHANOR_SERIALIZATION_SETTINGS";

/// One attribute configuration entry as written in a settings document.
pub type EntryMapping = serde_json::Map<String, serde_json::Value>;

/// Serialization configuration for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSettings {
	/// A single unnamed configuration set.
	List(Vec<EntryMapping>),
	/// Named configuration sets.
	Sets(IndexMap<String, Vec<EntryMapping>>),
}

impl ModelSettings {
	/// The class-level registry these settings describe.
	pub fn to_registry(&self) -> SerializationRegistry {
		match self {
			ModelSettings::List(entries) => {
				SerializationRegistry::list(entries.iter().cloned().map(ConfigEntry::Mapping))
			}
			ModelSettings::Sets(sets) => SerializationRegistry::sets(
				sets.iter()
					.map(|(name, entries)| (name.clone(), entries.clone())),
			),
		}
	}

	/// Number of entries across all sets.
	pub fn entry_count(&self) -> usize {
		match self {
			ModelSettings::List(entries) => entries.len(),
			ModelSettings::Sets(sets) => sets.values().map(Vec::len).sum(),
		}
	}
}

/// Serialization settings for any number of models, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializationSettings {
	#[serde(default)]
	pub models: IndexMap<String, ModelSettings>,
}

impl SerializationSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add or replace the settings of one model.
	pub fn model(mut self, name: impl Into<String>, settings: ModelSettings) -> Self {
		self.models.insert(name.into(), settings);
		self
	}

	/// Parse a settings document. Blank text yields empty settings.
	///
	/// # Examples
	///
	/// ```
	/// use athanor_conf::{SerializationSettings, SettingsFormat};
	///
	/// let settings = SerializationSettings::from_str(
	/// 	r#"{"models": {"User": [{"name": "id", "supports_json": true}]}}"#,
	/// 	SettingsFormat::Json,
	/// )
	/// .unwrap();
	/// assert_eq!(settings.models.len(), 1);
	/// ```
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(text: &str, format: SettingsFormat) -> Result<Self> {
		if text.trim().is_empty() {
			return Ok(Self::default());
		}
		match format {
			SettingsFormat::Json => Ok(serde_json::from_str(text)?),
			#[cfg(feature = "yaml")]
			SettingsFormat::Yaml => Ok(serde_yaml::from_str(text)?),
			#[cfg(feature = "toml")]
			SettingsFormat::Toml => Ok(toml::from_str(text)?),
			#[allow(unreachable_patterns)]
			disabled => Err(SettingsError::FormatDisabled(disabled)),
		}
	}

	/// Read a settings file, choosing the format by extension.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let format = SettingsFormat::from_path(path)?;
		let text = fs::read_to_string(path)?;
		let settings = Self::from_str(&text, format)?;
		tracing::debug!(
			path = %path.display(),
			%format,
			models = settings.models.len(),
			"loaded serialization settings"
		);
		Ok(settings)
	}

	/// Read the settings file named by [`SETTINGS_ENV_VAR`], if it is set.
	pub fn from_env() -> Result<Option<Self>> {
		Self::from_env_var(SETTINGS_ENV_VAR)
	}

	/// Read the settings file named by `variable`, if it is set and not blank.
	pub fn from_env_var(variable: &str) -> Result<Option<Self>> {
		match std::env::var_os(variable) {
			Some(path) if !path.is_empty() => Self::from_path(path).map(Some),
			_ => {
				tracing::debug!(variable, "settings variable not set");
				Ok(None)
			}
		}
	}

	/// Fold `other` into these settings; its models replace ones of the same name.
	pub fn merge(&mut self, other: SerializationSettings) {
		for (name, settings) in other.models {
			self.models.insert(name, settings);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Install each model's registry on its registered class.
	///
	/// Every model must be registered and every entry valid before anything
	/// is installed, so a failure leaves all classes unchanged. Returns the
	/// number of classes updated.
	pub fn apply(&self, registry: &ModelRegistry) -> Result<usize> {
		let mut staged = Vec::with_capacity(self.models.len());
		for (name, settings) in &self.models {
			let class = registry.require(name)?;
			let model_registry = settings.to_registry();
			class.validate_serialization_registry(&model_registry)?;
			staged.push((class, model_registry, settings.entry_count()));
		}

		let applied = staged.len();
		for (class, model_registry, entries) in staged {
			class.set_serialization_registry(model_registry)?;
			tracing::debug!(
				model = class.name(),
				entries,
				"applied serialization settings"
			);
		}
		Ok(applied)
	}
}
