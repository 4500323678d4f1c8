//! Class-level serialization registries.
//!
//! A model class may carry one explicit list of attribute configurations, or
//! a mapping from configuration-set name to such a list. Entries can be full
//! records or plain mappings loaded from configuration data; mappings are
//! coerced when the registry is resolved.

use crate::attribute::AttributeConfiguration;
use crate::error::ConfigurationError;
use indexmap::IndexMap;

/// Name under which a default list is kept when a class switches to named sets.
pub const ORIGINAL_CONFIG_SET: &str = "_original";

/// One entry of a class-level registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEntry {
	Record(AttributeConfiguration),
	Mapping(serde_json::Map<String, serde_json::Value>),
}

impl ConfigEntry {
	/// Attribute name the entry configures, when it has one.
	pub fn name(&self) -> Option<&str> {
		match self {
			ConfigEntry::Record(config) => Some(config.name()),
			ConfigEntry::Mapping(map) => map.get("name").and_then(|name| name.as_str()),
		}
	}

	/// The entry as a record, coercing mappings.
	pub fn to_configuration(&self) -> Result<AttributeConfiguration, ConfigurationError> {
		match self {
			ConfigEntry::Record(config) => Ok(config.clone()),
			ConfigEntry::Mapping(map) => AttributeConfiguration::from_mapping(map),
		}
	}
}

impl From<AttributeConfiguration> for ConfigEntry {
	fn from(config: AttributeConfiguration) -> Self {
		ConfigEntry::Record(config)
	}
}

impl From<serde_json::Map<String, serde_json::Value>> for ConfigEntry {
	fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
		ConfigEntry::Mapping(map)
	}
}

/// The explicit, class-level configuration source.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializationRegistry {
	/// One unnamed configuration set.
	Default(Vec<ConfigEntry>),
	/// Named configuration sets selectable at call time.
	Sets(IndexMap<String, Vec<ConfigEntry>>),
}

impl Default for SerializationRegistry {
	fn default() -> Self {
		SerializationRegistry::Default(Vec::new())
	}
}

impl SerializationRegistry {
	/// A default list.
	pub fn list<E: Into<ConfigEntry>>(entries: impl IntoIterator<Item = E>) -> Self {
		SerializationRegistry::Default(entries.into_iter().map(Into::into).collect())
	}

	/// Named sets.
	pub fn sets<S, E>(sets: impl IntoIterator<Item = (S, Vec<E>)>) -> Self
	where
		S: Into<String>,
		E: Into<ConfigEntry>,
	{
		SerializationRegistry::Sets(
			sets.into_iter()
				.map(|(name, entries)| (name.into(), entries.into_iter().map(Into::into).collect()))
				.collect(),
		)
	}

	pub fn uses_sets(&self) -> bool {
		matches!(self, SerializationRegistry::Sets(_))
	}

	/// Names of the configuration sets; empty for a default list.
	pub fn set_names(&self) -> Vec<String> {
		match self {
			SerializationRegistry::Default(_) => Vec::new(),
			SerializationRegistry::Sets(sets) => sets.keys().cloned().collect(),
		}
	}

	/// Entries for `config_set`, enforcing the set selection rules.
	pub fn select(
		&self,
		model: &str,
		config_set: Option<&str>,
	) -> Result<&[ConfigEntry], ConfigurationError> {
		match (self, config_set) {
			(SerializationRegistry::Default(entries), None) => Ok(entries.as_slice()),
			(SerializationRegistry::Default(_), Some(name)) => {
				Err(ConfigurationError::ConfigSetsNotDefined {
					model: model.to_string(),
					config_set: name.to_string(),
				})
			}
			(SerializationRegistry::Sets(_), None) => Err(ConfigurationError::ConfigSetRequired {
				model: model.to_string(),
			}),
			(SerializationRegistry::Sets(sets), Some(name)) => sets
				.get(name)
				.map(Vec::as_slice)
				.ok_or_else(|| ConfigurationError::UnknownConfigSet {
					model: model.to_string(),
					config_set: name.to_string(),
				}),
		}
	}

	fn select_mut(
		&mut self,
		model: &str,
		config_set: Option<&str>,
	) -> Result<&mut Vec<ConfigEntry>, ConfigurationError> {
		match (self, config_set) {
			(SerializationRegistry::Default(entries), None) => Ok(entries),
			(SerializationRegistry::Default(_), Some(name)) => {
				Err(ConfigurationError::ConfigSetsNotDefined {
					model: model.to_string(),
					config_set: name.to_string(),
				})
			}
			(SerializationRegistry::Sets(_), None) => Err(ConfigurationError::ConfigSetRequired {
				model: model.to_string(),
			}),
			(SerializationRegistry::Sets(sets), Some(name)) => {
				sets.get_mut(name)
					.ok_or_else(|| ConfigurationError::UnknownConfigSet {
						model: model.to_string(),
						config_set: name.to_string(),
					})
			}
		}
	}

	/// Insert `config`, replacing any entry for the same attribute in place.
	pub fn upsert(
		&mut self,
		model: &str,
		config_set: Option<&str>,
		config: AttributeConfiguration,
	) -> Result<(), ConfigurationError> {
		let entries = self.select_mut(model, config_set)?;
		match entries
			.iter()
			.position(|entry| entry.name() == Some(config.name()))
		{
			Some(index) => entries[index] = ConfigEntry::Record(config),
			None => entries.push(ConfigEntry::Record(config)),
		}
		Ok(())
	}

	/// Replace the default list (`None`) or one named set.
	///
	/// Naming a set on a registry that still holds a default list converts it
	/// to named sets; a non-empty default list is kept under
	/// [`ORIGINAL_CONFIG_SET`].
	pub fn configure(&mut self, config_set: Option<&str>, entries: Vec<ConfigEntry>) {
		match (std::mem::take(self), config_set) {
			(_, None) => *self = SerializationRegistry::Default(entries),
			(SerializationRegistry::Default(original), Some(name)) => {
				let mut sets = IndexMap::new();
				if !original.is_empty() {
					sets.insert(ORIGINAL_CONFIG_SET.to_string(), original);
				}
				sets.insert(name.to_string(), entries);
				*self = SerializationRegistry::Sets(sets);
			}
			(SerializationRegistry::Sets(mut sets), Some(name)) => {
				sets.insert(name.to_string(), entries);
				*self = SerializationRegistry::Sets(sets);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn record(name: &str) -> AttributeConfiguration {
		AttributeConfiguration::new(name).unwrap().supports_all(true)
	}

	#[rstest]
	fn test_select_rules() {
		let list = SerializationRegistry::list([record("id")]);
		assert_eq!(list.select("W", None).unwrap().len(), 1);
		assert!(matches!(
			list.select("W", Some("read")),
			Err(ConfigurationError::ConfigSetsNotDefined { .. })
		));

		let sets = SerializationRegistry::sets([("read", vec![record("id")])]);
		assert!(matches!(
			sets.select("W", None),
			Err(ConfigurationError::ConfigSetRequired { .. })
		));
		assert!(matches!(
			sets.select("W", Some("write")),
			Err(ConfigurationError::UnknownConfigSet { .. })
		));
		assert_eq!(sets.select("W", Some("read")).unwrap().len(), 1);
	}

	#[rstest]
	fn test_upsert_replaces_in_place() {
		let mut registry = SerializationRegistry::list([record("id"), record("name")]);
		let replacement = AttributeConfiguration::new("id").unwrap();
		registry.upsert("W", None, replacement.clone()).unwrap();
		let entries = registry.select("W", None).unwrap();
		assert_eq!(entries[0], ConfigEntry::Record(replacement));
		assert_eq!(entries.len(), 2);
	}

	#[rstest]
	fn test_upsert_matches_mapping_entries_by_name() {
		let mapping = json!({"name": "id", "supports_json": true});
		let mut registry =
			SerializationRegistry::list([ConfigEntry::from(mapping.as_object().cloned().unwrap())]);
		registry.upsert("W", None, record("id")).unwrap();
		assert_eq!(registry.select("W", None).unwrap(), &[ConfigEntry::Record(record("id"))]);
	}

	#[rstest]
	fn test_configure_named_set_keeps_original_list() {
		let mut registry = SerializationRegistry::list([record("id")]);
		registry.configure(Some("read"), vec![record("name").into()]);
		assert_eq!(registry.set_names(), vec![ORIGINAL_CONFIG_SET, "read"]);
	}

	#[rstest]
	fn test_configure_default_replaces_everything() {
		let mut registry = SerializationRegistry::sets([("read", vec![record("id")])]);
		registry.configure(None, vec![]);
		assert_eq!(registry, SerializationRegistry::default());
	}
}
