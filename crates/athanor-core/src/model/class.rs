use super::descriptor::AttributeDescriptor;
use crate::attribute::{AttributeConfiguration, AttributePatch};
use crate::declaration::{ConfigEntry, SerializationRegistry};
use crate::error::{ConfigurationError, Result};
use crate::format::{Direction, Format};
use crate::policy::DefaultPolicy;
use crate::resolver::{ConfigurationResolver, ConfigurationSet, ResolvedTable};
use crate::value_type::ValueType;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A mapped model class: its attributes and their serialization configuration.
///
/// The class owns its configuration sets. Resolved sets are cached per set
/// name; every mutation clears the cache, but snapshots already handed out
/// keep their contents.
///
/// # Examples
///
/// ```
/// use athanor_core::{AttributeDescriptor, Direction, Format, ModelClass, ValueType};
///
/// let widget = ModelClass::builder("Widget")
/// 	.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
/// 	.attribute(AttributeDescriptor::column("secret", ValueType::Text).supports_all((true, false)))
/// 	.build()
/// 	.unwrap();
///
/// let table = widget
/// 	.get_serialization_config(Format::Json, Direction::Outbound, None)
/// 	.unwrap();
/// assert_eq!(table.display_names(), vec!["id"]);
/// ```
#[derive(Debug)]
pub struct ModelClass {
	name: String,
	table_name: Option<String>,
	primary_key: Vec<String>,
	attributes: IndexMap<String, AttributeDescriptor>,
	registry: RwLock<SerializationRegistry>,
	cache: RwLock<HashMap<Option<String>, Arc<ConfigurationSet>>>,
	resolver: ConfigurationResolver,
}

impl ModelClass {
	pub fn builder(name: impl Into<String>) -> ModelClassBuilder {
		ModelClassBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn table_name(&self) -> Option<&str> {
		self.table_name.as_deref()
	}

	pub fn primary_key(&self) -> &[String] {
		&self.primary_key
	}

	/// Attributes in declaration order.
	pub fn attributes(&self) -> impl Iterator<Item = &AttributeDescriptor> {
		self.attributes.values()
	}

	pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
		self.attributes.get(name)
	}

	pub fn has_attribute(&self, name: &str) -> bool {
		self.attributes.contains_key(name)
	}

	pub fn policy(&self) -> &DefaultPolicy {
		self.resolver.policy()
	}

	/// A copy of the class-level registry.
	pub fn serialization_registry(&self) -> SerializationRegistry {
		self.registry.read().clone()
	}

	/// Names of the class's configuration sets; empty when it uses one default set.
	pub fn config_set_names(&self) -> Vec<String> {
		self.registry.read().set_names()
	}

	/// The resolved configuration set, computed once and cached.
	pub fn serialization_config(&self, config_set: Option<&str>) -> Result<Arc<ConfigurationSet>> {
		let key = config_set.map(str::to_string);
		if let Some(cached) = self.cache.read().get(&key) {
			return Ok(Arc::clone(cached));
		}
		let resolved = Arc::new(self.resolver.resolve(self, config_set)?);
		self.cache.write().insert(key, Arc::clone(&resolved));
		Ok(resolved)
	}

	/// The resolved table for `format` in `direction`.
	pub fn get_serialization_config(
		&self,
		format: Format,
		direction: Direction,
		config_set: Option<&str>,
	) -> Result<ResolvedTable> {
		Ok(self.serialization_config(config_set)?.table(format, direction))
	}

	/// Configuration of the attribute whose name or display name is `attribute`.
	pub fn get_attribute_serialization_config(
		&self,
		attribute: &str,
		config_set: Option<&str>,
	) -> Result<Option<AttributeConfiguration>> {
		Ok(self.serialization_config(config_set)?.find(attribute).cloned())
	}

	/// Whether `attribute` is eligible for `format` in `direction`.
	pub fn does_support_serialization(
		&self,
		attribute: &str,
		format: Format,
		direction: Direction,
		config_set: Option<&str>,
	) -> Result<bool> {
		let set = self.serialization_config(config_set)?;
		let config = set.find(attribute).ok_or_else(|| self.unknown_attribute(attribute))?;
		Ok(config.supports(format, direction))
	}

	/// Column names for CSV in `direction`, in column order.
	pub fn get_csv_column_names(
		&self,
		direction: Direction,
		config_set: Option<&str>,
	) -> Result<Vec<String>> {
		let table = self.get_serialization_config(Format::Csv, direction, config_set)?;
		Ok(table.rows().iter().map(|row| row.display_name.clone()).collect())
	}

	/// Update the fields set in `patch` on an attribute's current configuration.
	///
	/// The patched record is stored in the class-level registry, so it
	/// overrides any declaration-time configuration from then on.
	pub fn set_attribute_serialization_config(
		&self,
		attribute: &str,
		patch: AttributePatch,
		config_set: Option<&str>,
	) -> Result<()> {
		let current = self
			.serialization_config(config_set)?
			.find(attribute)
			.cloned()
			.ok_or_else(|| self.unknown_attribute(attribute))?;
		self.store(current.patched(patch), config_set)
	}

	/// Replace an attribute's configuration with `config`.
	pub fn replace_attribute_serialization_config(
		&self,
		config: AttributeConfiguration,
		config_set: Option<&str>,
	) -> Result<()> {
		if !self.has_attribute(config.name()) {
			return Err(self.unknown_attribute(config.name()).into());
		}
		self.store(config, config_set)
	}

	fn store(&self, config: AttributeConfiguration, config_set: Option<&str>) -> Result<()> {
		self.registry.write().upsert(&self.name, config_set, config)?;
		self.clear_serialization_cache();
		Ok(())
	}

	/// Replace the default list (`config_set` of `None`) or one named set.
	///
	/// The new entries are validated before anything is replaced.
	pub fn configure_serialization<E: Into<ConfigEntry>>(
		&self,
		entries: impl IntoIterator<Item = E>,
		config_set: Option<&str>,
	) -> Result<()> {
		let entries: Vec<ConfigEntry> = entries.into_iter().map(Into::into).collect();
		self.validate_entries(&entries)?;
		self.registry.write().configure(config_set, entries);
		self.clear_serialization_cache();
		Ok(())
	}

	/// Check that every entry of `registry` is well formed and names an attribute of this class.
	pub fn validate_serialization_registry(&self, registry: &SerializationRegistry) -> Result<()> {
		match registry {
			SerializationRegistry::Default(entries) => self.validate_entries(entries),
			SerializationRegistry::Sets(sets) => sets
				.values()
				.try_for_each(|entries| self.validate_entries(entries)),
		}
	}

	/// Replace the whole class-level registry.
	pub fn set_serialization_registry(&self, registry: SerializationRegistry) -> Result<()> {
		self.validate_serialization_registry(&registry)?;
		*self.registry.write() = registry;
		self.clear_serialization_cache();
		Ok(())
	}

	/// Drop every cached resolved set.
	pub fn clear_serialization_cache(&self) {
		self.cache.write().clear();
		tracing::debug!(model = %self.name, "cleared serialization cache");
	}

	fn validate_entries(&self, entries: &[ConfigEntry]) -> Result<()> {
		for entry in entries {
			let config = entry.to_configuration()?;
			if !self.has_attribute(config.name()) {
				return Err(self.unknown_attribute(config.name()).into());
			}
		}
		Ok(())
	}

	fn unknown_attribute(&self, attribute: &str) -> ConfigurationError {
		ConfigurationError::UnknownAttribute {
			model: self.name.clone(),
			attribute: attribute.to_string(),
		}
	}
}

/// Builder for [`ModelClass`].
#[derive(Debug)]
pub struct ModelClassBuilder {
	name: String,
	table_name: Option<String>,
	primary_key: Vec<String>,
	attributes: Vec<AttributeDescriptor>,
	registry: SerializationRegistry,
	policy: DefaultPolicy,
}

impl ModelClassBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			table_name: None,
			primary_key: Vec::new(),
			attributes: Vec::new(),
			registry: SerializationRegistry::default(),
			policy: DefaultPolicy::default(),
		}
	}

	pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
		self.table_name = Some(table_name.into());
		self
	}

	/// Add a primary key column name; call repeatedly for composite keys.
	pub fn primary_key(mut self, column: impl Into<String>) -> Self {
		self.primary_key.push(column.into());
		self
	}

	pub fn attribute(mut self, descriptor: AttributeDescriptor) -> Self {
		self.attributes.push(descriptor);
		self
	}

	/// Shorthand for an attribute with no declaration-time configuration.
	pub fn column(self, name: impl Into<String>, value_type: ValueType) -> Self {
		self.attribute(AttributeDescriptor::column(name, value_type))
	}

	/// The class-level registry as a single default list.
	pub fn serialization<E: Into<ConfigEntry>>(mut self, entries: impl IntoIterator<Item = E>) -> Self {
		self.registry = SerializationRegistry::list(entries);
		self
	}

	/// Add one named configuration set to the class-level registry.
	pub fn config_set<E: Into<ConfigEntry>>(
		mut self,
		name: impl Into<String>,
		entries: impl IntoIterator<Item = E>,
	) -> Self {
		let entries: Vec<ConfigEntry> = entries.into_iter().map(Into::into).collect();
		let name = name.into();
		self.registry = match self.registry {
			SerializationRegistry::Sets(mut sets) => {
				sets.insert(name, entries);
				SerializationRegistry::Sets(sets)
			}
			SerializationRegistry::Default(_) => SerializationRegistry::Sets(IndexMap::from([(name, entries)])),
		};
		self
	}

	pub fn registry(mut self, registry: SerializationRegistry) -> Self {
		self.registry = registry;
		self
	}

	pub fn policy(mut self, policy: DefaultPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Validate and build the class.
	///
	/// Every configuration set is resolved once, so unknown attributes and
	/// malformed entries surface here rather than on first use.
	pub fn build(self) -> Result<Arc<ModelClass>> {
		if self.name.trim().is_empty() {
			return Err(ConfigurationError::Malformed {
				attribute: String::new(),
				message: "model class name must not be empty".to_string(),
			}
			.into());
		}

		let mut attributes = IndexMap::with_capacity(self.attributes.len());
		for descriptor in self.attributes {
			if descriptor.name().trim().is_empty() {
				return Err(ConfigurationError::MissingName.into());
			}
			if attributes.contains_key(descriptor.name()) {
				return Err(ConfigurationError::Malformed {
					attribute: descriptor.name().to_string(),
					message: format!("declared more than once on '{}'", self.name),
				}
				.into());
			}
			attributes.insert(descriptor.name().to_string(), descriptor);
		}

		for column in &self.primary_key {
			if !attributes.contains_key(column) {
				return Err(ConfigurationError::UnknownAttribute {
					model: self.name.clone(),
					attribute: column.clone(),
				}
				.into());
			}
		}

		let class = ModelClass {
			name: self.name,
			table_name: self.table_name,
			primary_key: self.primary_key,
			attributes,
			registry: RwLock::new(self.registry),
			cache: RwLock::new(HashMap::new()),
			resolver: ConfigurationResolver::new(self.policy),
		};

		let set_names = class.config_set_names();
		if set_names.is_empty() {
			class.serialization_config(None)?;
		} else {
			for name in &set_names {
				class.serialization_config(Some(name))?;
			}
		}
		Ok(Arc::new(class))
	}
}
