//! Resolution of a class's attribute configurations.
//!
//! Two sources feed one merge step:
//!
//! - configuration declared on the attribute itself when the class was built
//!   ([`DeclarationSource::Attribute`]);
//! - the class-level [`SerializationRegistry`](crate::SerializationRegistry)
//!   ([`DeclarationSource::Registry`]).
//!
//! A registry entry replaces the attribute's declaration in full. Attributes
//! found in neither source get the resolver's [`DefaultPolicy`].

use crate::attribute::AttributeConfiguration;
use crate::error::ConfigurationError;
use crate::format::{Direction, Format};
use crate::hooks::Hook;
use crate::model::ModelClass;
use crate::policy::DefaultPolicy;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Where a resolved configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationSource {
	/// Not declared anywhere; produced by the default policy.
	Policy,
	/// Declared on the attribute when the class was built.
	Attribute,
	/// Declared in the class-level registry.
	Registry,
}

/// One attribute's final configuration and its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
	pub config: AttributeConfiguration,
	pub source: DeclarationSource,
}

/// Consolidated configuration of every attribute of a class for one set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSet {
	model: String,
	name: Option<String>,
	attributes: IndexMap<String, ResolvedAttribute>,
}

impl ConfigurationSet {
	/// Name of the model class this set belongs to.
	pub fn model(&self) -> &str {
		&self.model
	}

	/// Name of the configuration set, or `None` for the default set.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn len(&self) -> usize {
		self.attributes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.attributes.is_empty()
	}

	/// Configuration of the attribute called `attribute`.
	pub fn get(&self, attribute: &str) -> Option<&AttributeConfiguration> {
		self.attributes.get(attribute).map(|resolved| &resolved.config)
	}

	/// Configuration of the attribute whose name or display name is `name`.
	pub fn find(&self, name: &str) -> Option<&AttributeConfiguration> {
		self.get(name).or_else(|| {
			self.attributes
				.values()
				.map(|resolved| &resolved.config)
				.find(|config| config.answers_to(name))
		})
	}

	/// Provenance of the attribute's configuration.
	pub fn source(&self, attribute: &str) -> Option<DeclarationSource> {
		self.attributes.get(attribute).map(|resolved| resolved.source)
	}

	/// Every resolved configuration, in attribute declaration order.
	pub fn configurations(&self) -> impl Iterator<Item = &AttributeConfiguration> {
		self.attributes.values().map(|resolved| &resolved.config)
	}

	/// The rows eligible for `format` in `direction`.
	///
	/// CSV rows are ordered by `csv_sequence`, unsequenced attributes last,
	/// ties broken by attribute name. Other formats keep declaration order.
	pub fn table(&self, format: Format, direction: Direction) -> ResolvedTable {
		self.build_table(format, direction, |config| config.supports(format, direction))
	}

	/// Every attribute regardless of support flags, in the order `format` uses.
	pub fn full_table(&self, format: Format, direction: Direction) -> ResolvedTable {
		self.build_table(format, direction, |_| true)
	}

	fn build_table(
		&self,
		format: Format,
		direction: Direction,
		include: impl Fn(&AttributeConfiguration) -> bool,
	) -> ResolvedTable {
		let mut rows: Vec<TableRow> = self
			.configurations()
			.filter(|config| include(config))
			.map(|config| TableRow {
				attribute: config.name().to_string(),
				display_name: config.display_name().to_string(),
				csv_sequence: config.csv_sequence(),
				on_serialize: config.serialize_hook(format).cloned(),
				on_deserialize: config.deserialize_hook(format).cloned(),
			})
			.collect();
		if format == Format::Csv {
			rows.sort_by(TableRow::csv_order);
		}
		ResolvedTable {
			format,
			direction,
			rows,
		}
	}
}

/// One eligible attribute of a [`ResolvedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
	pub attribute: String,
	pub display_name: String,
	pub csv_sequence: Option<u32>,
	pub on_serialize: Option<Hook>,
	pub on_deserialize: Option<Hook>,
}

impl TableRow {
	fn csv_order(a: &TableRow, b: &TableRow) -> Ordering {
		(a.csv_sequence.is_none(), a.csv_sequence, &a.attribute).cmp(&(
			b.csv_sequence.is_none(),
			b.csv_sequence,
			&b.attribute,
		))
	}
}

/// Attributes eligible for one (configuration set, format, direction).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
	format: Format,
	direction: Direction,
	rows: Vec<TableRow>,
}

impl ResolvedTable {
	pub fn format(&self) -> Format {
		self.format
	}

	pub fn direction(&self) -> Direction {
		self.direction
	}

	pub fn rows(&self) -> &[TableRow] {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Keys or column names, in row order.
	pub fn display_names(&self) -> Vec<&str> {
		self.rows.iter().map(|row| row.display_name.as_str()).collect()
	}

	/// Row whose display name is `key`.
	pub fn row_for_key(&self, key: &str) -> Option<&TableRow> {
		self.rows.iter().find(|row| row.display_name == key)
	}
}

/// Merges declaration-time and class-level configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationResolver {
	policy: DefaultPolicy,
}

impl ConfigurationResolver {
	pub fn new(policy: DefaultPolicy) -> Self {
		Self { policy }
	}

	pub fn policy(&self) -> &DefaultPolicy {
		&self.policy
	}

	/// Resolve `class` for `config_set` (`None` selects the default set).
	pub fn resolve(
		&self,
		class: &ModelClass,
		config_set: Option<&str>,
	) -> Result<ConfigurationSet, ConfigurationError> {
		let registry = class.serialization_registry();
		let entries = registry.select(class.name(), config_set)?;

		let declared: IndexMap<String, AttributeConfiguration> = class
			.attributes()
			.filter_map(|attribute| {
				attribute
					.declared()
					.map(|config| (attribute.name().to_string(), config.clone()))
			})
			.collect();

		let mut explicit = IndexMap::with_capacity(entries.len());
		for entry in entries {
			let config = entry.to_configuration()?;
			if !class.has_attribute(config.name()) {
				return Err(ConfigurationError::UnknownAttribute {
					model: class.name().to_string(),
					attribute: config.name().to_string(),
				});
			}
			explicit.insert(config.name().to_string(), config);
		}

		let resolved = self.merge(
			class.name(),
			config_set,
			class.attributes().map(|attribute| attribute.name()),
			declared,
			explicit,
		);
		tracing::debug!(
			model = class.name(),
			config_set = config_set.unwrap_or("<default>"),
			attributes = resolved.len(),
			"resolved serialization configuration"
		);
		Ok(resolved)
	}

	/// Merge the two sources over `attribute_names`, in that order.
	pub fn merge<'a>(
		&self,
		model: &str,
		config_set: Option<&str>,
		attribute_names: impl IntoIterator<Item = &'a str>,
		mut declared: IndexMap<String, AttributeConfiguration>,
		mut explicit: IndexMap<String, AttributeConfiguration>,
	) -> ConfigurationSet {
		let attributes = attribute_names
			.into_iter()
			.map(|name| {
				let resolved = if let Some(config) = explicit.swap_remove(name) {
					ResolvedAttribute {
						config,
						source: DeclarationSource::Registry,
					}
				} else if let Some(config) = declared.swap_remove(name) {
					ResolvedAttribute {
						config,
						source: DeclarationSource::Attribute,
					}
				} else {
					ResolvedAttribute {
						config: self.policy.configuration_for(name),
						source: DeclarationSource::Policy,
					}
				};
				(name.to_string(), resolved)
			})
			.collect();
		ConfigurationSet {
			model: model.to_string(),
			name: config_set.map(str::to_string),
			attributes,
		}
	}
}
