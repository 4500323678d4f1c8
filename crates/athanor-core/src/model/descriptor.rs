use crate::attribute::AttributeConfiguration;
use crate::format::FormatSupport;
use crate::hooks::FormatHook;
use crate::value_type::ValueType;

/// What kind of attribute a descriptor describes.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
	/// A stored column.
	Column(ValueType),
	/// A computed attribute backed by model code rather than storage.
	Hybrid(ValueType),
	/// A reference to instances of another registered model.
	Relationship { target: String, many: bool },
}

/// One attribute of a model class, with any configuration declared alongside it.
///
/// The `supports_*`, `csv_sequence`, `display_name` and hook methods record
/// declaration-time configuration. A class-level registry entry for the same
/// attribute replaces all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
	name: String,
	kind: AttributeKind,
	declared: Option<AttributeConfiguration>,
}

impl AttributeDescriptor {
	pub fn column(name: impl Into<String>, value_type: ValueType) -> Self {
		Self::with_kind(name, AttributeKind::Column(value_type))
	}

	pub fn hybrid(name: impl Into<String>, value_type: ValueType) -> Self {
		Self::with_kind(name, AttributeKind::Hybrid(value_type))
	}

	/// A to-one relationship to the model registered as `target`.
	pub fn relationship(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::with_kind(
			name,
			AttributeKind::Relationship {
				target: target.into(),
				many: false,
			},
		)
	}

	fn with_kind(name: impl Into<String>, kind: AttributeKind) -> Self {
		Self {
			name: name.into(),
			kind,
			declared: None,
		}
	}

	/// Make a relationship to-many. No effect on other kinds.
	pub fn many(mut self) -> Self {
		if let AttributeKind::Relationship { many, .. } = &mut self.kind {
			*many = true;
		}
		self
	}

	pub fn supports_csv(self, support: impl Into<FormatSupport>) -> Self {
		let support = support.into();
		self.declare(|config| config.supports_csv(support))
	}

	pub fn supports_json(self, support: impl Into<FormatSupport>) -> Self {
		let support = support.into();
		self.declare(|config| config.supports_json(support))
	}

	pub fn supports_yaml(self, support: impl Into<FormatSupport>) -> Self {
		let support = support.into();
		self.declare(|config| config.supports_yaml(support))
	}

	pub fn supports_dict(self, support: impl Into<FormatSupport>) -> Self {
		let support = support.into();
		self.declare(|config| config.supports_dict(support))
	}

	pub fn supports_all(self, support: impl Into<FormatSupport>) -> Self {
		let support = support.into();
		self.declare(|config| config.supports_all(support))
	}

	pub fn csv_sequence(self, sequence: u32) -> Self {
		self.declare(|config| config.with_csv_sequence(sequence))
	}

	pub fn display_name(self, display_name: impl Into<String>) -> Self {
		let display_name = display_name.into();
		self.declare(|config| config.with_display_name(display_name))
	}

	pub fn on_serialize(self, hook: impl Into<FormatHook>) -> Self {
		let hook = hook.into();
		self.declare(|config| config.on_serialize(hook))
	}

	pub fn on_deserialize(self, hook: impl Into<FormatHook>) -> Self {
		let hook = hook.into();
		self.declare(|config| config.on_deserialize(hook))
	}

	fn declare(mut self, update: impl FnOnce(AttributeConfiguration) -> AttributeConfiguration) -> Self {
		let current = self
			.declared
			.take()
			.unwrap_or_else(|| AttributeConfiguration::disabled(self.name.clone()));
		self.declared = Some(update(current));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &AttributeKind {
		&self.kind
	}

	/// Declaration-time configuration, if any was given.
	pub fn declared(&self) -> Option<&AttributeConfiguration> {
		self.declared.as_ref()
	}

	/// Value type of a column or hybrid attribute.
	pub fn value_type(&self) -> Option<&ValueType> {
		match &self.kind {
			AttributeKind::Column(value_type) | AttributeKind::Hybrid(value_type) => Some(value_type),
			AttributeKind::Relationship { .. } => None,
		}
	}

	pub fn is_relationship(&self) -> bool {
		matches!(self.kind, AttributeKind::Relationship { .. })
	}

	/// Type name used in error messages.
	pub fn type_name(&self) -> String {
		match &self.kind {
			AttributeKind::Column(value_type) | AttributeKind::Hybrid(value_type) => {
				value_type.name().to_string()
			}
			AttributeKind::Relationship { target, many: true } => format!("list of {target}"),
			AttributeKind::Relationship { target, many: false } => target.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::format::Format;
	use rstest::rstest;

	#[rstest]
	fn test_plain_descriptor_declares_nothing() {
		let descriptor = AttributeDescriptor::column("id", ValueType::Integer);
		assert!(descriptor.declared().is_none());
		assert_eq!(descriptor.value_type(), Some(&ValueType::Integer));
	}

	#[rstest]
	fn test_keywords_accumulate() {
		let descriptor = AttributeDescriptor::column("id", ValueType::Integer)
			.supports_csv(true)
			.supports_json((true, false))
			.csv_sequence(1)
			.display_name("ID");
		let config = descriptor.declared().unwrap();
		assert_eq!(config.name(), "id");
		assert_eq!(config.support(Format::Csv), FormatSupport::BOTH);
		assert_eq!(config.support(Format::Json), FormatSupport::new(true, false));
		assert_eq!(config.csv_sequence(), Some(1));
		assert_eq!(config.display_name(), "ID");
	}

	#[rstest]
	fn test_many_only_affects_relationships() {
		let related = AttributeDescriptor::relationship("parts", "Part").many();
		assert_eq!(
			related.kind(),
			&AttributeKind::Relationship {
				target: "Part".to_string(),
				many: true
			}
		);
		assert_eq!(related.type_name(), "list of Part");

		let column = AttributeDescriptor::column("id", ValueType::Integer).many();
		assert_eq!(column.kind(), &AttributeKind::Column(ValueType::Integer));
	}
}
