use super::class::ModelClass;
use super::descriptor::AttributeKind;
use crate::error::{ConfigurationError, Result};
use crate::value::{Map, Value};
use std::sync::Arc;

/// Attribute access the serialization driver needs from a model object.
///
/// [`Instance`] implements it for dynamic records; typed structs implement it
/// by mapping attribute names to their fields.
pub trait Model {
	/// The class describing this object's attributes.
	fn model_class(&self) -> Arc<ModelClass>;

	/// Current value of `name`, or `None` if the object has no such attribute.
	fn get_attribute(&self, name: &str) -> Option<Value>;

	/// Assign `value` to `name`.
	fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;
}

/// A dynamic model object holding one value per class attribute.
#[derive(Debug, Clone)]
pub struct Instance {
	class: Arc<ModelClass>,
	values: Map,
}

impl Instance {
	/// A fresh instance: every attribute null, to-many relationships empty.
	pub fn new(class: Arc<ModelClass>) -> Self {
		let values = class
			.attributes()
			.map(|attribute| {
				let initial = match attribute.kind() {
					AttributeKind::Relationship { many: true, .. } => Value::List(Vec::new()),
					_ => Value::Null,
				};
				(attribute.name().to_string(), initial)
			})
			.collect();
		Self { class, values }
	}

	/// Builder-style [`Instance::set`].
	pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
		self.set(name, value)?;
		Ok(self)
	}

	pub fn class(&self) -> &Arc<ModelClass> {
		&self.class
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
		match self.values.get_mut(name) {
			Some(slot) => {
				*slot = value.into();
				Ok(())
			}
			None => Err(ConfigurationError::UnknownAttribute {
				model: self.class.name().to_string(),
				attribute: name.to_string(),
			}
			.into()),
		}
	}

	/// Values in attribute declaration order.
	pub fn values(&self) -> &Map {
		&self.values
	}

	pub fn into_values(self) -> Map {
		self.values
	}
}

impl PartialEq for Instance {
	fn eq(&self, other: &Self) -> bool {
		self.class.name() == other.class.name() && self.values == other.values
	}
}

impl Model for Instance {
	fn model_class(&self) -> Arc<ModelClass> {
		Arc::clone(&self.class)
	}

	fn get_attribute(&self, name: &str) -> Option<Value> {
		self.values.get(name).cloned()
	}

	fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
		self.set(name, value)
	}
}
