//! Process-wide registry of model classes.
//!
//! Relationship attributes name their target class; the registry is how the
//! driver finds that class when it deserializes nested records.

use super::class::ModelClass;
use crate::error::{ConfigurationError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static MODEL_REGISTRY: Lazy<RwLock<IndexMap<String, Arc<ModelClass>>>> =
	Lazy::new(|| RwLock::new(IndexMap::new()));

/// Registers `class` under its name, returning the class it replaced.
pub fn register_model(class: Arc<ModelClass>) -> Option<Arc<ModelClass>> {
	let name = class.name().to_string();
	tracing::debug!(model = %name, "registering model class");
	MODEL_REGISTRY.write().insert(name, class)
}

/// Handle to the global model registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelRegistry;

impl ModelRegistry {
	pub fn new() -> Self {
		Self
	}

	/// The process-wide registry. Every handle shares the same storage.
	pub fn global() -> Self {
		Self
	}

	pub fn register(&self, class: Arc<ModelClass>) -> Option<Arc<ModelClass>> {
		register_model(class)
	}

	pub fn get(&self, name: &str) -> Option<Arc<ModelClass>> {
		MODEL_REGISTRY.read().get(name).cloned()
	}

	/// Like [`ModelRegistry::get`], but an unregistered name is an error.
	pub fn require(&self, name: &str) -> Result<Arc<ModelClass>> {
		self.get(name)
			.ok_or_else(|| ConfigurationError::UnknownModel(name.to_string()).into())
	}

	pub fn unregister(&self, name: &str) -> Option<Arc<ModelClass>> {
		MODEL_REGISTRY.write().shift_remove(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		MODEL_REGISTRY.read().contains_key(name)
	}

	/// Registered model names, in registration order.
	pub fn names(&self) -> Vec<String> {
		MODEL_REGISTRY.read().keys().cloned().collect()
	}

	/// Clears all registered classes.
	///
	/// This is primarily useful for testing.
	pub fn clear(&self) {
		MODEL_REGISTRY.write().clear();
	}

	pub fn len(&self) -> usize {
		MODEL_REGISTRY.read().len()
	}

	pub fn is_empty(&self) -> bool {
		MODEL_REGISTRY.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value_type::ValueType;
	use rstest::rstest;

	#[rstest]
	fn test_register_and_require() {
		let class = ModelClass::builder("RegistryTestModel")
			.column("id", ValueType::Integer)
			.build()
			.unwrap();
		let registry = ModelRegistry::new();
		registry.register(Arc::clone(&class));

		assert!(registry.contains("RegistryTestModel"));
		assert!(Arc::ptr_eq(&registry.require("RegistryTestModel").unwrap(), &class));

		registry.unregister("RegistryTestModel");
		assert!(registry.get("RegistryTestModel").is_none());
	}

	#[rstest]
	fn test_require_unknown_model() {
		let err = ModelRegistry::new().require("NeverRegistered").unwrap_err();
		assert!(err.is_configuration_error());
		assert_eq!(err.to_string(), "Model 'NeverRegistered' is not registered");
	}
}
