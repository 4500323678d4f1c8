//! # Athanor
//!
//! Declarative, per-attribute serialization of model instances to and from
//! CSV, JSON, YAML and ordered dicts.
//!
//! Every attribute of a model class carries an inbound/outbound support flag
//! for each format, an optional display name, an optional CSV position and
//! optional per-format hooks. Configuration may be declared on the attribute
//! itself or in a class-level registry (optionally split into named
//! configuration sets); the resolver merges both into one table per format
//! and direction, and the driver walks that table.
//!
//! ## Feature Flags
//!
//! - `minimal` - Configuration records, resolver and model layer only
//! - `serializers` - Format dispatch, codecs and the (de)serialization driver
//! - `conf` - Settings files for class-level registries
//! - `full` (default) - All of the above, with YAML and TOML settings
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "serializers")]
//! # {
//! use athanor::prelude::*;
//!
//! let user = ModelClass::builder("FacadeUser")
//! 	.column("id", ValueType::Integer)
//! 	.column("password", ValueType::Text)
//! 	.serialization([
//! 		AttributeConfiguration::new("id").unwrap().supports_all(true),
//! 		AttributeConfiguration::new("password").unwrap().supports_all((true, false)),
//! 	])
//! 	.build()
//! 	.unwrap();
//!
//! let mut instance = Instance::new(user)
//! 	.with("id", 1)
//! 	.unwrap()
//! 	.with("password", "hunter2")
//! 	.unwrap();
//! assert_eq!(instance.to_json(&SerializeOptions::default()).unwrap(), r#"{"id":1}"#);
//!
//! instance
//! 	.update_from_csv("2|swordfish\r\n", &CsvOptions::default())
//! 	.unwrap();
//! assert_eq!(instance.get("id"), Some(&Value::Int(2)));
//! # }
//! ```

pub mod core;
#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "serializers")]
pub mod serializers;

pub use athanor_core::{
	AttributeConfiguration, AttributeDescriptor, Direction, Error, Format, FormatHook, FormatSupport,
	Hook, Instance, Model, ModelClass, ModelRegistry, Result, SerializationRegistry, Value,
	ValueType,
};

#[cfg(feature = "conf")]
pub use athanor_conf::{SerializationSettings, SettingsError, SettingsFormat};

#[cfg(feature = "serializers")]
pub use athanor_serializers::{
	CsvDialect, CsvOptions, DeserializeModel, DeserializeOptions, GenerateOptions, Input,
	ModelClassExt, SerializeModel, SerializeOptions,
};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::{
		AttributeConfiguration, AttributeDescriptor, Direction, Format, FormatHook, FormatSupport,
		Hook, Instance, Model, ModelClass, ModelRegistry, SerializationRegistry, Value, ValueType,
	};

	#[cfg(feature = "serializers")]
	pub use athanor_serializers::prelude::*;

	#[cfg(feature = "conf")]
	pub use crate::{SerializationSettings, SettingsFormat};
}
