//! Core types for declarative attribute serialization.
//!
//! This crate holds everything that decides *whether* and *how* an attribute
//! takes part in serialization, independent of any text format:
//!
//! - **Configuration records**: [`AttributeConfiguration`] with per-format
//!   [`FormatSupport`] pairs, CSV ordering and [`FormatHook`]s
//! - **Resolution**: [`ConfigurationResolver`] merges declaration-time
//!   configuration with a class-level [`SerializationRegistry`] under a
//!   [`DefaultPolicy`]
//! - **Model layer**: [`ModelClass`], [`Instance`] and the [`Model`] trait
//! - **Values**: [`Value`] and declared [`ValueType`]s
//! - **Errors**: the [`Error`] taxonomy shared by every Athanor crate
//!
//! ## Example
//!
//! ```
//! use athanor_core::{AttributeConfiguration, Direction, Format, ModelClass, ValueType};
//!
//! let class = ModelClass::builder("User")
//! 	.column("id", ValueType::Integer)
//! 	.column("password", ValueType::Text)
//! 	.serialization([
//! 		AttributeConfiguration::new("id").unwrap().supports_all(true),
//! 		AttributeConfiguration::new("password").unwrap().supports_all((true, false)),
//! 	])
//! 	.build()
//! 	.unwrap();
//!
//! assert!(class
//! 	.does_support_serialization("password", Format::Json, Direction::Inbound, None)
//! 	.unwrap());
//! assert!(!class
//! 	.does_support_serialization("password", Format::Json, Direction::Outbound, None)
//! 	.unwrap());
//! ```

pub mod attribute;
pub mod declaration;
pub mod error;
pub mod format;
pub mod hooks;
pub mod model;
pub mod policy;
pub mod resolver;
pub mod value;
pub mod value_type;

pub use attribute::{AttributeConfiguration, AttributePatch};
pub use declaration::{ConfigEntry, ORIGINAL_CONFIG_SET, SerializationRegistry};
pub use error::{ConfigurationError, DeserializationError, Error, Result, SerializationError};
pub use format::{Direction, Format, FormatSupport};
pub use hooks::{FormatHook, Hook, HookError, HookResult};
pub use model::{
	AttributeDescriptor, AttributeKind, Instance, Model, ModelClass, ModelClassBuilder, ModelRegistry,
	register_model,
};
pub use policy::DefaultPolicy;
pub use resolver::{
	ConfigurationResolver, ConfigurationSet, DeclarationSource, ResolvedAttribute, ResolvedTable,
	TableRow,
};
pub use value::{Map, Value};
pub use value_type::{TypeCategory, ValueType};
