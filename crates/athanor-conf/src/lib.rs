//! Settings files for class-level serialization registries.
//!
//! Serialization configuration can live outside the code that declares a
//! model. A settings document in JSON, YAML (feature `yaml`) or TOML (feature
//! `toml`) lists attribute configuration entries per model, and
//! [`SerializationSettings::apply`] installs them on the registered classes.
//!
//! ## Example
//!
//! ```
//! use athanor_conf::{SerializationSettings, SettingsFormat};
//! use athanor_core::{Direction, Format, ModelClass, ModelRegistry, ValueType};
//! use std::sync::Arc;
//!
//! let account = ModelClass::builder("ConfAccount")
//! 	.column("id", ValueType::Integer)
//! 	.build()
//! 	.unwrap();
//! ModelRegistry::global().register(Arc::clone(&account));
//!
//! let settings = SerializationSettings::from_str(
//! 	r#"{"models": {"ConfAccount": [{"name": "id", "supports_csv": true}]}}"#,
//! 	SettingsFormat::Json,
//! )
//! .unwrap();
//! settings.apply(&ModelRegistry::global()).unwrap();
//!
//! assert!(account
//! 	.does_support_serialization("id", Format::Csv, Direction::Outbound, None)
//! 	.unwrap());
//! ```

pub mod error;
pub mod format;
pub mod settings;
pub mod sources;

pub use error::{Result, SettingsError};
pub use format::SettingsFormat;
pub use settings::{EntryMapping, ModelSettings, SETTINGS_ENV_VAR, SerializationSettings};
pub use sources::{EnvFileSource, FileSource, InlineSource, SettingsLoader, SettingsSource};
