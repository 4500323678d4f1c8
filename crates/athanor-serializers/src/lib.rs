//! Format dispatch, text codecs and the serialization driver.
//!
//! This crate turns model instances into CSV, JSON, YAML or ordered dicts and
//! back, following the per-attribute configuration resolved by
//! [`athanor_core`]:
//!
//! - **Dispatch**: default conversions by type category and format
//!   ([`dispatch`])
//! - **Codecs**: JSON, YAML and delimited text ([`codecs`])
//! - **Driver**: walks resolved tables, applies hooks and enforces the
//!   nesting limit ([`driver`])
//! - **Extension traits**: `to_json`, `update_from_csv`, `new_from_yaml` and
//!   friends on every [`Model`](athanor_core::Model) ([`SerializeModel`],
//!   [`DeserializeModel`], [`ModelClassExt`])
//! - **Generation**: model classes inferred from one serialized record
//!   ([`generate_model_from_json`] and siblings)
//!
//! ## Example
//!
//! ```
//! use athanor_core::{AttributeDescriptor, Instance, ModelClass, ValueType};
//! use athanor_serializers::prelude::*;
//!
//! let widget = ModelClass::builder("LibWidget")
//! 	.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
//! 	.attribute(AttributeDescriptor::column("secret", ValueType::Text).supports_all((true, false)))
//! 	.build()
//! 	.unwrap();
//!
//! let mut instance = Instance::new(widget).with("id", 7).unwrap().with("secret", "x").unwrap();
//! assert_eq!(instance.to_json(&SerializeOptions::default()).unwrap(), r#"{"id":7}"#);
//!
//! instance
//! 	.update_from_json(r#"{"id": 9, "secret": "y"}"#, &DeserializeOptions::default())
//! 	.unwrap();
//! assert_eq!(instance.get("secret").unwrap().as_str(), Some("y"));
//! ```

pub mod codecs;
pub mod dispatch;
pub mod driver;
pub mod ext;
pub mod generate;
pub mod input;
pub mod options;

pub use dispatch::{
	Conversion, ConversionError, Converted, default_deserializer, default_serializer,
	deserialize_default, serialize_default, supports_deserialization, supports_serialization,
};
pub use ext::{DeserializeModel, ModelClassExt, SerializeModel};
pub use generate::{
	GenerateOptions, generate_model_from_csv, generate_model_from_dict, generate_model_from_json,
	generate_model_from_yaml,
};
pub use input::Input;
pub use options::{CsvDialect, CsvOptions, DeserializeOptions, SerializeOptions};

/// Traits and option types needed to call the format methods.
pub mod prelude {
	pub use crate::ext::{DeserializeModel, ModelClassExt, SerializeModel};
	pub use crate::input::Input;
	pub use crate::options::{CsvDialect, CsvOptions, DeserializeOptions, SerializeOptions};
}
