//! Configuration records, the resolver and the model layer.
//!
//! # Examples
//!
//! ```rust
//! use athanor::core::{AttributeConfiguration, Format, FormatSupport};
//!
//! let config = AttributeConfiguration::new("password")
//! 	.unwrap()
//! 	.supports_json((true, false));
//! assert_eq!(config.support(Format::Json), FormatSupport::new(true, false));
//! ```

pub use athanor_core::*;
