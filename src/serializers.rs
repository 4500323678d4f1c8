//! Format dispatch, codecs, the serialization driver and model generation.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "serializers")]
//! use athanor::serializers::{CsvDialect, generate_model_from_csv};
//! ```

pub use athanor_serializers::*;
