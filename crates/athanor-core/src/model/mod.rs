//! The model layer: classes, attribute descriptors, instances and the registry.
//!
//! A [`ModelClass`] stands in for a mapped ORM class. It enumerates its
//! attributes, distinguishes columns, computed attributes and relationships,
//! and owns the serialization configuration for all of them.

mod class;
mod descriptor;
mod instance;
mod registry;

pub use class::{ModelClass, ModelClassBuilder};
pub use descriptor::{AttributeDescriptor, AttributeKind};
pub use instance::{Instance, Model};
pub use registry::{ModelRegistry, register_model};
