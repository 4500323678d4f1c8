//! Settings files for class-level serialization registries.

pub use athanor_conf::*;
