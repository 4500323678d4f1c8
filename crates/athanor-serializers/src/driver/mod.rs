//! The serialization driver.
//!
//! Walks a class's resolved table for one format and direction, applies
//! hooks or default conversions per attribute and assembles the result.
//! Nothing here touches text; see [`crate::codecs`] for that.

mod deserialize;
mod serialize;

pub use deserialize::{apply_record, deserialize_record, read_csv_record, read_record};
pub use serialize::{csv_rows, dump_record, serialize_record};

/// Which attributes a serialization pass includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
	/// Only outbound-eligible attributes, unsupported types fail.
	Configured,
	/// Every attribute, unsupported types pass through unconverted.
	Dump,
}
