//! Raw input accepted by the deserialization entry points.

use athanor_core::DeserializationError;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Serialized data to deserialize: text, bytes, a reader or a file path.
///
/// `&str` and `String` convert to [`Input::Text`]; use [`Input::path`] to read
/// a file instead.
pub enum Input<'a> {
	Text(Cow<'a, str>),
	Bytes(Cow<'a, [u8]>),
	Reader(Box<dyn Read + 'a>),
	Path(PathBuf),
}

impl<'a> Input<'a> {
	pub fn path(path: impl AsRef<Path>) -> Self {
		Input::Path(path.as_ref().to_path_buf())
	}

	pub fn reader(reader: impl Read + 'a) -> Self {
		Input::Reader(Box::new(reader))
	}

	/// Read the whole input as UTF-8 text.
	pub fn read_to_string(self) -> Result<String, DeserializationError> {
		match self {
			Input::Text(text) => Ok(text.into_owned()),
			Input::Bytes(bytes) => {
				String::from_utf8(bytes.into_owned()).map_err(|e| DeserializationError::Io(e.to_string()))
			}
			Input::Reader(mut reader) => {
				let mut text = String::new();
				reader.read_to_string(&mut text)?;
				Ok(text)
			}
			Input::Path(path) => std::fs::read_to_string(&path)
				.map_err(|e| DeserializationError::Io(format!("{}: {e}", path.display()))),
		}
	}
}

impl fmt::Debug for Input<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
			Input::Reader(_) => f.write_str("Reader(..)"),
			Input::Path(path) => f.debug_tuple("Path").field(path).finish(),
		}
	}
}

impl<'a> From<&'a str> for Input<'a> {
	fn from(text: &'a str) -> Self {
		Input::Text(Cow::Borrowed(text))
	}
}

impl From<String> for Input<'_> {
	fn from(text: String) -> Self {
		Input::Text(Cow::Owned(text))
	}
}

impl<'a> From<&'a String> for Input<'a> {
	fn from(text: &'a String) -> Self {
		Input::Text(Cow::Borrowed(text.as_str()))
	}
}

impl<'a> From<&'a [u8]> for Input<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Input::Bytes(Cow::Borrowed(bytes))
	}
}

impl From<Vec<u8>> for Input<'_> {
	fn from(bytes: Vec<u8>) -> Self {
		Input::Bytes(Cow::Owned(bytes))
	}
}

impl From<PathBuf> for Input<'_> {
	fn from(path: PathBuf) -> Self {
		Input::Path(path)
	}
}

impl<'a> From<&'a Path> for Input<'a> {
	fn from(path: &'a Path) -> Self {
		Input::Path(path.to_path_buf())
	}
}
