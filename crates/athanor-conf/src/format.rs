//! Settings document formats.

use crate::error::{Result, SettingsError};
use std::fmt;
use std::path::Path;

/// Text format of a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsFormat {
	Json,
	Yaml,
	Toml,
}

impl SettingsFormat {
	/// Detect the format from a file extension, without the leading dot.
	///
	/// # Examples
	///
	/// ```
	/// use athanor_conf::SettingsFormat;
	///
	/// assert_eq!(SettingsFormat::from_extension("yml").unwrap(), SettingsFormat::Yaml);
	/// assert!(SettingsFormat::from_extension("ini").is_err());
	/// ```
	pub fn from_extension(extension: &str) -> Result<Self> {
		match extension.to_ascii_lowercase().as_str() {
			"json" => Ok(SettingsFormat::Json),
			"yaml" | "yml" => Ok(SettingsFormat::Yaml),
			"toml" => Ok(SettingsFormat::Toml),
			_ => Err(SettingsError::UnsupportedExtension(extension.to_string())),
		}
	}

	/// Detect the format from a file path's extension.
	pub fn from_path(path: &Path) -> Result<Self> {
		let extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.ok_or_else(|| SettingsError::UnsupportedExtension(path.display().to_string()))?;
		Self::from_extension(extension)
	}

	/// Whether this build can parse the format.
	pub fn is_enabled(self) -> bool {
		match self {
			SettingsFormat::Json => true,
			SettingsFormat::Yaml => cfg!(feature = "yaml"),
			SettingsFormat::Toml => cfg!(feature = "toml"),
		}
	}

	pub fn extension(self) -> &'static str {
		match self {
			SettingsFormat::Json => "json",
			SettingsFormat::Yaml => "yaml",
			SettingsFormat::Toml => "toml",
		}
	}
}

impl fmt::Display for SettingsFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}
