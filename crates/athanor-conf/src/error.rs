//! Errors raised while loading or applying settings.

use crate::format::SettingsFormat;

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Error type for settings loading
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	#[cfg(feature = "toml")]
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Unsupported settings file extension: {0}")]
	UnsupportedExtension(String),

	#[error("Settings format {0} is not enabled in this build")]
	FormatDisabled(SettingsFormat),

	#[error(transparent)]
	Core(#[from] athanor_core::Error),
}

impl SettingsError {
	/// Whether the error came from reading or parsing a settings document.
	pub fn is_load_error(&self) -> bool {
		!matches!(self, SettingsError::Core(_))
	}
}
