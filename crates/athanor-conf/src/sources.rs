//! Settings sources merged in priority order.
//!
//! A [`SettingsLoader`] combines any number of sources; models defined by a
//! higher-priority source replace those of lower ones.

use crate::error::Result;
use crate::format::SettingsFormat;
use crate::settings::{SETTINGS_ENV_VAR, SerializationSettings};
use std::fs;
use std::path::PathBuf;

/// Trait for settings sources
pub trait SettingsSource: Send + Sync {
	/// Load settings from this source
	fn load(&self) -> Result<SerializationSettings>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// A settings file on disk.
pub struct FileSource {
	path: PathBuf,
	format: Option<SettingsFormat>,
	required: bool,
}

impl FileSource {
	/// A file whose format is detected from its extension.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			format: None,
			required: true,
		}
	}

	/// Parse the file as `format` regardless of its extension.
	pub fn with_format(mut self, format: SettingsFormat) -> Self {
		self.format = Some(format);
		self
	}

	/// Treat a missing file as empty settings.
	pub fn optional(mut self) -> Self {
		self.required = false;
		self
	}
}

impl SettingsSource for FileSource {
	fn load(&self) -> Result<SerializationSettings> {
		if !self.required && !self.path.exists() {
			return Ok(SerializationSettings::default());
		}
		match self.format {
			Some(format) => {
				let text = fs::read_to_string(&self.path)?;
				SerializationSettings::from_str(&text, format)
			}
			None => SerializationSettings::from_path(&self.path),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("Settings file: {}", self.path.display())
	}
}

/// A settings file named by an environment variable.
pub struct EnvFileSource {
	variable: String,
}

impl EnvFileSource {
	/// Read the path from [`SETTINGS_ENV_VAR`].
	pub fn new() -> Self {
		Self::with_variable(SETTINGS_ENV_VAR)
	}

	pub fn with_variable(variable: impl Into<String>) -> Self {
		Self {
			variable: variable.into(),
		}
	}
}

impl Default for EnvFileSource {
	fn default() -> Self {
		Self::new()
	}
}

impl SettingsSource for EnvFileSource {
	fn load(&self) -> Result<SerializationSettings> {
		Ok(SerializationSettings::from_env_var(&self.variable)?.unwrap_or_default())
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Settings file named by ${}", self.variable)
	}
}

/// Settings built in code.
pub struct InlineSource {
	settings: SerializationSettings,
}

impl InlineSource {
	pub fn new(settings: SerializationSettings) -> Self {
		Self { settings }
	}
}

impl SettingsSource for InlineSource {
	fn load(&self) -> Result<SerializationSettings> {
		Ok(self.settings.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		format!("Inline settings ({} models)", self.settings.models.len())
	}
}

/// Merges settings sources by priority.
#[derive(Default)]
pub struct SettingsLoader {
	sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source<S: SettingsSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Load every source, lowest priority first. Ties keep insertion order.
	pub fn load(&self) -> Result<SerializationSettings> {
		let mut ordered: Vec<&dyn SettingsSource> = self.sources.iter().map(|source| &**source).collect();
		ordered.sort_by_key(|source| source.priority());

		let mut merged = SerializationSettings::default();
		for source in ordered {
			tracing::debug!(source = %source.description(), "loading serialization settings");
			merged.merge(source.load()?);
		}
		Ok(merged)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::ModelSettings;
	use rstest::rstest;
	use serial_test::serial;
	use std::env;
	use tempfile::TempDir;

	fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
		let path = dir.path().join(name);
		fs::write(&path, contents).unwrap();
		path
	}

	#[rstest]
	fn test_file_source_by_extension() {
		let dir = TempDir::new().unwrap();
		let path = write(&dir, "settings.json", r#"{"models": {"User": []}}"#);
		let settings = FileSource::new(path).load().unwrap();
		assert!(settings.models.contains_key("User"));
	}

	#[rstest]
	fn test_file_source_forced_format() {
		let dir = TempDir::new().unwrap();
		let path = write(&dir, "settings.conf", r#"{"models": {"User": []}}"#);
		let settings = FileSource::new(path)
			.with_format(SettingsFormat::Json)
			.load()
			.unwrap();
		assert_eq!(settings.models.len(), 1);
	}

	#[rstest]
	fn test_missing_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("absent.json");
		assert!(FileSource::new(&path).load().is_err());
		assert!(FileSource::new(&path).optional().load().unwrap().is_empty());
	}

	#[rstest]
	#[serial]
	fn test_env_file_source() {
		let dir = TempDir::new().unwrap();
		let path = write(&dir, "env.json", r#"{"models": {"FromEnv": []}}"#);

		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::set_var("ATHANOR_TEST_SOURCE_SETTINGS", &path);
		}
		let settings = EnvFileSource::with_variable("ATHANOR_TEST_SOURCE_SETTINGS")
			.load()
			.unwrap();
		// SAFETY: See above.
		unsafe {
			env::remove_var("ATHANOR_TEST_SOURCE_SETTINGS");
		}

		assert!(settings.models.contains_key("FromEnv"));
		assert!(EnvFileSource::with_variable("ATHANOR_TEST_SOURCE_SETTINGS")
			.load()
			.unwrap()
			.is_empty());
	}

	#[rstest]
	fn test_loader_priority() {
		let dir = TempDir::new().unwrap();
		let path = write(
			&dir,
			"settings.json",
			r#"{"models": {"Shared": {"file": []}, "FileOnly": []}}"#,
		);
		let inline = SerializationSettings::new()
			.model("Shared", ModelSettings::List(Vec::new()))
			.model("InlineOnly", ModelSettings::List(Vec::new()));

		let merged = SettingsLoader::new()
			.add_source(FileSource::new(path))
			.add_source(InlineSource::new(inline))
			.load()
			.unwrap();

		assert_eq!(
			merged.models.keys().collect::<Vec<_>>(),
			vec!["Shared", "InlineOnly", "FileOnly"]
		);
		assert!(matches!(merged.models["Shared"], ModelSettings::Sets(_)));
	}
}
