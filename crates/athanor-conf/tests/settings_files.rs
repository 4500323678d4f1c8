//! Settings documents read from disk in every enabled format.

use athanor_conf::{SerializationSettings, SettingsError, SettingsFormat};
use athanor_core::{Direction, Format, ModelClass, ModelRegistry, ValueType};
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
	let path = dir.path().join(name);
	fs::write(&path, contents).unwrap();
	path
}

fn register(name: &str) -> Arc<ModelClass> {
	let class = ModelClass::builder(name)
		.column("id", ValueType::Integer)
		.column("email", ValueType::Text)
		.build()
		.unwrap();
	ModelRegistry::global().register(Arc::clone(&class));
	class
}

fn supports(class: &ModelClass, attribute: &str, format: Format, config_set: Option<&str>) -> (bool, bool) {
	(
		class
			.does_support_serialization(attribute, format, Direction::Inbound, config_set)
			.unwrap(),
		class
			.does_support_serialization(attribute, format, Direction::Outbound, config_set)
			.unwrap(),
	)
}

#[rstest]
fn test_json_file() {
	let class = register("FileJsonMember");
	let dir = TempDir::new().unwrap();
	let path = write(
		&dir,
		"serialization.json",
		r#"{
			"models": {
				"FileJsonMember": [
					{"name": "id", "supports_json": true, "csv_sequence": 1},
					{"name": "email", "supports_json": [true, false], "display_name": "mail"}
				]
			}
		}"#,
	);

	let settings = SerializationSettings::from_path(&path).unwrap();
	assert_eq!(settings.apply(&ModelRegistry::global()).unwrap(), 1);
	assert_eq!(supports(&class, "id", Format::Json, None), (true, true));
	assert_eq!(supports(&class, "email", Format::Json, None), (true, false));
	assert_eq!(
		class
			.get_attribute_serialization_config("mail", None)
			.unwrap()
			.unwrap()
			.name(),
		"email"
	);
}

#[cfg(feature = "yaml")]
#[rstest]
fn test_yaml_file_with_sets() {
	let class = register("FileYamlMember");
	let dir = TempDir::new().unwrap();
	let path = write(
		&dir,
		"serialization.yml",
		"models:\n  FileYamlMember:\n    admin:\n      - name: id\n        supports_csv: true\n      - name: email\n        supports_csv: true\n    public:\n      - name: id\n        supports_csv: [false, true]\n",
	);

	SerializationSettings::from_path(&path)
		.unwrap()
		.apply(&ModelRegistry::global())
		.unwrap();

	assert_eq!(class.config_set_names(), vec!["admin", "public"]);
	assert_eq!(supports(&class, "email", Format::Csv, Some("admin")), (true, true));
	assert_eq!(supports(&class, "id", Format::Csv, Some("public")), (false, true));
	assert!(class.serialization_config(None).is_err());
}

#[cfg(feature = "toml")]
#[rstest]
fn test_toml_file() {
	let class = register("FileTomlMember");
	let dir = TempDir::new().unwrap();
	let path = write(
		&dir,
		"serialization.toml",
		r#"
[[models.FileTomlMember]]
name = "id"
supports_yaml = true

[[models.FileTomlMember]]
name = "email"
supports_yaml = [false, true]
"#,
	);

	SerializationSettings::from_path(&path)
		.unwrap()
		.apply(&ModelRegistry::global())
		.unwrap();
	assert_eq!(supports(&class, "id", Format::Yaml, None), (true, true));
	assert_eq!(supports(&class, "email", Format::Yaml, None), (false, true));
}

#[rstest]
fn test_unknown_extension() {
	let dir = TempDir::new().unwrap();
	let path = write(&dir, "serialization.ini", "[models]");
	let err = SerializationSettings::from_path(&path).unwrap_err();
	assert!(matches!(err, SettingsError::UnsupportedExtension(ref ext) if ext == "ini"));
}

#[rstest]
fn test_malformed_entry_is_configuration_error() {
	register("FileBadSequence");
	let settings = SerializationSettings::from_str(
		r#"{"models": {"FileBadSequence": [{"name": "id", "csv_sequence": -1}]}}"#,
		SettingsFormat::Json,
	)
	.unwrap();
	let err = settings.apply(&ModelRegistry::global()).unwrap_err();
	assert!(matches!(err, SettingsError::Core(ref core) if core.is_configuration_error()));
}
