//! Declaration-time and class-level configuration resolved together.

use athanor_core::{
	AttributeConfiguration, AttributeDescriptor, AttributePatch, ConfigurationError,
	DeclarationSource, DefaultPolicy, Direction, Error, Format, FormatSupport, ModelClass,
	SerializationRegistry, ValueType,
};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

#[fixture]
fn user() -> Arc<ModelClass> {
	ModelClass::builder("DeclUser")
		.primary_key("id")
		.attribute(AttributeDescriptor::column("id", ValueType::Integer).supports_all(true))
		.attribute(
			AttributeDescriptor::column("email", ValueType::Text)
				.supports_json(true)
				.display_name("mail")
				.csv_sequence(2),
		)
		.column("password", ValueType::Text)
		.serialization([AttributeConfiguration::new("password")
			.unwrap()
			.supports_json((true, false))])
		.build()
		.unwrap()
}

fn pair(class: &ModelClass, attribute: &str, format: Format, config_set: Option<&str>) -> (bool, bool) {
	let check = |direction| {
		class
			.does_support_serialization(attribute, format, direction, config_set)
			.unwrap()
	};
	(check(Direction::Inbound), check(Direction::Outbound))
}

#[rstest]
fn test_sources_are_merged(user: Arc<ModelClass>) {
	let set = user.serialization_config(None).unwrap();
	assert_eq!(set.source("id"), Some(DeclarationSource::Attribute));
	assert_eq!(set.source("password"), Some(DeclarationSource::Registry));

	assert_eq!(pair(&user, "password", Format::Json, None), (true, false));
	assert_eq!(pair(&user, "password", Format::Csv, None), (false, false));
	assert_eq!(pair(&user, "email", Format::Json, None), (true, true));
	assert_eq!(pair(&user, "email", Format::Yaml, None), (false, false));
}

#[rstest]
fn test_outbound_json_table(user: Arc<ModelClass>) {
	let table = user
		.get_serialization_config(Format::Json, Direction::Outbound, None)
		.unwrap();
	assert_eq!(table.display_names(), vec!["id", "mail"]);
	assert!(table.row_for_key("mail").is_some());
	assert!(table.row_for_key("password").is_none());
}

#[rstest]
fn test_registry_entry_from_mapping(user: Arc<ModelClass>) {
	let mapping = json!({"name": "email", "supports_csv": [false, true]});
	user.configure_serialization(
		[
			AttributeConfiguration::new("password").unwrap().supports_json((true, false)),
			AttributeConfiguration::from_mapping(mapping.as_object().unwrap()).unwrap(),
		],
		None,
	)
	.unwrap();

	// The registry replaces the declaration in full, display name included.
	assert_eq!(pair(&user, "email", Format::Csv, None), (false, true));
	assert_eq!(pair(&user, "email", Format::Json, None), (false, false));
	assert_eq!(
		user.get_csv_column_names(Direction::Outbound, None).unwrap(),
		vec!["email".to_string(), "id".to_string()]
	);
}

#[rstest]
fn test_named_sets(user: Arc<ModelClass>) {
	user.set_serialization_registry(SerializationRegistry::sets([
		(
			"admin",
			vec![
				AttributeConfiguration::new("password").unwrap().supports_all(true),
				AttributeConfiguration::new("email").unwrap().supports_all(true),
			],
		),
		("public", vec![AttributeConfiguration::new("email").unwrap().supports_json((false, true))]),
	]))
	.unwrap();

	assert_eq!(pair(&user, "password", Format::Dict, Some("admin")), (true, true));
	assert_eq!(pair(&user, "password", Format::Dict, Some("public")), (false, false));
	assert_eq!(pair(&user, "email", Format::Json, Some("public")), (false, true));
	// Attribute declarations still apply inside a set.
	assert_eq!(pair(&user, "id", Format::Csv, Some("public")), (true, true));

	let err = user.serialization_config(None).unwrap_err();
	assert!(matches!(
		err,
		Error::Configuration(ConfigurationError::ConfigSetRequired { .. })
	));
	let err = user.serialization_config(Some("staff")).unwrap_err();
	assert!(matches!(
		err,
		Error::Configuration(ConfigurationError::UnknownConfigSet { ref config_set, .. }) if config_set == "staff"
	));
}

#[rstest]
fn test_patch_through_display_name(user: Arc<ModelClass>) {
	user.set_attribute_serialization_config(
		"mail",
		AttributePatch::new().supports_yaml(FormatSupport::new(true, false)),
		None,
	)
	.unwrap();

	let config = user
		.get_attribute_serialization_config("email", None)
		.unwrap()
		.unwrap();
	assert_eq!(config.support(Format::Yaml), FormatSupport::new(true, false));
	assert_eq!(config.support(Format::Json), FormatSupport::BOTH);
	assert_eq!(config.display_name(), "mail");
	assert_eq!(config.csv_sequence(), Some(2));
	assert_eq!(
		user.serialization_config(None).unwrap().source("email"),
		Some(DeclarationSource::Registry)
	);
}

#[rstest]
fn test_permissive_policy() {
	let class = ModelClass::builder("DeclOpen")
		.column("id", ValueType::Integer)
		.policy(DefaultPolicy::uniform(FormatSupport::new(false, true)))
		.build()
		.unwrap();
	assert_eq!(pair(&class, "id", Format::Yaml, None), (false, true));
	assert_eq!(
		class.serialization_config(None).unwrap().source("id"),
		Some(DeclarationSource::Policy)
	);
}
