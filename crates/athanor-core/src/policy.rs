//! Support granted to attributes that no configuration source mentions.

use crate::attribute::AttributeConfiguration;
use crate::format::{Format, FormatSupport};

/// Constant policy applied by the resolver to undeclared attributes.
///
/// The default, [`DefaultPolicy::FAIL_CLOSED`], disables every format in both
/// directions so that no attribute is exposed implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPolicy {
	pub csv: FormatSupport,
	pub json: FormatSupport,
	pub yaml: FormatSupport,
	pub dict: FormatSupport,
}

impl DefaultPolicy {
	/// Nothing is serialized or deserialized unless configured.
	pub const FAIL_CLOSED: DefaultPolicy = DefaultPolicy::uniform(FormatSupport::NONE);

	/// The same support for every format.
	pub const fn uniform(support: FormatSupport) -> Self {
		Self {
			csv: support,
			json: support,
			yaml: support,
			dict: support,
		}
	}

	pub fn support(&self, format: Format) -> FormatSupport {
		match format {
			Format::Csv => self.csv,
			Format::Json => self.json,
			Format::Yaml => self.yaml,
			Format::Dict => self.dict,
		}
	}

	/// The configuration an undeclared attribute called `name` resolves to.
	pub fn configuration_for(&self, name: &str) -> AttributeConfiguration {
		Format::ALL
			.into_iter()
			.fold(AttributeConfiguration::disabled(name), |config, format| {
				config.with_support(format, self.support(format))
			})
	}
}

impl Default for DefaultPolicy {
	fn default() -> Self {
		Self::FAIL_CLOSED
	}
}
