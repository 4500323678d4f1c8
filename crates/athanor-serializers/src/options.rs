//! Per-call options for the serialization driver.

/// Options for serializing to JSON, YAML or dict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
	/// Named configuration set, or `None` for the default set.
	pub config_set: Option<String>,
	/// Deepest level of related objects to include. `0` omits them entirely.
	pub max_nesting: usize,
	/// Nesting level of the object being serialized.
	pub current_nesting: usize,
}

impl SerializeOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config_set(mut self, config_set: impl Into<String>) -> Self {
		self.config_set = Some(config_set.into());
		self
	}

	pub fn max_nesting(mut self, max_nesting: usize) -> Self {
		self.max_nesting = max_nesting;
		self
	}

	pub fn current_nesting(mut self, current_nesting: usize) -> Self {
		self.current_nesting = current_nesting;
		self
	}

	/// Options for the objects one level further down.
	pub(crate) fn nested(&self) -> Self {
		Self {
			config_set: self.config_set.clone(),
			max_nesting: self.max_nesting,
			current_nesting: self.current_nesting.saturating_add(1),
		}
	}
}

/// Options for deserializing from any format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializeOptions {
	/// Named configuration set, or `None` for the default set.
	pub config_set: Option<String>,
	/// Reject input keys that map to no inbound-eligible attribute.
	pub strict: bool,
}

impl Default for DeserializeOptions {
	fn default() -> Self {
		Self {
			config_set: None,
			strict: true,
		}
	}
}

impl DeserializeOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config_set(mut self, config_set: impl Into<String>) -> Self {
		self.config_set = Some(config_set.into());
		self
	}

	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}
}

/// How CSV rows are written and read.
///
/// # Examples
///
/// ```
/// use athanor_serializers::CsvDialect;
///
/// let dialect = CsvDialect::default().delimiter(b',').null_text("");
/// assert_eq!(dialect.delimiter, b',');
/// assert_eq!(dialect.wrapper_character, b'\'');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDialect {
	pub delimiter: u8,
	/// Quote every non-numeric field instead of only those that need it.
	pub wrap_all_strings: bool,
	/// Text written for null values and read back as null.
	pub null_text: String,
	pub wrapper_character: u8,
	/// Double a wrapper character that appears inside a field instead of escaping it.
	pub double_wrapper_character_when_nested: bool,
	pub escape_character: u8,
	/// `"\r\n"` or a single byte.
	pub line_terminator: String,
}

impl Default for CsvDialect {
	fn default() -> Self {
		Self {
			delimiter: b'|',
			wrap_all_strings: false,
			null_text: "None".to_string(),
			wrapper_character: b'\'',
			double_wrapper_character_when_nested: false,
			escape_character: b'\\',
			line_terminator: "\r\n".to_string(),
		}
	}
}

impl CsvDialect {
	pub fn delimiter(mut self, delimiter: u8) -> Self {
		self.delimiter = delimiter;
		self
	}

	pub fn wrap_all_strings(mut self, wrap_all_strings: bool) -> Self {
		self.wrap_all_strings = wrap_all_strings;
		self
	}

	pub fn null_text(mut self, null_text: impl Into<String>) -> Self {
		self.null_text = null_text.into();
		self
	}

	pub fn wrapper_character(mut self, wrapper_character: u8) -> Self {
		self.wrapper_character = wrapper_character;
		self
	}

	pub fn double_wrapper_character_when_nested(mut self, double: bool) -> Self {
		self.double_wrapper_character_when_nested = double;
		self
	}

	pub fn escape_character(mut self, escape_character: u8) -> Self {
		self.escape_character = escape_character;
		self
	}

	pub fn line_terminator(mut self, line_terminator: impl Into<String>) -> Self {
		self.line_terminator = line_terminator.into();
		self
	}
}

/// Options for serializing to or deserializing from CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvOptions {
	/// Named configuration set, or `None` for the default set.
	pub config_set: Option<String>,
	/// Write a header line before the data row.
	pub include_header: bool,
	pub dialect: CsvDialect,
}

impl CsvOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config_set(mut self, config_set: impl Into<String>) -> Self {
		self.config_set = Some(config_set.into());
		self
	}

	pub fn include_header(mut self, include_header: bool) -> Self {
		self.include_header = include_header;
		self
	}

	pub fn dialect(mut self, dialect: CsvDialect) -> Self {
		self.dialect = dialect;
		self
	}
}
