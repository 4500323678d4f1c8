//! Delimited single-record text.
//!
//! A serialized record is one data line, optionally preceded by a header
//! line of column names. Null values are written as the dialect's
//! `null_text`, and a field equal to `null_text` (or empty) reads back as null.

use crate::options::CsvDialect;
use ::csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use athanor_core::{DeserializationError, Format, Map, SerializationError, Value};

fn terminator(dialect: &CsvDialect) -> Result<Terminator, String> {
	match dialect.line_terminator.as_bytes() {
		b"\r\n" => Ok(Terminator::CRLF),
		[byte] => Ok(Terminator::Any(*byte)),
		_ => Err(format!(
			"line terminator {:?} must be \"\\r\\n\" or a single byte",
			dialect.line_terminator
		)),
	}
}

/// Text of one field.
pub fn render_field(value: &Value, dialect: &CsvDialect) -> String {
	match value {
		Value::Null => dialect.null_text.clone(),
		Value::Text(text) if text.is_empty() => dialect.null_text.clone(),
		Value::Text(text) => text.clone(),
		other => other.to_string(),
	}
}

/// Write `rows` as delimited lines, each followed by the line terminator.
pub fn write_rows(rows: &[Vec<String>], dialect: &CsvDialect) -> Result<String, SerializationError> {
	let encode_error = |message: String| SerializationError::Encode {
		format: Format::Csv,
		message,
	};
	let quote_style = if dialect.wrap_all_strings {
		QuoteStyle::NonNumeric
	} else {
		QuoteStyle::Necessary
	};
	let mut writer = WriterBuilder::new()
		.delimiter(dialect.delimiter)
		.quote(dialect.wrapper_character)
		.escape(dialect.escape_character)
		.double_quote(dialect.double_wrapper_character_when_nested)
		.quote_style(quote_style)
		.terminator(terminator(dialect).map_err(encode_error)?)
		.from_writer(vec![]);

	for row in rows {
		writer
			.write_record(row)
			.map_err(|e| encode_error(e.to_string()))?;
	}
	let bytes = writer
		.into_inner()
		.map_err(|e| encode_error(e.to_string()))?;
	String::from_utf8(bytes).map_err(|e| encode_error(e.to_string()))
}

/// Read one record, keyed by `columns`.
///
/// Input is either a single data line or a header line followed by a data
/// line; a header must list exactly `columns`. Missing trailing fields are
/// null, surplus fields are a structure error.
pub fn read_record(
	text: &str,
	columns: &[String],
	dialect: &CsvDialect,
) -> Result<Map, DeserializationError> {
	let mut reader = ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.delimiter(dialect.delimiter)
		.quote(dialect.wrapper_character)
		.escape(Some(dialect.escape_character))
		.double_quote(dialect.double_wrapper_character_when_nested)
		.terminator(terminator(dialect).map_err(DeserializationError::CsvStructure)?)
		.from_reader(text.as_bytes());

	let records = reader
		.records()
		.collect::<Result<Vec<StringRecord>, _>>()
		.map_err(|e| DeserializationError::Parse {
			format: Format::Csv,
			message: e.to_string(),
		})?;

	let data = match records.as_slice() {
		[] => return Err(DeserializationError::EmptyInput { format: Format::Csv }),
		[row] => row,
		[header, row] => {
			if !header.iter().eq(columns.iter().map(String::as_str)) {
				return Err(DeserializationError::CsvStructure(format!(
					"header [{}] does not match the expected columns [{}]",
					header.iter().collect::<Vec<_>>().join(", "),
					columns.join(", ")
				)));
			}
			row
		}
		_ => {
			return Err(DeserializationError::CsvStructure(format!(
				"expected a single record, found {} lines",
				records.len()
			)));
		}
	};

	keyed_fields(data, columns, dialect)
}

fn keyed_fields(
	data: &StringRecord,
	columns: &[String],
	dialect: &CsvDialect,
) -> Result<Map, DeserializationError> {
	if data.len() > columns.len() {
		return Err(DeserializationError::CsvStructure(format!(
			"record has {} fields but only {} columns are expected",
			data.len(),
			columns.len()
		)));
	}

	Ok(columns
		.iter()
		.enumerate()
		.map(|(i, column)| {
			let value = match data.get(i) {
				Some(field) if field.is_empty() || field == dialect.null_text => Value::Null,
				Some(field) => Value::Text(field.to_string()),
				None => Value::Null,
			};
			(column.clone(), value)
		})
		.collect())
}

/// Read the first record of headed CSV text, keyed by its own header.
///
/// Used where no expected columns exist yet, such as generating a model.
pub fn read_headed_record(text: &str, dialect: &CsvDialect) -> Result<Map, DeserializationError> {
	let mut reader = ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.delimiter(dialect.delimiter)
		.quote(dialect.wrapper_character)
		.escape(Some(dialect.escape_character))
		.double_quote(dialect.double_wrapper_character_when_nested)
		.terminator(terminator(dialect).map_err(DeserializationError::CsvStructure)?)
		.from_reader(text.as_bytes());
	let parse_error = |e: ::csv::Error| DeserializationError::Parse {
		format: Format::Csv,
		message: e.to_string(),
	};

	let header: Vec<String> = reader
		.headers()
		.map_err(parse_error)?
		.iter()
		.map(str::to_string)
		.collect();
	if header.iter().all(String::is_empty) {
		return Err(DeserializationError::EmptyInput { format: Format::Csv });
	}
	let Some(row) = reader.records().next().transpose().map_err(parse_error)? else {
		return Err(DeserializationError::CsvStructure(
			"expected a header line and a data line, found only the header".to_string(),
		));
	};
	keyed_fields(&row, &header, dialect)
}
