//! Format methods on models and model classes.
//!
//! [`SerializeModel`] and [`DeserializeModel`] are implemented for every
//! [`Model`], so `use athanor_serializers::prelude::*` is enough to call
//! `to_json` or `update_from_csv` on an [`Instance`] or a typed model.

use crate::codecs::{csv, json, yaml};
use crate::driver;
use crate::input::Input;
use crate::options::{CsvOptions, DeserializeOptions, SerializeOptions};
use athanor_core::{Direction, Format, Instance, Map, Model, ModelClass, Result, Value};
use std::sync::Arc;

/// Serialization to every supported format.
pub trait SerializeModel: Model {
	/// One CSV data line, preceded by a header line when `include_header` is set.
	fn to_csv(&self, options: &CsvOptions) -> Result<String> {
		let (header, fields) = driver::csv_rows(self, options, false)?;
		write_csv(header, fields, options)
	}

	/// The CSV data line alone.
	fn get_csv_data(&self, options: &CsvOptions) -> Result<String> {
		let (_, fields) = driver::csv_rows(self, options, false)?;
		Ok(csv::write_rows(&[fields], &options.dialect)?)
	}

	fn to_json(&self, options: &SerializeOptions) -> Result<String> {
		let record = driver::serialize_record(self, Format::Json, options)?;
		Ok(json::encode(&record)?)
	}

	fn to_yaml(&self, options: &SerializeOptions) -> Result<String> {
		let record = driver::serialize_record(self, Format::Yaml, options)?;
		Ok(yaml::encode(&record)?)
	}

	/// An ordered mapping of display names to native values.
	fn to_dict(&self, options: &SerializeOptions) -> Result<Map> {
		driver::serialize_record(self, Format::Dict, options)
	}

	/// [`to_csv`](SerializeModel::to_csv) over every attribute, ignoring support flags.
	fn dump_to_csv(&self, options: &CsvOptions) -> Result<String> {
		let (header, fields) = driver::csv_rows(self, options, true)?;
		write_csv(header, fields, options)
	}

	fn dump_to_json(&self, options: &SerializeOptions) -> Result<String> {
		let record = driver::dump_record(self, Format::Json, options)?;
		Ok(json::encode(&record)?)
	}

	fn dump_to_yaml(&self, options: &SerializeOptions) -> Result<String> {
		let record = driver::dump_record(self, Format::Yaml, options)?;
		Ok(yaml::encode(&record)?)
	}

	fn dump_to_dict(&self, options: &SerializeOptions) -> Result<Map> {
		driver::dump_record(self, Format::Dict, options)
	}
}

impl<M: Model + ?Sized> SerializeModel for M {}

fn write_csv(header: Vec<String>, fields: Vec<String>, options: &CsvOptions) -> Result<String> {
	let rows = if options.include_header {
		vec![header, fields]
	} else {
		vec![fields]
	};
	Ok(csv::write_rows(&rows, &options.dialect)?)
}

/// Deserialization into an existing model, or into a fresh one.
///
/// Every value is converted before any attribute is assigned, so a failed
/// update leaves the model as it was.
pub trait DeserializeModel: Model {
	fn update_from_csv<'a>(&mut self, input: impl Into<Input<'a>>, options: &CsvOptions) -> Result<()> {
		let class = self.model_class();
		let record = driver::read_csv_record(&class, input.into(), options)?;
		driver::apply_record(self, record, Format::Csv, &csv_deserialize_options(options))
	}

	fn update_from_json<'a>(
		&mut self,
		input: impl Into<Input<'a>>,
		options: &DeserializeOptions,
	) -> Result<()> {
		let record = driver::read_record(input.into(), Format::Json)?;
		driver::apply_record(self, record, Format::Json, options)
	}

	fn update_from_yaml<'a>(
		&mut self,
		input: impl Into<Input<'a>>,
		options: &DeserializeOptions,
	) -> Result<()> {
		let record = driver::read_record(input.into(), Format::Yaml)?;
		driver::apply_record(self, record, Format::Yaml, options)
	}

	fn update_from_dict(&mut self, record: Map, options: &DeserializeOptions) -> Result<()> {
		let record = crate::codecs::into_record(Value::Map(record), Format::Dict)?;
		driver::apply_record(self, record, Format::Dict, options)
	}

	fn new_from_csv<'a>(input: impl Into<Input<'a>>, options: &CsvOptions) -> Result<Self>
	where
		Self: Default + Sized,
	{
		let mut model = Self::default();
		model.update_from_csv(input, options)?;
		Ok(model)
	}

	fn new_from_json<'a>(input: impl Into<Input<'a>>, options: &DeserializeOptions) -> Result<Self>
	where
		Self: Default + Sized,
	{
		let mut model = Self::default();
		model.update_from_json(input, options)?;
		Ok(model)
	}

	fn new_from_yaml<'a>(input: impl Into<Input<'a>>, options: &DeserializeOptions) -> Result<Self>
	where
		Self: Default + Sized,
	{
		let mut model = Self::default();
		model.update_from_yaml(input, options)?;
		Ok(model)
	}

	fn new_from_dict(record: Map, options: &DeserializeOptions) -> Result<Self>
	where
		Self: Default + Sized,
	{
		let mut model = Self::default();
		model.update_from_dict(record, options)?;
		Ok(model)
	}
}

impl<M: Model + ?Sized> DeserializeModel for M {}

fn csv_deserialize_options(options: &CsvOptions) -> DeserializeOptions {
	DeserializeOptions {
		config_set: options.config_set.clone(),
		strict: true,
	}
}

/// Creating [`Instance`]s of a class from serialized data.
pub trait ModelClassExt {
	/// The CSV header line for the class's outbound columns.
	fn get_csv_header(&self, options: &CsvOptions) -> Result<String>;

	fn new_from_csv<'a>(&self, input: impl Into<Input<'a>>, options: &CsvOptions) -> Result<Instance>;

	fn new_from_json<'a>(
		&self,
		input: impl Into<Input<'a>>,
		options: &DeserializeOptions,
	) -> Result<Instance>;

	fn new_from_yaml<'a>(
		&self,
		input: impl Into<Input<'a>>,
		options: &DeserializeOptions,
	) -> Result<Instance>;

	fn new_from_dict(&self, record: Map, options: &DeserializeOptions) -> Result<Instance>;
}

impl ModelClassExt for Arc<ModelClass> {
	fn get_csv_header(&self, options: &CsvOptions) -> Result<String> {
		let columns = self.get_csv_column_names(Direction::Outbound, options.config_set.as_deref())?;
		Ok(csv::write_rows(&[columns], &options.dialect)?)
	}

	fn new_from_csv<'a>(&self, input: impl Into<Input<'a>>, options: &CsvOptions) -> Result<Instance> {
		let mut instance = Instance::new(Arc::clone(self));
		instance.update_from_csv(input, options)?;
		Ok(instance)
	}

	fn new_from_json<'a>(
		&self,
		input: impl Into<Input<'a>>,
		options: &DeserializeOptions,
	) -> Result<Instance> {
		let mut instance = Instance::new(Arc::clone(self));
		instance.update_from_json(input, options)?;
		Ok(instance)
	}

	fn new_from_yaml<'a>(
		&self,
		input: impl Into<Input<'a>>,
		options: &DeserializeOptions,
	) -> Result<Instance> {
		let mut instance = Instance::new(Arc::clone(self));
		instance.update_from_yaml(input, options)?;
		Ok(instance)
	}

	fn new_from_dict(&self, record: Map, options: &DeserializeOptions) -> Result<Instance> {
		let mut instance = Instance::new(Arc::clone(self));
		instance.update_from_dict(record, options)?;
		Ok(instance)
	}
}
