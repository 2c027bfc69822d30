//! Default backend producing plotly.js figure JSON.

mod commands;
mod express;
mod factory;
mod graph_objects;

use std::borrow::Cow;

use plotmsg_value::{Record, Value};

use crate::backend::PlotBackend;
use crate::error::{InterpretError, Result};
use crate::figure::{Figure, Trace};

pub use express::PALETTE;
pub use graph_objects::TRACE_TYPES;

/// [`PlotBackend`] targeting plotly.js.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyBackend;

impl PlotBackend for PlotlyBackend {
	fn graph_object(&self, func: &str, kwargs: &Record) -> Result<Trace> {
		graph_objects::build(func, kwargs)
	}

	fn express(&self, func: &str, kwargs: &Record) -> Result<Vec<Trace>> {
		express::build(func, kwargs)
	}

	fn figure_factory(&self, func: &str, kwargs: &Record) -> Result<Vec<Trace>> {
		factory::build(func, kwargs)
	}

	fn apply_command(&self, figure: &mut Figure, func: &str, kwargs: &Record) -> Result<()> {
		commands::apply(figure, func, kwargs)
	}
}

/// Typed access to the keyword arguments of one call.
struct Args<'a> {
	func: &'a str,
	kwargs: &'a Record,
}

impl<'a> Args<'a> {
	fn new(func: &'a str, kwargs: &'a Record) -> Self {
		Self { func, kwargs }
	}

	/// An explicit null counts as absent.
	fn get(&self, name: &str) -> Option<&'a Value> {
		self.kwargs.get(name).filter(|v| !v.is_nothing())
	}

	fn required(&self, name: &'static str) -> Result<&'a Value> {
		self.get(name).ok_or_else(|| InterpretError::MissingArgument {
			func: self.func.to_owned(),
			arg: name,
		})
	}

	fn numbers(&self, name: &'static str) -> Result<Cow<'a, [f64]>> {
		self.required(name)?.as_numbers().map_err(|err| InterpretError::invalid(self.func, name, err))
	}

	fn f64_or(&self, name: &str, default: f64) -> Result<f64> {
		self.get(name)
			.map_or(Ok(default), Value::as_float)
			.map_err(|err| InterpretError::invalid(self.func, name, err))
	}

	fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
		self.get(name)
			.map_or(Ok(default), Value::as_bool)
			.map_err(|err| InterpretError::invalid(self.func, name, err))
	}

	fn str_opt(&self, name: &str) -> Result<Option<&'a str>> {
		self.get(name)
			.map(Value::as_str)
			.transpose()
			.map_err(|err| InterpretError::invalid(self.func, name, err))
	}

	/// Keyword arguments not named in `consumed`.
	fn rest(&self, consumed: &[&str]) -> Record {
		self.kwargs
			.iter()
			.filter(|(key, _)| !consumed.contains(&key.as_str()))
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect()
	}
}

#[cfg(test)]
mod tests;
