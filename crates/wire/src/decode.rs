//! Message decoder: envelope bytes to native values.
//!
//! Decoding is a pure function of the input bytes. Every protobuf oneof is
//! resolved through its discriminator; an unset discriminator (which is also
//! what a variant unknown to this schema decodes to) is a schema error rather
//! than a silent default.

use plotmsg_value::{Record, Value};
use prost::Message;

use crate::error::{DecodeError, Result};
use crate::message::{CommandDescriptor, CreationMethod, Decoded, FigureMessage, TraceDescriptor};
use crate::proto::{self, dict_item_val, message_container, series_any, trace};

/// Parses the outer envelope.
pub fn decode(bytes: &[u8]) -> Result<proto::MessageContainer> {
	Ok(proto::MessageContainer::decode(bytes)?)
}

/// Parses and unpacks one envelope.
pub fn decode_message(bytes: &[u8]) -> Result<Decoded> {
	decode(bytes)?.unpack()
}

/// Recursive structural translation of a wire message into native values.
pub trait Unpack {
	type Output;

	fn unpack(&self) -> Result<Self::Output>;
}

impl Unpack for proto::MessageContainer {
	type Output = Decoded;

	fn unpack(&self) -> Result<Decoded> {
		match &self.message {
			Some(message_container::Message::Dict(dict)) => dict.unpack().map(Decoded::Dict),
			Some(message_container::Message::Fig(fig)) => fig.unpack().map(Decoded::Figure),
			None => Err(DecodeError::UnrecognisedVariant { context: "MessageContainer" }),
		}
	}
}

impl Unpack for proto::Dictionary {
	type Output = Record;

	/// Keys come out sorted so that equal maps unpack identically.
	fn unpack(&self) -> Result<Record> {
		let mut entries: Vec<_> = self.data.iter().collect();
		entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

		let mut record = Record::with_capacity(entries.len());
		for (key, item) in entries {
			record.insert(key.clone(), item.unpack()?);
		}
		Ok(record)
	}
}

impl Unpack for proto::DictItemVal {
	type Output = Value;

	fn unpack(&self) -> Result<Value> {
		let Some(value) = &self.value else {
			return Err(DecodeError::UnrecognisedVariant { context: "DictItemVal" });
		};
		Ok(match value {
			dict_item_val::Value::Bool(val) => Value::Bool(*val),
			dict_item_val::Value::String(val) => Value::String(val.clone()),
			dict_item_val::Value::Double(val) => Value::Float(*val),
			dict_item_val::Value::Int(val) => Value::Int(*val),
			dict_item_val::Value::SeriesD(series) => Value::FloatArray(series.data.clone()),
			dict_item_val::Value::SeriesI(series) => Value::IntArray(series.data.clone()),
			dict_item_val::Value::SeriesString(series) => Value::StringList(series.data.clone()),
			dict_item_val::Value::SeriesAny(series) => series.unpack()?,
			dict_item_val::Value::Dict(dict) => Value::Record(dict.unpack()?),
			dict_item_val::Value::Null(_) => Value::Nothing,
		})
	}
}

impl Unpack for proto::SeriesAny {
	type Output = Value;

	fn unpack(&self) -> Result<Value> {
		self.data.iter().map(Unpack::unpack).collect::<Result<Vec<_>>>().map(Value::List)
	}
}

impl Unpack for series_any::Value {
	type Output = Value;

	fn unpack(&self) -> Result<Value> {
		use series_any::value::Kind;

		match &self.value {
			Some(Kind::Null(_)) => Ok(Value::Nothing),
			Some(Kind::String(val)) => Ok(Value::String(val.clone())),
			Some(Kind::Double(val)) => Ok(Value::Float(*val)),
			Some(Kind::Int(val)) => Ok(Value::Int(*val)),
			Some(Kind::Bool(val)) => Ok(Value::Bool(*val)),
			None => Err(DecodeError::UnrecognisedVariant { context: "SeriesAny.Value" }),
		}
	}
}

impl Unpack for proto::Trace {
	type Output = TraceDescriptor;

	fn unpack(&self) -> Result<TraceDescriptor> {
		let method = match trace::CreationMethods::try_from(self.method) {
			Ok(trace::CreationMethods::GraphObjects) => CreationMethod::GraphObjects,
			Ok(trace::CreationMethods::PlotlyExpress) => CreationMethod::PlotlyExpress,
			Ok(trace::CreationMethods::FigureFactory) => CreationMethod::FigureFactory,
			Err(_) => return Err(DecodeError::UnknownCreationMethod(self.method)),
		};
		Ok(TraceDescriptor {
			method,
			func: self.method_func.clone(),
			kwargs: unpack_kwargs(self.kwargs.as_ref())?,
		})
	}
}

impl Unpack for proto::Command {
	type Output = CommandDescriptor;

	fn unpack(&self) -> Result<CommandDescriptor> {
		Ok(CommandDescriptor {
			func: self.func.clone(),
			kwargs: unpack_kwargs(self.kwargs.as_ref())?,
		})
	}
}

impl Unpack for proto::Figure {
	type Output = FigureMessage;

	fn unpack(&self) -> Result<FigureMessage> {
		Ok(FigureMessage {
			uuid: self.uuid.clone(),
			traces: self.traces.iter().map(Unpack::unpack).collect::<Result<_>>()?,
			commands: self.commands.iter().map(Unpack::unpack).collect::<Result<_>>()?,
		})
	}
}

// An omitted kwargs dictionary is the same as an empty one.
fn unpack_kwargs(dict: Option<&proto::Dictionary>) -> Result<Record> {
	dict.map_or_else(|| Ok(Record::new()), Unpack::unpack)
}
