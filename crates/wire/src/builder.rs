//! Producer-side builders for envelopes.
//!
//! ```
//! use plotmsg_wire::builder::{Dict, FigureBuilder, TraceBuilder};
//!
//! let bytes = FigureBuilder::new("demo")
//! 	.trace(TraceBuilder::graph_objects("Scatter").kwarg("x", vec![1.0, 2.0]).kwarg("mode", "markers"))
//! 	.command("update_layout", Dict::new().with("title_text", "Demo"))
//! 	.encode();
//! assert!(!bytes.is_empty());
//! ```

use plotmsg_value::Value;
use prost::Message;

use crate::error::EncodeError;
use crate::proto::{self, dict_item_val, message_container, series_any, trace};

/// Explicit null for keyword values and heterogeneous lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Null;

/// One element of a heterogeneous list.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyItem {
	Null,
	String(String),
	Double(f64),
	Int(i64),
	Bool(bool),
}

impl From<Null> for AnyItem {
	fn from(_: Null) -> Self {
		Self::Null
	}
}

impl From<&str> for AnyItem {
	fn from(val: &str) -> Self {
		Self::String(val.to_owned())
	}
}

impl From<String> for AnyItem {
	fn from(val: String) -> Self {
		Self::String(val)
	}
}

impl From<f64> for AnyItem {
	fn from(val: f64) -> Self {
		Self::Double(val)
	}
}

impl From<i64> for AnyItem {
	fn from(val: i64) -> Self {
		Self::Int(val)
	}
}

impl From<i32> for AnyItem {
	fn from(val: i32) -> Self {
		Self::Int(val.into())
	}
}

impl From<bool> for AnyItem {
	fn from(val: bool) -> Self {
		Self::Bool(val)
	}
}

impl From<AnyItem> for series_any::Value {
	fn from(item: AnyItem) -> Self {
		use series_any::value::Kind;

		let kind = match item {
			AnyItem::Null => Kind::Null(proto::NullValue::NullValue as i32),
			AnyItem::String(val) => Kind::String(val),
			AnyItem::Double(val) => Kind::Double(val),
			AnyItem::Int(val) => Kind::Int(val),
			AnyItem::Bool(val) => Kind::Bool(val),
		};
		Self { value: Some(kind) }
	}
}

/// A keyword value ready to be placed in a [`Dict`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item(proto::DictItemVal);

impl Item {
	fn new(value: dict_item_val::Value) -> Self {
		Self(proto::DictItemVal { value: Some(value) })
	}

	pub fn into_proto(self) -> proto::DictItemVal {
		self.0
	}
}

macro_rules! item_from {
	($($ty:ty => |$v:ident| $body:expr;)+) => {
		$(
			impl From<$ty> for Item {
				fn from($v: $ty) -> Self {
					Self::new($body)
				}
			}
		)+
	};
}

item_from! {
	bool => |v| dict_item_val::Value::Bool(v);
	f64 => |v| dict_item_val::Value::Double(v);
	i64 => |v| dict_item_val::Value::Int(v);
	i32 => |v| dict_item_val::Value::Int(v.into());
	&str => |v| dict_item_val::Value::String(v.to_owned());
	String => |v| dict_item_val::Value::String(v);
	Null => |_v| dict_item_val::Value::Null(proto::NullValue::NullValue as i32);
	Vec<f64> => |v| dict_item_val::Value::SeriesD(proto::SeriesD { data: v });
	Vec<i64> => |v| dict_item_val::Value::SeriesI(proto::SeriesI { data: v });
	Vec<i32> => |v| dict_item_val::Value::SeriesI(proto::SeriesI { data: v.into_iter().map(i64::from).collect() });
	Vec<String> => |v| dict_item_val::Value::SeriesString(proto::SeriesString { data: v });
	Vec<&str> => |v| dict_item_val::Value::SeriesString(proto::SeriesString { data: v.into_iter().map(str::to_owned).collect() });
	Vec<AnyItem> => |v| dict_item_val::Value::SeriesAny(proto::SeriesAny { data: v.into_iter().map(Into::into).collect() });
	Dict => |v| dict_item_val::Value::Dict(v.into_proto());
}

impl TryFrom<Value> for Item {
	type Error = EncodeError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		Ok(match value {
			Value::Bool(val) => val.into(),
			Value::Int(val) => val.into(),
			Value::Float(val) => val.into(),
			Value::String(val) => val.into(),
			Value::IntArray(vals) => vals.into(),
			Value::FloatArray(vals) => vals.into(),
			Value::StringList(vals) => vals.into(),
			Value::Nothing => Null.into(),
			Value::Record(rec) => {
				let mut dict = Dict::new();
				for (key, value) in rec {
					dict.insert(key, Item::try_from(value)?);
				}
				dict.into()
			}
			Value::List(vals) => {
				let items = vals
					.into_iter()
					.enumerate()
					.map(|(index, val)| match val {
						Value::Nothing => Ok(AnyItem::Null),
						Value::String(s) => Ok(AnyItem::String(s)),
						Value::Float(f) => Ok(AnyItem::Double(f)),
						Value::Int(i) => Ok(AnyItem::Int(i)),
						Value::Bool(b) => Ok(AnyItem::Bool(b)),
						other => Err(EncodeError::NonScalarListElement {
							index,
							kind: other.get_type().to_string(),
						}),
					})
					.collect::<Result<Vec<_>, _>>()?;
				items.into()
			}
		})
	}
}

/// Keyword mapping under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
	inner: proto::Dictionary,
}

impl Dict {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`Dict::insert`].
	#[must_use]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Item>) -> Self {
		self.insert(key, value);
		self
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Item>) {
		self.inner.data.insert(key.into(), value.into().into_proto());
	}

	/// Copies every entry of `other` over `self`, like a mapping update.
	pub fn update(&mut self, other: Dict) {
		self.inner.data.extend(other.inner.data);
	}

	pub fn len(&self) -> usize {
		self.inner.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.data.is_empty()
	}

	pub fn into_proto(self) -> proto::Dictionary {
		self.inner
	}

	/// Encodes a standalone dictionary envelope.
	pub fn encode(self) -> Vec<u8> {
		proto::MessageContainer {
			message: Some(message_container::Message::Dict(self.inner)),
		}
		.encode_to_vec()
	}
}

/// One trace of a [`FigureBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct TraceBuilder {
	method: trace::CreationMethods,
	func: String,
	kwargs: Dict,
}

impl TraceBuilder {
	pub fn new(method: trace::CreationMethods, func: impl Into<String>) -> Self {
		Self {
			method,
			func: func.into(),
			kwargs: Dict::new(),
		}
	}

	pub fn graph_objects(func: impl Into<String>) -> Self {
		Self::new(trace::CreationMethods::GraphObjects, func)
	}

	pub fn plotly_express(func: impl Into<String>) -> Self {
		Self::new(trace::CreationMethods::PlotlyExpress, func)
	}

	pub fn figure_factory(func: impl Into<String>) -> Self {
		Self::new(trace::CreationMethods::FigureFactory, func)
	}

	#[must_use]
	pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Item>) -> Self {
		self.kwargs.insert(key, value);
		self
	}

	#[must_use]
	pub fn kwargs(mut self, kwargs: Dict) -> Self {
		self.kwargs.update(kwargs);
		self
	}

	pub fn into_proto(self) -> proto::Trace {
		proto::Trace {
			method: self.method as i32,
			method_func: self.func,
			kwargs: Some(self.kwargs.into_proto()),
		}
	}
}

/// Figure envelope under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureBuilder {
	uuid: String,
	traces: Vec<TraceBuilder>,
	commands: Vec<(String, Dict)>,
}

impl FigureBuilder {
	pub fn new(uuid: impl Into<String>) -> Self {
		Self {
			uuid: uuid.into(),
			traces: Vec::new(),
			commands: Vec::new(),
		}
	}

	#[must_use]
	pub fn trace(mut self, trace: TraceBuilder) -> Self {
		self.traces.push(trace);
		self
	}

	#[must_use]
	pub fn command(mut self, func: impl Into<String>, kwargs: Dict) -> Self {
		self.commands.push((func.into(), kwargs));
		self
	}

	pub fn len(&self) -> usize {
		self.traces.len()
	}

	pub fn is_empty(&self) -> bool {
		self.traces.is_empty()
	}

	/// Removes the trace at `index`, if any.
	pub fn remove_trace(&mut self, index: usize) -> Option<TraceBuilder> {
		(index < self.traces.len()).then(|| self.traces.remove(index))
	}

	pub fn build(self) -> proto::MessageContainer {
		let fig = proto::Figure {
			uuid: self.uuid,
			traces: self.traces.into_iter().map(TraceBuilder::into_proto).collect(),
			commands: self
				.commands
				.into_iter()
				.map(|(func, kwargs)| proto::Command {
					func,
					kwargs: Some(kwargs.into_proto()),
				})
				.collect(),
		};
		proto::MessageContainer {
			message: Some(message_container::Message::Fig(fig)),
		}
	}

	pub fn encode(self) -> Vec<u8> {
		self.build().encode_to_vec()
	}
}
