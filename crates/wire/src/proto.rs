//! Envelope messages, declared with prost derives.
//!
//! Field numbers mirror `proto/plotmsg.proto`.

use std::collections::HashMap;

/// Marker enum for the explicit null variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum NullValue {
	NullValue = 0,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeriesD {
	#[prost(double, repeated, tag = "1")]
	pub data: Vec<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeriesI {
	#[prost(int64, repeated, tag = "1")]
	pub data: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeriesString {
	#[prost(string, repeated, tag = "1")]
	pub data: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeriesAny {
	#[prost(message, repeated, tag = "1")]
	pub data: Vec<series_any::Value>,
}

pub mod series_any {
	#[derive(Clone, PartialEq, ::prost::Message)]
	pub struct Value {
		#[prost(oneof = "value::Kind", tags = "1, 2, 3, 4, 5")]
		pub value: Option<value::Kind>,
	}

	pub mod value {
		#[derive(Clone, PartialEq, ::prost::Oneof)]
		pub enum Kind {
			#[prost(enumeration = "super::super::NullValue", tag = "1")]
			Null(i32),
			#[prost(string, tag = "2")]
			String(::prost::alloc::string::String),
			#[prost(double, tag = "3")]
			Double(f64),
			#[prost(int64, tag = "4")]
			Int(i64),
			#[prost(bool, tag = "5")]
			Bool(bool),
		}
	}
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DictItemVal {
	#[prost(oneof = "dict_item_val::Value", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10")]
	pub value: Option<dict_item_val::Value>,
}

pub mod dict_item_val {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum Value {
		#[prost(bool, tag = "1")]
		Bool(bool),
		#[prost(string, tag = "2")]
		String(::prost::alloc::string::String),
		#[prost(double, tag = "3")]
		Double(f64),
		#[prost(int64, tag = "4")]
		Int(i64),
		#[prost(message, tag = "5")]
		SeriesD(super::SeriesD),
		#[prost(message, tag = "6")]
		SeriesI(super::SeriesI),
		#[prost(message, tag = "7")]
		SeriesString(super::SeriesString),
		#[prost(message, tag = "8")]
		SeriesAny(super::SeriesAny),
		#[prost(message, tag = "9")]
		Dict(super::Dictionary),
		#[prost(enumeration = "super::NullValue", tag = "10")]
		Null(i32),
	}
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Dictionary {
	#[prost(map = "string, message", tag = "1")]
	pub data: HashMap<String, DictItemVal>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Trace {
	#[prost(enumeration = "trace::CreationMethods", tag = "1")]
	pub method: i32,
	#[prost(string, tag = "2")]
	pub method_func: String,
	#[prost(message, optional, tag = "3")]
	pub kwargs: Option<Dictionary>,
}

pub mod trace {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum CreationMethods {
		GraphObjects = 0,
		PlotlyExpress = 1,
		FigureFactory = 2,
	}
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Command {
	#[prost(string, tag = "1")]
	pub func: String,
	#[prost(message, optional, tag = "2")]
	pub kwargs: Option<Dictionary>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Figure {
	#[prost(string, tag = "1")]
	pub uuid: String,
	#[prost(message, repeated, tag = "2")]
	pub traces: Vec<Trace>,
	#[prost(message, repeated, tag = "3")]
	pub commands: Vec<Command>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageContainer {
	#[prost(oneof = "message_container::Message", tags = "1, 2")]
	pub message: Option<message_container::Message>,
}

pub mod message_container {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum Message {
		#[prost(message, tag = "1")]
		Dict(super::Dictionary),
		#[prost(message, tag = "2")]
		Fig(super::Figure),
	}
}
