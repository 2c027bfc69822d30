//! Value tree produced by decoding plot messages.
//!
//! This crate defines the compact value model shared by the decoder, the
//! figure interpreter and the reconciler. Values form a tree: a [`Record`]
//! maps attribute names to values and never refers back to a parent.

use std::borrow::Cow;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Insertion-ordered mapping used by [`Value::Record`].
///
/// Keys are unique: [`Record::insert`] replaces an existing entry in place.
/// Equality ignores key order.
#[derive(Debug, Clone, Default)]
pub struct Record {
	inner: Vec<(String, Value)>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			inner: Vec::with_capacity(capacity),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Inserts `value` under `key`, returning the value it replaced.
	pub fn insert<K>(&mut self, key: K, value: Value) -> Option<Value>
	where
		K: Into<String>,
	{
		let key = key.into();
		match self.get_mut(&key) {
			Some(slot) => Some(std::mem::replace(slot, value)),
			None => {
				self.inner.push((key, value));
				None
			}
		}
	}

	/// Removes `key`, preserving the order of the remaining entries.
	pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Value> {
		let key = key.as_ref();
		let idx = self.inner.iter().position(|(k, _)| k == key)?;
		Some(self.inner.remove(idx).1)
	}

	pub fn contains(&self, key: impl AsRef<str>) -> bool {
		self.get(key).is_some()
	}

	pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
		let key = key.as_ref();
		self.inner.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn get_mut(&mut self, key: impl AsRef<str>) -> Option<&mut Value> {
		let key = key.as_ref();
		self.inner.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Returns the nested record under `key`, creating it when missing.
	///
	/// A non-record value already stored under `key` is replaced.
	pub fn record_mut(&mut self, key: impl AsRef<str>) -> &mut Record {
		let key = key.as_ref();
		let idx = match self.inner.iter().position(|(k, _)| k == key) {
			Some(idx) => {
				if !matches!(self.inner[idx].1, Value::Record(_)) {
					self.inner[idx].1 = Value::Record(Record::new());
				}
				idx
			}
			None => {
				self.inner.push((key.to_owned(), Value::Record(Record::new())));
				self.inner.len() - 1
			}
		};
		match &mut self.inner[idx].1 {
			Value::Record(record) => record,
			_ => unreachable!("slot was just set to a record"),
		}
	}

	/// Deep-merges `other` into `self`: nested records merge, everything else replaces.
	pub fn merge(&mut self, other: Record) {
		for (key, value) in other {
			match value {
				Value::Record(nested) => self.record_mut(&key).merge(nested),
				value => {
					self.insert(key, value);
				}
			}
		}
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.inner.iter().map(|(k, _)| k.as_str())
	}

	pub fn iter(&self) -> RecordIter<'_> {
		RecordIter { inner: self.inner.iter() }
	}
}

impl PartialEq for Record {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
	}
}

pub struct RecordIter<'a> {
	inner: std::slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for RecordIter<'a> {
	type Item = (&'a String, &'a Value);

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|(key, value)| (key, value))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a> ExactSizeIterator for RecordIter<'a> {}

impl<'a> IntoIterator for &'a Record {
	type Item = (&'a String, &'a Value);
	type IntoIter = RecordIter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl IntoIterator for Record {
	type Item = (String, Value);
	type IntoIter = std::vec::IntoIter<(String, Value)>;

	fn into_iter(self) -> Self::IntoIter {
		self.inner.into_iter()
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		let mut record = Self::new();
		for (key, value) in iter {
			record.insert(key, value);
		}
		record
	}
}

/// Decoded value.
///
/// Numeric sequences keep their element type. `List` holds heterogeneous
/// scalars where `Nothing` stands for an explicit null.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	IntArray(Vec<i64>),
	FloatArray(Vec<f64>),
	StringList(Vec<String>),
	List(Vec<Value>),
	Record(Record),
	Nothing,
}

impl Value {
	pub fn string(val: impl Into<String>) -> Self {
		Self::String(val.into())
	}

	pub fn get_type(&self) -> ValueType {
		match self {
			Self::Bool(_) => ValueType::Bool,
			Self::Int(_) => ValueType::Int,
			Self::Float(_) => ValueType::Float,
			Self::String(_) => ValueType::String,
			Self::IntArray(_) | Self::FloatArray(_) => ValueType::NumericArray,
			Self::StringList(_) | Self::List(_) => ValueType::List,
			Self::Record(_) => ValueType::Record,
			Self::Nothing => ValueType::Nothing,
		}
	}

	pub fn is_nothing(&self) -> bool {
		matches!(self, Self::Nothing)
	}

	/// Value equality as the reconciler sees it.
	///
	/// Integer and float arrays compare elementwise by numeric value, string
	/// lists compare equal to heterogeneous lists holding the same strings,
	/// and NaN equals NaN so that unchanged data never counts as a change.
	pub fn same_as(&self, other: &Value) -> bool {
		match (self, other) {
			(Self::Float(a), Self::Float(b)) => float_eq(*a, *b),
			(Self::IntArray(a), Self::IntArray(b)) => a == b,
			(Self::FloatArray(a), Self::FloatArray(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| float_eq(*x, *y)),
			(Self::IntArray(a), Self::FloatArray(b)) | (Self::FloatArray(b), Self::IntArray(a)) => {
				a.len() == b.len() && a.iter().zip(b).all(|(x, y)| *x as f64 == *y)
			}
			(Self::StringList(a), Self::List(b)) | (Self::List(b), Self::StringList(a)) => {
				a.len() == b.len() && a.iter().zip(b).all(|(x, y)| matches!(y, Self::String(s) if s == x))
			}
			(Self::List(a), Self::List(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y)),
			(Self::Record(a), Self::Record(b)) => a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.same_as(w))),
			(a, b) => a == b,
		}
	}

	pub fn as_bool(&self) -> Result<bool, ValueTypeError> {
		match self {
			Self::Bool(val) => Ok(*val),
			other => Err(ValueTypeError::new("bool", other.get_type())),
		}
	}

	pub fn as_int(&self) -> Result<i64, ValueTypeError> {
		match self {
			Self::Int(val) => Ok(*val),
			other => Err(ValueTypeError::new("int", other.get_type())),
		}
	}

	/// Returns a number, widening integers.
	pub fn as_float(&self) -> Result<f64, ValueTypeError> {
		match self {
			Self::Float(val) => Ok(*val),
			Self::Int(val) => Ok(*val as f64),
			other => Err(ValueTypeError::new("number", other.get_type())),
		}
	}

	pub fn as_str(&self) -> Result<&str, ValueTypeError> {
		match self {
			Self::String(val) => Ok(val),
			other => Err(ValueTypeError::new("string", other.get_type())),
		}
	}

	pub fn as_record(&self) -> Result<&Record, ValueTypeError> {
		match self {
			Self::Record(val) => Ok(val),
			other => Err(ValueTypeError::new("record", other.get_type())),
		}
	}

	pub fn into_record(self) -> Result<Record, Self> {
		match self {
			Self::Record(val) => Ok(val),
			other => Err(other),
		}
	}

	/// Borrows a numeric sequence as floats.
	///
	/// Heterogeneous lists are accepted when every element is a number or
	/// null; nulls become NaN.
	pub fn as_numbers(&self) -> Result<Cow<'_, [f64]>, ValueTypeError> {
		match self {
			Self::FloatArray(vals) => Ok(Cow::Borrowed(vals)),
			Self::IntArray(vals) => Ok(Cow::Owned(vals.iter().map(|v| *v as f64).collect())),
			Self::List(vals) => vals
				.iter()
				.map(|v| match v {
					Self::Nothing => Ok(f64::NAN),
					other => other.as_float(),
				})
				.collect::<Result<Vec<_>, _>>()
				.map(Cow::Owned)
				.map_err(|_| ValueTypeError::new("numeric array", ValueType::List)),
			other => Err(ValueTypeError::new("numeric array", other.get_type())),
		}
	}

	/// Number of elements for sequences, `None` for everything else.
	pub fn seq_len(&self) -> Option<usize> {
		match self {
			Self::IntArray(vals) => Some(vals.len()),
			Self::FloatArray(vals) => Some(vals.len()),
			Self::StringList(vals) => Some(vals.len()),
			Self::List(vals) => Some(vals.len()),
			_ => None,
		}
	}

	/// Element `idx` of a sequence as a scalar value.
	pub fn element(&self, idx: usize) -> Option<Value> {
		match self {
			Self::IntArray(vals) => vals.get(idx).copied().map(Self::Int),
			Self::FloatArray(vals) => vals.get(idx).copied().map(Self::Float),
			Self::StringList(vals) => vals.get(idx).cloned().map(Self::String),
			Self::List(vals) => vals.get(idx).cloned(),
			_ => None,
		}
	}
}

fn float_eq(a: f64, b: f64) -> bool {
	a == b || (a.is_nan() && b.is_nan())
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(val) => write!(f, "{val}"),
			Self::Int(val) => write!(f, "{val}"),
			Self::Float(val) => write!(f, "{val}"),
			Self::String(val) => f.write_str(val),
			Self::IntArray(vals) => write!(f, "int[{}]", vals.len()),
			Self::FloatArray(vals) => write!(f, "float[{}]", vals.len()),
			Self::StringList(vals) => write!(f, "string[{}]", vals.len()),
			Self::List(vals) => write!(f, "list[{}]", vals.len()),
			Self::Record(val) => {
				f.write_str("{")?;
				for (i, (key, value)) in val.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{key}: {value}")?;
				}
				f.write_str("}")
			}
			Self::Nothing => f.write_str("null"),
		}
	}
}

impl From<bool> for Value {
	fn from(val: bool) -> Self {
		Self::Bool(val)
	}
}

impl From<i64> for Value {
	fn from(val: i64) -> Self {
		Self::Int(val)
	}
}

impl From<i32> for Value {
	fn from(val: i32) -> Self {
		Self::Int(val.into())
	}
}

impl From<f64> for Value {
	fn from(val: f64) -> Self {
		Self::Float(val)
	}
}

impl From<&str> for Value {
	fn from(val: &str) -> Self {
		Self::String(val.to_owned())
	}
}

impl From<String> for Value {
	fn from(val: String) -> Self {
		Self::String(val)
	}
}

impl From<Vec<i64>> for Value {
	fn from(vals: Vec<i64>) -> Self {
		Self::IntArray(vals)
	}
}

impl From<Vec<f64>> for Value {
	fn from(vals: Vec<f64>) -> Self {
		Self::FloatArray(vals)
	}
}

impl From<Vec<String>> for Value {
	fn from(vals: Vec<String>) -> Self {
		Self::StringList(vals)
	}
}

impl From<Record> for Value {
	fn from(val: Record) -> Self {
		Self::Record(val)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(val: Option<T>) -> Self {
		val.map_or(Self::Nothing, Into::into)
	}
}

impl Serialize for Record {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (key, value) in self {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Bool(val) => serializer.serialize_bool(*val),
			Self::Int(val) => serializer.serialize_i64(*val),
			Self::Float(val) => serializer.serialize_f64(*val),
			Self::String(val) => serializer.serialize_str(val),
			Self::IntArray(vals) => serialize_seq(serializer, vals),
			Self::FloatArray(vals) => serialize_seq(serializer, vals),
			Self::StringList(vals) => serialize_seq(serializer, vals),
			Self::List(vals) => serialize_seq(serializer, vals),
			Self::Record(val) => val.serialize(serializer),
			Self::Nothing => serializer.serialize_unit(),
		}
	}
}

fn serialize_seq<S: Serializer, T: Serialize>(serializer: S, vals: &[T]) -> Result<S::Ok, S::Error> {
	let mut seq = serializer.serialize_seq(Some(vals.len()))?;
	for val in vals {
		seq.serialize_element(val)?;
	}
	seq.end()
}

/// Coarse native type used to decide whether two values can be patched.
///
/// Integer and float arrays share [`ValueType::NumericArray`]; string lists
/// and heterogeneous lists share [`ValueType::List`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
	Bool,
	Int,
	Float,
	String,
	NumericArray,
	List,
	Record,
	Nothing,
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::String => "string",
			Self::NumericArray => "numeric array",
			Self::List => "list",
			Self::Record => "record",
			Self::Nothing => "nothing",
		};
		f.write_str(name)
	}
}

/// Error returned by typed accessors like [`Value::as_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTypeError {
	expected: &'static str,
	got: ValueType,
}

impl ValueTypeError {
	pub fn new(expected: &'static str, got: ValueType) -> Self {
		Self { expected, got }
	}

	pub fn got(&self) -> ValueType {
		self.got
	}
}

impl fmt::Display for ValueTypeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "expected {}, got {}", self.expected, self.got)
	}
}

impl std::error::Error for ValueTypeError {}

/// Builds a [`Record`] from `key => value` pairs.
///
/// ```
/// use plotmsg_value::{Value, record};
///
/// let rec = record! { "x" => vec![1_i64, 2, 3], "mode" => "markers" };
/// assert_eq!(rec.get("mode"), Some(&Value::string("markers")));
/// ```
#[macro_export]
macro_rules! record {
	() => { $crate::Record::new() };
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut rec = $crate::Record::new();
		$( rec.insert($key, $crate::Value::from($value)); )+
		rec
	}};
}

#[cfg(test)]
mod tests;
