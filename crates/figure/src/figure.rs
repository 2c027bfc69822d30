//! Renderable figure model.
//!
//! A [`Figure`] is an ordered list of [`Trace`]s plus a layout record, both
//! shaped like plotly.js figure JSON. Attribute writes made after
//! construction go through [`Figure::set_attr`] and [`Figure::remove_attr`],
//! which count every write and, for live figures, journal it so a frontend
//! can replay incremental changes.

use std::fmt;
use std::str::FromStr;

use plotmsg_value::{Record, Value};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Trace type assumed when a trace record carries no `type`.
pub const DEFAULT_TRACE_TYPE: &str = "scatter";

/// Whether a stored figure is patched in place or rebuilt on every message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
	/// Plain figure, replaced wholesale on update.
	#[default]
	Snapshot,
	/// Interactive figure, reconciled attribute by attribute.
	Live,
}

impl FigureKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Snapshot => "snapshot",
			Self::Live => "live",
		}
	}
}

impl fmt::Display for FigureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FigureKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"snapshot" => Ok(Self::Snapshot),
			"live" => Ok(Self::Live),
			other => Err(format!("unknown figure kind '{other}', expected 'snapshot' or 'live'")),
		}
	}
}

/// One plotted trace: a plotly.js trace record with a `type` key.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
	attrs: Record,
}

impl Trace {
	pub fn new(kind: &str) -> Self {
		Self::from_attrs(kind, Record::new())
	}

	/// Builds a trace of `kind` from already expanded attributes. A `type`
	/// entry in `attrs` is ignored.
	pub fn from_attrs(kind: &str, attrs: Record) -> Self {
		let mut rec = Record::with_capacity(attrs.len() + 1);
		rec.insert("type", Value::string(kind));
		for (key, value) in attrs {
			if key != "type" {
				rec.insert(key, value);
			}
		}
		Self { attrs: rec }
	}

	pub fn kind(&self) -> &str {
		self.attrs.get("type").and_then(|v| v.as_str().ok()).unwrap_or(DEFAULT_TRACE_TYPE)
	}

	pub fn attrs(&self) -> &Record {
		&self.attrs
	}

	pub fn attrs_mut(&mut self) -> &mut Record {
		&mut self.attrs
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.attrs.get(key)
	}

	/// Looks up a nested attribute, e.g. `["marker", "size"]`.
	pub fn get_path<S: AsRef<str>>(&self, keys: &[S]) -> Option<&Value> {
		lookup(&self.attrs, keys)
	}

	/// Sets a top-level attribute.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.attrs.insert(key, value.into());
	}
}

impl Serialize for Trace {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.attrs.serialize(serializer)
	}
}

/// Which part of a figure an [`AttrPath`] addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
	Trace(usize),
	Layout,
}

/// Address of one attribute inside a figure.
///
/// Displays like `data[0].marker.size` or `layout.title.text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrPath {
	pub target: Target,
	pub keys: Vec<String>,
}

impl AttrPath {
	pub fn trace<I, S>(index: usize, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			target: Target::Trace(index),
			keys: keys.into_iter().map(Into::into).collect(),
		}
	}

	pub fn layout<I, S>(keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			target: Target::Layout,
			keys: keys.into_iter().map(Into::into).collect(),
		}
	}

	/// Path of the attribute `key` nested under this one.
	pub fn child(&self, key: &str) -> Self {
		let mut keys = Vec::with_capacity(self.keys.len() + 1);
		keys.extend(self.keys.iter().cloned());
		keys.push(key.to_owned());
		Self { target: self.target, keys }
	}
}

impl fmt::Display for AttrPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.target {
			Target::Trace(idx) => write!(f, "data[{idx}]")?,
			Target::Layout => f.write_str("layout")?,
		}
		for key in &self.keys {
			write!(f, ".{key}")?;
		}
		Ok(())
	}
}

impl Serialize for AttrPath {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// One journaled attribute write. `value` is `None` for a removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
	pub path: AttrPath,
	pub value: Option<Value>,
}

/// A renderable figure.
#[derive(Debug, Clone, Default)]
pub struct Figure {
	kind: FigureKind,
	traces: Vec<Trace>,
	layout: Record,
	writes: u64,
	changes: Vec<Change>,
	closed: bool,
}

impl Figure {
	pub fn new(kind: FigureKind) -> Self {
		Self {
			kind,
			..Self::default()
		}
	}

	pub fn with_traces(kind: FigureKind, traces: Vec<Trace>) -> Self {
		Self {
			kind,
			traces,
			..Self::default()
		}
	}

	pub fn kind(&self) -> FigureKind {
		self.kind
	}

	pub fn is_live(&self) -> bool {
		self.kind == FigureKind::Live
	}

	pub fn traces(&self) -> &[Trace] {
		&self.traces
	}

	pub fn trace(&self, index: usize) -> Option<&Trace> {
		self.traces.get(index)
	}

	pub fn len(&self) -> usize {
		self.traces.len()
	}

	pub fn is_empty(&self) -> bool {
		self.traces.is_empty()
	}

	pub fn layout(&self) -> &Record {
		&self.layout
	}

	pub fn push_trace(&mut self, trace: Trace) {
		self.traces.push(trace);
	}

	/// Direct access for construction-time edits. Writes made here are not
	/// counted or journaled.
	pub fn traces_mut(&mut self) -> &mut [Trace] {
		&mut self.traces
	}

	/// Direct access for construction-time edits. Writes made here are not
	/// counted or journaled.
	pub fn layout_mut(&mut self) -> &mut Record {
		&mut self.layout
	}

	/// Reads the attribute at `path`.
	pub fn attr(&self, path: &AttrPath) -> Option<&Value> {
		let root = match path.target {
			Target::Trace(idx) => self.traces.get(idx)?.attrs(),
			Target::Layout => &self.layout,
		};
		lookup(root, &path.keys)
	}

	/// Writes `value` at `path`, creating intermediate records.
	///
	/// Returns `false` without counting a write when the path addresses a
	/// trace that does not exist or names no attribute.
	pub fn set_attr(&mut self, path: &AttrPath, value: Value) -> bool {
		let Some((last, parents)) = path.keys.split_last() else {
			return false;
		};
		let Some(root) = self.root_mut(path.target) else {
			return false;
		};
		let parent = parents.iter().fold(root, |rec, key| rec.record_mut(key));
		parent.insert(last.clone(), value.clone());
		self.record_write(path, Some(value));
		true
	}

	/// Removes the attribute at `path`, returning the old value.
	pub fn remove_attr(&mut self, path: &AttrPath) -> Option<Value> {
		let (last, parents) = path.keys.split_last()?;
		let mut rec = self.root_mut(path.target)?;
		for key in parents {
			rec = match rec.get_mut(key)? {
				Value::Record(nested) => nested,
				_ => return None,
			};
		}
		let old = rec.remove(last)?;
		self.record_write(path, None);
		Some(old)
	}

	/// Deep-merges `patch` into the layout through [`Figure::set_attr`], one
	/// write per leaf. Returns the number of writes.
	pub fn update_layout(&mut self, patch: &Record) -> usize {
		let mut leaves = Vec::new();
		collect_leaves(&AttrPath::layout(Vec::<String>::new()), patch, &mut leaves);
		let count = leaves.len();
		for (path, value) in leaves {
			self.set_attr(&path, value);
		}
		count
	}

	/// Total attribute writes since construction.
	pub fn write_count(&self) -> u64 {
		self.writes
	}

	/// Drains the journal of writes made to a live figure.
	pub fn take_changes(&mut self) -> Vec<Change> {
		std::mem::take(&mut self.changes)
	}

	/// Releases the change journal. Later writes are still applied and
	/// counted but no longer journaled.
	pub fn close(&mut self) {
		self.closed = true;
		self.changes = Vec::new();
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}

	fn root_mut(&mut self, target: Target) -> Option<&mut Record> {
		match target {
			Target::Trace(idx) => self.traces.get_mut(idx).map(Trace::attrs_mut),
			Target::Layout => Some(&mut self.layout),
		}
	}

	fn record_write(&mut self, path: &AttrPath, value: Option<Value>) {
		self.writes += 1;
		if self.is_live() && !self.closed {
			self.changes.push(Change { path: path.clone(), value });
		}
	}
}

/// Figures compare by content; write counters and journals are ignored.
impl PartialEq for Figure {
	fn eq(&self, other: &Self) -> bool {
		self.kind == other.kind && self.traces == other.traces && self.layout == other.layout
	}
}

impl Serialize for Figure {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct("Figure", 2)?;
		state.serialize_field("data", &self.traces)?;
		state.serialize_field("layout", &self.layout)?;
		state.end()
	}
}

fn lookup<'a, S: AsRef<str>>(root: &'a Record, keys: &[S]) -> Option<&'a Value> {
	let (last, parents) = keys.split_last()?;
	let mut rec = root;
	for key in parents {
		rec = match rec.get(key)? {
			Value::Record(nested) => nested,
			_ => return None,
		};
	}
	rec.get(last)
}

fn collect_leaves(path: &AttrPath, rec: &Record, out: &mut Vec<(AttrPath, Value)>) {
	for (key, value) in rec {
		let child = path.child(key);
		match value {
			Value::Record(nested) if !nested.is_empty() => collect_leaves(&child, nested, out),
			other => out.push((child, other.clone())),
		}
	}
}
