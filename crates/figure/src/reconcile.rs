//! In-place figure reconciliation.
//!
//! [`reconcile`] patches a stored live figure to match an incoming one,
//! writing only attributes whose value changed. The full diff is planned
//! before the first write, so a refused reconciliation leaves the stored
//! figure untouched.

use plotmsg_value::{Record, Value};
use serde::Serialize;

use crate::error::ReconcileError;
use crate::figure::{AttrPath, Figure, FigureKind};

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
	/// Attributes written or removed, in write order.
	pub written: Vec<AttrPath>,
	/// Attributes present on both sides and left alone as equal.
	pub skipped: usize,
}

impl ReconcileReport {
	pub fn is_noop(&self) -> bool {
		self.written.is_empty()
	}
}

/// Checks that `incoming` can be patched onto `existing`.
pub fn check(existing: &Figure, incoming: &Figure) -> Result<(), ReconcileError> {
	if existing.kind() != incoming.kind() {
		return Err(ReconcileError::KindMismatch {
			existing: existing.kind(),
			incoming: incoming.kind(),
		});
	}
	if existing.kind() != FigureKind::Live {
		return Err(ReconcileError::NotLive);
	}
	if existing.len() != incoming.len() {
		return Err(ReconcileError::TraceCountMismatch {
			existing: existing.len(),
			incoming: incoming.len(),
		});
	}
	for (index, (old, new)) in existing.traces().iter().zip(incoming.traces()).enumerate() {
		if old.kind() != new.kind() {
			return Err(ReconcileError::TraceTypeMismatch {
				index,
				existing: old.kind().to_owned(),
				incoming: new.kind().to_owned(),
			});
		}
	}
	Ok(())
}

/// Patches `existing` so that it renders like `incoming`.
///
/// Traces pair up by position. For every attribute in the union of both
/// sides: an absent side means overwrite (or remove), a change of native type
/// is refused, records recurse, and equal values are skipped.
pub fn reconcile(existing: &mut Figure, incoming: &Figure) -> Result<ReconcileReport, ReconcileError> {
	check(existing, incoming)?;

	let mut plan = Plan::default();
	for (index, (old, new)) in existing.traces().iter().zip(incoming.traces()).enumerate() {
		plan.diff_records(&AttrPath::trace(index, Vec::<String>::new()), old.attrs(), new.attrs())?;
	}
	plan.diff_records(&AttrPath::layout(Vec::<String>::new()), existing.layout(), incoming.layout())?;

	let mut report = ReconcileReport {
		written: Vec::with_capacity(plan.writes.len()),
		skipped: plan.skipped,
	};
	for (path, value) in plan.writes {
		match value {
			Some(value) => {
				existing.set_attr(&path, value);
			}
			None => {
				existing.remove_attr(&path);
			}
		}
		report.written.push(path);
	}
	Ok(report)
}

#[derive(Default)]
struct Plan {
	writes: Vec<(AttrPath, Option<Value>)>,
	skipped: usize,
}

impl Plan {
	fn diff_records(&mut self, path: &AttrPath, old: &Record, new: &Record) -> Result<(), ReconcileError> {
		let keys = old.keys().chain(new.keys().filter(|key| !old.contains(key)));
		for key in keys {
			let child = path.child(key);
			match (present(old, key), present(new, key)) {
				(None, None) => {}
				(Some(_), None) => self.writes.push((child, None)),
				(None, Some(value)) => self.writes.push((child, Some(value.clone()))),
				(Some(a), Some(b)) => self.diff_values(child, a, b)?,
			}
		}
		Ok(())
	}

	fn diff_values(&mut self, path: AttrPath, old: &Value, new: &Value) -> Result<(), ReconcileError> {
		if old.get_type() != new.get_type() {
			return Err(ReconcileError::TypeMismatch {
				path,
				existing: old.get_type(),
				incoming: new.get_type(),
			});
		}
		match (old, new) {
			(Value::Record(a), Value::Record(b)) => self.diff_records(&path, a, b)?,
			_ if old.same_as(new) => self.skipped += 1,
			_ => self.writes.push((path, Some(new.clone()))),
		}
		Ok(())
	}
}

// Null counts as absent.
fn present<'a>(rec: &'a Record, key: &str) -> Option<&'a Value> {
	rec.get(key).filter(|v| !v.is_nothing())
}
