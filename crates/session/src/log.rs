//! Message log.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use plotmsg_wire::Decoded;
use serde::Serialize;

/// How many log entries are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Retention {
	#[default]
	Unbounded,
	/// Keep only the most recent entries.
	Last(usize),
}

impl From<Option<usize>> for Retention {
	fn from(limit: Option<usize>) -> Self {
		limit.map_or(Self::Unbounded, Self::Last)
	}
}

/// One processed message and whether processing succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
	pub ok: bool,
	pub received_at: DateTime<Local>,
	pub message: Decoded,
}

/// Append-only record of decoded messages.
#[derive(Debug, Default)]
pub struct MessageLog {
	entries: VecDeque<LogEntry>,
	retention: Retention,
}

impl MessageLog {
	pub fn new(retention: Retention) -> Self {
		Self {
			entries: VecDeque::new(),
			retention,
		}
	}

	pub fn push(&mut self, message: Decoded, ok: bool) {
		self.entries.push_back(LogEntry {
			ok,
			received_at: Local::now(),
			message,
		});
		self.trim();
	}

	pub fn retention(&self) -> Retention {
		self.retention
	}

	/// Changes the retention, dropping the oldest entries if needed.
	pub fn set_retention(&mut self, retention: Retention) {
		self.retention = retention;
		self.trim();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Entries from oldest to newest.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
		self.entries.iter()
	}

	pub fn last(&self) -> Option<&LogEntry> {
		self.entries.back()
	}

	/// Number of entries whose processing failed.
	pub fn failures(&self) -> usize {
		self.entries.iter().filter(|entry| !entry.ok).count()
	}

	fn trim(&mut self) {
		if let Retention::Last(limit) = self.retention {
			while self.entries.len() > limit {
				self.entries.pop_front();
			}
		}
	}
}
