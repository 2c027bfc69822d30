//! Figure selection state for an operator frontend.
//!
//! Both models track the registry's ids through [`StoreEvent`]s. When the
//! selected id disappears the selection falls back to the first stored id.

use crate::store::StoreEvent;

fn track(options: &mut Vec<String>, event: &StoreEvent) {
	match event {
		StoreEvent::Inserted(uuid) if !options.contains(uuid) => options.push(uuid.clone()),
		StoreEvent::Removed(uuid) => options.retain(|id| id != uuid),
		StoreEvent::Cleared => options.clear(),
		_ => {}
	}
}

/// Single-figure selector, like a dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleSelection {
	options: Vec<String>,
	selected: Option<String>,
}

impl SingleSelection {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the options, keeping the selection if still present.
	pub fn refresh(&mut self, ids: Vec<String>) {
		self.options = ids;
		self.settle();
	}

	pub fn apply(&mut self, event: &StoreEvent) {
		track(&mut self.options, event);
		self.settle();
	}

	/// Selects `uuid` if it is one of the options.
	pub fn select(&mut self, uuid: &str) -> bool {
		let known = self.options.iter().any(|id| id == uuid);
		if known {
			self.selected = Some(uuid.to_owned());
		}
		known
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn options(&self) -> &[String] {
		&self.options
	}

	fn settle(&mut self) {
		if self.selected.as_ref().is_none_or(|sel| !self.options.contains(sel)) {
			self.selected = self.options.first().cloned();
		}
	}
}

/// Multi-figure selector, like a list box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelection {
	options: Vec<String>,
	selected: Vec<String>,
}

impl MultiSelection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn refresh(&mut self, ids: Vec<String>) {
		self.options = ids;
		self.settle();
	}

	pub fn apply(&mut self, event: &StoreEvent) {
		track(&mut self.options, event);
		self.settle();
	}

	/// Replaces the selection with the known ids among `uuids`.
	pub fn select<S: AsRef<str>>(&mut self, uuids: &[S]) {
		self.selected = uuids
			.iter()
			.map(AsRef::as_ref)
			.filter(|uuid| self.options.iter().any(|id| id == uuid))
			.map(str::to_owned)
			.collect();
		self.settle();
	}

	pub fn selected(&self) -> &[String] {
		&self.selected
	}

	pub fn options(&self) -> &[String] {
		&self.options
	}

	fn settle(&mut self) {
		let options = &self.options;
		self.selected.retain(|sel| options.contains(sel));
		if self.selected.is_empty()
			&& let Some(first) = self.options.first()
		{
			self.selected.push(first.clone());
		}
	}
}

#[cfg(test)]
mod tests;
