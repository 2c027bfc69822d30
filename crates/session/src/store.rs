//! Stored figure registry.
//!
//! One [`FigureStore`] is shared by every consumer in the process; clones
//! are cheap handles onto the same map. Figures keep the order in which
//! their ids were first stored.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use plotmsg_figure::{Figure, ReconcileReport, reconcile};
use tracing::{debug, warn};

use crate::error::StoreError;

/// What [`FigureStore::add`] did with a figure.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome {
	/// First figure under this id.
	Inserted,
	/// The stored live figure was patched in place.
	Reconciled(ReconcileReport),
	/// The stored figure was closed and replaced.
	Replaced,
}

/// Registry change delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
	Inserted(String),
	Reconciled(String),
	Replaced(String),
	Removed(String),
	Cleared,
}

impl StoreEvent {
	/// The affected id, if the event concerns a single figure.
	pub fn uuid(&self) -> Option<&str> {
		match self {
			Self::Inserted(uuid) | Self::Reconciled(uuid) | Self::Replaced(uuid) | Self::Removed(uuid) => Some(uuid),
			Self::Cleared => None,
		}
	}
}

/// Callback run after every registry change, with no registry lock held.
/// Observers may read the store and subscribe further observers.
pub type StoreObserver = Arc<dyn Fn(&FigureStore, &StoreEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
	figures: RwLock<IndexMap<String, Figure>>,
	observers: RwLock<Vec<StoreObserver>>,
}

/// Shared `uuid -> Figure` registry.
#[derive(Clone, Default)]
pub struct FigureStore {
	inner: Arc<Inner>,
}

impl FigureStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `figure` under `uuid`.
	///
	/// A live figure arriving for a stored live figure is reconciled in
	/// place. Anything else, including a refused reconciliation, closes the
	/// stored figure and replaces it.
	pub fn add(&self, uuid: impl Into<String>, figure: Figure) -> StoreOutcome {
		let uuid = uuid.into();
		let outcome = {
			let mut figures = self.inner.figures.write();
			match figures.get_mut(&uuid) {
				None => {
					figures.insert(uuid.clone(), figure);
					StoreOutcome::Inserted
				}
				Some(stored) if stored.is_live() && figure.is_live() => match reconcile(stored, &figure) {
					Ok(report) => StoreOutcome::Reconciled(report),
					Err(err) => {
						warn!(uuid = %uuid, error = %err, "recreating figure");
						stored.close();
						*stored = figure;
						StoreOutcome::Replaced
					}
				},
				Some(stored) => {
					stored.close();
					*stored = figure;
					StoreOutcome::Replaced
				}
			}
		};

		let event = match &outcome {
			StoreOutcome::Inserted => StoreEvent::Inserted(uuid),
			StoreOutcome::Reconciled(report) => {
				debug!(uuid = %uuid, writes = report.written.len(), skipped = report.skipped, "reconciled figure");
				StoreEvent::Reconciled(uuid)
			}
			StoreOutcome::Replaced => StoreEvent::Replaced(uuid),
		};
		self.notify(&event);
		outcome
	}

	/// Reconciles the stored figure under `uuid` with `figure`.
	pub fn update(&self, uuid: &str, figure: &Figure) -> Result<ReconcileReport, StoreError> {
		let report = {
			let mut figures = self.inner.figures.write();
			let stored = figures.get_mut(uuid).ok_or_else(|| StoreError::NotStored(uuid.to_owned()))?;
			if !stored.is_live() || !figure.is_live() {
				return Err(StoreError::NotLive(uuid.to_owned()));
			}
			reconcile(stored, figure).map_err(|source| StoreError::Reconcile {
				uuid: uuid.to_owned(),
				source,
			})?
		};
		self.notify(&StoreEvent::Reconciled(uuid.to_owned()));
		Ok(report)
	}

	/// Closes and removes every listed figure. Unknown ids are ignored.
	///
	/// Returns the number of figures removed.
	pub fn remove<I, S>(&self, uuids: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let removed: Vec<String> = {
			let mut figures = self.inner.figures.write();
			uuids
				.into_iter()
				.filter_map(|uuid| {
					let (uuid, mut figure) = figures.shift_remove_entry(uuid.as_ref())?;
					figure.close();
					Some(uuid)
				})
				.collect()
		};
		for uuid in &removed {
			self.notify(&StoreEvent::Removed(uuid.clone()));
		}
		removed.len()
	}

	/// Closes and removes every figure.
	pub fn clear(&self) {
		{
			let mut figures = self.inner.figures.write();
			for figure in figures.values_mut() {
				figure.close();
			}
			figures.clear();
		}
		self.notify(&StoreEvent::Cleared);
	}

	pub fn get(&self, uuid: &str) -> Option<Figure> {
		self.inner.figures.read().get(uuid).cloned()
	}

	pub fn contains(&self, uuid: &str) -> bool {
		self.inner.figures.read().contains_key(uuid)
	}

	/// Runs `f` on the stored figure without cloning it.
	pub fn with_figure<R>(&self, uuid: &str, f: impl FnOnce(&Figure) -> R) -> Option<R> {
		self.inner.figures.read().get(uuid).map(f)
	}

	/// Runs `f` on the stored figure under the write lock and reports the
	/// change to observers as [`StoreEvent::Reconciled`].
	pub fn edit<R>(&self, uuid: &str, f: impl FnOnce(&mut Figure) -> R) -> Option<R> {
		let result = self.inner.figures.write().get_mut(uuid).map(f)?;
		self.notify(&StoreEvent::Reconciled(uuid.to_owned()));
		Some(result)
	}

	/// Runs `f` on the stored figure under the write lock. Observers are not
	/// notified.
	pub fn with_figure_mut<R>(&self, uuid: &str, f: impl FnOnce(&mut Figure) -> R) -> Option<R> {
		self.inner.figures.write().get_mut(uuid).map(f)
	}

	/// Stored ids in first-stored order.
	pub fn ids(&self) -> Vec<String> {
		self.inner.figures.read().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.inner.figures.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.figures.read().is_empty()
	}

	/// Registers `observer` for every later registry change.
	pub fn subscribe(&self, observer: impl Fn(&FigureStore, &StoreEvent) + Send + Sync + 'static) {
		self.inner.observers.write().push(Arc::new(observer));
	}

	fn notify(&self, event: &StoreEvent) {
		let observers = self.inner.observers.read().clone();
		for observer in &observers {
			observer(self, event);
		}
	}
}

impl std::fmt::Debug for FigureStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FigureStore").field("ids", &self.ids()).finish_non_exhaustive()
	}
}
