//! Figure message interpretation.

use std::sync::Arc;

use plotmsg_wire::{CreationMethod, FigureMessage};
use tracing::debug;

use crate::backend::PlotBackend;
use crate::error::Result;
use crate::figure::{Figure, FigureKind};
use crate::plotly::PlotlyBackend;

/// Receives progress while a figure message is interpreted.
///
/// `start` is called once with the number of trace descriptors, then
/// `advance` once per interpreted descriptor. Commands are not counted.
pub trait ProgressObserver: Send + Sync {
	fn start(&self, total: usize);
	fn advance(&self);
}

/// Builds figures from figure messages through a [`PlotBackend`].
pub struct Interpreter<B = PlotlyBackend> {
	backend: B,
	kind: FigureKind,
	progress: Option<Arc<dyn ProgressObserver>>,
}

impl Interpreter<PlotlyBackend> {
	pub fn new(kind: FigureKind) -> Self {
		Self::with_backend(PlotlyBackend, kind)
	}
}

impl Default for Interpreter<PlotlyBackend> {
	fn default() -> Self {
		Self::new(FigureKind::default())
	}
}

impl<B: PlotBackend> Interpreter<B> {
	pub fn with_backend(backend: B, kind: FigureKind) -> Self {
		Self {
			backend,
			kind,
			progress: None,
		}
	}

	#[must_use]
	pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
		self.progress = Some(observer);
		self
	}

	pub fn kind(&self) -> FigureKind {
		self.kind
	}

	pub fn set_kind(&mut self, kind: FigureKind) {
		self.kind = kind;
	}

	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Builds every trace, then applies every command in order.
	pub fn build(&self, message: &FigureMessage) -> Result<Figure> {
		if let Some(progress) = &self.progress {
			progress.start(message.traces.len());
		}

		let mut traces = Vec::with_capacity(message.traces.len());
		for desc in &message.traces {
			let func = desc.func_or_default();
			match desc.method {
				CreationMethod::GraphObjects => traces.push(self.backend.graph_object(func, &desc.kwargs)?),
				CreationMethod::PlotlyExpress => traces.extend(self.backend.express(func, &desc.kwargs)?),
				CreationMethod::FigureFactory => traces.extend(self.backend.figure_factory(func, &desc.kwargs)?),
			}
			self.advance();
		}

		let mut figure = Figure::with_traces(self.kind, traces);
		for cmd in &message.commands {
			self.backend.apply_command(&mut figure, &cmd.func, &cmd.kwargs)?;
		}

		debug!(uuid = %message.uuid, kind = %self.kind, traces = figure.len(), "interpreted figure");
		Ok(figure)
	}

	fn advance(&self) {
		if let Some(progress) = &self.progress {
			progress.advance();
		}
	}
}
