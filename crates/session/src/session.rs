//! The processing step shared by every receive loop.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use parking_lot::Mutex;
use plotmsg_figure::{Figure, FigureKind, Interpreter, PlotBackend, PlotlyBackend};
use plotmsg_value::{Record, Value, record};
use plotmsg_wire::{Decoded, FigureMessage, decode_message};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProcessError;
use crate::log::{MessageLog, Retention};
use crate::selection::SingleSelection;
use crate::store::{FigureStore, StoreOutcome};

/// Interpreter type used by sessions.
pub type SessionInterpreter = Interpreter<Arc<dyn PlotBackend>>;

/// Figure sizing applied to the selected figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
	/// Let the frontend fit the figure to its container.
	Autosize,
	Fixed { width: u32, height: u32 },
}

impl SizeMode {
	/// Layout attributes implementing this mode.
	pub fn layout_patch(self) -> Record {
		match self {
			Self::Autosize => record! { "autosize" => true, "width" => Value::Nothing, "height" => Value::Nothing },
			Self::Fixed { width, height } => record! {
				"autosize" => false,
				"width" => i64::from(width),
				"height" => i64::from(height),
			},
		}
	}
}

/// State of the most recent operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
	Initialised,
	Processing,
	Ok,
	Failed(String),
	ClearedMessages,
	ClearedFigures,
}

impl fmt::Display for StepState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Initialised => f.write_str("Initialised"),
			Self::Processing => f.write_str("Processing"),
			Self::Ok => f.write_str("OK"),
			Self::Failed(err) => write!(f, "Error: {err}"),
			Self::ClearedMessages => f.write_str("Cleared messages"),
			Self::ClearedFigures => f.write_str("Cleared figures"),
		}
	}
}

/// Snapshot of the session counters for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
	pub state: StepState,
	/// Local `%H:%M` of the last received message.
	pub last_message: Option<String>,
	pub figures: usize,
	pub messages: usize,
	/// Messages received since the session started, including cleared ones.
	pub received: u64,
}

impl fmt::Display for SessionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} | Last msg: {} | Stored figs: {} msgs: {} | Historic msgs: {}",
			self.state,
			self.last_message.as_deref().unwrap_or("No msg."),
			self.figures,
			self.messages,
			self.received
		)
	}
}

/// What [`Session::process`] did with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
	/// A bare dictionary, logged only.
	Logged,
	Figure { uuid: String, outcome: StoreOutcome },
}

#[derive(Debug)]
struct Status {
	state: StepState,
	last_message: Option<String>,
	received: u64,
	size: Option<SizeMode>,
}

struct Inner {
	store: FigureStore,
	interpreter: SessionInterpreter,
	log: Mutex<MessageLog>,
	status: Mutex<Status>,
	selection: Arc<Mutex<SingleSelection>>,
}

/// Shared processing state: registry, message log, interpreter, status.
///
/// Clones are handles onto the same session.
#[derive(Clone)]
pub struct Session {
	inner: Arc<Inner>,
}

impl Session {
	/// Session with a fresh registry and the plotly backend.
	pub fn new(kind: FigureKind) -> Self {
		let backend: Arc<dyn PlotBackend> = Arc::new(PlotlyBackend);
		Self::with_parts(FigureStore::new(), Interpreter::with_backend(backend, kind), Retention::Unbounded)
	}

	pub fn with_parts(store: FigureStore, interpreter: SessionInterpreter, retention: Retention) -> Self {
		let selection = Arc::new(Mutex::new(SingleSelection::new()));
		selection.lock().refresh(store.ids());
		let tracked = selection.clone();
		store.subscribe(move |_, event| tracked.lock().apply(event));

		Self {
			inner: Arc::new(Inner {
				store,
				interpreter,
				log: Mutex::new(MessageLog::new(retention)),
				status: Mutex::new(Status {
					state: StepState::Initialised,
					last_message: None,
					received: 0,
					size: None,
				}),
				selection,
			}),
		}
	}

	pub fn store(&self) -> &FigureStore {
		&self.inner.store
	}

	pub fn figure_kind(&self) -> FigureKind {
		self.inner.interpreter.kind()
	}

	/// Runs `f` with the message log locked.
	pub fn with_log<R>(&self, f: impl FnOnce(&MessageLog) -> R) -> R {
		f(&self.inner.log.lock())
	}

	pub fn set_retention(&self, retention: Retention) {
		self.inner.log.lock().set_retention(retention);
	}

	/// Decodes, logs, interprets and stores one message.
	pub fn process(&self, bytes: &[u8]) -> Result<ProcessOutcome, ProcessError> {
		let mut guard = StepGuard::begin(&self.inner.status);
		let result = self.process_message(bytes);
		match &result {
			Ok(_) => guard.succeed(),
			Err(err) => guard.fail(err),
		}
		result
	}

	fn process_message(&self, bytes: &[u8]) -> Result<ProcessOutcome, ProcessError> {
		let decoded = decode_message(bytes)?;
		debug!(message = %decoded.label(), "decoded message");
		let result = match &decoded {
			Decoded::Dict(_) => Ok(ProcessOutcome::Logged),
			Decoded::Figure(msg) => self.store_figure(msg),
		};
		self.inner.log.lock().push(decoded, result.is_ok());
		result
	}

	fn store_figure(&self, msg: &FigureMessage) -> Result<ProcessOutcome, ProcessError> {
		let mut figure = self.inner.interpreter.build(msg).map_err(|source| ProcessError::Interpret {
			uuid: msg.uuid.clone(),
			source,
		})?;
		self.apply_size(&msg.uuid, &mut figure);
		let outcome = self.inner.store.add(msg.uuid.clone(), figure);
		info!(uuid = %msg.uuid, ?outcome, "stored figure");
		Ok(ProcessOutcome::Figure {
			uuid: msg.uuid.clone(),
			outcome,
		})
	}

	// Keeps an explicit size on the selected figure across updates. With
	// nothing selected the incoming figure becomes the selection.
	fn apply_size(&self, uuid: &str, figure: &mut Figure) {
		let Some(size) = self.inner.status.lock().size else {
			return;
		};
		if self.selected().is_none_or(|selected| selected == uuid) {
			for (key, value) in size.layout_patch() {
				figure.layout_mut().insert(key, value);
			}
		}
	}

	pub fn clear_messages(&self) {
		self.inner.log.lock().clear();
		self.inner.status.lock().state = StepState::ClearedMessages;
	}

	pub fn clear_figures(&self) {
		self.inner.store.clear();
		self.inner.status.lock().state = StepState::ClearedFigures;
	}

	/// Applies `size` to the selected figure, and to later updates of it.
	///
	/// Returns `false` when no figure is selected.
	pub fn set_size(&self, size: SizeMode) -> bool {
		self.inner.status.lock().size = Some(size);
		let Some(uuid) = self.selected() else {
			return false;
		};
		let patch = size.layout_patch();
		self.inner.store.edit(&uuid, |fig| fig.update_layout(&patch)).is_some()
	}

	pub fn size(&self) -> Option<SizeMode> {
		self.inner.status.lock().size
	}

	pub fn selected(&self) -> Option<String> {
		self.inner.selection.lock().selected().map(str::to_owned)
	}

	pub fn select(&self, uuid: &str) -> bool {
		self.inner.selection.lock().select(uuid)
	}

	pub fn status(&self) -> SessionStatus {
		let (state, last_message, received) = {
			let status = self.inner.status.lock();
			(status.state.clone(), status.last_message.clone(), status.received)
		};
		SessionStatus {
			state,
			last_message,
			figures: self.inner.store.len(),
			messages: self.inner.log.lock().len(),
			received,
		}
	}
}

impl fmt::Debug for Session {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Session").field("status", &self.status()).finish_non_exhaustive()
	}
}

/// Brackets one processing step in the status.
///
/// Creating the guard stamps the receive time, bumps the received counter
/// and marks the session as processing. Dropping it records the outcome; a
/// guard dropped without an outcome (early return or unwinding panic)
/// records a failure.
pub(crate) struct StepGuard<'a> {
	status: &'a Mutex<Status>,
	started: Instant,
	outcome: Option<Result<(), String>>,
}

impl<'a> StepGuard<'a> {
	fn begin(status: &'a Mutex<Status>) -> Self {
		{
			let mut status = status.lock();
			status.last_message = Some(Local::now().format("%H:%M").to_string());
			status.state = StepState::Processing;
			status.received += 1;
		}
		Self {
			status,
			started: Instant::now(),
			outcome: None,
		}
	}

	fn succeed(&mut self) {
		self.outcome = Some(Ok(()));
	}

	fn fail(&mut self, err: &dyn fmt::Display) {
		self.outcome = Some(Err(err.to_string()));
	}
}

impl Drop for StepGuard<'_> {
	fn drop(&mut self) {
		let state = match self.outcome.take() {
			Some(Ok(())) => StepState::Ok,
			Some(Err(err)) => StepState::Failed(err),
			None => StepState::Failed("processing aborted".into()),
		};
		debug!(elapsed_ms = self.started.elapsed().as_millis() as u64, state = %state, "processing step finished");
		self.status.lock().state = state;
	}
}

#[cfg(test)]
mod tests;
