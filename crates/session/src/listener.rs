//! Receive loops.
//!
//! A [`Listener`] feeds received envelopes into [`Session::process`]. Its
//! [`SpinMode`] is fixed at construction:
//!
//! * blocking: the caller drives the loop with [`Listener::spin_once`] or
//!   [`Listener::spin`] on a runtime owned by the listener
//! * async: [`Listener::spin_async`] starts one background task that runs
//!   until [`Listener::stop`] or drop
//!
//! Blocking listeners must not be driven or dropped from inside an async
//! context.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::error::{ListenerError, TransportError};
use crate::session::Session;
use crate::spawn;
use crate::transport::{Subscriber, ZmqSubscriber};

/// Default wait for a message during a [`Listener::spin_once`] pass.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
	#[default]
	Blocking,
	Async,
}

impl SpinMode {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Blocking => "blocking",
			Self::Async => "async",
		}
	}
}

impl fmt::Display for SpinMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SpinMode {
	type Err = ListenerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"blocking" | "default" => Ok(Self::Blocking),
			"async" => Ok(Self::Async),
			other => Err(ListenerError::UnknownMode(other.to_owned())),
		}
	}
}

struct SpinTask {
	cancel: CancellationToken,
	handle: JoinHandle<()>,
}

/// Drives a [`Subscriber`] into a [`Session`].
pub struct Listener<S> {
	session: Session,
	subscriber: Arc<Mutex<S>>,
	mode: SpinMode,
	runtime: Option<tokio::runtime::Runtime>,
	poll_timeout: Duration,
	task: Option<SpinTask>,
}

impl<S: Subscriber + 'static> Listener<S> {
	/// Creates a listener. Blocking listeners build their own current-thread
	/// runtime.
	pub fn new(subscriber: S, session: Session, mode: SpinMode) -> Result<Self, ListenerError> {
		let runtime = match mode {
			SpinMode::Blocking => Some(spawn::blocking_runtime().map_err(ListenerError::Runtime)?),
			SpinMode::Async => None,
		};
		Ok(Self::from_parts(subscriber, session, mode, runtime))
	}

	fn from_parts(subscriber: S, session: Session, mode: SpinMode, runtime: Option<tokio::runtime::Runtime>) -> Self {
		Self {
			session,
			subscriber: Arc::new(Mutex::new(subscriber)),
			mode,
			runtime,
			poll_timeout: DEFAULT_POLL_TIMEOUT,
			task: None,
		}
	}

	#[must_use]
	pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
		self.poll_timeout = timeout;
		self
	}

	pub fn mode(&self) -> SpinMode {
		self.mode
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Processes every message available now, returning how many were
	/// received. A closed transport ends the pass like an empty one.
	pub fn spin_once(&mut self) -> Result<usize, ListenerError> {
		let runtime = self.blocking_runtime("spin_once")?;
		let session = &self.session;
		let subscriber = &self.subscriber;
		let wait = self.poll_timeout;
		runtime.block_on(async {
			let mut subscriber = subscriber.lock().await;
			let mut received = 0;
			loop {
				match subscriber.try_recv(wait).await {
					Ok(Some(bytes)) => {
						received += 1;
						handle(session, &bytes);
					}
					Ok(None) => break,
					Err(TransportError::Closed) => {
						debug!("transport closed");
						break;
					}
					Err(err) => return Err(err.into()),
				}
			}
			Ok(received)
		})
	}

	/// Processes messages until the transport closes.
	pub fn spin(&mut self) -> Result<(), ListenerError> {
		let runtime = self.blocking_runtime("spin")?;
		let session = &self.session;
		let subscriber = &self.subscriber;
		runtime.block_on(async {
			let mut subscriber = subscriber.lock().await;
			loop {
				match subscriber.recv().await {
					Ok(bytes) => handle(session, &bytes),
					Err(TransportError::Closed) => {
						debug!("transport closed");
						return Ok(());
					}
					Err(err) => return Err(err.into()),
				}
			}
		})
	}

	/// Starts the background receive task on the ambient runtime, or on a
	/// shared fallback runtime outside one.
	///
	/// Returns `false` without starting anything if a task is already
	/// running.
	pub fn spin_async(&mut self) -> Result<bool, ListenerError> {
		self.expect_mode("spin_async", SpinMode::Async)?;
		if self.is_spinning() {
			warn!("already spinning asynchronously");
			return Ok(false);
		}

		let cancel = CancellationToken::new();
		let token = cancel.clone();
		let session = self.session.clone();
		let subscriber = self.subscriber.clone();
		let handle = spawn::spawn(async move {
			let mut subscriber = subscriber.lock().await;
			loop {
				let received = tokio::select! {
					_ = token.cancelled() => break,
					received = subscriber.recv() => received,
				};
				match received {
					Ok(bytes) => handle(&session, &bytes),
					Err(TransportError::Closed) => {
						debug!("transport closed, receive task exiting");
						break;
					}
					Err(err) => {
						error!(error = %err, "receive failed, receive task exiting");
						break;
					}
				}
			}
		});
		self.task = Some(SpinTask { cancel, handle });
		Ok(true)
	}

	/// Whether a background receive task is running.
	pub fn is_spinning(&self) -> bool {
		self.task.as_ref().is_some_and(|task| !task.handle.is_finished())
	}

	/// Waits for the background task to finish on its own, e.g. after the
	/// transport closed.
	pub async fn join(&mut self) {
		if let Some(task) = self.task.take()
			&& let Err(err) = task.handle.await
			&& !err.is_cancelled()
		{
			error!(error = %err, "receive task failed");
		}
	}

	/// Cancels the background task. In-flight processing may be abandoned.
	pub fn stop(&mut self) {
		if let Some(task) = self.task.take() {
			task.cancel.cancel();
			task.handle.abort();
			debug!("receive task stopped");
		}
	}

	fn expect_mode(&self, operation: &'static str, expected: SpinMode) -> Result<(), ListenerError> {
		if self.mode == expected {
			Ok(())
		} else {
			Err(ListenerError::ModeMismatch {
				operation,
				expected,
				actual: self.mode,
			})
		}
	}

	fn blocking_runtime(&self, operation: &'static str) -> Result<&tokio::runtime::Runtime, ListenerError> {
		self.expect_mode(operation, SpinMode::Blocking)?;
		self.runtime.as_ref().ok_or(ListenerError::ModeMismatch {
			operation,
			expected: SpinMode::Blocking,
			actual: self.mode,
		})
	}
}

impl Listener<ZmqSubscriber> {
	/// Connects a blocking listener; the socket lives on the listener's own
	/// runtime.
	pub fn connect_blocking(address: &str, settle: Duration, session: Session) -> Result<Self, ListenerError> {
		let runtime = spawn::blocking_runtime().map_err(ListenerError::Runtime)?;
		let subscriber = runtime.block_on(ZmqSubscriber::connect(address, settle))?;
		Ok(Self::from_parts(subscriber, session, SpinMode::Blocking, Some(runtime)))
	}

	/// Connects an async listener on the ambient runtime.
	pub async fn connect_async(address: &str, settle: Duration, session: Session) -> Result<Self, ListenerError> {
		let subscriber = ZmqSubscriber::connect(address, settle).await?;
		Ok(Self::from_parts(subscriber, session, SpinMode::Async, None))
	}
}

impl<S> Drop for Listener<S> {
	fn drop(&mut self) {
		if let Some(task) = self.task.take() {
			task.cancel.cancel();
			task.handle.abort();
		}
	}
}

fn handle(session: &Session, bytes: &[u8]) {
	match session.process(bytes) {
		Ok(outcome) => debug!(?outcome, "processed message"),
		Err(err) => error!(error = %err, "failed to process message"),
	}
}

#[cfg(test)]
mod tests;
