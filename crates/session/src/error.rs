//! Error types for the session layer.

use std::path::PathBuf;

use plotmsg_figure::{InterpretError, ReconcileError};
use plotmsg_wire::DecodeError;
use thiserror::Error;

use crate::listener::SpinMode;

/// Errors raised by explicit [`FigureStore::update`](crate::FigureStore::update) calls.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("no figure stored under '{0}'")]
	NotStored(String),

	/// Only live figures can be patched in place.
	#[error("figure '{0}' is not live")]
	NotLive(String),

	#[error("cannot update figure '{uuid}': {source}")]
	Reconcile {
		uuid: String,
		#[source]
		source: ReconcileError,
	},
}

/// Errors raised while processing one received message.
#[derive(Debug, Error)]
pub enum ProcessError {
	#[error(transparent)]
	Decode(#[from] DecodeError),

	#[error("cannot build figure '{uuid}': {source}")]
	Interpret {
		uuid: String,
		#[source]
		source: InterpretError,
	},
}

/// Transport failures. "No message available" is not an error.
#[derive(Debug, Error)]
pub enum TransportError {
	/// The sending side is gone; no further messages will arrive.
	#[error("transport closed")]
	Closed,

	#[error("zeromq: {0}")]
	Zmq(#[from] zeromq::ZmqError),
}

/// Listener setup and mode errors.
#[derive(Debug, Error)]
pub enum ListenerError {
	#[error("unknown spin mode '{0}', expected 'blocking' or 'async'")]
	UnknownMode(String),

	#[error("{operation} needs a {expected} listener, this one is {actual}")]
	ModeMismatch {
		operation: &'static str,
		expected: SpinMode,
		actual: SpinMode,
	},

	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error("failed to build listener runtime: {0}")]
	Runtime(#[source] std::io::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	#[error("invalid config: {error}")]
	Parse {
		/// Source file, when the text came from disk.
		path: Option<PathBuf>,
		error: toml::de::Error,
	},
}
