//! Error types for figure interpretation and reconciliation.

use plotmsg_value::ValueType;
use plotmsg_wire::CreationMethod;
use thiserror::Error;

use crate::figure::{AttrPath, FigureKind};

/// Errors raised while turning a figure message into a [`Figure`](crate::Figure).
#[derive(Debug, Error, PartialEq)]
pub enum InterpretError {
	/// The backend has no trace factory of this name for the creation method.
	#[error("no {method} function named '{func}'")]
	UnknownFunction { method: CreationMethod, func: String },

	#[error("unknown figure command '{0}'")]
	UnknownCommand(String),

	#[error("{func}: invalid argument '{arg}': {reason}")]
	InvalidArgument { func: String, arg: String, reason: String },

	#[error("{func}: missing required argument '{arg}'")]
	MissingArgument { func: String, arg: &'static str },
}

impl InterpretError {
	pub(crate) fn invalid(func: &str, arg: &str, reason: impl ToString) -> Self {
		Self::InvalidArgument {
			func: func.to_owned(),
			arg: arg.to_owned(),
			reason: reason.to_string(),
		}
	}
}

/// Reconciliation refusals. Each means the stored figure must be recreated
/// instead of patched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconcileError {
	#[error("cannot reconcile a {existing} figure with a {incoming} figure")]
	KindMismatch { existing: FigureKind, incoming: FigureKind },

	/// Only live figures can be patched in place.
	#[error("figure is not live")]
	NotLive,

	#[error("trace count changed from {existing} to {incoming}, recreate the figure instead")]
	TraceCountMismatch { existing: usize, incoming: usize },

	#[error("trace {index} changed type from '{existing}' to '{incoming}', recreate the figure instead")]
	TraceTypeMismatch { index: usize, existing: String, incoming: String },

	#[error("{path} changed type from {existing} to {incoming}, recreate the figure instead")]
	TypeMismatch {
		path: AttrPath,
		existing: ValueType,
		incoming: ValueType,
	},
}

/// Result type for interpretation.
pub type Result<T> = std::result::Result<T, InterpretError>;
