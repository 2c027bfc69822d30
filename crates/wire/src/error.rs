//! Error types for envelope decoding.

use thiserror::Error;

/// Schema errors raised while decoding an envelope.
///
/// All of these indicate version skew between producer and consumer and are
/// never retried.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// The bytes are not a valid protobuf envelope.
	#[error("malformed envelope: {0}")]
	Malformed(#[from] prost::DecodeError),

	/// A oneof discriminator selected no variant known to this schema.
	#[error("unrecognised variant in {context}")]
	UnrecognisedVariant {
		/// Message whose oneof was unset.
		context: &'static str,
	},

	/// A trace named a creation method outside the known enumeration.
	#[error("unknown trace creation method {0}")]
	UnknownCreationMethod(i32),
}

/// Errors raised when converting a native value into a wire item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
	/// Heterogeneous lists only carry scalars and nulls.
	#[error("list element {index} is a {kind}, only scalars and null can be sent in a list")]
	NonScalarListElement {
		/// Position of the offending element.
		index: usize,
		/// Type name of the element.
		kind: String,
	},
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
