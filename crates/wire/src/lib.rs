//! Wire format for plot messages.
//!
//! * [`proto`]: the protobuf envelope, declared with prost derives
//! * [`decode`]: envelope bytes to [`Decoded`] value trees
//! * [`builder`]: producer-side construction of envelopes

pub mod builder;
pub mod decode;
pub mod error;
pub mod message;
pub mod proto;

pub use decode::{Unpack, decode, decode_message};
pub use error::{DecodeError, EncodeError, Result};
pub use message::{CommandDescriptor, CreationMethod, DEFAULT_TRACE_FUNC, Decoded, FigureMessage, TraceDescriptor};
