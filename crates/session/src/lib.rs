//! Receiving side of plot messaging.
//!
//! A [`Listener`] pulls encoded envelopes from a [`Subscriber`] and hands
//! them to a [`Session`], which decodes them, logs them, builds figures and
//! keeps those figures in a shared [`FigureStore`].

pub mod config;
pub mod error;
pub mod listener;
pub mod log;
pub mod selection;
pub mod session;
mod spawn;
pub mod store;
pub mod transport;

pub use config::Config;
pub use error::{ConfigError, ListenerError, ProcessError, StoreError, TransportError};
pub use listener::{DEFAULT_POLL_TIMEOUT, Listener, SpinMode};
pub use log::{LogEntry, MessageLog, Retention};
pub use selection::{MultiSelection, SingleSelection};
pub use session::{ProcessOutcome, Session, SessionInterpreter, SessionStatus, SizeMode, StepState};
pub use store::{FigureStore, StoreEvent, StoreObserver, StoreOutcome};
pub use transport::{
	ChannelPublisher, ChannelSubscriber, DEFAULT_ADDRESS, DEFAULT_RECONNECT_INTERVAL, Subscriber, ZmqPublisher, ZmqSubscriber, channel,
};
