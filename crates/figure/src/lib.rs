//! Figures built from plot messages.
//!
//! * [`Interpreter`] turns a [`FigureMessage`](plotmsg_wire::FigureMessage)
//!   into a [`Figure`] through a [`PlotBackend`]
//! * [`reconcile`] patches a stored live figure in place
//! * [`render`] writes figures as plotly.js JSON or HTML

pub mod backend;
pub mod error;
pub mod figure;
pub mod interpret;
pub mod plotly;
pub mod props;
pub mod reconcile;
pub mod render;

pub use backend::PlotBackend;
pub use error::{InterpretError, ReconcileError, Result};
pub use figure::{AttrPath, Change, DEFAULT_TRACE_TYPE, Figure, FigureKind, Target, Trace};
pub use interpret::{Interpreter, ProgressObserver};
pub use plotly::PlotlyBackend;
pub use reconcile::{ReconcileReport, reconcile};
