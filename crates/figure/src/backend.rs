//! Plotting-library boundary.

use plotmsg_value::Record;

use crate::error::Result;
use crate::figure::{Figure, Trace};

/// Builds traces and applies figure commands on behalf of the interpreter.
///
/// Implementations are shared across threads by the session, so they should
/// be stateless or internally synchronised.
pub trait PlotBackend: Send + Sync {
	/// Constructs exactly one trace from a trace class name.
	fn graph_object(&self, func: &str, kwargs: &Record) -> Result<Trace>;

	/// Declarative chart constructor. May return several traces.
	fn express(&self, func: &str, kwargs: &Record) -> Result<Vec<Trace>>;

	/// Composite chart constructor. May return several traces.
	fn figure_factory(&self, func: &str, kwargs: &Record) -> Result<Vec<Trace>>;

	/// Applies the named method to a freshly built figure.
	fn apply_command(&self, figure: &mut Figure, func: &str, kwargs: &Record) -> Result<()>;
}

impl<B: PlotBackend + ?Sized> PlotBackend for std::sync::Arc<B> {
	fn graph_object(&self, func: &str, kwargs: &Record) -> Result<Trace> {
		(**self).graph_object(func, kwargs)
	}

	fn express(&self, func: &str, kwargs: &Record) -> Result<Vec<Trace>> {
		(**self).express(func, kwargs)
	}

	fn figure_factory(&self, func: &str, kwargs: &Record) -> Result<Vec<Trace>> {
		(**self).figure_factory(func, kwargs)
	}

	fn apply_command(&self, figure: &mut Figure, func: &str, kwargs: &Record) -> Result<()> {
		(**self).apply_command(figure, func, kwargs)
	}
}
