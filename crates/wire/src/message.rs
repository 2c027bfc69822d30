//! Native descriptors produced by unpacking an envelope.

use std::fmt;
use std::str::FromStr;

use plotmsg_value::Record;
use serde::Serialize;

/// Trace factory used when a descriptor names none.
pub const DEFAULT_TRACE_FUNC: &str = "scatter";

/// How the consumer should build the trace(s) of one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationMethod {
	/// Construct exactly one trace object from the keyword arguments.
	GraphObjects,
	/// Declarative one-call chart constructor; may expand into several traces.
	PlotlyExpress,
	/// Composite chart constructor; may expand into several traces.
	FigureFactory,
}

impl CreationMethod {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::GraphObjects => "graph_objects",
			Self::PlotlyExpress => "plotly_express",
			Self::FigureFactory => "figure_factory",
		}
	}
}

impl fmt::Display for CreationMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for CreationMethod {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"graph_objects" => Ok(Self::GraphObjects),
			"plotly_express" => Ok(Self::PlotlyExpress),
			"figure_factory" => Ok(Self::FigureFactory),
			other => Err(format!("unknown trace creation method '{other}'")),
		}
	}
}

/// One trace request inside a [`FigureMessage`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceDescriptor {
	pub method: CreationMethod,
	pub func: String,
	pub kwargs: Record,
}

impl TraceDescriptor {
	pub fn new(method: CreationMethod, func: impl Into<String>, kwargs: Record) -> Self {
		Self {
			method,
			func: func.into(),
			kwargs,
		}
	}

	/// The factory function name, falling back to [`DEFAULT_TRACE_FUNC`].
	pub fn func_or_default(&self) -> &str {
		if self.func.is_empty() { DEFAULT_TRACE_FUNC } else { &self.func }
	}
}

/// A named method applied to the figure after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDescriptor {
	pub func: String,
	pub kwargs: Record,
}

/// A complete figure description keyed by a stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureMessage {
	pub uuid: String,
	pub traces: Vec<TraceDescriptor>,
	pub commands: Vec<CommandDescriptor>,
}

/// Result of unpacking one envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoded {
	/// A bare keyword mapping, kept for diagnostics only.
	Dict(Record),
	/// A figure to interpret and store.
	Figure(FigureMessage),
}

impl Decoded {
	pub fn as_figure(&self) -> Option<&FigureMessage> {
		match self {
			Self::Figure(fig) => Some(fig),
			Self::Dict(_) => None,
		}
	}

	/// Short human label used in logs.
	pub fn label(&self) -> String {
		match self {
			Self::Dict(rec) => format!("dict({} keys)", rec.len()),
			Self::Figure(fig) => format!("figure '{}' ({} traces, {} commands)", fig.uuid, fig.traces.len(), fig.commands.len()),
		}
	}
}
