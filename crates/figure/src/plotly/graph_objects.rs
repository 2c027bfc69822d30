use plotmsg_value::Record;
use plotmsg_wire::CreationMethod;

use crate::error::{InterpretError, Result};
use crate::figure::Trace;
use crate::props;

/// Trace classes accepted by name, matched case-insensitively.
pub const TRACE_TYPES: &[&str] = &[
	"bar",
	"box",
	"candlestick",
	"cone",
	"contour",
	"heatmap",
	"histogram",
	"histogram2d",
	"isosurface",
	"mesh3d",
	"pie",
	"scatter",
	"scatter3d",
	"scattergl",
	"scatterpolar",
	"streamtube",
	"surface",
	"violin",
	"volume",
];

pub(super) fn build(func: &str, kwargs: &Record) -> Result<Trace> {
	let kind = TRACE_TYPES
		.iter()
		.find(|name| name.eq_ignore_ascii_case(func))
		.ok_or_else(|| InterpretError::UnknownFunction {
			method: CreationMethod::GraphObjects,
			func: func.to_owned(),
		})?;
	Ok(Trace::from_attrs(kind, props::expand(kwargs)))
}
