use plotmsg_value::{Record, Value};
use plotmsg_wire::CreationMethod;

use super::Args;
use crate::error::{InterpretError, Result};
use crate::figure::Trace;
use crate::props;

/// Default qualitative colour sequence for colour groups.
pub const PALETTE: &[&str] = &[
	"#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Column arguments split per colour group, with the trace attribute each
/// one fills.
const COLUMNS: &[(&str, &str)] = &[("x", "x"), ("y", "y"), ("text", "text"), ("hover_name", "hovertext")];

/// Arguments handled here. Everything else is expanded onto each trace.
const CONSUMED: &[&str] = &["x", "y", "text", "hover_name", "color", "color_discrete_sequence", "title"];

pub(super) fn build(func: &str, kwargs: &Record) -> Result<Vec<Trace>> {
	let (kind, mode) = match func {
		"scatter" => ("scatter", Some("markers")),
		"line" => ("scatter", Some("lines")),
		"bar" => ("bar", None),
		"histogram" => ("histogram", None),
		_ => {
			return Err(InterpretError::UnknownFunction {
				method: CreationMethod::PlotlyExpress,
				func: func.to_owned(),
			});
		}
	};
	let args = Args::new(func, kwargs);
	if args.get("x").is_none() && args.get("y").is_none() {
		return Err(InterpretError::MissingArgument {
			func: func.to_owned(),
			arg: "x",
		});
	}

	let len = column_len(&args)?;
	let color = args.get("color");
	let palette = palette(&args)?;
	let extra = args.rest(CONSUMED);
	if let Some(title) = args.get("title") {
		tracing::debug!(func, %title, "express title ignored, only traces are kept");
	}

	let groups = match color {
		Some(color) => group_by(color, len),
		None => vec![(None, (0..len).collect())],
	};

	let mut traces = Vec::with_capacity(groups.len());
	for (idx, (name, rows)) in groups.into_iter().enumerate() {
		let mut trace = Trace::new(kind);
		if let Some(mode) = mode {
			trace.set("mode", mode);
		}
		for (column, attr) in COLUMNS {
			if let Some(values) = args.get(column) {
				trace.set(*attr, take_rows(values, &rows));
			}
		}
		let marker_color = &palette[idx % palette.len()];
		match name {
			Some(name) => {
				trace.set("name", name.clone());
				trace.set("legendgroup", name);
				trace.set("showlegend", true);
			}
			None => trace.set("showlegend", false),
		}
		let style_key = if mode == Some("lines") { "line" } else { "marker" };
		trace.attrs_mut().record_mut(style_key).insert("color", Value::string(marker_color.as_str()));
		props::merge_into(trace.attrs_mut(), &extra);
		traces.push(trace);
	}
	Ok(traces)
}

/// Common length of the column arguments.
fn column_len(args: &Args<'_>) -> Result<usize> {
	let mut len = None;
	for column in COLUMNS.iter().map(|(column, _)| *column).chain(["color"]) {
		let Some(values) = args.get(column) else {
			continue;
		};
		let n = values
			.seq_len()
			.ok_or_else(|| InterpretError::invalid(args.func, column, format!("expected a sequence, got {}", values.get_type())))?;
		match len {
			None => len = Some(n),
			Some(expected) if expected != n => {
				return Err(InterpretError::invalid(args.func, column, format!("has {n} rows, expected {expected}")));
			}
			Some(_) => {}
		}
	}
	Ok(len.unwrap_or(0))
}

/// Group colours, `color_discrete_sequence` when given.
fn palette(args: &Args<'_>) -> Result<Vec<String>> {
	match args.get("color_discrete_sequence") {
		None => Ok(PALETTE.iter().map(|color| (*color).to_owned()).collect()),
		Some(Value::StringList(colors)) if !colors.is_empty() => Ok(colors.clone()),
		Some(other) => Err(InterpretError::invalid(
			args.func,
			"color_discrete_sequence",
			format!("expected a non-empty list of colours, got {}", other.get_type()),
		)),
	}
}

/// Row indices per distinct colour value, in first-seen order.
fn group_by(color: &Value, len: usize) -> Vec<(Option<String>, Vec<usize>)> {
	let mut groups: Vec<(Option<String>, Vec<usize>)> = Vec::new();
	for row in 0..len {
		let key = color.element(row).map(|v| v.to_string()).unwrap_or_default();
		match groups.iter_mut().find(|(name, _)| name.as_deref() == Some(key.as_str())) {
			Some((_, rows)) => rows.push(row),
			None => groups.push((Some(key), vec![row])),
		}
	}
	groups
}

fn take_rows(values: &Value, rows: &[usize]) -> Value {
	match values {
		Value::IntArray(vals) => Value::IntArray(rows.iter().map(|&r| vals[r]).collect()),
		Value::FloatArray(vals) => Value::FloatArray(rows.iter().map(|&r| vals[r]).collect()),
		Value::StringList(vals) => Value::StringList(rows.iter().map(|&r| vals[r].clone()).collect()),
		Value::List(vals) => Value::List(rows.iter().map(|&r| vals[r].clone()).collect()),
		other => other.clone(),
	}
}
