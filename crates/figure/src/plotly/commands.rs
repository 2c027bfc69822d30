use plotmsg_value::{Record, Value, record};

use super::Args;
use crate::error::{InterpretError, Result};
use crate::figure::{Figure, Trace};
use crate::props;

pub(super) fn apply(figure: &mut Figure, func: &str, kwargs: &Record) -> Result<()> {
	match func {
		"update_layout" => props::merge_into(figure.layout_mut(), kwargs),
		"update_traces" => update_traces(figure, &Args::new(func, kwargs))?,
		"update_xaxes" => update_axes(figure, "xaxis", kwargs),
		"update_yaxes" => update_axes(figure, "yaxis", kwargs),
		"set_equal_axis" => update_axes(figure, "yaxis", &record! { "scaleanchor" => "x", "scaleratio" => 1_i64 }),
		_ => return Err(InterpretError::UnknownCommand(func.to_owned())),
	}
	Ok(())
}

/// Patches every trace matching the optional `selector` record.
fn update_traces(figure: &mut Figure, args: &Args<'_>) -> Result<()> {
	let selector = match args.get("selector") {
		Some(Value::Record(sel)) => props::expand(sel),
		Some(other) => {
			return Err(InterpretError::invalid(args.func, "selector", format!("expected a record, got {}", other.get_type())));
		}
		None => Record::new(),
	};
	let patch = args.rest(&["selector", "row", "col"]);
	for trace in figure.traces_mut().iter_mut().filter(|trace| matches(trace, &selector)) {
		props::merge_into(trace.attrs_mut(), &patch);
	}
	Ok(())
}

fn matches(trace: &Trace, selector: &Record) -> bool {
	selector.iter().all(|(key, want)| match (trace.get(key), want) {
		(Some(Value::Record(have)), Value::Record(want)) => want.iter().all(|(k, v)| have.get(k).is_some_and(|h| h.same_as(v))),
		(Some(have), want) => have.same_as(want),
		(None, _) => false,
	})
}

/// Applies `kwargs` to every axis of `axis` kind in the layout, or to the
/// primary axis when the layout names none.
fn update_axes(figure: &mut Figure, axis: &str, kwargs: &Record) {
	let layout = figure.layout_mut();
	let mut names: Vec<String> = layout
		.keys()
		.filter(|key| key.strip_prefix(axis).is_some_and(|n| n.bytes().all(|b| b.is_ascii_digit())))
		.map(str::to_owned)
		.collect();
	if names.is_empty() {
		names.push(axis.to_owned());
	}
	for name in names {
		props::merge_into(layout.record_mut(&name), kwargs);
	}
}
