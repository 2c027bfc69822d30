use std::f64::consts::PI;

use plotmsg_value::{Record, Value};
use plotmsg_wire::CreationMethod;

use super::Args;
use crate::error::{InterpretError, Result};
use crate::figure::Trace;
use crate::props;

pub(super) fn build(func: &str, kwargs: &Record) -> Result<Vec<Trace>> {
	let args = Args::new(func, kwargs);
	match func {
		"create_quiver" => quiver(&args).map(|trace| vec![trace]),
		"vector_field" => vector_field(&args),
		_ => Err(InterpretError::UnknownFunction {
			method: CreationMethod::FigureFactory,
			func: func.to_owned(),
		}),
	}
}

/// Arrays named in `names`, checked for equal length.
fn columns<const N: usize>(args: &Args<'_>, names: [&'static str; N]) -> Result<[Vec<f64>; N]> {
	let mut out: [Vec<f64>; N] = std::array::from_fn(|_| Vec::new());
	for (slot, name) in out.iter_mut().zip(names) {
		*slot = args.numbers(name)?.into_owned();
	}
	let len = out[0].len();
	for (col, name) in out.iter().zip(names) {
		if col.len() != len {
			return Err(InterpretError::invalid(args.func, name, format!("has {} elements, expected {len}", col.len())));
		}
	}
	Ok(out)
}

fn num(val: f64) -> Value {
	if val.is_nan() { Value::Nothing } else { Value::Float(val) }
}

/// 2-D quiver: one line trace holding every barb followed by every arrow
/// head, segments separated by nulls.
fn quiver(args: &Args<'_>) -> Result<Trace> {
	const CONSUMED: &[&str] = &["x", "y", "u", "v", "scale", "arrow_scale", "angle", "name"];

	let [x, y, u, v] = columns(args, ["x", "y", "u", "v"])?;
	let scale = args.f64_or("scale", 0.1)?;
	let arrow_scale = args.f64_or("arrow_scale", 0.3)?;
	let angle = args.f64_or("angle", PI / 9.0)?;
	let name = args.str_opt("name")?.unwrap_or("quiver");

	let end_x: Vec<f64> = x.iter().zip(&u).map(|(x, u)| x + u * scale).collect();
	let end_y: Vec<f64> = y.iter().zip(&v).map(|(y, v)| y + v * scale).collect();

	let mut xs = Vec::with_capacity(x.len() * 7);
	let mut ys = Vec::with_capacity(y.len() * 7);
	for i in 0..x.len() {
		xs.extend([num(x[i]), num(end_x[i]), Value::Nothing]);
		ys.extend([num(y[i]), num(end_y[i]), Value::Nothing]);
	}
	for i in 0..x.len() {
		let (dx, dy) = (end_x[i] - x[i], end_y[i] - y[i]);
		let arrow_len = dx.hypot(dy) * arrow_scale;
		let barb_angle = dy.atan2(dx);
		let (a1, a2) = (barb_angle + angle, barb_angle - angle);
		let p1 = (end_x[i] - arrow_len * a1.cos(), end_y[i] - arrow_len * a1.sin());
		let p2 = (end_x[i] - arrow_len * a2.cos(), end_y[i] - arrow_len * a2.sin());
		xs.extend([num(p1.0), num(end_x[i]), num(p2.0), Value::Nothing]);
		ys.extend([num(p1.1), num(end_y[i]), num(p2.1), Value::Nothing]);
	}

	let mut trace = Trace::from_attrs("scatter", props::expand(&args.rest(CONSUMED)));
	trace.set("x", Value::List(xs));
	trace.set("y", Value::List(ys));
	trace.set("mode", "lines");
	trace.set("name", name);
	Ok(trace)
}

/// 3-D vector field: a cone trace for the arrow heads and a line trace for
/// the arrow bodies, coloured by vector magnitude.
fn vector_field(args: &Args<'_>) -> Result<Vec<Trace>> {
	let [mut x, mut y, mut z, u, v, w] = columns(args, ["x", "y", "z", "u", "v", "w"])?;
	let scale = args.f64_or("scale", 1.0)?;
	let head_sizeref = args.f64_or("arrow_head_sizeref", 0.2)? * scale;
	let head_color = args.str_opt("arrow_head_color")?.unwrap_or("grey");
	let body_length = args.f64_or("arrow_body_length_scale", 0.1)? * scale;
	let body_width = args.f64_or("arrow_body_line_width", 3.0)? * scale;
	let body_color = args.get("arrow_body_line_color");

	if args.bool_or("normalise_scale", false)? {
		for col in [&mut x, &mut y, &mut z] {
			normalise(col);
		}
	}

	let norms: Vec<f64> = (0..u.len()).map(|i| (u[i] * u[i] + v[i] * v[i] + w[i] * w[i]).sqrt()).collect();
	let unit = |comp: &[f64]| -> Vec<f64> {
		comp.iter()
			.zip(&norms)
			.map(|(c, n)| if *n == 0.0 { 0.0 } else { c / n })
			.collect()
	};
	let tip_x: Vec<f64> = x.iter().zip(&u).map(|(p, d)| p + body_length * d).collect();
	let tip_y: Vec<f64> = y.iter().zip(&v).map(|(p, d)| p + body_length * d).collect();
	let tip_z: Vec<f64> = z.iter().zip(&w).map(|(p, d)| p + body_length * d).collect();

	let mut traces = Vec::with_capacity(2);
	if head_sizeref > 0.0 {
		let mut head = Trace::new("cone");
		head.set("x", tip_x.clone());
		head.set("y", tip_y.clone());
		head.set("z", tip_z.clone());
		head.set("u", unit(&u[..]));
		head.set("v", unit(&v[..]));
		head.set("w", unit(&w[..]));
		let stop = |at: i64| Value::List(vec![Value::Int(at), Value::string(head_color)]);
		head.set("colorscale", Value::List(vec![stop(0), stop(1)]));
		head.set("showscale", false);
		head.set("sizemode", "scaled");
		head.set("anchor", "tip");
		head.set("sizeref", head_sizeref);
		traces.push(head);
	}

	let edges = |start: &[f64], end: &[f64]| -> Value {
		Value::List(start.iter().zip(end).flat_map(|(s, e)| [num(*s), num(*e), Value::Nothing]).collect())
	};
	let line_color = match body_color {
		Some(color) => color.clone(),
		None => Value::FloatArray(norms.iter().flat_map(|n| [*n; 3]).collect()),
	};

	let mut body = Trace::new("scatter3d");
	body.set("x", edges(&x[..], &tip_x[..]));
	body.set("y", edges(&y[..], &tip_y[..]));
	body.set("z", edges(&z[..], &tip_z[..]));
	body.set("mode", "lines");
	let line = body.attrs_mut().record_mut("line");
	line.insert("color", line_color);
	line.insert("showscale", Value::Bool(true));
	line.insert("colorscale", Value::string("thermal"));
	line.insert("width", Value::Float(body_width));
	line.record_mut("colorbar").insert("thickness", Value::Int(15));
	traces.push(body);
	Ok(traces)
}

/// Rescales `col` onto `[0, 1]`.
fn normalise(col: &mut [f64]) {
	let min = col.iter().copied().fold(f64::INFINITY, f64::min);
	for val in col.iter_mut() {
		*val -= min;
	}
	let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	if max > 0.0 {
		for val in col.iter_mut() {
			*val /= max;
		}
	}
}
