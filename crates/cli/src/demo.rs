//! Demo figure sent by `plotmsg publish-demo`.

use plotmsg_wire::builder::{Dict, FigureBuilder, TraceBuilder};

const POINTS: usize = 20;

/// Markers coloured along a viridis scale, with a titled colour bar.
pub fn figure(uuid: &str) -> FigureBuilder {
	let x: Vec<f64> = (0..POINTS).map(|i| i as f64).collect();
	let y: Vec<f64> = x.iter().map(|x| x + 5.0).collect();
	let color: Vec<i64> = (3..).take(POINTS).collect();

	let marker = Dict::new()
		.with("size", 14_i64)
		.with("opacity", 0.5)
		.with("colorscale", "Viridis")
		.with("colorbar", Dict::new().with("title", "Colorbar"))
		.with("color", color);

	FigureBuilder::new(uuid).trace(
		TraceBuilder::graph_objects("Scatter")
			.kwarg("mode", "markers")
			.kwarg("x", x)
			.kwarg("y", y)
			.kwarg("marker", marker),
	)
}
