use plotmsg_value::{Value, record};
use plotmsg_wire::CreationMethod;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::figure::FigureKind;

#[test]
fn graph_objects_expand_magic_underscores() {
	let trace = PlotlyBackend
		.graph_object(
			"Scatter",
			&record! {
				"x" => vec![1_i64, 2, 3],
				"mode" => "markers",
				"marker_size" => 10_i64,
			},
		)
		.expect("known trace class");
	assert_eq!(trace.kind(), "scatter");
	assert_eq!(trace.get_path(&["marker", "size"]), Some(&Value::Int(10)));
	assert_eq!(trace.get("mode"), Some(&Value::string("markers")));
}

#[rstest]
#[case("scatter3d", "scatter3d")]
#[case("Cone", "cone")]
#[case("HEATMAP", "heatmap")]
fn graph_object_names_match_case_insensitively(#[case] func: &str, #[case] kind: &str) {
	assert_eq!(PlotlyBackend.graph_object(func, &Record::new()).expect("known").kind(), kind);
}

#[test]
fn unknown_graph_object_is_reported() {
	let err = PlotlyBackend.graph_object("Sankeyish", &Record::new()).unwrap_err();
	assert_eq!(
		err,
		InterpretError::UnknownFunction {
			method: CreationMethod::GraphObjects,
			func: "Sankeyish".into(),
		}
	);
}

#[test]
fn express_scatter_without_color_is_one_trace() {
	let traces = PlotlyBackend
		.express("scatter", &record! { "x" => vec![1.0, 2.0], "y" => vec![3.0, 4.0], "title" => "ignored" })
		.expect("valid");
	assert_eq!(traces.len(), 1);
	assert_eq!(traces[0].get("mode"), Some(&Value::string("markers")));
	assert_eq!(traces[0].get("x"), Some(&Value::FloatArray(vec![1.0, 2.0])));
	assert_eq!(traces[0].get_path(&["marker", "color"]), Some(&Value::string(PALETTE[0])));
}

#[test]
fn express_color_groups_split_rows_in_first_seen_order() {
	let traces = PlotlyBackend
		.express(
			"line",
			&record! {
				"x" => vec![1_i64, 2, 3, 4],
				"y" => vec![10_i64, 20, 30, 40],
				"color" => vec!["b".to_owned(), "a".to_owned(), "b".to_owned(), "a".to_owned()],
			},
		)
		.expect("valid");
	assert_eq!(traces.len(), 2);
	assert_eq!(traces[0].get("name"), Some(&Value::string("b")));
	assert_eq!(traces[0].get("x"), Some(&Value::IntArray(vec![1, 3])));
	assert_eq!(traces[1].get("name"), Some(&Value::string("a")));
	assert_eq!(traces[1].get("y"), Some(&Value::IntArray(vec![20, 40])));
	assert_eq!(traces[1].get_path(&["line", "color"]), Some(&Value::string(PALETTE[1])));
}

#[test]
fn express_passes_other_keywords_to_every_trace() {
	let traces = PlotlyBackend
		.express(
			"scatter",
			&record! {
				"x" => vec![1_i64, 2, 3],
				"y" => vec![4_i64, 5, 6],
				"color" => vec!["a".to_owned(), "b".to_owned(), "a".to_owned()],
				"hover_name" => vec!["p".to_owned(), "q".to_owned(), "r".to_owned()],
				"opacity" => 0.3,
				"marker_size" => 9_i64,
			},
		)
		.expect("valid");
	assert_eq!(traces.len(), 2);
	for trace in &traces {
		assert_eq!(trace.get("opacity"), Some(&Value::Float(0.3)));
		assert_eq!(trace.get_path(&["marker", "size"]), Some(&Value::Int(9)));
		assert_eq!(trace.get("hover_name"), None);
	}
	assert_eq!(traces[0].get("hovertext"), Some(&Value::StringList(vec!["p".into(), "r".into()])));
	assert_eq!(traces[1].get_path(&["marker", "color"]), Some(&Value::string(PALETTE[1])));
}

#[test]
fn express_colour_sequence_overrides_the_palette() {
	let traces = PlotlyBackend
		.express(
			"bar",
			&record! {
				"x" => vec![1_i64, 2],
				"color" => vec!["a".to_owned(), "b".to_owned()],
				"color_discrete_sequence" => vec!["red".to_owned()],
			},
		)
		.expect("valid");
	assert_eq!(traces[0].get_path(&["marker", "color"]), Some(&Value::string("red")));
	assert_eq!(traces[1].get_path(&["marker", "color"]), Some(&Value::string("red")));
	assert_eq!(traces[0].get("color_discrete_sequence"), None);

	let err = PlotlyBackend
		.express("bar", &record! { "x" => vec![1_i64], "color_discrete_sequence" => "red" })
		.unwrap_err();
	assert!(
		matches!(err, InterpretError::InvalidArgument { ref arg, .. } if arg == "color_discrete_sequence"),
		"{err}"
	);
}

#[test]
fn express_rejects_ragged_columns() {
	let err = PlotlyBackend
		.express("bar", &record! { "x" => vec![1_i64, 2], "y" => vec![1_i64] })
		.unwrap_err();
	assert!(matches!(err, InterpretError::InvalidArgument { ref arg, .. } if arg == "y"), "{err}");
}

#[test]
fn express_needs_data() {
	let err = PlotlyBackend.express("histogram", &Record::new()).unwrap_err();
	assert!(matches!(err, InterpretError::MissingArgument { arg: "x", .. }), "{err}");
}

#[test]
fn quiver_draws_barbs_then_heads() {
	let traces = PlotlyBackend
		.figure_factory(
			"create_quiver",
			&record! {
				"x" => vec![0.0],
				"y" => vec![0.0],
				"u" => vec![1.0],
				"v" => vec![0.0],
				"scale" => 1.0,
				"name" => "wind",
				"line_width" => 2_i64,
			},
		)
		.expect("valid");
	assert_eq!(traces.len(), 1);
	let trace = &traces[0];
	assert_eq!(trace.get("name"), Some(&Value::string("wind")));
	assert_eq!(trace.get_path(&["line", "width"]), Some(&Value::Int(2)));

	let Some(Value::List(xs)) = trace.get("x") else {
		panic!("x should be a list");
	};
	// One barb (start, end, gap) and one head (left, tip, right, gap).
	assert_eq!(xs.len(), 7);
	assert_eq!(&xs[..3], &[Value::Float(0.0), Value::Float(1.0), Value::Nothing]);
	assert_eq!(xs[4], Value::Float(1.0));
	assert_eq!(xs[6], Value::Nothing);
	let left = xs[3].as_float().expect("number");
	assert!(left < 1.0 && left > 0.6, "{left}");
}

#[test]
fn quiver_requires_matching_lengths() {
	let err = PlotlyBackend
		.figure_factory(
			"create_quiver",
			&record! { "x" => vec![0.0, 1.0], "y" => vec![0.0], "u" => vec![1.0], "v" => vec![1.0] },
		)
		.unwrap_err();
	assert!(matches!(err, InterpretError::InvalidArgument { ref arg, .. } if arg == "y"), "{err}");
}

#[test]
fn vector_field_emits_heads_and_bodies() {
	let traces = PlotlyBackend
		.figure_factory(
			"vector_field",
			&record! {
				"x" => vec![0.0, 1.0],
				"y" => vec![0.0, 1.0],
				"z" => vec![0.0, 1.0],
				"u" => vec![3.0, 0.0],
				"v" => vec![4.0, 0.0],
				"w" => vec![0.0, 2.0],
			},
		)
		.expect("valid");
	assert_eq!(traces.iter().map(Trace::kind).collect::<Vec<_>>(), vec!["cone", "scatter3d"]);

	let cone = &traces[0];
	assert_eq!(cone.get("u"), Some(&Value::FloatArray(vec![0.6, 0.0])));
	assert_eq!(cone.get("anchor"), Some(&Value::string("tip")));
	assert_eq!(cone.get("sizeref"), Some(&Value::Float(0.2)));

	let body = &traces[1];
	assert_eq!(body.get_path(&["line", "color"]), Some(&Value::FloatArray(vec![5.0, 5.0, 5.0, 2.0, 2.0, 2.0])));
	assert_eq!(body.get_path(&["line", "colorbar", "thickness"]), Some(&Value::Int(15)));
	let Some(Value::List(xs)) = body.get("x") else {
		panic!("x should be a list");
	};
	assert_eq!(xs.len(), 6);
	assert_eq!(xs[2], Value::Nothing);
}

#[test]
fn vector_field_without_heads() {
	let traces = PlotlyBackend
		.figure_factory(
			"vector_field",
			&record! {
				"x" => vec![0.0], "y" => vec![0.0], "z" => vec![0.0],
				"u" => vec![1.0], "v" => vec![0.0], "w" => vec![0.0],
				"arrow_head_sizeref" => 0.0,
				"arrow_body_line_color" => "black",
			},
		)
		.expect("valid");
	assert_eq!(traces.len(), 1);
	assert_eq!(traces[0].get_path(&["line", "color"]), Some(&Value::string("black")));
}

#[test]
fn update_traces_respects_selector() {
	let mut fig = Figure::with_traces(FigureKind::Snapshot, vec![Trace::new("scatter"), Trace::new("box")]);
	PlotlyBackend
		.apply_command(&mut fig, "update_traces", &record! { "boxpoints" => "all", "selector" => record! { "type" => "box" } })
		.expect("valid command");
	assert_eq!(fig.traces()[0].get("boxpoints"), None);
	assert_eq!(fig.traces()[1].get("boxpoints"), Some(&Value::string("all")));
}

#[test]
fn update_layout_expands_keywords() {
	let mut fig = Figure::new(FigureKind::Snapshot);
	PlotlyBackend
		.apply_command(&mut fig, "update_layout", &record! { "title_text" => "PlotMsg demo", "boxmode" => "group" })
		.expect("valid command");
	assert_eq!(fig.layout(), &record! { "title" => record! { "text" => "PlotMsg demo" }, "boxmode" => "group" });
}

#[test]
fn axis_updates_reach_every_axis_of_that_kind() {
	let mut fig = Figure::new(FigureKind::Snapshot);
	fig.layout_mut().insert("yaxis", Value::Record(Record::new()));
	fig.layout_mut().insert("yaxis2", Value::Record(Record::new()));
	PlotlyBackend
		.apply_command(&mut fig, "update_yaxes", &record! { "title_text" => "m" })
		.expect("valid command");
	for axis in ["yaxis", "yaxis2"] {
		assert_eq!(
			fig.layout().get(axis),
			Some(&Value::Record(record! { "title" => record! { "text" => "m" } })),
			"{axis}"
		);
	}
}

#[test]
fn set_equal_axis_anchors_y_to_x() {
	let mut fig = Figure::new(FigureKind::Snapshot);
	PlotlyBackend.apply_command(&mut fig, "set_equal_axis", &Record::new()).expect("valid command");
	assert_eq!(
		fig.layout(),
		&record! { "yaxis" => record! { "scaleanchor" => "x", "scaleratio" => 1_i64 } }
	);
}

#[test]
fn unknown_command_is_reported() {
	let mut fig = Figure::new(FigureKind::Snapshot);
	let err = PlotlyBackend.apply_command(&mut fig, "show", &Record::new()).unwrap_err();
	assert_eq!(err, InterpretError::UnknownCommand("show".into()));
}
