use plotmsg_figure::{FigureKind, Trace};
use plotmsg_value::record;
use pretty_assertions::assert_eq;

use super::*;

fn figure() -> Figure {
	Figure::with_traces(
		FigureKind::Snapshot,
		vec![Trace::from_attrs("scatter", record! { "y" => vec![1_i64, 2, 3] })],
	)
}

#[test]
fn paths_are_sanitised() {
	let dir = tempfile::tempdir().expect("temp dir");
	let writer = FigureWriter::create(dir.path(), OutputFormat::Json).expect("writer");
	assert_eq!(writer.path_for("test_1"), dir.path().join("test_1.json"));
	assert_eq!(writer.path_for("../etc/passwd"), dir.path().join("_.._etc_passwd.json"));
	assert_eq!(writer.path_for(""), dir.path().join("_.json"));
}

#[test]
fn json_output_holds_the_figure() {
	let dir = tempfile::tempdir().expect("temp dir");
	let writer = FigureWriter::create(dir.path().join("figs"), OutputFormat::Json).expect("writer");
	let path = writer.write("a", &figure()).expect("writes");

	let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).expect("reads")).expect("valid json");
	assert_eq!(json["data"][0]["type"], "scatter");
	assert_eq!(json["data"][0]["y"], serde_json::json!([1, 2, 3]));
}

#[test]
fn html_output_embeds_plotly() {
	let dir = tempfile::tempdir().expect("temp dir");
	let writer = FigureWriter::create(dir.path(), OutputFormat::Html).expect("writer");
	let html = std::fs::read_to_string(writer.write("a", &figure()).expect("writes")).expect("reads");
	assert!(html.contains(render::PLOTLY_JS_CDN));
}

#[test]
fn store_events_are_mirrored_to_disk() {
	let dir = tempfile::tempdir().expect("temp dir");
	let writer = FigureWriter::create(dir.path(), OutputFormat::Json).expect("writer");
	let store = FigureStore::new();
	let observer = writer.clone();
	store.subscribe(move |store, event| observer.on_event(store, event));

	store.add("a", figure());
	store.add("b", figure());
	assert!(writer.path_for("a").is_file());
	assert!(writer.path_for("b").is_file());

	store.remove(["a"]);
	assert!(!writer.path_for("a").exists());
	assert!(writer.path_for("b").is_file());

	store.clear();
	assert!(!writer.path_for("b").exists());
}
