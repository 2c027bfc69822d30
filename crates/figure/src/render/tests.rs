use plotmsg_value::{Value, record};

use super::*;
use crate::figure::{FigureKind, Trace};

fn demo() -> Figure {
	let mut fig = Figure::with_traces(FigureKind::Snapshot, vec![Trace::from_attrs("scatter", record! { "text" => "</script>" })]);
	fig.layout_mut().insert("title", Value::string("demo"));
	fig
}

#[test]
fn json_round_trips_through_serde() {
	let json = to_json(&demo()).expect("serializable");
	let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
	assert_eq!(parsed["data"][0]["type"], "scatter");
	assert_eq!(parsed["layout"]["title"], "demo");
}

#[test]
fn html_embeds_figure_safely() {
	let html = to_html(&demo(), "a <b> & c").expect("serializable");
	assert!(html.contains(PLOTLY_JS_CDN));
	assert!(html.contains("<title>a &lt;b&gt; &amp; c</title>"));
	assert!(html.contains(r"<\/script>"));
	assert_eq!(html.matches("</script>").count(), 2);
}
