//! Figure output as plotly.js JSON or a standalone HTML page.

use crate::figure::Figure;

/// plotly.js bundle referenced by [`to_html`].
pub const PLOTLY_JS_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Pretty-printed `{"data": [...], "layout": {...}}`.
pub fn to_json(figure: &Figure) -> serde_json::Result<String> {
	serde_json::to_string_pretty(figure)
}

/// Standalone page drawing `figure` with plotly.js.
pub fn to_html(figure: &Figure, title: &str) -> serde_json::Result<String> {
	// `</` would end the script element early.
	let json = serde_json::to_string(figure)?.replace("</", "<\\/");
	let title = escape(title);
	Ok(format!(
		r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS_CDN}"></script>
</head>
<body>
<div id="figure"></div>
<script>
const fig = {json};
Plotly.newPlot("figure", fig.data, fig.layout, {{responsive: true}});
</script>
</body>
</html>
"#
	))
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			ch => out.push(ch),
		}
	}
	out
}

#[cfg(test)]
mod tests;
