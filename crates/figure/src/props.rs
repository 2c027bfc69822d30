//! Keyword to attribute-path expansion.
//!
//! Plotting keywords use "magic underscores": `marker_size` addresses
//! `marker.size` and `line_colorbar_thickness` addresses
//! `line.colorbar.thickness`. Only names of known compound properties are
//! split off, so `showscale` or `sizeref` stay whole.

use plotmsg_value::{Record, Value};

/// Compound property names. Names containing an underscore are matched
/// before their first segment.
const COMPOUND: &[&str] = &[
	"aspectratio",
	"camera",
	"center",
	"colorbar",
	"contours",
	"domain",
	"error_x",
	"error_y",
	"error_z",
	"eye",
	"font",
	"gradient",
	"grid",
	"hoverlabel",
	"insidetextfont",
	"labelfont",
	"legend",
	"legendgrouptitle",
	"lighting",
	"lightposition",
	"line",
	"margin",
	"marker",
	"outsidetextfont",
	"pad",
	"scene",
	"selector",
	"textfont",
	"tickfont",
	"title",
	"up",
	"xaxis",
	"yaxis",
	"zaxis",
];

fn is_compound(name: &str) -> bool {
	COMPOUND.contains(&name) || is_numbered_axis(name)
}

// `xaxis2`, `yaxis3`, ...
fn is_numbered_axis(name: &str) -> bool {
	["xaxis", "yaxis"]
		.iter()
		.any(|axis| name.strip_prefix(axis).is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())))
}

/// Splits a keyword into its attribute path.
///
/// ```
/// use plotmsg_figure::props::split_path;
///
/// assert_eq!(split_path("marker_colorbar_title"), ["marker", "colorbar", "title"]);
/// assert_eq!(split_path("error_y_array"), ["error_y", "array"]);
/// assert_eq!(split_path("showscale"), ["showscale"]);
/// ```
pub fn split_path(key: &str) -> Vec<String> {
	if key.starts_with('_') || key.ends_with('_') || key.contains("__") {
		return vec![key.to_owned()];
	}
	let segments: Vec<&str> = key.split('_').collect();
	let mut path = Vec::new();
	let mut start = 0;
	'outer: while start < segments.len() {
		// Longest compound prefix that still leaves something after it.
		for end in (start + 1..segments.len()).rev() {
			let candidate = segments[start..end].join("_");
			if is_compound(&candidate) {
				path.push(candidate);
				start = end;
				continue 'outer;
			}
		}
		path.push(segments[start..].join("_"));
		break;
	}
	path
}

/// Expands every keyword of `kwargs`, recursing into record values.
///
/// Later keywords win; record values deep-merge into what earlier keywords
/// created, so `marker={"size": 3}` and `marker_color="red"` combine.
pub fn expand(kwargs: &Record) -> Record {
	let mut out = Record::with_capacity(kwargs.len());
	merge_into(&mut out, kwargs);
	out
}

/// Expands `patch` and deep-merges it into `target`.
pub fn merge_into(target: &mut Record, patch: &Record) {
	for (key, value) in patch {
		insert_path(target, &split_path(key), value.clone());
	}
}

/// Inserts `value` at `path`, creating intermediate records.
pub fn insert_path<S: AsRef<str>>(target: &mut Record, path: &[S], value: Value) {
	let Some((last, parents)) = path.split_last() else {
		return;
	};
	let parent = parents.iter().fold(target, |rec, key| rec.record_mut(key));
	match value {
		Value::Record(nested) => merge_into(parent.record_mut(last), &nested),
		value => {
			parent.insert(last.as_ref(), value);
		}
	}
}
