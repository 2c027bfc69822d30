use pretty_assertions::assert_eq;

use super::*;

fn ids(names: &[&str]) -> Vec<String> {
	names.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn single_selection_defaults_to_first() {
	let mut sel = SingleSelection::new();
	assert_eq!(sel.selected(), None);
	sel.refresh(ids(&["a", "b"]));
	assert_eq!(sel.selected(), Some("a"));
}

#[test]
fn single_selection_survives_unrelated_changes() {
	let mut sel = SingleSelection::new();
	sel.refresh(ids(&["a", "b", "c"]));
	assert!(sel.select("b"));
	sel.apply(&StoreEvent::Removed("a".into()));
	sel.apply(&StoreEvent::Inserted("d".into()));
	assert_eq!(sel.selected(), Some("b"));
	assert_eq!(sel.options(), ids(&["b", "c", "d"]).as_slice());
}

#[test]
fn single_selection_falls_back_when_removed() {
	let mut sel = SingleSelection::new();
	sel.refresh(ids(&["a", "b"]));
	sel.select("b");
	sel.apply(&StoreEvent::Removed("b".into()));
	assert_eq!(sel.selected(), Some("a"));
	sel.apply(&StoreEvent::Cleared);
	assert_eq!(sel.selected(), None);
	assert!(!sel.select("a"));
}

#[test]
fn multi_selection_keeps_what_is_still_stored() {
	let mut sel = MultiSelection::new();
	sel.refresh(ids(&["a", "b", "c"]));
	assert_eq!(sel.selected(), ids(&["a"]).as_slice());

	sel.select(&["b", "c", "zzz"]);
	assert_eq!(sel.selected(), ids(&["b", "c"]).as_slice());

	sel.apply(&StoreEvent::Removed("b".into()));
	assert_eq!(sel.selected(), ids(&["c"]).as_slice());

	sel.apply(&StoreEvent::Removed("c".into()));
	assert_eq!(sel.selected(), ids(&["a"]).as_slice());
}

#[test]
fn duplicate_inserts_do_not_duplicate_options() {
	let mut sel = MultiSelection::new();
	sel.apply(&StoreEvent::Inserted("a".into()));
	sel.apply(&StoreEvent::Inserted("a".into()));
	sel.apply(&StoreEvent::Reconciled("a".into()));
	assert_eq!(sel.options(), ids(&["a"]).as_slice());
}
