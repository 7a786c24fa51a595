use super::*;

fn ids(raw: &[&str]) -> Vec<ItemId> {
    raw.iter().map(|s| (*s).to_owned()).collect()
}

// =============================================================
// SelectionSet
// =============================================================

#[test]
fn new_set_is_empty() {
    let set = SelectionSet::new();
    assert!(set.is_empty());
    assert!(set.only().is_none());
}

#[test]
fn select_replaces_and_reports_change() {
    let mut set = SelectionSet::new();
    assert!(set.select(ids(&["a", "b"])));
    assert!(set.select(ids(&["c"])));
    assert_eq!(set.to_vec(), ids(&["c"]));
}

#[test]
fn select_same_ids_is_not_a_change() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a", "b"]));
    assert!(!set.select(ids(&["a", "b"])));
}

#[test]
fn select_collapses_duplicates() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a", "a", "b", "a"]));
    assert_eq!(set.to_vec(), ids(&["a", "b"]));
}

#[test]
fn toggle_is_symmetric_difference() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a"]));
    set.toggle("b");
    assert_eq!(set.to_vec(), ids(&["a", "b"]));
    set.toggle("a");
    assert_eq!(set.to_vec(), ids(&["b"]));
    set.toggle("b");
    assert!(set.is_empty());
}

#[test]
fn toggle_preserves_insertion_order_of_rest() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a", "b", "c"]));
    set.toggle("b");
    assert_eq!(set.to_vec(), ids(&["a", "c"]));
}

#[test]
fn clear_reports_change_only_when_non_empty() {
    let mut set = SelectionSet::new();
    assert!(!set.clear());
    set.select(ids(&["a"]));
    assert!(set.clear());
    assert!(set.is_empty());
}

#[test]
fn only_returns_single_selection() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a"]));
    assert_eq!(set.only().map(String::as_str), Some("a"));
    set.toggle("b");
    assert!(set.only().is_none());
}

#[test]
fn retain_drops_missing() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a", "b", "c"]));
    assert!(set.retain(|id| id != "b"));
    assert_eq!(set.to_vec(), ids(&["a", "c"]));
    assert!(!set.retain(|_| true));
}

#[test]
fn remove_reports_presence() {
    let mut set = SelectionSet::new();
    set.select(ids(&["a"]));
    assert!(set.remove("a"));
    assert!(!set.remove("a"));
}

// =============================================================
// SelectionModel
// =============================================================

#[test]
fn collections_are_independent() {
    let mut model = SelectionModel::new();
    model.set_mut(Collection::Annotations).select(ids(&["x"]));
    model.set_mut(Collection::Comments).select(ids(&["x", "y"]));
    assert!(model.is_selected(Collection::Annotations, "x"));
    assert!(!model.is_selected(Collection::Annotations, "y"));
    assert_eq!(model.set(Collection::Comments).len(), 2);
    model.annotations.clear();
    assert!(!model.is_empty());
    model.comments.clear();
    assert!(model.is_empty());
}
