//! Selection model: independent id sets for annotations and comments.
//!
//! Every mutator reports whether the set actually changed so the engine can
//! emit a selection callback synchronously and only when needed.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use indexmap::IndexSet;

use crate::doc::{Collection, ItemId};

/// An insertion-ordered set of ids. Order carries no meaning beyond being
/// stable for callbacks and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: IndexSet<ItemId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Duplicate ids collapse. Returns true if changed.
    pub fn select<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = ItemId>,
    {
        let next: IndexSet<ItemId> = ids.into_iter().collect();
        if next == self.ids {
            return false;
        }
        self.ids = next;
        true
    }

    /// Add `id` if absent, remove it if present. Always a change.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.ids.shift_remove(id) {
            self.ids.insert(id.to_owned());
        }
        true
    }

    /// Remove `id`. Returns true if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.shift_remove(id)
    }

    /// Drop every id for which `keep` returns false. Returns true if any were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.ids.len();
        self.ids.retain(|id| keep(id));
        self.ids.len() != before
    }

    /// Empty the selection. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The single selected id, if exactly one is selected.
    #[must_use]
    pub fn only(&self) -> Option<&ItemId> {
        if self.ids.len() == 1 { self.ids.first() } else { None }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    /// Snapshot as a `Vec` for callbacks.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ItemId> {
        self.ids.iter().cloned().collect()
    }
}

/// Selections for both collections of one review session.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    pub annotations: SelectionSet,
    pub comments: SelectionSet,
}

impl SelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(&self, collection: Collection) -> &SelectionSet {
        match collection {
            Collection::Annotations => &self.annotations,
            Collection::Comments => &self.comments,
        }
    }

    pub fn set_mut(&mut self, collection: Collection) -> &mut SelectionSet {
        match collection {
            Collection::Annotations => &mut self.annotations,
            Collection::Comments => &mut self.comments,
        }
    }

    #[must_use]
    pub fn is_selected(&self, collection: Collection, id: &str) -> bool {
        self.set(collection).contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.comments.is_empty()
    }
}
