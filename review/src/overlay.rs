//! Optimistic overlay: in-flight position and bounds overrides.
//!
//! An override exists while a gesture is active and for a grace period after
//! the mutation it produced has settled, so the shape does not snap back to
//! its stale authoritative value while the backend round-trips. Once an
//! override expires the authoritative record wins again, whether the write
//! landed or not.
//!
//! Lifecycle of one entry:
//!
//! 1. `begin`, `shift` and `set_bounds` mark it active.
//! 2. `register` attaches every ticket emitted for it.
//! 3. `end` marks the gesture over.
//! 4. Once inactive with no tickets in flight, it gets an expiry deadline
//!    (`now + grace`) and `expire` removes it.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::bridge::Ticket;
use crate::coords::{Point, Rect};
use crate::doc::{Annotation, Collection, Comment, ItemId};

type OverrideKey = (Collection, ItemId);

#[derive(Debug, Clone, Default)]
struct Override {
    position: Option<Point>,
    bounds: Option<Rect>,
    active: bool,
    in_flight: HashSet<Ticket>,
    expires_at: Option<f64>,
}

/// Host-facing copy of every live override, in normalized coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub positions: BTreeMap<ItemId, Point>,
    pub bounds: BTreeMap<ItemId, Rect>,
    pub comment_positions: BTreeMap<ItemId, Point>,
}

/// Per-session store of optimistic overrides.
#[derive(Debug, Default)]
pub struct OptimisticOverlayStore {
    entries: HashMap<OverrideKey, Override>,
}

impl OptimisticOverlayStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, collection: Collection, id: &str) -> &mut Override {
        let entry = self.entries.entry((collection, id.to_owned())).or_default();
        entry.active = true;
        entry.expires_at = None;
        entry
    }

    /// Mark a record as part of an active gesture. Any pending expiry is
    /// cancelled so a record grabbed again keeps its last optimistic value.
    pub fn begin(&mut self, collection: Collection, id: &str) {
        self.entry(collection, id);
    }

    /// Move a record's override by a normalized delta, starting from
    /// `authoritative` when no position override exists yet. A bounds
    /// override left by an earlier resize moves along with it.
    pub fn shift(&mut self, collection: Collection, id: &str, authoritative: Point, delta: Point) {
        let entry = self.entry(collection, id);
        let base = entry.position.unwrap_or(authoritative);
        entry.position = Some(base.offset(delta.x, delta.y));
        if let Some(bounds) = entry.bounds {
            entry.bounds = Some(bounds.translate(delta.x, delta.y));
        }
    }

    pub fn set_bounds(&mut self, id: &str, bounds: Rect) {
        self.entry(Collection::Annotations, id).bounds = Some(bounds);
    }

    #[must_use]
    pub fn position(&self, collection: Collection, id: &str) -> Option<Point> {
        self.get(collection, id).and_then(|o| o.position)
    }

    #[must_use]
    pub fn bounds(&self, id: &str) -> Option<Rect> {
        self.get(Collection::Annotations, id).and_then(|o| o.bounds)
    }

    fn get(&self, collection: Collection, id: &str) -> Option<&Override> {
        self.entries.get(&(collection, id.to_owned()))
    }

    /// Attach `ticket` to every listed record.
    pub fn register<'a, I>(&mut self, ticket: Ticket, keys: I)
    where
        I: IntoIterator<Item = &'a OverrideKey>,
    {
        for key in keys {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.in_flight.insert(ticket);
            }
        }
    }

    /// The gesture touching this record is over. Starts the grace period
    /// immediately when nothing is in flight.
    pub fn end(&mut self, collection: Collection, id: &str, now_ms: f64, grace_ms: f64) {
        if let Some(entry) = self.entries.get_mut(&(collection, id.to_owned())) {
            entry.active = false;
            if entry.in_flight.is_empty() {
                entry.expires_at = Some(now_ms + grace_ms);
            }
        }
    }

    /// A mutation finished (either way). Returns how many records were waiting on it.
    pub fn settle(&mut self, ticket: Ticket, now_ms: f64, grace_ms: f64) -> usize {
        let mut touched = 0;
        for entry in self.entries.values_mut() {
            if entry.in_flight.remove(&ticket) {
                touched += 1;
                if !entry.active && entry.in_flight.is_empty() {
                    entry.expires_at = Some(now_ms + grace_ms);
                }
            }
        }
        touched
    }

    /// Drop overrides whose grace period has elapsed. Returns true if any were removed.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.expires_at.is_none_or(|at| at > now_ms));
        self.entries.len() != before
    }

    /// Drop an override immediately. Returns true if one existed.
    pub fn discard(&mut self, collection: Collection, id: &str) -> bool {
        self.entries.remove(&(collection, id.to_owned())).is_some()
    }

    /// Keep only overrides whose record passes `keep`, whatever their state.
    /// Returns true if any were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(Collection, &str) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|(collection, id), _| keep(*collection, id.as_str()));
        self.entries.len() != before
    }

    /// Earliest pending expiry, for hosts that schedule a precise wake-up.
    #[must_use]
    pub fn next_expiry(&self) -> Option<f64> {
        self.entries
            .values()
            .filter_map(|e| e.expires_at)
            .min_by(f64::total_cmp)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized extent to render for `annotation`: the bounds override if
    /// present, otherwise the authoritative extent shifted by the position
    /// override.
    #[must_use]
    pub fn annotation_extent(&self, annotation: &Annotation) -> Rect {
        let extent = annotation.extent();
        let Some(entry) = self.get(Collection::Annotations, &annotation.id) else {
            return extent;
        };
        if let Some(bounds) = entry.bounds {
            return bounds;
        }
        match entry.position {
            Some(p) => extent.translate(p.x - annotation.position.x, p.y - annotation.position.y),
            None => extent,
        }
    }

    /// Normalized anchor to render for `comment`.
    #[must_use]
    pub fn comment_position(&self, comment: &Comment) -> Point {
        self.position(Collection::Comments, &comment.id)
            .unwrap_or(comment.position)
    }

    /// Copy of all overrides for the host.
    #[must_use]
    pub fn snapshot(&self) -> OverlaySnapshot {
        let mut snap = OverlaySnapshot::default();
        for ((collection, id), entry) in &self.entries {
            match collection {
                Collection::Annotations => {
                    if let Some(p) = entry.position {
                        snap.positions.insert(id.clone(), p);
                    }
                    if let Some(b) = entry.bounds {
                        snap.bounds.insert(id.clone(), b);
                    }
                }
                Collection::Comments => {
                    if let Some(p) = entry.position {
                        snap.comment_positions.insert(id.clone(), p);
                    }
                }
            }
        }
        snap
    }
}
