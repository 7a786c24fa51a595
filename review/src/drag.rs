//! Drag gesture state machine.
//!
//! `Idle → Translating → Idle` and `Idle → Resizing → Idle`. A gesture can
//! only start from `Idle`, so a translate and a resize never overlap.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::coords::{CoordinateMapper, Point, Rect};
use crate::doc::{Collection, ItemId};
use crate::input::{Corner, Gesture};

/// One step of a resize drag, ready for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeStep {
    pub id: ItemId,
    pub corner: Corner,
    /// CSS-pixel bounds at gesture start.
    pub initial_bounds: Rect,
    /// CSS-pixel position the grabbed handle should move to.
    pub target: Point,
}

/// Normalized delta range one translate step may use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub min: Point,
    pub max: Point,
}

impl Room {
    pub const UNBOUNDED: Self = Self {
        min: Point { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY },
        max: Point { x: f64::INFINITY, y: f64::INFINITY },
    };

    /// Room that keeps every one of `positions` inside `[0,1]²`. Always
    /// admits a zero delta, so a record already outside can stay put.
    #[must_use]
    pub fn within_unit<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let (mut lo, mut hi) = (Self::UNBOUNDED.max, Self::UNBOUNDED.min);
        for p in positions {
            lo = Point::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Self {
            min: Point::new((-lo.x).min(0.0), (-lo.y).min(0.0)),
            max: Point::new((1.0 - hi.x).max(0.0), (1.0 - hi.y).max(0.0)),
        }
    }

    #[must_use]
    pub fn clamp(self, d: Point) -> Point {
        Point::new(d.x.max(self.min.x).min(self.max.x), d.y.max(self.min.y).min(self.max.y))
    }
}

/// Owns the single active gesture of an interaction session.
#[derive(Debug, Default)]
pub struct DragController {
    gesture: Gesture,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.gesture.is_idle()
    }

    /// Start moving `ids` of `collection`, anchored at `pt` (CSS pixels).
    /// Returns false if another gesture is active.
    pub fn begin_translate(&mut self, collection: Collection, ids: Vec<ItemId>, pt: Point) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        self.gesture = Gesture::Translating { collection, ids, anchor: pt, total: Point::default() };
        true
    }

    /// Start resizing `id` by the handle `corner`. Returns false if another
    /// gesture is active or the corner is not a valid handle.
    pub fn begin_resize(&mut self, id: ItemId, corner: Corner, initial_bounds: Rect, start: Point) -> bool {
        if !self.gesture.is_idle() || !corner.is_valid() {
            return false;
        }
        self.gesture = Gesture::Resizing { id, corner, initial_bounds, start, changed: false };
        true
    }

    /// Advance a translate to `pt`.
    ///
    /// Returns the collection and the normalized delta since the previous
    /// event, limited to `room`, then re-anchors at `pt`. The delta is also
    /// added to the gesture's running total. `None` when not translating.
    pub fn translate_step(&mut self, pt: Point, mapper: &CoordinateMapper, room: Room) -> Option<(Collection, Point)> {
        let Gesture::Translating { collection, anchor, total, .. } = &mut self.gesture else {
            return None;
        };
        let delta = room.clamp(mapper.delta_to_normalized(pt.x - anchor.x, pt.y - anchor.y));
        *anchor = pt;
        *total = total.offset(delta.x, delta.y);
        Some((*collection, delta))
    }

    /// Where the grabbed handle should be for pointer position `pt`: the
    /// handle's point on the initial bounds plus the cumulative pointer
    /// delta since gesture start. `None` when not resizing.
    #[must_use]
    pub fn resize_step(&self, pt: Point) -> Option<ResizeStep> {
        let Gesture::Resizing { id, corner, initial_bounds, start, .. } = &self.gesture else {
            return None;
        };
        let handle = corner.handle_point(*initial_bounds);
        Some(ResizeStep {
            id: id.clone(),
            corner: *corner,
            initial_bounds: *initial_bounds,
            target: handle.offset(pt.x - start.x, pt.y - start.y),
        })
    }

    /// Record that the resize produced accepted bounds.
    pub fn mark_resized(&mut self) {
        if let Gesture::Resizing { changed, .. } = &mut self.gesture {
            *changed = true;
        }
    }

    /// End the gesture and hand back its final state.
    pub fn finish(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }
}
