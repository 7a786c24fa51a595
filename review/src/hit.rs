//! Pointer hit testing.
//!
//! Resolves a CSS-pixel point to the record under it, using the optimistic
//! geometry so a shape is grabbed where it is drawn, not where the server
//! last put it.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::coords::{CoordinateMapper, Point};
use crate::doc::{Annotation, Collection, ItemId, ReviewDoc};
use crate::input::Corner;
use crate::overlay::OptimisticOverlayStore;
use crate::selection::SelectionModel;

/// Which part of a record was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::Nw, Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W];

    /// The edges this handle controls.
    #[must_use]
    pub fn corner(self) -> Corner {
        match self {
            Self::N => Corner::TOP,
            Self::Ne => Corner::TOP_RIGHT,
            Self::E => Corner::RIGHT,
            Self::Se => Corner::BOTTOM_RIGHT,
            Self::S => Corner::BOTTOM,
            Self::Sw => Corner::BOTTOM_LEFT,
            Self::W => Corner::LEFT,
            Self::Nw => Corner::TOP_LEFT,
        }
    }

    /// CSS cursor shown while hovering the handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub collection: Collection,
    pub id: ItemId,
    pub part: HitPart,
}

impl Hit {
    /// CSS cursor for hovering this hit.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match self.part {
            HitPart::Body => "move",
            HitPart::ResizeHandle(anchor) => anchor.cursor(),
        }
    }
}

/// Everything a hit test reads. All borrowed; hit testing never mutates.
pub struct Scene<'a> {
    pub doc: &'a ReviewDoc,
    pub overlay: &'a OptimisticOverlayStore,
    pub mapper: &'a CoordinateMapper,
    pub selection: &'a SelectionModel,
    pub frame: Option<u32>,
    /// Handle and body slop in CSS pixels.
    pub handle_radius_px: f64,
    /// Comment pin radius in CSS pixels.
    pub comment_radius_px: f64,
}

impl Scene<'_> {
    /// The annotation that currently shows resize handles: exactly one
    /// selected, visible on this frame, and carrying explicit bounds.
    #[must_use]
    pub fn resizable(&self) -> Option<&Annotation> {
        let id = self.selection.annotations.only()?;
        self.doc
            .annotation(id)
            .filter(|a| a.has_bounds() && a.is_visible && a.is_on_frame(self.frame))
    }
}

/// Test what lies under `pt` (CSS pixels).
///
/// Priority: resize handles of the single selected annotation, then comment
/// pins, then annotation bodies. Within a layer the topmost (last in
/// snapshot order) wins.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene<'_>) -> Option<Hit> {
    hit_handles(pt, scene)
        .or_else(|| hit_comments(pt, scene))
        .or_else(|| hit_annotations(pt, scene))
}

fn hit_handles(pt: Point, scene: &Scene<'_>) -> Option<Hit> {
    let annotation = scene.resizable()?;
    let extent = scene.mapper.rect_to_css(scene.overlay.annotation_extent(annotation));
    ResizeAnchor::ALL
        .into_iter()
        .find(|anchor| anchor.corner().handle_point(extent).distance_to(pt) <= scene.handle_radius_px)
        .map(|anchor| Hit {
            collection: Collection::Annotations,
            id: annotation.id.clone(),
            part: HitPart::ResizeHandle(anchor),
        })
}

fn hit_comments(pt: Point, scene: &Scene<'_>) -> Option<Hit> {
    scene
        .doc
        .visible_comments(scene.frame)
        .rev()
        .find(|c| {
            let anchor = scene.mapper.normalized_to_css(scene.overlay.comment_position(c));
            anchor.distance_to(pt) <= scene.comment_radius_px
        })
        .map(|c| Hit { collection: Collection::Comments, id: c.id.clone(), part: HitPart::Body })
}

fn hit_annotations(pt: Point, scene: &Scene<'_>) -> Option<Hit> {
    scene
        .doc
        .visible_annotations(scene.frame)
        .rev()
        .find(|a| {
            scene
                .mapper
                .rect_to_css(scene.overlay.annotation_extent(a))
                .inflate(scene.handle_radius_px)
                .contains(pt)
        })
        .map(|a| Hit { collection: Collection::Annotations, id: a.id.clone(), part: HitPart::Body })
}
