//! Boundary to the backend mutation layer.
//!
//! The engine never calls the backend itself. It emits [`Mutation`]s tagged
//! with a [`Ticket`]; the host forwards them to whatever implements
//! [`PersistenceBridge`] and later reports the outcome through
//! `EngineCore::persistence_settled`. The outcome is only used to decide when
//! optimistic overrides may be dropped.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use serde::{Deserialize, Serialize};

use crate::coords::Rect;
use crate::doc::{Collection, ItemId};

/// Correlates an emitted mutation with its completion. Monotonic per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

/// A write the backend should perform. All geometry is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// Shift every listed annotation (position, bounds, points) by `(dx, dy)`.
    MoveAnnotations { ids: Vec<ItemId>, dx: f64, dy: f64 },
    /// Shift every listed comment anchor by `(dx, dy)`.
    MoveComments { ids: Vec<ItemId>, dx: f64, dy: f64 },
    /// Replace an annotation's bounds.
    ResizeAnnotation { id: ItemId, bounds: Rect },
    /// Delete records.
    Delete { collection: Collection, ids: Vec<ItemId> },
    /// Show or hide annotations.
    SetVisibility { ids: Vec<ItemId>, visible: bool },
}

impl Mutation {
    /// Records whose optimistic overrides wait on this mutation.
    #[must_use]
    pub fn overlay_keys(&self) -> Vec<(Collection, ItemId)> {
        match self {
            Self::MoveAnnotations { ids, .. } => ids.iter().map(|id| (Collection::Annotations, id.clone())).collect(),
            Self::MoveComments { ids, .. } => ids.iter().map(|id| (Collection::Comments, id.clone())).collect(),
            Self::ResizeAnnotation { id, .. } => vec![(Collection::Annotations, id.clone())],
            Self::Delete { .. } | Self::SetVisibility { .. } => Vec::new(),
        }
    }

    /// Whether applying the mutation twice equals applying it once.
    ///
    /// Moves are relative and therefore never safe to replay.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::MoveAnnotations { .. } | Self::MoveComments { .. })
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveAnnotations { .. } => "move_annotations",
            Self::MoveComments { .. } => "move_comments",
            Self::ResizeAnnotation { .. } => "resize_annotation",
            Self::Delete { .. } => "delete",
            Self::SetVisibility { .. } => "set_visibility",
        }
    }

    /// Route this mutation to the matching bridge operation.
    pub fn dispatch<B>(&self, ticket: Ticket, bridge: &mut B)
    where
        B: PersistenceBridge + ?Sized,
    {
        match self {
            Self::MoveAnnotations { ids, dx, dy } => bridge.annotations_moved(ticket, ids, *dx, *dy),
            Self::MoveComments { ids, dx, dy } => bridge.comments_moved(ticket, ids, *dx, *dy),
            Self::ResizeAnnotation { id, bounds } => bridge.annotation_resized(ticket, id, *bounds),
            Self::Delete { collection, ids } => bridge.deleted(ticket, *collection, ids),
            Self::SetVisibility { ids, visible } => bridge.visibility_changed(ticket, ids, *visible),
        }
    }
}

/// Why a mutation did not land.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistError {
    /// The backend refused the write (validation, authorization, stale record).
    #[error("mutation rejected: {0}")]
    Rejected(String),
    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    /// No answer within the host's deadline.
    #[error("mutation timed out after {0} ms")]
    Timeout(u64),
}

/// Fire-and-forget write operations the engine relies on.
///
/// Implementations must not block; completion is reported back to the
/// engine with the same ticket.
pub trait PersistenceBridge {
    fn annotations_moved(&mut self, ticket: Ticket, ids: &[ItemId], dx: f64, dy: f64);
    fn comments_moved(&mut self, ticket: Ticket, ids: &[ItemId], dx: f64, dy: f64);
    fn annotation_resized(&mut self, ticket: Ticket, id: &str, bounds: Rect);
    fn deleted(&mut self, ticket: Ticket, collection: Collection, ids: &[ItemId]);
    fn visibility_changed(&mut self, ticket: Ticket, ids: &[ItemId], visible: bool);
}
