use serde::Serialize;
use tracing::{debug, warn};

use crate::bridge::{Mutation, PersistError, Ticket};
use crate::config::EngineConfig;
use crate::consts::MOVE_EPSILON;
use crate::coords::{CoordinateMapper, Point, Rect, Size};
use crate::doc::{Annotation, Collection, Comment, ItemId, ReviewDoc};
use crate::drag::{DragController, Room};
use crate::hit::{Hit, HitPart, Scene, hit_test};
use crate::input::{Button, CanvasMode, Corner, Gesture, Key, Modifiers};
use crate::overlay::{OptimisticOverlayStore, OverlaySnapshot};
use crate::resize::ResizeSolver;
use crate::schedule::Coalescer;
use crate::selection::SelectionModel;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const DEFAULT_CURSOR: &str = "default";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum Action {
    AnnotationSelectionChanged { ids: Vec<ItemId> },
    CommentSelectionChanged { ids: Vec<ItemId> },
    /// The live overrides changed; the host re-renders selection boxes from these.
    OptimisticStateChanged(OverlaySnapshot),
    /// Forward to the persistence bridge and report back with the same ticket.
    Persist { ticket: Ticket, mutation: Mutation },
    SetCursor(String),
    RenderNeeded,
}

/// One annotation review session: selection, gestures, optimistic overlay.
///
/// Holds no browser handles so it can be driven natively in tests and by
/// the replay harness.
pub struct EngineCore {
    pub doc: ReviewDoc,
    pub selection: SelectionModel,
    pub mapper: CoordinateMapper,
    drag: DragController,
    overlay: OptimisticOverlayStore,
    resize_debounce: Coalescer<ItemId, Rect>,
    solver: ResizeSolver,
    config: EngineConfig,
    mode: CanvasMode,
    frame: Option<u32>,
    /// Container measurement that arrived mid-gesture; applied once idle.
    deferred_container: Option<Size>,
    cursor: String,
    next_ticket: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            doc: ReviewDoc::new(),
            selection: SelectionModel::new(),
            mapper: CoordinateMapper::new(),
            drag: DragController::new(),
            overlay: OptimisticOverlayStore::new(),
            resize_debounce: Coalescer::new(config.resize_debounce_ms),
            solver: ResizeSolver::new(config.min_resize_px),
            config,
            mode: CanvasMode::default(),
            frame: None,
            deferred_container: None,
            cursor: DEFAULT_CURSOR.to_owned(),
            next_ticket: 0,
        }
    }

    // --- Data inputs ---

    /// Replace the records with a fresh snapshot, dropping selected ids and
    /// overrides whose records no longer exist.
    pub fn load_snapshot(&mut self, annotations: Vec<Annotation>, comments: Vec<Comment>) -> Vec<Action> {
        self.doc.load_snapshot(annotations, comments);
        let mut actions = Vec::new();
        let doc = &self.doc;
        for collection in [Collection::Annotations, Collection::Comments] {
            if self.selection.set_mut(collection).retain(|id| doc.contains(collection, id)) {
                actions.push(self.selection_action(collection));
            }
        }
        if self.overlay.retain(|collection, id| doc.contains(collection, id)) {
            debug!(left = self.overlay.len(), "dropped overrides of vanished records");
            actions.push(Action::OptimisticStateChanged(self.overlay.snapshot()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Record a new container measurement. A measurement that arrives during
    /// a gesture is held until the gesture ends so pixel-space gesture state
    /// stays consistent.
    pub fn set_container(&mut self, width: f64, height: f64) -> Vec<Action> {
        if !self.drag.is_idle() {
            self.deferred_container = Some(Size::new(width, height));
            return Vec::new();
        }
        self.mapper.set_container(width, height);
        vec![Action::RenderNeeded]
    }

    /// Switch canvas mode. Commits any active gesture and clears both selections.
    pub fn set_mode(&mut self, mode: CanvasMode, now_ms: f64) -> Vec<Action> {
        if self.mode == mode {
            return Vec::new();
        }
        debug!(?mode, "canvas mode changed");
        let mut actions = self.end_gesture(now_ms);
        self.mode = mode;
        actions.extend(self.clear_selection());
        actions
    }

    /// Switch to another video frame (`None` for still images). Commits any
    /// active gesture and clears both selections.
    pub fn set_frame(&mut self, frame: Option<u32>, now_ms: f64) -> Vec<Action> {
        if self.frame == frame {
            return Vec::new();
        }
        let mut actions = self.end_gesture(now_ms);
        self.frame = frame;
        actions.extend(self.clear_selection());
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Selection ---

    pub fn select_annotations(&mut self, ids: Vec<ItemId>) -> Vec<Action> {
        self.select(Collection::Annotations, ids)
    }

    pub fn select_comments(&mut self, ids: Vec<ItemId>) -> Vec<Action> {
        self.select(Collection::Comments, ids)
    }

    /// Replace the selection of one collection.
    pub fn select(&mut self, collection: Collection, ids: Vec<ItemId>) -> Vec<Action> {
        if self.selection.set_mut(collection).select(ids) {
            vec![self.selection_action(collection), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Add or remove one id (shift-click).
    pub fn toggle(&mut self, collection: Collection, id: &str) -> Vec<Action> {
        self.selection.set_mut(collection).toggle(id);
        vec![self.selection_action(collection), Action::RenderNeeded]
    }

    /// Clear both selections.
    pub fn clear_selection(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for collection in [Collection::Annotations, Collection::Comments] {
            if self.selection.set_mut(collection).clear() {
                actions.push(self.selection_action(collection));
            }
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        if button != Button::Primary || !self.mode.is_select() || self.mapper.container().is_none() {
            return Vec::new();
        }
        if !self.drag.is_idle() {
            // A second primary press without a release; close the first gesture.
            return self.end_gesture(now_ms);
        }

        let Some(hit) = hit_test(pt, &self.scene()) else {
            return if modifiers.shift { Vec::new() } else { self.clear_selection() };
        };

        match hit.part {
            HitPart::ResizeHandle(anchor) => self.begin_resize(&hit, anchor.corner(), pt),
            HitPart::Body => self.press_body(&hit, pt, modifiers),
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point, modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        match self.drag.gesture() {
            Gesture::Idle => self.hover(pt),
            Gesture::Translating { .. } => self.translate_to(pt),
            Gesture::Resizing { .. } => self.resize_to(pt, modifiers, now_ms),
        }
    }

    /// Release: apply the final pointer position, then commit.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button, modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        if button != Button::Primary || self.drag.is_idle() {
            return Vec::new();
        }
        let mut actions = self.on_pointer_move(pt, modifiers, now_ms);
        actions.extend(self.end_gesture(now_ms));
        actions
    }

    /// Pointer left the surface or the window lost focus. Commits what the
    /// user already sees, like a release.
    pub fn on_pointer_cancel(&mut self, now_ms: f64) -> Vec<Action> {
        self.end_gesture(now_ms)
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        if key.0 != "Escape" {
            return Vec::new();
        }
        if self.drag.is_idle() {
            self.clear_selection()
        } else {
            self.cancel_gesture(now_ms)
        }
    }

    // --- Commands ---

    /// Delete everything selected: one mutation per non-empty collection.
    pub fn delete_selected(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = self.end_gesture(now_ms);
        for collection in [Collection::Annotations, Collection::Comments] {
            let ids = self.selection.set(collection).to_vec();
            if ids.is_empty() {
                continue;
            }
            for id in &ids {
                self.overlay.discard(collection, id);
                if collection == Collection::Annotations {
                    self.resize_debounce.cancel(id);
                }
            }
            self.selection.set_mut(collection).clear();
            actions.push(self.selection_action(collection));
            actions.push(self.persist(Mutation::Delete { collection, ids }));
        }
        if !actions.is_empty() {
            actions.push(Action::OptimisticStateChanged(self.overlay.snapshot()));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pass a visibility toggle through to the backend.
    pub fn set_visibility(&mut self, ids: Vec<ItemId>, visible: bool) -> Vec<Action> {
        if ids.is_empty() {
            return Vec::new();
        }
        vec![self.persist(Mutation::SetVisibility { ids, visible })]
    }

    // --- Timers and completions ---

    /// Fire due debounced resizes and expire settled overrides.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .resize_debounce
            .take_due(now_ms)
            .into_iter()
            .map(|(id, bounds)| self.persist(Mutation::ResizeAnnotation { id, bounds }))
            .collect();
        if self.overlay.expire(now_ms) {
            actions.push(Action::OptimisticStateChanged(self.overlay.snapshot()));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// The host finished a `Persist` action. Failures are logged and absorbed;
    /// either way the override starts its grace period and the next snapshot
    /// decides what the user sees.
    pub fn persistence_settled(&mut self, ticket: Ticket, result: Result<(), PersistError>, now_ms: f64) {
        match result {
            Ok(()) => debug!(ticket = ticket.0, "mutation settled"),
            Err(e) => warn!(ticket = ticket.0, error = %e, "mutation failed; override will fall back to server state"),
        }
        self.overlay.settle(ticket, now_ms, self.config.settle_grace_ms);
    }

    /// Earliest time `tick` has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        match (self.resize_debounce.next_due(), self.overlay.next_expiry()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        self.drag.gesture()
    }

    #[must_use]
    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    #[must_use]
    pub fn frame(&self) -> Option<u32> {
        self.frame
    }

    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    #[must_use]
    pub fn overlay(&self) -> &OptimisticOverlayStore {
        &self.overlay
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalized extent to draw for annotation `id`, overrides applied.
    #[must_use]
    pub fn annotation_extent(&self, id: &str) -> Option<Rect> {
        self.doc.annotation(id).map(|a| self.overlay.annotation_extent(a))
    }

    /// Normalized anchor to draw for comment `id`, overrides applied.
    #[must_use]
    pub fn comment_position(&self, id: &str) -> Option<Point> {
        self.doc.comment(id).map(|c| self.overlay.comment_position(c))
    }

    // --- Internals ---

    fn scene(&self) -> Scene<'_> {
        Scene {
            doc: &self.doc,
            overlay: &self.overlay,
            mapper: &self.mapper,
            selection: &self.selection,
            frame: self.frame,
            handle_radius_px: self.config.handle_radius_px,
            comment_radius_px: self.config.comment_radius_px,
        }
    }

    fn selection_action(&self, collection: Collection) -> Action {
        let ids = self.selection.set(collection).to_vec();
        match collection {
            Collection::Annotations => Action::AnnotationSelectionChanged { ids },
            Collection::Comments => Action::CommentSelectionChanged { ids },
        }
    }

    fn persist(&mut self, mutation: Mutation) -> Action {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.overlay.register(ticket, &mutation.overlay_keys());
        debug!(ticket = ticket.0, kind = mutation.name(), "persist");
        Action::Persist { ticket, mutation }
    }

    fn set_cursor(&mut self, cursor: &str) -> Option<Action> {
        if self.cursor == cursor {
            return None;
        }
        cursor.clone_into(&mut self.cursor);
        Some(Action::SetCursor(self.cursor.clone()))
    }

    fn hover(&mut self, pt: Point) -> Vec<Action> {
        if !self.mode.is_select() || self.mapper.container().is_none() {
            return Vec::new();
        }
        let cursor = hit_test(pt, &self.scene()).map_or(DEFAULT_CURSOR, |hit| hit.cursor());
        self.set_cursor(cursor).into_iter().collect()
    }

    fn begin_resize(&mut self, hit: &Hit, corner: Corner, pt: Point) -> Vec<Action> {
        let Some(annotation) = self.doc.annotation(&hit.id) else {
            return Vec::new();
        };
        let initial = self.mapper.rect_to_css(self.overlay.annotation_extent(annotation));
        let start = self.mapper.clamp_css(pt);
        if !self.drag.begin_resize(hit.id.clone(), corner, initial, start) {
            return Vec::new();
        }
        debug!(id = %hit.id, ?corner, "resize started");
        self.overlay.begin(Collection::Annotations, &hit.id);
        self.set_cursor(hit.cursor()).into_iter().collect()
    }

    fn press_body(&mut self, hit: &Hit, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let collection = hit.collection;
        let mut actions = Vec::new();

        if modifiers.shift {
            actions.extend(self.toggle(collection, &hit.id));
            if !self.selection.is_selected(collection, &hit.id) {
                return actions;
            }
        } else if !self.selection.is_selected(collection, &hit.id) {
            actions.extend(self.select(collection, vec![hit.id.clone()]));
            let other = match collection {
                Collection::Annotations => Collection::Comments,
                Collection::Comments => Collection::Annotations,
            };
            if self.selection.set_mut(other).clear() {
                actions.push(self.selection_action(other));
            }
        }

        let ids = self.selection.set(collection).to_vec();
        if self.drag.begin_translate(collection, ids, self.mapper.clamp_css(pt)) {
            let ids = self.drag.gesture().participants();
            debug!(?collection, count = ids.len(), "translate started");
            for id in ids {
                self.overlay.begin(collection, id);
            }
        }
        actions
    }

    /// The pointer is clamped to the container and the step to the room left
    /// around the moving records, so a drag that leaves the surface cannot
    /// carry records out of media space.
    fn translate_to(&mut self, pt: Point) -> Vec<Action> {
        let pt = self.mapper.clamp_css(pt);
        let Some(collection) = self.drag.gesture().translate_collection() else {
            return Vec::new();
        };
        let room = Room::within_unit(
            self.drag
                .gesture()
                .participants()
                .iter()
                .filter_map(|id| self.overlay.position(collection, id).or_else(|| self.doc.position(collection, id))),
        );
        let Some((_, delta)) = self.drag.translate_step(pt, &self.mapper, room) else {
            return Vec::new();
        };
        if delta.x.abs() < MOVE_EPSILON && delta.y.abs() < MOVE_EPSILON {
            return Vec::new();
        }
        for id in self.drag.gesture().participants() {
            if let Some(authoritative) = self.doc.position(collection, id) {
                self.overlay.shift(collection, id, authoritative, delta);
            }
        }
        vec![Action::OptimisticStateChanged(self.overlay.snapshot()), Action::RenderNeeded]
    }

    fn resize_to(&mut self, pt: Point, modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        let Some(step) = self.drag.resize_step(self.mapper.clamp_css(pt)) else {
            return Vec::new();
        };
        let Some(css) = self.solver.solve(step.corner, step.initial_bounds, step.target, modifiers.shift) else {
            return Vec::new();
        };
        let bounds = self.mapper.rect_to_normalized(css);
        if self.overlay.bounds(&step.id) == Some(bounds) {
            return Vec::new();
        }
        self.overlay.set_bounds(&step.id, bounds);
        self.drag.mark_resized();
        self.resize_debounce.schedule(step.id, bounds, now_ms);
        vec![Action::OptimisticStateChanged(self.overlay.snapshot()), Action::RenderNeeded]
    }

    /// Commit the active gesture: emit its mutation and start the overrides'
    /// grace period. A gesture without net change drops its overrides at once.
    fn end_gesture(&mut self, now_ms: f64) -> Vec<Action> {
        let grace = self.config.settle_grace_ms;
        let mut actions = Vec::new();

        match self.drag.finish() {
            Gesture::Idle => return actions,
            Gesture::Translating { collection, ids, total, .. } => {
                let moved = total.x.abs() >= MOVE_EPSILON || total.y.abs() >= MOVE_EPSILON;
                let live: Vec<ItemId> = ids.iter().filter(|id| self.doc.contains(collection, id)).cloned().collect();
                if moved && !live.is_empty() {
                    let mutation = match collection {
                        Collection::Annotations => Mutation::MoveAnnotations { ids: live, dx: total.x, dy: total.y },
                        Collection::Comments => Mutation::MoveComments { ids: live, dx: total.x, dy: total.y },
                    };
                    actions.push(self.persist(mutation));
                }
                debug!(?collection, moved, "translate ended");
                for id in &ids {
                    self.overlay.end(collection, id, now_ms, if moved { grace } else { 0.0 });
                }
            }
            Gesture::Resizing { id, changed, .. } => {
                if let Some(bounds) = self.resize_debounce.flush(&id) {
                    actions.push(self.persist(Mutation::ResizeAnnotation { id: id.clone(), bounds }));
                }
                debug!(%id, changed, "resize ended");
                self.overlay.end(Collection::Annotations, &id, now_ms, if changed { grace } else { 0.0 });
            }
        }

        self.overlay.expire(now_ms);
        if let Some(size) = self.deferred_container.take() {
            self.mapper.set_container(size.width, size.height);
        }
        actions.push(Action::OptimisticStateChanged(self.overlay.snapshot()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abandon the active gesture: pending debounced writes are dropped and
    /// live overrides removed, so the authoritative records show again.
    fn cancel_gesture(&mut self, now_ms: f64) -> Vec<Action> {
        match self.drag.finish() {
            Gesture::Idle => return Vec::new(),
            Gesture::Translating { collection, ids, .. } => {
                for id in &ids {
                    self.overlay.end(collection, id, now_ms, 0.0);
                }
            }
            Gesture::Resizing { id, .. } => {
                self.resize_debounce.cancel(&id);
                self.overlay.end(Collection::Annotations, &id, now_ms, 0.0);
            }
        }
        debug!("gesture cancelled");
        self.overlay.expire(now_ms);
        if let Some(size) = self.deferred_container.take() {
            self.mapper.set_container(size.width, size.height);
        }
        vec![Action::OptimisticStateChanged(self.overlay.snapshot()), Action::RenderNeeded]
    }
}
