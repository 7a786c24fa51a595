//! Simulated asynchronous backend.
//!
//! Each mutation resolves on its own tokio task after the configured
//! latency. Successful writes are applied to a shared record store so the
//! replay can feed the engine a fresh authoritative snapshot, the way the
//! reactive data layer would. Completions come back over an unbounded
//! channel tagged with the engine's ticket.
//!
//! RETRIES
//! =======
//! Only resizes are retried: they carry absolute bounds, so replaying one
//! cannot double-apply. Moves are relative and fail on the first error.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use review::bridge::{Mutation, PersistError, PersistenceBridge, Ticket};
use review::coords::Rect;
use review::doc::{Annotation, Collection, Comment, ItemId};

use crate::config::BackendConfig;

/// Authoritative records held by the backend.
#[derive(Debug, Clone, Default)]
pub struct Records {
    pub annotations: Vec<Annotation>,
    pub comments: Vec<Comment>,
}

impl Records {
    /// Apply a successful write.
    pub fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::MoveAnnotations { ids, dx, dy } => {
                for annotation in self.annotations.iter_mut().filter(|a| ids.contains(&a.id)) {
                    annotation.position = annotation.position.offset(*dx, *dy);
                    let data = &mut annotation.drawing_data;
                    data.bounds = data.bounds.map(|b| b.translate(*dx, *dy));
                    for point in &mut data.points {
                        *point = point.offset(*dx, *dy);
                    }
                }
            }
            Mutation::MoveComments { ids, dx, dy } => {
                for comment in self.comments.iter_mut().filter(|c| ids.contains(&c.id)) {
                    comment.position = comment.position.offset(*dx, *dy);
                }
            }
            Mutation::ResizeAnnotation { id, bounds } => {
                if let Some(annotation) = self.annotations.iter_mut().find(|a| &a.id == id) {
                    annotation.position = bounds.origin();
                    annotation.drawing_data.bounds = Some(*bounds);
                }
            }
            Mutation::Delete { collection: Collection::Annotations, ids } => {
                self.annotations.retain(|a| !ids.contains(&a.id));
            }
            Mutation::Delete { collection: Collection::Comments, ids } => {
                self.comments.retain(|c| !ids.contains(&c.id));
            }
            Mutation::SetVisibility { ids, visible } => {
                for annotation in self.annotations.iter_mut().filter(|a| ids.contains(&a.id)) {
                    annotation.is_visible = *visible;
                }
            }
        }
    }
}

/// Outcome of one mutation, after any retries.
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: Ticket,
    pub mutation: &'static str,
    pub attempts: usize,
    pub result: Result<(), PersistError>,
    /// Records after the write, present only on success.
    pub snapshot: Option<Records>,
}

/// A [`PersistenceBridge`] that resolves writes on background tasks.
pub struct SimulatedBackend {
    config: BackendConfig,
    records: Arc<Mutex<Records>>,
    attempts: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<Completion>,
}

impl SimulatedBackend {
    pub fn new(config: BackendConfig, records: Records) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Self {
            config,
            records: Arc::new(Mutex::new(records)),
            attempts: Arc::new(AtomicU64::new(0)),
            tx,
        };
        (backend, rx)
    }

    /// Current authoritative records.
    pub async fn records(&self) -> Records {
        self.records.lock().await.clone()
    }

    fn submit(&self, ticket: Ticket, mutation: Mutation) {
        let config = self.config;
        let allowed = if matches!(mutation, Mutation::ResizeAnnotation { .. }) {
            1 + config.resize_retries
        } else {
            1
        };
        let records = Arc::clone(&self.records);
        let counter = Arc::clone(&self.attempts);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut attempt = 1;
            let result = loop {
                tokio::time::sleep(Duration::from_millis(config.latency_ms)).await;
                let seq = counter.fetch_add(1, Ordering::Relaxed) + 1;
                if config.fail_every == 0 || seq % config.fail_every != 0 {
                    break Ok(());
                }
                let error = PersistError::Rejected(format!("simulated failure on attempt #{seq}"));
                if attempt < allowed {
                    warn!(ticket = ticket.0, mutation = mutation.name(), attempt, total = allowed, error = %error, "mutation failed; retrying");
                    tokio::time::sleep(Duration::from_millis((attempt as u64) * config.retry_base_ms)).await;
                    attempt += 1;
                } else {
                    break Err(error);
                }
            };

            let snapshot = if result.is_ok() {
                let mut records = records.lock().await;
                records.apply(&mutation);
                Some(records.clone())
            } else {
                None
            };
            let completion = Completion { ticket, mutation: mutation.name(), attempts: attempt, result, snapshot };
            if tx.send(completion).is_err() {
                debug!(ticket = ticket.0, "completion receiver closed");
            }
        });
    }
}

impl PersistenceBridge for SimulatedBackend {
    fn annotations_moved(&mut self, ticket: Ticket, ids: &[ItemId], dx: f64, dy: f64) {
        self.submit(ticket, Mutation::MoveAnnotations { ids: ids.to_vec(), dx, dy });
    }

    fn comments_moved(&mut self, ticket: Ticket, ids: &[ItemId], dx: f64, dy: f64) {
        self.submit(ticket, Mutation::MoveComments { ids: ids.to_vec(), dx, dy });
    }

    fn annotation_resized(&mut self, ticket: Ticket, id: &str, bounds: Rect) {
        self.submit(ticket, Mutation::ResizeAnnotation { id: id.to_owned(), bounds });
    }

    fn deleted(&mut self, ticket: Ticket, collection: Collection, ids: &[ItemId]) {
        self.submit(ticket, Mutation::Delete { collection, ids: ids.to_vec() });
    }

    fn visibility_changed(&mut self, ticket: Ticket, ids: &[ItemId], visible: bool) {
        self.submit(ticket, Mutation::SetVisibility { ids: ids.to_vec(), visible });
    }
}
