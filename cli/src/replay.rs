//! Session replay.
//!
//! Feeds a [`Script`] through an [`EngineCore`] in real time. Three sources
//! wake the loop: the next script event, the engine's next timer deadline
//! (debounced resize, overlay expiry), and backend completions. The run
//! ends once the script is exhausted, nothing is in flight, and no timer is
//! pending.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use review::engine::{Action, EngineCore};

use crate::backend::{Completion, SimulatedBackend};
use crate::config::ReviewConfig;
use crate::error::CliError;
use crate::script::Script;

/// Totals printed after a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub events: usize,
    pub actions: usize,
    pub persisted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub retries: usize,
    /// Overrides still live at exit. Always zero unless a timer was lost.
    pub overrides_left: usize,
    pub annotations: usize,
    pub comments: usize,
    pub elapsed_ms: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Line<'a> {
    at_ms: f64,
    #[serde(flatten)]
    action: &'a Action,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a Summary,
}

struct Session<'w, W> {
    engine: EngineCore,
    backend: SimulatedBackend,
    out: &'w mut W,
    in_flight: usize,
    summary: Summary,
}

impl<W: Write> Session<'_, W> {
    fn emit(&mut self, actions: Vec<Action>, now_ms: f64) -> Result<(), CliError> {
        for action in actions {
            self.summary.actions += 1;
            serde_json::to_writer(&mut *self.out, &Line { at_ms: now_ms, action: &action })?;
            writeln!(self.out)?;
            if let Action::Persist { ticket, mutation } = &action {
                debug!(ticket = ticket.0, mutation = mutation.name(), "dispatching mutation");
                mutation.dispatch(*ticket, &mut self.backend);
                self.in_flight += 1;
                self.summary.persisted += 1;
            }
        }
        Ok(())
    }

    fn settle(&mut self, done: Completion, now_ms: f64) -> Result<(), CliError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.summary.retries += done.attempts.saturating_sub(1);
        match &done.result {
            Ok(()) => self.summary.succeeded += 1,
            Err(e) => {
                warn!(ticket = done.ticket.0, mutation = done.mutation, error = %e, "mutation failed");
                self.summary.failed += 1;
            }
        }
        self.engine.persistence_settled(done.ticket, done.result, now_ms);
        if let Some(records) = done.snapshot {
            let actions = self.engine.load_snapshot(records.annotations, records.comments);
            self.emit(actions, now_ms)?;
        }
        Ok(())
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Replay `script`, writing one JSON line per engine action to `out`.
///
/// # Errors
///
/// Returns [`CliError::Write`] or [`CliError::Json`] if output fails.
pub async fn run<W: Write>(script: Script, config: ReviewConfig, out: &mut W) -> Result<Summary, CliError> {
    let records = crate::backend::Records {
        annotations: script.annotations.clone(),
        comments: script.comments.clone(),
    };
    let (backend, mut completions) = SimulatedBackend::new(config.backend, records);
    let mut session = Session { engine: EngineCore::with_config(config.engine), backend, out, in_flight: 0, summary: Summary::default() };

    let start = Instant::now();
    let setup = session.engine.load_snapshot(script.annotations, script.comments);
    session.emit(setup, 0.0)?;
    let setup = session.engine.set_container(script.container.width, script.container.height);
    session.emit(setup, 0.0)?;
    if script.frame.is_some() {
        let setup = session.engine.set_frame(script.frame, 0.0);
        session.emit(setup, 0.0)?;
    }

    info!(events = script.events.len(), "replay started");
    let mut events = script.events.into_iter().peekable();
    loop {
        let next_event = events.peek().map(|e| e.at_ms);
        let wake = [next_event, session.engine.next_deadline()].into_iter().flatten().min_by(f64::total_cmp);
        if wake.is_none() && session.in_flight == 0 {
            break;
        }

        let sleep = async {
            match wake {
                Some(at) => tokio::time::sleep_until(start + Duration::from_secs_f64(at.max(0.0) / 1000.0)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            Some(done) = completions.recv() => {
                let now = elapsed_ms(start);
                session.settle(done, now)?;
            }
            () = sleep => {
                // Never let rounding leave `now` short of the deadline we slept for.
                let now = elapsed_ms(start).max(wake.unwrap_or_default());
                while let Some(timed) = events.next_if(|e| e.at_ms <= now) {
                    session.summary.events += 1;
                    let actions = timed.event.apply(&mut session.engine, now);
                    session.emit(actions, now)?;
                }
                let actions = session.engine.tick(now);
                session.emit(actions, now)?;
            }
        }
    }

    let records = session.backend.records().await;
    let mut summary = session.summary;
    summary.overrides_left = session.engine.overlay().len();
    summary.annotations = records.annotations.len();
    summary.comments = records.comments.len();
    summary.elapsed_ms = elapsed_ms(start);
    info!(
        persisted = summary.persisted,
        succeeded = summary.succeeded,
        failed = summary.failed,
        elapsed_ms = summary.elapsed_ms,
        "replay finished"
    );

    serde_json::to_writer(&mut *session.out, &SummaryLine { summary: &summary })?;
    writeln!(session.out)?;
    Ok(summary)
}
