//! Playback synchronization between the master and slave videos.
//!
//! While playing, each animation frame reads the master's time, hard-seeks
//! the slave if it drifted past the playback tolerance, and reports the
//! master's frame upward. Only the slave is ever corrected so the master
//! never stutters.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::FrameClock;
use crate::consts::PLAYBACK_DRIFT_SECS;

/// One of the two videos of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Primary,
    Comparison,
}

impl Side {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Comparison,
            Self::Comparison => Self::Primary,
        }
    }
}

/// A decoder the compositor drives. Implemented for `HtmlVideoElement` in
/// the browser and by fakes in tests.
pub trait VideoSource {
    /// Start loading a new source URL.
    fn load(&mut self, url: &str);
    /// Current media time in seconds.
    fn current_time(&self) -> f64;
    fn seek(&mut self, time: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
}

/// Borrow a pair as `(master, slave)`.
pub fn master_slave<'a, V>(primary: &'a mut V, comparison: &'a mut V, master: Side) -> (&'a mut V, &'a mut V) {
    match master {
        Side::Primary => (primary, comparison),
        Side::Comparison => (comparison, primary),
    }
}

/// Outcome of one playback step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTick {
    pub frame: u32,
    pub time: f64,
    /// Whether the slave was re-seeked this step.
    pub corrected: bool,
}

/// Playback gate and drift correction for one pair.
#[derive(Debug, Clone)]
pub struct SyncScheduler {
    playing: bool,
    synced: bool,
    master: Side,
    drift_secs: f64,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new(PLAYBACK_DRIFT_SECS)
    }
}

impl SyncScheduler {
    #[must_use]
    pub fn new(drift_secs: f64) -> Self {
        Self { playing: false, synced: true, master: Side::Primary, drift_secs }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    #[must_use]
    pub fn master(&self) -> Side {
        self.master
    }

    #[must_use]
    pub fn slave(&self) -> Side {
        self.master.other()
    }

    pub fn set_master(&mut self, master: Side) {
        self.master = master;
    }

    /// Whether the animation-frame loop should keep running.
    #[must_use]
    pub fn should_run(&self, ready: bool) -> bool {
        self.playing && ready
    }

    /// One animation frame of synchronized playback.
    pub fn step<V>(&self, primary: &mut V, comparison: &mut V, clock: &FrameClock) -> SyncTick
    where
        V: VideoSource,
    {
        let (master, slave) = master_slave(primary, comparison, self.master);
        let time = master.current_time();
        let mut corrected = false;
        if self.synced && (slave.current_time() - time).abs() > self.drift_secs {
            debug!(master = ?self.master, time, drift = slave.current_time() - time, "slave resynced");
            slave.seek(time);
            corrected = true;
        }
        SyncTick { frame: clock.frame_at(time), time, corrected }
    }

    /// Bring the slave within one frame of the master, e.g. right after
    /// pausing. Returns true if a seek was issued.
    pub fn align<V>(&self, primary: &mut V, comparison: &mut V, clock: &FrameClock) -> bool
    where
        V: VideoSource,
    {
        if !self.synced {
            return false;
        }
        let (master, slave) = master_slave(primary, comparison, self.master);
        let time = master.current_time();
        if !clock.needs_seek(slave.current_time(), time) {
            return false;
        }
        slave.seek(time);
        true
    }
}
