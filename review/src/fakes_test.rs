//! Test doubles for the compositor's browser seams.

use crate::coords::{Rect, Size};
use crate::render::{FrameSink, RenderError};
use crate::sync::{Side, VideoSource};

/// A decoder whose clock only moves when told to.
#[derive(Debug, Default, Clone)]
pub struct FakeVideo {
    pub time: f64,
    pub playing: bool,
    pub muted: bool,
    pub loads: Vec<String>,
    pub seeks: Vec<f64>,
}

impl FakeVideo {
    pub fn at(time: f64) -> Self {
        Self { time, ..Default::default() }
    }
}

impl VideoSource for FakeVideo {
    fn load(&mut self, url: &str) {
        self.loads.push(url.to_owned());
        self.time = 0.0;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn seek(&mut self, time: f64) {
        self.seeks.push(time);
        self.time = time;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub target: Side,
    pub time: f64,
    pub dest: Rect,
    pub alpha: f64,
}

/// A sink that records what would have been drawn.
#[derive(Debug, Default)]
pub struct FakeSink {
    pub sizes: Vec<(Side, Size)>,
    pub clears: Vec<Side>,
    pub draws: Vec<Draw>,
    pub fail_draws: bool,
}

impl FrameSink<FakeVideo> for FakeSink {
    fn configure(&mut self, target: Side, size: Size) -> Result<(), RenderError> {
        self.sizes.push((target, size));
        Ok(())
    }

    fn clear(&mut self, target: Side) -> Result<(), RenderError> {
        self.clears.push(target);
        Ok(())
    }

    fn draw(&mut self, target: Side, video: &FakeVideo, dest: Rect, alpha: f64) -> Result<(), RenderError> {
        if self.fail_draws {
            return Err(RenderError::Draw { target, reason: "fake failure".into() });
        }
        self.draws.push(Draw { target, time: video.time, dest, alpha });
        Ok(())
    }
}
