//! Recorded session scripts.
//!
//! A script is one JSON document: the container size, the records the
//! session starts with, and a time-ordered list of input events. Pointer
//! coordinates are container-relative CSS pixels, exactly as the browser
//! host would pass them.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use serde::Deserialize;

use review::coords::Point;
use review::doc::{Annotation, AnnotationKind, Collection, Comment, ItemId};
use review::engine::{Action, EngineCore};
use review::input::{Button, CanvasMode, Key, Modifiers};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub container: Container,
    #[serde(default)]
    pub frame: Option<u32>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

impl Script {
    /// Parse and check event ordering.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Json`] for malformed JSON and [`CliError::Script`]
    /// when timestamps are negative or out of order.
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        let script: Self = serde_json::from_str(json)?;
        let mut last = 0.0;
        for (index, event) in script.events.iter().enumerate() {
            if !event.at_ms.is_finite() || event.at_ms < last {
                return Err(CliError::Script(format!(
                    "event {index} at {}ms is out of order (previous {last}ms)",
                    event.at_ms
                )));
            }
            last = event.at_ms;
        }
        Ok(script)
    }

    /// Timestamp of the last event.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.at_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl From<ScriptButton> for Button {
    fn from(button: ScriptButton) -> Self {
        match button {
            ScriptButton::Primary => Button::Primary,
            ScriptButton::Middle => Button::Middle,
            ScriptButton::Secondary => Button::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScriptMode {
    Select,
    Annotate { kind: AnnotationKind },
    Comment,
}

impl From<ScriptMode> for CanvasMode {
    fn from(mode: ScriptMode) -> Self {
        match mode {
            ScriptMode::Select => CanvasMode::Select,
            ScriptMode::Annotate { kind } => CanvasMode::Annotate(kind),
            ScriptMode::Comment => CanvasMode::Comment,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
        #[serde(default)]
        shift: bool,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        shift: bool,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
        #[serde(default)]
        shift: bool,
    },
    PointerCancel,
    Key {
        key: String,
    },
    Frame {
        frame: Option<u32>,
    },
    Mode(ScriptMode),
    Container {
        width: f64,
        height: f64,
    },
    Select {
        collection: Collection,
        ids: Vec<ItemId>,
    },
    DeleteSelected,
}

fn shift(shift: bool) -> Modifiers {
    Modifiers { shift, ..Modifiers::default() }
}

impl ScriptEvent {
    /// Feed this event to the engine.
    pub fn apply(&self, engine: &mut EngineCore, now_ms: f64) -> Vec<Action> {
        match self {
            Self::PointerDown { x, y, button, shift: s } => {
                engine.on_pointer_down(Point::new(*x, *y), (*button).into(), shift(*s), now_ms)
            }
            Self::PointerMove { x, y, shift: s } => engine.on_pointer_move(Point::new(*x, *y), shift(*s), now_ms),
            Self::PointerUp { x, y, button, shift: s } => {
                engine.on_pointer_up(Point::new(*x, *y), (*button).into(), shift(*s), now_ms)
            }
            Self::PointerCancel => engine.on_pointer_cancel(now_ms),
            Self::Key { key } => engine.on_key_down(&Key(key.clone()), Modifiers::default(), now_ms),
            Self::Frame { frame } => engine.set_frame(*frame, now_ms),
            Self::Mode(mode) => engine.set_mode((*mode).into(), now_ms),
            Self::Container { width, height } => engine.set_container(*width, *height),
            Self::Select { collection, ids } => engine.select(*collection, ids.clone()),
            Self::DeleteSelected => engine.delete_selected(now_ms),
        }
    }
}
