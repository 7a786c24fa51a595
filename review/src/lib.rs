//! Review canvas: annotation interaction and dual-video comparison.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to a
//! video player. It has two halves that share coordinate and scheduling
//! primitives:
//!
//! - The annotation engine turns pointer and keyboard input over the review
//!   canvas into selection changes, optimistic overrides, and persistence
//!   requests. The host only wires DOM events in and carries the resulting
//!   [`engine::Action`]s to the backend.
//! - The compositor keeps a primary and a comparison video frame-synchronized
//!   and draws them side by side or overlaid.
//!
//! Both are synchronous state machines with explicit time (`now_ms`) so they
//! can be driven from tests and from the replay tool without a browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Annotation engine, [`engine::EngineCore`] |
//! | [`doc`] | Annotation and comment records |
//! | [`coords`] | Points, rects, and normalized ↔ pixel mapping |
//! | [`selection`] | Ordered selection sets |
//! | [`input`] | Input event types, resize corners, the gesture state machine |
//! | [`drag`] | Translate/resize gesture bookkeeping |
//! | [`resize`] | Resize geometry: pinned edges, aspect lock, size floor |
//! | [`hit`] | Hit-testing handles, pins, and shapes |
//! | [`overlay`] | Optimistic overrides with settle grace |
//! | [`bridge`] | Persistence mutations and the backend seam |
//! | [`schedule`] | Cancel-and-replace debounce timers |
//! | [`compositor`] | Dual-video compositor |
//! | [`loader`] | Per-side load state |
//! | [`clock`] | Frame ↔ time conversion and paused seeks |
//! | [`sync`] | Master/slave playback sync |
//! | [`layout`] | Split and overlay canvas layout |
//! | [`render`] | Frame drawing through [`render::FrameSink`] |
//! | [`web`] | DOM bindings for `<video>`, `<canvas>`, and containers |
//! | [`config`] | Tunables loaded from JSON |
//! | [`consts`] | Shared numeric constants |

pub mod bridge;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod consts;
pub mod coords;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod loader;
pub mod overlay;
pub mod render;
pub mod resize;
pub mod schedule;
pub mod selection;
pub mod sync;
pub mod web;

#[cfg(test)]
#[path = "fakes_test.rs"]
pub(crate) mod fakes;
