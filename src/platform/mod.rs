//! Platform abstraction layer
//!
//! The engine only talks to the outside world through these traits:
//! - `RenderSurface`: per-slot transforms and visible instance counts
//! - `Viewport`: current window size
//! - `ScoreSink`: score deltas and the game-over notification
//!
//! All calls are made from the session's single thread and must not block.

pub mod headless;

pub use headless::{FixedViewport, RecordingSurface, ScoreTally};

use glam::Vec2;

use crate::session::EndReason;
use crate::sim::ObjectKind;

/// Instanced sprites for falling objects, one instance array per kind
pub trait RenderSurface {
    /// Number of instances pre-allocated for `kind`
    fn slot_capacity(&self, kind: ObjectKind) -> usize;

    /// Move one instance (display space)
    fn update_slot_transform(&mut self, kind: ObjectKind, index: usize, position: Vec2);

    /// Draw only the first `count` instances of `kind`
    fn set_visible_count(&mut self, kind: ObjectKind, count: usize);
}

/// Window size source, read on every coordinate mapping
pub trait Viewport {
    fn size(&self) -> Vec2;
}

/// Receives scoring and lifecycle events
pub trait ScoreSink {
    fn on_score_delta(&mut self, delta: i32);

    /// Called exactly once per session
    fn on_game_over(&mut self, reason: EndReason);
}
