//! In-memory collaborators for the headless binary and tests
//!
//! Each type is a cheap `Rc` handle, so a clone can be handed to the session
//! while the caller keeps another to inspect what was recorded.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use super::{RenderSurface, ScoreSink, Viewport};
use crate::session::EndReason;
use crate::sim::{ObjectKind, PerKind};

#[derive(Debug, Default)]
struct SurfaceLog {
    capacity: PerKind<usize>,
    transforms: HashMap<(ObjectKind, usize), Vec2>,
    visible: PerKind<usize>,
    transform_writes: usize,
}

/// Render surface that records the last transform of every instance
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new(capacity: PerKind<usize>) -> Self {
        Self {
            log: Rc::new(RefCell::new(SurfaceLog {
                capacity,
                ..Default::default()
            })),
        }
    }

    /// Last position written to an instance
    pub fn transform(&self, kind: ObjectKind, index: usize) -> Option<Vec2> {
        self.log.borrow().transforms.get(&(kind, index)).copied()
    }

    pub fn visible_count(&self, kind: ObjectKind) -> usize {
        self.log.borrow().visible[kind]
    }

    pub fn transform_writes(&self) -> usize {
        self.log.borrow().transform_writes
    }
}

impl RenderSurface for RecordingSurface {
    fn slot_capacity(&self, kind: ObjectKind) -> usize {
        self.log.borrow().capacity[kind]
    }

    fn update_slot_transform(&mut self, kind: ObjectKind, index: usize, position: Vec2) {
        let mut log = self.log.borrow_mut();
        log.transforms.insert((kind, index), position);
        log.transform_writes += 1;
    }

    fn set_visible_count(&mut self, kind: ObjectKind, count: usize) {
        self.log.borrow_mut().visible[kind] = count;
    }
}

/// Viewport with a settable size
#[derive(Debug)]
pub struct FixedViewport {
    size: Cell<Vec2>,
}

impl FixedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Cell::new(Vec2::new(width, height)),
        }
    }

    pub fn resize(&self, width: f32, height: f32) {
        log::debug!("Viewport resized to {width}x{height}");
        self.size.set(Vec2::new(width, height));
    }
}

impl Viewport for FixedViewport {
    fn size(&self) -> Vec2 {
        self.size.get()
    }
}

#[derive(Debug, Default)]
struct Tally {
    total: i64,
    deltas: Vec<i32>,
    game_overs: Vec<EndReason>,
}

/// Score sink that sums deltas and records game-over notifications
#[derive(Debug, Clone, Default)]
pub struct ScoreTally {
    tally: Rc<RefCell<Tally>>,
}

impl ScoreTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> i64 {
        self.tally.borrow().total
    }

    pub fn deltas(&self) -> Vec<i32> {
        self.tally.borrow().deltas.clone()
    }

    pub fn game_overs(&self) -> Vec<EndReason> {
        self.tally.borrow().game_overs.clone()
    }
}

impl ScoreSink for ScoreTally {
    fn on_score_delta(&mut self, delta: i32) {
        let mut tally = self.tally.borrow_mut();
        tally.total += i64::from(delta);
        tally.deltas.push(delta);
    }

    fn on_game_over(&mut self, reason: EndReason) {
        self.tally.borrow_mut().game_overs.push(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_shared_between_clones() {
        let tally = ScoreTally::new();
        let mut sink: Box<dyn ScoreSink> = Box::new(tally.clone());
        sink.on_score_delta(10);
        sink.on_score_delta(-4);
        sink.on_game_over(EndReason::Stopped);
        assert_eq!(tally.total(), 6);
        assert_eq!(tally.deltas(), vec![10, -4]);
        assert_eq!(tally.game_overs(), vec![EndReason::Stopped]);
    }

    #[test]
    fn test_surface_records() {
        let surface = RecordingSurface::new(PerKind::new(4, 2));
        let mut handle: Box<dyn RenderSurface> = Box::new(surface.clone());
        assert_eq!(handle.slot_capacity(ObjectKind::Bad), 2);
        handle.update_slot_transform(ObjectKind::Good, 1, Vec2::ONE);
        handle.set_visible_count(ObjectKind::Good, 2);
        assert_eq!(surface.transform(ObjectKind::Good, 1), Some(Vec2::ONE));
        assert_eq!(surface.transform(ObjectKind::Good, 0), None);
        assert_eq!(surface.visible_count(ObjectKind::Good), 2);
        assert_eq!(surface.transform_writes(), 1);
    }
}
