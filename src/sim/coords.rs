//! Simulation <-> display coordinate mapping
//!
//! Simulation space is in field pixels with the origin at the top-left corner
//! and y growing downward. Display space is normalized to [-1, 1] on both axes
//! with y growing upward. The field size is re-read from the viewport on every
//! call so a resize applies immediately.

use std::rc::Rc;

use glam::Vec2;

use crate::platform::Viewport;

/// Play field size in simulation units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Bidirectional transform between simulation and display space
#[derive(Clone)]
pub struct CoordinateMapper {
    viewport: Rc<dyn Viewport>,
    aspect: f32,
}

impl CoordinateMapper {
    pub fn new(viewport: Rc<dyn Viewport>, aspect: f32) -> Self {
        Self { viewport, aspect }
    }

    /// Largest field of the configured aspect ratio that fits the viewport
    pub fn field(&self) -> FieldSize {
        let size = self.viewport.size();
        let height = if size.x >= size.y * self.aspect {
            size.y
        } else {
            size.x / self.aspect
        };
        FieldSize {
            width: height * self.aspect,
            height,
        }
    }

    pub fn to_display(&self, sim: Vec2) -> Vec2 {
        let field = self.field();
        Vec2::new(
            -1.0 + (sim.x / field.width) * 2.0,
            1.0 - (sim.y / field.height) * 2.0,
        )
    }

    pub fn to_simulation(&self, display: Vec2) -> Vec2 {
        let field = self.field();
        Vec2::new(
            (display.x + 1.0) / 2.0 * field.width,
            (1.0 - display.y) / 2.0 * field.height,
        )
    }

    /// Convert a size (not a position) from display units to simulation units
    pub fn extent_to_simulation(&self, extent: Vec2) -> Vec2 {
        extent * self.field().as_vec2() / 2.0
    }
}
