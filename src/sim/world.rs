//! Body store and fixed-step integrator
//!
//! Falling objects accelerate under gravity; the catcher zone and the floor are
//! static. Each step reports at most one contact per falling body, against the
//! first static body (lowest id) its path touched. The catcher is created before
//! the floor, so a catch wins over a landing in the same step.
//!
//! Contacts are swept along each body's motion during the step, and anything
//! that ends up at or below the floor top lands regardless, so a large step
//! can't carry an object through the floor.

use glam::Vec2;

use super::body::{Body, BodyId, BodyKind, Shape};
use super::collision::swept_overlap;

/// Two bodies reported touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub a: BodyId,
    pub b: BodyId,
}

/// All simulated bodies (kept sorted by id for deterministic iteration)
#[derive(Debug, Clone, Default)]
pub struct World {
    bodies: Vec<Body>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body at rest
    pub fn insert(&mut self, kind: BodyKind, shape: Shape, pos: Vec2) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        // Ids only grow, so pushing keeps the order
        self.bodies.push(Body {
            id,
            kind,
            shape,
            pos,
            vel: Vec2::ZERO,
        });
        id
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.position_of(id)?;
        Some(self.bodies.remove(idx))
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.position_of(id).map(|idx| &self.bodies[idx])
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.position_of(id).is_some()
    }

    /// Move a body and replace its shape (used for static bodies tracking the viewport)
    pub fn place(&mut self, id: BodyId, pos: Vec2, shape: Shape) -> bool {
        match self.position_of(id) {
            Some(idx) => {
                let body = &mut self.bodies[idx];
                body.pos = pos;
                body.shape = shape;
                true
            }
            None => false,
        }
    }

    /// Falling objects currently in the world
    pub fn objects(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| !b.kind.is_static())
    }

    pub fn object_count(&self) -> usize {
        self.objects().count()
    }

    /// Advance falling bodies by `dt` seconds and report new contacts
    pub fn step(&mut self, dt: f32, gravity: f32) -> Vec<ContactPair> {
        let mut moved = Vec::new();
        for (idx, body) in self.bodies.iter_mut().enumerate() {
            if body.kind.is_static() {
                continue;
            }
            let from = body.pos;
            body.vel.y += gravity * dt;
            body.pos += body.vel * dt;
            moved.push((idx, from));
        }

        let mut contacts = Vec::new();
        for (idx, from) in moved {
            let body = &self.bodies[idx];
            let hit = self.bodies.iter().filter(|s| s.kind.is_static()).find(|s| {
                swept_overlap(&s.shape, s.pos, &body.shape, from, body.pos) || below_floor(s, body)
            });
            if let Some(fixed) = hit {
                contacts.push(ContactPair {
                    a: fixed.id,
                    b: body.id,
                });
            }
        }
        contacts
    }

    fn position_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }
}

fn below_floor(fixed: &Body, body: &Body) -> bool {
    if fixed.kind != BodyKind::Boundary {
        return false;
    }
    let top = match fixed.shape {
        Shape::Rect { half_extents } => fixed.pos.y - half_extents.y,
        Shape::Circle { radius } => fixed.pos.y - radius,
    };
    body.pos.y >= top
}
