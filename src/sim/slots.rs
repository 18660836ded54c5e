//! Display slot pool
//!
//! Every kind has a fixed array of display slots pre-allocated on the render
//! surface. Slots are claimed round-robin; wrapping back to index 0 is the
//! exhaustion signal and is sticky. Hidden slots are parked off-field instead
//! of shrinking the visible count, which would make the instances flicker.

use glam::Vec2;
use thiserror::Error;

use super::body::{BodyId, ObjectKind, PerKind};
use crate::consts::OFF_FIELD;
use crate::platform::RenderSurface;

/// Round-robin wraparound for a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} slots exhausted after {capacity} claims")]
pub struct Exhausted {
    pub kind: ObjectKind,
    pub capacity: usize,
}

/// One visual instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySlot {
    pub active: bool,
    pub position: Vec2,
}

impl Default for DisplaySlot {
    fn default() -> Self {
        Self {
            active: false,
            position: OFF_FIELD,
        }
    }
}

#[derive(Debug, Clone)]
struct SlotBank {
    slots: Vec<DisplaySlot>,
    bound: Vec<Option<BodyId>>,
    last_claimed: Option<usize>,
    visible: usize,
}

impl SlotBank {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![DisplaySlot::default(); capacity],
            bound: vec![None; capacity],
            last_claimed: None,
            visible: 0,
        }
    }

    fn next(&self) -> Option<usize> {
        match self.last_claimed {
            None => Some(0),
            Some(last) => {
                let next = (last + 1) % self.slots.len();
                (next != 0).then_some(next)
            }
        }
    }
}

/// Fixed-capacity display slots per kind, writing through to the render surface
pub struct SlotPool {
    banks: PerKind<SlotBank>,
    surface: Box<dyn RenderSurface>,
}

impl SlotPool {
    pub fn new(capacity: PerKind<usize>, surface: Box<dyn RenderSurface>) -> Self {
        Self {
            banks: PerKind::new(SlotBank::new(capacity.good), SlotBank::new(capacity.bad)),
            surface,
        }
    }

    pub fn capacity(&self, kind: ObjectKind) -> usize {
        self.banks[kind].slots.len()
    }

    /// Index the next `claim` would return, without advancing
    pub fn peek(&self, kind: ObjectKind) -> Result<usize, Exhausted> {
        self.banks[kind].next().ok_or(Exhausted {
            kind,
            capacity: self.capacity(kind),
        })
    }

    /// Claim the next index round-robin
    pub fn claim(&mut self, kind: ObjectKind) -> Result<usize, Exhausted> {
        let index = self.peek(kind)?;
        self.banks[kind].last_claimed = Some(index);
        Ok(index)
    }

    /// Highest index claimed so far
    pub fn last_claimed(&self, kind: ObjectKind) -> Option<usize> {
        self.banks[kind].last_claimed
    }

    /// Tie a body to a slot and mark it active, returning the body it replaces.
    /// Out-of-range indices are ignored.
    pub fn bind(&mut self, kind: ObjectKind, index: usize, body: BodyId) -> Option<BodyId> {
        let bank = &mut self.banks[kind];
        if index >= bank.slots.len() {
            log::warn!("Cannot bind {body:?} to {kind}:{index}: only {} slots", bank.slots.len());
            return None;
        }
        bank.slots[index].active = true;
        bank.bound[index].replace(body)
    }

    pub fn bound_body(&self, kind: ObjectKind, index: usize) -> Option<BodyId> {
        self.banks[kind].bound.get(index).copied().flatten()
    }

    /// Hide the slot and forget its body
    pub fn release(&mut self, kind: ObjectKind, index: usize) {
        if let Some(bound) = self.banks[kind].bound.get_mut(index) {
            *bound = None;
            self.hide(kind, index);
        }
    }

    /// Park the slot off-field; the visible count is left alone
    pub fn hide(&mut self, kind: ObjectKind, index: usize) {
        if let Some(slot) = self.banks[kind].slots.get_mut(index) {
            slot.active = false;
            slot.position = OFF_FIELD;
            self.surface.update_slot_transform(kind, index, OFF_FIELD);
        }
    }

    pub fn set_position(&mut self, kind: ObjectKind, index: usize, position: Vec2) {
        if let Some(slot) = self.banks[kind].slots.get_mut(index) {
            slot.position = position;
            self.surface.update_slot_transform(kind, index, position);
        }
    }

    /// Grow the visible count to at least `count`
    pub fn reveal(&mut self, kind: ObjectKind, count: usize) {
        let bank = &mut self.banks[kind];
        let count = count.min(bank.slots.len());
        if count > bank.visible {
            bank.visible = count;
            self.surface.set_visible_count(kind, count);
        }
    }

    pub fn visible_count(&self, kind: ObjectKind) -> usize {
        self.banks[kind].visible
    }

    pub fn slot(&self, kind: ObjectKind, index: usize) -> Option<&DisplaySlot> {
        self.banks[kind].slots.get(index)
    }

    /// Slots currently bound to a body, as (index, body)
    pub fn live(&self, kind: ObjectKind) -> impl Iterator<Item = (usize, BodyId)> + '_ {
        self.banks[kind]
            .bound
            .iter()
            .enumerate()
            .filter_map(|(index, body)| body.map(|body| (index, body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::RecordingSurface;
    use proptest::prelude::*;

    fn pool(capacity: usize) -> (RecordingSurface, SlotPool) {
        let surface = RecordingSurface::new(PerKind::new(capacity, capacity));
        let pool = SlotPool::new(PerKind::new(capacity, capacity), Box::new(surface.clone()));
        (surface, pool)
    }

    #[test]
    fn test_claim_round_robin_then_exhausted() {
        let (_, mut pool) = pool(3);
        assert_eq!(pool.claim(ObjectKind::Good), Ok(0));
        assert_eq!(pool.claim(ObjectKind::Good), Ok(1));
        assert_eq!(pool.claim(ObjectKind::Good), Ok(2));
        let err = pool.claim(ObjectKind::Good).unwrap_err();
        assert_eq!(err.capacity, 3);
        // Sticky
        assert!(pool.claim(ObjectKind::Good).is_err());
        assert_eq!(pool.last_claimed(ObjectKind::Good), Some(2));
        // Kinds are independent
        assert_eq!(pool.claim(ObjectKind::Bad), Ok(0));
    }

    #[test]
    fn test_single_slot_capacity() {
        let (_, mut pool) = pool(1);
        assert_eq!(pool.peek(ObjectKind::Bad), Ok(0));
        assert_eq!(pool.claim(ObjectKind::Bad), Ok(0));
        assert!(pool.peek(ObjectKind::Bad).is_err());
    }

    #[test]
    fn test_bind_replaces() {
        let (_, mut pool) = pool(4);
        assert_eq!(pool.bind(ObjectKind::Good, 2, BodyId(10)), None);
        assert_eq!(pool.bind(ObjectKind::Good, 2, BodyId(11)), Some(BodyId(10)));
        assert_eq!(pool.bound_body(ObjectKind::Good, 2), Some(BodyId(11)));
        assert_eq!(pool.live(ObjectKind::Good).count(), 1);
    }

    #[test]
    fn test_release_hides_and_unbinds() {
        let (surface, mut pool) = pool(8);
        pool.bind(ObjectKind::Good, 7, BodyId(3));
        pool.set_position(ObjectKind::Good, 7, Vec2::new(0.1, 0.2));
        assert_eq!(surface.transform(ObjectKind::Good, 7), Some(Vec2::new(0.1, 0.2)));

        pool.release(ObjectKind::Good, 7);
        assert_eq!(pool.bound_body(ObjectKind::Good, 7), None);
        assert!(!pool.slot(ObjectKind::Good, 7).unwrap().active);
        assert_eq!(surface.transform(ObjectKind::Good, 7), Some(OFF_FIELD));
    }

    #[test]
    fn test_reveal_only_grows() {
        let (surface, mut pool) = pool(5);
        pool.reveal(ObjectKind::Bad, 3);
        pool.reveal(ObjectKind::Bad, 2);
        assert_eq!(pool.visible_count(ObjectKind::Bad), 3);
        pool.reveal(ObjectKind::Bad, 50);
        assert_eq!(pool.visible_count(ObjectKind::Bad), 5);
        assert_eq!(surface.visible_count(ObjectKind::Bad), 5);
        assert_eq!(surface.visible_count(ObjectKind::Good), 0);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let (surface, mut pool) = pool(2);
        pool.hide(ObjectKind::Good, 9);
        pool.set_position(ObjectKind::Good, 9, Vec2::ZERO);
        pool.release(ObjectKind::Good, 9);
        assert_eq!(surface.transform_writes(), 0);

        assert_eq!(pool.bind(ObjectKind::Good, 9, BodyId(4)), None);
        assert_eq!(pool.bound_body(ObjectKind::Good, 9), None);
        assert_eq!(pool.live(ObjectKind::Good).count(), 0);
    }

    proptest! {
        #[test]
        fn claims_cover_range_once(capacity in 1usize..64) {
            let (_, mut pool) = pool(capacity);
            let mut seen = vec![false; capacity];
            for expected in 0..capacity {
                let index = pool.claim(ObjectKind::Good).unwrap();
                prop_assert_eq!(index, expected);
                prop_assert!(!seen[index]);
                seen[index] = true;
            }
            prop_assert!(pool.claim(ObjectKind::Good).is_err());
        }
    }
}
