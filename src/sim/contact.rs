//! Contact classification and scoring
//!
//! A falling object touching the catcher zone or the floor is always consumed.
//! Only catcher contacts score; floor landings are silent for both kinds.

use super::body::{BodyId, BodyKind, ObjectTag, PerKind};
use super::slots::SlotPool;
use super::world::{ContactPair, World};
use crate::platform::ScoreSink;

/// What a contact turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Caught { tag: ObjectTag, delta: i32 },
    Landed { tag: ObjectTag },
    Ignored,
}

/// Turns contact pairs into removals and score deltas
#[derive(Debug, Clone)]
pub struct ContactResolver {
    score: PerKind<i32>,
    caught: PerKind<u32>,
    landed: PerKind<u32>,
}

impl ContactResolver {
    pub fn new(score: PerKind<i32>) -> Self {
        Self {
            score,
            caught: PerKind::default(),
            landed: PerKind::default(),
        }
    }

    pub fn caught(&self) -> PerKind<u32> {
        self.caught
    }

    pub fn landed(&self) -> PerKind<u32> {
        self.landed
    }

    pub fn resolve(
        &mut self,
        pair: ContactPair,
        world: &mut World,
        pool: &mut SlotPool,
        sink: &mut dyn ScoreSink,
    ) -> Resolution {
        let (Some(a), Some(b)) = (world.get(pair.a), world.get(pair.b)) else {
            log::warn!("Ignoring contact {:?} <-> {:?}: body no longer exists", pair.a, pair.b);
            return Resolution::Ignored;
        };

        let (fixed, tag, object): (BodyKind, ObjectTag, BodyId) = match (a.kind, b.kind) {
            (fixed @ (BodyKind::Catcher | BodyKind::Boundary), BodyKind::Object(tag)) => {
                (fixed, tag, b.id)
            }
            (BodyKind::Object(tag), fixed @ (BodyKind::Catcher | BodyKind::Boundary)) => {
                (fixed, tag, a.id)
            }
            (ka, kb) => {
                log::warn!("Ignoring unexpected contact {ka:?} <-> {kb:?}");
                return Resolution::Ignored;
            }
        };

        world.remove(object);
        if pool.bound_body(tag.kind, tag.index) == Some(object) {
            pool.release(tag.kind, tag.index);
        }

        if fixed == BodyKind::Catcher {
            let delta = self.score[tag.kind];
            self.caught[tag.kind] += 1;
            log::debug!("Caught {tag} ({delta:+})");
            sink.on_score_delta(delta);
            Resolution::Caught { tag, delta }
        } else {
            self.landed[tag.kind] += 1;
            log::debug!("{tag} hit the floor");
            Resolution::Landed { tag }
        }
    }
}
