//! Simulation module
//!
//! Everything that mutates game state lives here:
//! - Single-threaded, driven by the session's frame and spawn ticks
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - Rendering only through `platform::RenderSurface`

pub mod body;
pub mod collision;
pub mod contact;
pub mod coords;
pub mod slots;
pub mod spawn;
pub mod world;

pub use body::{Body, BodyId, BodyKind, ObjectKind, ObjectTag, PerKind, Shape};
pub use collision::{sd_box, sd_circle, shapes_overlap};
pub use contact::{ContactResolver, Resolution};
pub use coords::{CoordinateMapper, FieldSize};
pub use slots::{DisplaySlot, Exhausted, SlotPool};
pub use spawn::{SpawnOutcome, SpawnScheduler};
pub use world::{ContactPair, World};
