//! Popcorn Catch - falling-object catching game engine
//!
//! Core modules:
//! - `sim`: Simulation (bodies, coordinate mapping, slots, spawning, contacts)
//! - `session`: Session loop driving the simulation and its collaborators
//! - `platform`: Collaborator traits (render surface, viewport, score sink)
//! - `config`: Per-session configuration and profiles
//! - `highscores`: Best-score board

pub mod config;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::{Profile, SessionConfig};
pub use error::{ConfigError, ScoreBoardError, SessionError};
pub use highscores::HighScores;
pub use session::{Collaborators, EndReason, Session, SessionSummary, start};

/// Engine constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Legacy field aspect ratio (width / height = 600 / 1000)
    pub const FIELD_ASPECT: f32 = 600.0 / 1000.0;
    /// Catcher ground level in display space
    pub const CATCHER_GROUND_Y: f32 = -0.75;
    /// Catcher horizontal movement bound in display space
    pub const CATCHER_BOUND: f32 = 0.75;

    /// Spawn columns use the inner 80% of the field width
    pub const SPAWN_MARGIN: f32 = 0.1;
    /// Floor thickness as a fraction of field height
    pub const FLOOR_THICKNESS: f32 = 1.0 / 60.0;

    /// Display position used to park hidden slots outside the viewport
    pub const OFF_FIELD: Vec2 = Vec2::new(0.0, 10.0);
}

/// Clamp a catcher display position: x to [-bound, bound], y pinned to ground.
#[inline]
pub fn clamp_catcher(display: glam::Vec2, bound: f32, ground_y: f32) -> glam::Vec2 {
    let x = if display.x.is_nan() {
        0.0
    } else {
        display.x.clamp(-bound, bound)
    };
    glam::Vec2::new(x, ground_y)
}
