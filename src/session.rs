//! Session loop
//!
//! A `Session` owns one game: the simulated world, the slot pool, the spawn
//! scheduler and the contact resolver. The host drives it cooperatively from a
//! single thread with two independent triggers: `frame` at display cadence and
//! `spawn_tick` at the configured interval (`advance` feeds both from one clock).

use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_catcher;
use crate::config::SessionConfig;
use crate::consts::*;
use crate::error::SessionError;
use crate::platform::{RenderSurface, ScoreSink, Viewport};
use crate::sim::{
    BodyId, BodyKind, ContactResolver, CoordinateMapper, ObjectKind, PerKind, Shape, SlotPool,
    SpawnOutcome, SpawnScheduler, World,
};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every slot of a kind has been used once
    Exhausted,
    /// The host called `stop`
    Stopped,
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Over(EndReason),
}

/// External collaborators, handed over at start
pub struct Collaborators {
    pub surface: Box<dyn RenderSurface>,
    pub viewport: Rc<dyn Viewport>,
    pub score: Box<dyn ScoreSink>,
}

impl Collaborators {
    pub fn new(
        surface: impl RenderSurface + 'static,
        viewport: Rc<dyn Viewport>,
        score: impl ScoreSink + 'static,
    ) -> Self {
        Self {
            surface: Box::new(surface),
            viewport,
            score: Box::new(score),
        }
    }
}

/// Counters for a session so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub spawned: PerKind<u32>,
    pub caught: PerKind<u32>,
    pub landed: PerKind<u32>,
    /// Sum of every score delta emitted
    pub score: i64,
    pub end: Option<EndReason>,
}

/// One running game
pub struct Session {
    config: SessionConfig,
    phase: SessionPhase,
    world: World,
    pool: SlotPool,
    mapper: CoordinateMapper,
    scheduler: SpawnScheduler,
    resolver: ContactResolver,
    score: Box<dyn ScoreSink>,
    catcher: BodyId,
    floor: BodyId,
    /// Latest drag position, unclamped
    catcher_input: Vec2,
    accumulator: f32,
}

/// Validate the collaborators and begin a session
pub fn start(config: SessionConfig, collaborators: Collaborators) -> Result<Session, SessionError> {
    config.validate()?;
    let Collaborators {
        surface,
        viewport,
        score,
    } = collaborators;

    let size = viewport.size();
    if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
        return Err(SessionError::InvalidViewport {
            width: size.x,
            height: size.y,
        });
    }
    for kind in ObjectKind::ALL {
        let available = surface.slot_capacity(kind);
        let required = config.slot_capacity[kind];
        if available < required {
            return Err(SessionError::SurfaceTooSmall {
                kind,
                available,
                required,
            });
        }
    }

    let mapper = CoordinateMapper::new(viewport, config.aspect_ratio);
    let mut pool = SlotPool::new(config.slot_capacity, surface);
    for kind in ObjectKind::ALL {
        for index in 0..pool.capacity(kind) {
            pool.hide(kind, index);
        }
    }

    // Catcher first: it wins over the floor when both touch in one step
    let mut world = World::new();
    let placeholder = Shape::Rect {
        half_extents: Vec2::ONE,
    };
    let catcher = world.insert(BodyKind::Catcher, placeholder, Vec2::ZERO);
    let floor = world.insert(BodyKind::Boundary, placeholder, Vec2::ZERO);

    let seed = config.seed.unwrap_or_else(clock_seed);
    let mut session = Session {
        scheduler: SpawnScheduler::new(config.spawn_interval(), seed),
        resolver: ContactResolver::new(config.score),
        catcher_input: Vec2::new(0.0, config.catcher_ground_y),
        phase: SessionPhase::Running,
        accumulator: 0.0,
        config,
        world,
        pool,
        mapper,
        score,
        catcher,
        floor,
    };
    session.sync_static_bodies();

    let field = session.mapper.field();
    log::info!(
        "Session started: seed {seed}, {} good / {} bad slots, field {:.0}x{:.0}",
        session.config.slot_capacity.good,
        session.config.slot_capacity.bad,
        field.width,
        field.height
    );
    Ok(session)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Drag input for the catcher, in display space; clamped when read
    pub fn drag_catcher(&mut self, display: Vec2) {
        self.catcher_input = display;
    }

    /// Catcher display position after clamping
    pub fn catcher_position(&self) -> Vec2 {
        clamp_catcher(
            self.catcher_input,
            self.config.catcher_bound,
            self.config.catcher_ground_y,
        )
    }

    /// Catcher position in simulation space as of the last sync
    pub fn catcher_body_position(&self) -> Option<Vec2> {
        self.world.get(self.catcher).map(|b| b.pos)
    }

    /// Drive both triggers from one host clock
    pub fn advance(&mut self, elapsed: Duration) {
        let due = self.scheduler.poll(elapsed);
        for _ in 0..due {
            if !matches!(self.spawn_tick(), SpawnOutcome::Spawned(_)) {
                break;
            }
        }
        self.frame(elapsed);
    }

    /// Spawn trigger: produce one object per kind, or end the session on exhaustion
    pub fn spawn_tick(&mut self) -> SpawnOutcome {
        if !self.is_running() {
            return SpawnOutcome::Idle;
        }
        let outcome = self.scheduler.tick(
            &mut self.world,
            &mut self.pool,
            &self.mapper,
            self.config.object_radius,
        );
        if let SpawnOutcome::Exhausted(_) = outcome {
            self.finish(EndReason::Exhausted);
        }
        outcome
    }

    /// Frame trigger: step the simulation, resolve contacts, then sync slots.
    /// Once the session is over only the slot sync runs.
    pub fn frame(&mut self, dt: Duration) {
        if self.is_running() {
            self.sync_static_bodies();

            let gravity = self.config.gravity * self.mapper.field().height / 2.0;
            self.accumulator += dt.as_secs_f32().min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                for pair in self.world.step(SIM_DT, gravity) {
                    self.resolver.resolve(
                        pair,
                        &mut self.world,
                        &mut self.pool,
                        self.score.as_mut(),
                    );
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }
        self.sync_slots();
    }

    /// End the session early; a no-op once it is over
    pub fn stop(&mut self) {
        match self.phase {
            SessionPhase::Running => self.finish(EndReason::Stopped),
            SessionPhase::Over(reason) => {
                log::debug!("Stop ignored, session already over ({reason:?})");
            }
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let caught = self.resolver.caught();
        let score = ObjectKind::ALL
            .iter()
            .map(|&kind| i64::from(caught[kind]) * i64::from(self.config.score[kind]))
            .sum();
        SessionSummary {
            spawned: self.scheduler.spawned(),
            caught,
            landed: self.resolver.landed(),
            score,
            end: match self.phase {
                SessionPhase::Running => None,
                SessionPhase::Over(reason) => Some(reason),
            },
        }
    }

    fn finish(&mut self, reason: EndReason) {
        if !self.is_running() {
            return;
        }
        self.phase = SessionPhase::Over(reason);
        self.scheduler.stop();
        self.accumulator = 0.0;

        let summary = self.summary();
        log::info!(
            "Session over ({reason:?}): score {}, caught {}/{} good, {}/{} bad",
            summary.score,
            summary.caught.good,
            summary.spawned.good,
            summary.caught.bad,
            summary.spawned.bad
        );
        self.score.on_game_over(reason);
    }

    /// Re-derive catcher and floor placement from the current viewport
    fn sync_static_bodies(&mut self) {
        let field = self.mapper.field();

        let catcher_pos = self.mapper.to_simulation(self.catcher_position());
        let zone = Shape::Rect {
            half_extents: self.mapper.extent_to_simulation(self.config.catcher_size / 2.0),
        };
        self.world.place(self.catcher, catcher_pos, zone);

        let floor = Shape::Rect {
            half_extents: Vec2::new(field.width, field.height * FLOOR_THICKNESS / 2.0),
        };
        self.world.place(self.floor, Vec2::new(field.width / 2.0, field.height), floor);
    }

    /// Write every live object's display position into its slot
    fn sync_slots(&mut self) {
        for body in self.world.objects() {
            if let Some(tag) = body.tag() {
                let position = self.mapper.to_display(body.pos);
                self.pool.set_position(tag.kind, tag.index, position);
            }
        }
    }
}
