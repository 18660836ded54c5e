//! Timed object production
//!
//! On every tick each kind claims its next slot and drops a new body from the
//! top of the field. A tick that would wrap any kind's slots ends scheduling
//! before a single body is created.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{BodyId, BodyKind, ObjectKind, ObjectTag, PerKind, Shape};
use super::coords::CoordinateMapper;
use super::slots::{Exhausted, SlotPool};
use super::world::World;
use crate::consts::SPAWN_MARGIN;

/// Result of one spawn tick
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnOutcome {
    /// One new body per kind
    Spawned(Vec<(ObjectTag, BodyId)>),
    /// Slots wrapped; the scheduler has stopped
    Exhausted(Exhausted),
    /// Scheduler already stopped
    Idle,
}

/// Fixed-interval spawner
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    interval: Duration,
    elapsed: Duration,
    running: bool,
    rng: Pcg32,
    spawned: PerKind<u32>,
}

impl SpawnScheduler {
    pub fn new(interval: Duration, seed: u64) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            running: true,
            rng: Pcg32::seed_from_u64(seed),
            spawned: PerKind::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Cancel future ticks (idempotent)
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Objects produced so far per kind
    pub fn spawned(&self) -> PerKind<u32> {
        self.spawned
    }

    /// Feed wall-clock time; returns how many ticks are due
    pub fn poll(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += elapsed;
        let mut due = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due += 1;
        }
        due
    }

    /// Run one spawn tick
    pub fn tick(
        &mut self,
        world: &mut World,
        pool: &mut SlotPool,
        mapper: &CoordinateMapper,
        object_radius: f32,
    ) -> SpawnOutcome {
        if !self.running {
            return SpawnOutcome::Idle;
        }

        for kind in ObjectKind::ALL {
            if let Err(exhausted) = pool.peek(kind) {
                log::info!("Spawning finished: {exhausted}");
                self.stop();
                return SpawnOutcome::Exhausted(exhausted);
            }
        }

        let field = mapper.field();
        let radius = mapper.extent_to_simulation(Vec2::splat(object_radius)).x;
        let mut spawned = Vec::with_capacity(ObjectKind::ALL.len());

        for kind in ObjectKind::ALL {
            let index = match pool.claim(kind) {
                Ok(index) => index,
                Err(exhausted) => {
                    self.stop();
                    return SpawnOutcome::Exhausted(exhausted);
                }
            };
            pool.reveal(kind, index + 1);

            // Never leave two live bodies on one slot
            if let Some(stale) = pool.bound_body(kind, index) {
                world.remove(stale);
                log::debug!("Removed stale body {stale:?} from {kind}:{index}");
            }

            let x = field.width * self.rng.random_range(SPAWN_MARGIN..=1.0 - SPAWN_MARGIN);
            let pos = Vec2::new(x, 0.0);
            let tag = ObjectTag::new(kind, index);
            let id = world.insert(BodyKind::Object(tag), Shape::Circle { radius }, pos);
            pool.bind(kind, index, id);
            pool.set_position(kind, index, mapper.to_display(pos));

            self.spawned[kind] += 1;
            log::debug!("Spawned {tag} as {id:?} at x={x:.1}");
            spawned.push((tag, id));
        }

        SpawnOutcome::Spawned(spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIELD_ASPECT;
    use crate::platform::{FixedViewport, RecordingSurface};
    use std::rc::Rc;

    struct Fixture {
        surface: RecordingSurface,
        world: World,
        pool: SlotPool,
        mapper: CoordinateMapper,
        scheduler: SpawnScheduler,
    }

    fn fixture(capacity: usize) -> Fixture {
        let capacity = PerKind::new(capacity, capacity);
        let surface = RecordingSurface::new(capacity);
        Fixture {
            pool: SlotPool::new(capacity, Box::new(surface.clone())),
            surface,
            world: World::new(),
            mapper: CoordinateMapper::new(Rc::new(FixedViewport::new(600.0, 1000.0)), FIELD_ASPECT),
            scheduler: SpawnScheduler::new(Duration::from_millis(1000), 42),
        }
    }

    impl Fixture {
        fn tick(&mut self) -> SpawnOutcome {
            self.scheduler
                .tick(&mut self.world, &mut self.pool, &self.mapper, 0.065)
        }
    }

    #[test]
    fn test_poll_interval() {
        let mut scheduler = SpawnScheduler::new(Duration::from_millis(1000), 1);
        assert_eq!(scheduler.poll(Duration::from_millis(999)), 0);
        assert_eq!(scheduler.poll(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.poll(Duration::from_millis(2500)), 2);
        assert_eq!(scheduler.poll(Duration::from_millis(500)), 1);
        scheduler.stop();
        scheduler.stop();
        assert_eq!(scheduler.poll(Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_tick_spawns_each_kind() {
        let mut f = fixture(3);
        let SpawnOutcome::Spawned(bodies) = f.tick() else {
            panic!("expected spawn");
        };
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].0, ObjectTag::new(ObjectKind::Good, 0));
        assert_eq!(bodies[1].0, ObjectTag::new(ObjectKind::Bad, 0));
        assert_eq!(f.world.object_count(), 2);

        for (tag, id) in bodies {
            let body = f.world.get(id).unwrap();
            assert_eq!(body.tag(), Some(tag));
            assert_eq!(body.pos.y, 0.0);
            // Inner 80% of a 600 wide field
            assert!(body.pos.x >= 60.0 - 1e-3 && body.pos.x <= 540.0 + 1e-3);
            assert_eq!(f.pool.bound_body(tag.kind, tag.index), Some(id));
            assert_eq!(f.surface.visible_count(tag.kind), 1);
        }
    }

    #[test]
    fn test_exhaustion_spawns_nothing() {
        let mut f = fixture(3);
        for _ in 0..3 {
            assert!(matches!(f.tick(), SpawnOutcome::Spawned(_)));
        }
        assert_eq!(f.pool.last_claimed(ObjectKind::Good), Some(2));
        assert_eq!(f.pool.last_claimed(ObjectKind::Bad), Some(2));
        assert_eq!(f.pool.visible_count(ObjectKind::Bad), 3);

        let outcome = f.tick();
        assert!(matches!(outcome, SpawnOutcome::Exhausted(e) if e.kind == ObjectKind::Good));
        assert!(!f.scheduler.is_running());
        assert_eq!(f.world.object_count(), 6);
        assert_eq!(f.scheduler.spawned(), PerKind::new(3, 3));
        assert_eq!(f.tick(), SpawnOutcome::Idle);
    }

    #[test]
    fn test_uneven_capacity_exhausts_before_any_spawn() {
        let capacity = PerKind::new(3, 1);
        let surface = RecordingSurface::new(capacity);
        let mut pool = SlotPool::new(capacity, Box::new(surface));
        let mut world = World::new();
        let mapper =
            CoordinateMapper::new(Rc::new(FixedViewport::new(600.0, 1000.0)), FIELD_ASPECT);
        let mut scheduler = SpawnScheduler::new(Duration::from_millis(1000), 3);

        assert!(matches!(
            scheduler.tick(&mut world, &mut pool, &mapper, 0.065),
            SpawnOutcome::Spawned(_)
        ));
        let outcome = scheduler.tick(&mut world, &mut pool, &mapper, 0.065);
        assert!(matches!(outcome, SpawnOutcome::Exhausted(e) if e.kind == ObjectKind::Bad));
        // The good kind did not advance on the exhausting tick
        assert_eq!(pool.last_claimed(ObjectKind::Good), Some(0));
        assert_eq!(world.object_count(), 2);
    }

    #[test]
    fn test_same_seed_same_positions() {
        let mut a = fixture(5);
        let mut b = fixture(5);
        for _ in 0..5 {
            a.tick();
            b.tick();
        }
        let xs = |f: &Fixture| f.world.objects().map(|o| o.pos.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }
}
