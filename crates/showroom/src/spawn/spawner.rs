//! Rate-limited spawner with timed eviction
//!
//! While the trigger is held, every call to [`Spawner::try_spawn`] creates a
//! logo pair at the pick point unless the last creation happened less than
//! the creation delay ago. Each creation arms a one-shot eviction timer; a
//! firing timer always evicts the pool's head, whichever pair armed it.

use super::pool::{PooledPair, SpawnPool};
use crate::assets::ModelAsset;
use crate::config::SpawnConfig;
use crate::foundation::math::{euler_xyz, Transform, Vec3};
use crate::foundation::time::TimerQueue;
use crate::physics::{BodyDesc, BodyShape, ContactMaterial, PhysicsWorld};
use crate::scene::{Material, SceneGraph, SceneObject, ShadowFlags};
use std::rc::Rc;
use std::time::Duration;

/// Model and material every spawned object is cloned from
#[derive(Debug, Clone)]
pub struct SpawnTemplate {
    /// Shared model data
    pub model: Rc<ModelAsset>,
    /// Material given to each instance
    pub material: Material,
}

/// Result of one spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A pair was created and appended to the pool
    Created(PooledPair),
    /// The trigger is not held
    Idle,
    /// The last creation is too recent
    RateLimited,
    /// The pointer has no world point
    NoPickPoint,
    /// The template model has not loaded yet
    NoTemplate,
}

/// Creates pooled logo pairs and evicts them after their lifetime
#[derive(Debug)]
pub struct Spawner {
    config: SpawnConfig,
    held: bool,
    last_creation: Option<Duration>,
    template: Option<SpawnTemplate>,
    evictions: TimerQueue<()>,
    created: u64,
    evicted: u64,
}

impl Spawner {
    /// Create an idle spawner
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            held: false,
            last_creation: None,
            template: None,
            evictions: TimerQueue::new(),
            created: 0,
            evicted: 0,
        }
    }

    /// Install the template once its model has loaded
    pub fn set_template(&mut self, template: SpawnTemplate) {
        self.template = Some(template);
    }

    /// Whether a template is installed
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Trigger pressed
    pub fn press(&mut self) {
        self.held = true;
    }

    /// Trigger released
    pub fn release(&mut self) {
        self.held = false;
    }

    /// Whether the trigger is held
    pub fn is_held(&self) -> bool {
        self.held
    }

    fn creation_delay(&self) -> Duration {
        Duration::from_millis(self.config.creation_delay_ms)
    }

    fn lifetime(&self) -> Duration {
        Duration::from_millis(self.config.lifetime_ms)
    }

    /// Attempt one creation at `now`
    pub fn try_spawn(
        &mut self,
        now: Duration,
        point: Option<Vec3>,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        pool: &mut SpawnPool,
    ) -> SpawnOutcome {
        if !self.held {
            return SpawnOutcome::Idle;
        }
        if self
            .last_creation
            .is_some_and(|last| now.saturating_sub(last) < self.creation_delay())
        {
            return SpawnOutcome::RateLimited;
        }
        let Some(point) = point else {
            return SpawnOutcome::NoPickPoint;
        };
        let Some(template) = &self.template else {
            return SpawnOutcome::NoTemplate;
        };

        let object = scene.add(
            SceneObject::model("logo", Rc::clone(&template.model), template.material.clone())
                .with_transform(
                    Transform::from_position(point)
                        .with_rotation(euler_xyz(std::f32::consts::FRAC_PI_2, 0.0, 0.0)),
                )
                .with_shadows(ShadowFlags::CAST | ShadowFlags::RECEIVE),
        );
        let body = physics.add_body(&self.body_desc(point));

        let pair = PooledPair {
            object,
            body,
            created_at: now,
        };
        pool.push(pair);
        self.evictions.schedule(now + self.lifetime(), ());
        self.last_creation = Some(now);
        self.created += 1;

        log::debug!(
            "Spawned logo #{} at ({:.2}, {:.2}, {:.2}); pool size {}",
            self.created,
            point.x,
            point.y,
            point.z,
            pool.len()
        );
        SpawnOutcome::Created(pair)
    }

    fn body_desc(&self, point: Vec3) -> BodyDesc {
        BodyDesc::dynamic(
            BodyShape::Cylinder {
                radius: self.config.radius,
                height: self.config.height,
            },
            self.config.mass,
        )
        .at(point)
        .spinning(Vec3::from(self.config.angular_velocity))
        .damped(self.config.linear_damping, self.config.angular_damping)
        .with_contact(ContactMaterial {
            friction: self.config.friction,
            restitution: self.config.restitution,
        })
    }

    /// Fire every eviction timer due at `now`, one head eviction per timer
    pub fn fire_due_evictions(
        &mut self,
        now: Duration,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        pool: &mut SpawnPool,
    ) -> usize {
        let mut fired = 0;
        while self.evictions.pop_due(now).is_some() {
            fired += 1;
            if let Some(pair) = pool.evict_oldest(scene, physics) {
                self.evicted += 1;
                log::debug!(
                    "Evicted logo created at {} ms; pool size {}",
                    pair.created_at.as_millis(),
                    pool.len()
                );
            }
        }
        fired
    }

    /// Deadline of the next eviction
    pub fn next_eviction(&self) -> Option<Duration> {
        self.evictions.next_due()
    }

    /// Armed eviction timers
    pub fn pending_evictions(&self) -> usize {
        self.evictions.len()
    }

    /// Time of the last creation
    pub fn last_creation(&self) -> Option<Duration> {
        self.last_creation
    }

    /// Pairs created so far
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Pairs evicted so far
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::model::tests::logo_glb;
    use crate::config::PhysicsConfig;
    use crate::scene::{Color, PhysicalParams};

    struct Rig {
        scene: SceneGraph,
        physics: PhysicsWorld,
        pool: SpawnPool,
        spawner: Spawner,
    }

    impl Rig {
        fn new() -> Self {
            let mut spawner = Spawner::new(SpawnConfig::default());
            spawner.set_template(SpawnTemplate {
                model: Rc::new(ModelAsset::parse("aphos.glb", &logo_glb()).expect("model")),
                material: Material::physical(Color::WHITE, PhysicalParams::default()),
            });
            Self {
                scene: SceneGraph::new(),
                physics: PhysicsWorld::new(&PhysicsConfig::default()).expect("physics"),
                pool: SpawnPool::new(),
                spawner,
            }
        }

        fn spawn(&mut self, ms: u64) -> SpawnOutcome {
            self.spawner.try_spawn(
                Duration::from_millis(ms),
                Some(Vec3::new(1.0, 2.0, 3.0)),
                &mut self.scene,
                &mut self.physics,
                &mut self.pool,
            )
        }

        fn evict(&mut self, ms: u64) -> usize {
            self.spawner
                .fire_due_evictions(Duration::from_millis(ms), &mut self.scene, &mut self.physics, &mut self.pool)
        }
    }

    #[test]
    fn test_nothing_happens_while_released() {
        let mut rig = Rig::new();
        assert_eq!(rig.spawn(0), SpawnOutcome::Idle);
        assert!(rig.pool.is_empty());
    }

    #[test]
    fn test_rate_limit_is_measured_from_last_creation() {
        let mut rig = Rig::new();
        rig.spawner.press();
        assert!(matches!(rig.spawn(0), SpawnOutcome::Created(_)));
        assert_eq!(rig.spawn(50), SpawnOutcome::RateLimited);

        // Re-pressing does not reset the window
        rig.spawner.release();
        rig.spawner.press();
        assert_eq!(rig.spawn(99), SpawnOutcome::RateLimited);
        assert!(matches!(rig.spawn(100), SpawnOutcome::Created(_)));
        assert_eq!(rig.pool.len(), 2);
        assert_eq!(rig.spawner.last_creation(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_missing_point_or_template_does_not_consume_the_window() {
        let mut rig = Rig::new();
        rig.spawner.press();
        let outcome = rig.spawner.try_spawn(
            Duration::ZERO,
            None,
            &mut rig.scene,
            &mut rig.physics,
            &mut rig.pool,
        );
        assert_eq!(outcome, SpawnOutcome::NoPickPoint);
        assert!(rig.spawner.last_creation().is_none());

        let mut bare = Spawner::new(SpawnConfig::default());
        bare.press();
        let outcome = bare.try_spawn(
            Duration::ZERO,
            Some(Vec3::zeros()),
            &mut rig.scene,
            &mut rig.physics,
            &mut rig.pool,
        );
        assert_eq!(outcome, SpawnOutcome::NoTemplate);
        assert!(matches!(rig.spawn(1), SpawnOutcome::Created(_)));
    }

    #[test]
    fn test_spawned_body_uses_configured_spin() {
        let mut rig = Rig::new();
        rig.spawner.press();
        let SpawnOutcome::Created(pair) = rig.spawn(0) else {
            panic!("expected a creation");
        };
        assert_eq!(rig.physics.angular_velocity(pair.body), Some(Vec3::new(4.0, 10.0, 10.0)));
        assert_eq!(
            rig.scene.get(pair.object).map(|o| o.transform.position),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_each_timer_evicts_only_the_head() {
        let mut rig = Rig::new();
        rig.spawner.press();
        let created: Vec<_> = [0, 100, 200]
            .into_iter()
            .filter_map(|ms| match rig.spawn(ms) {
                SpawnOutcome::Created(pair) => Some(pair),
                _ => None,
            })
            .collect();
        assert_eq!(created.len(), 3);
        assert_eq!(rig.spawner.pending_evictions(), 3);

        assert_eq!(rig.evict(9_999), 0);
        assert_eq!(rig.evict(10_000), 1);
        assert_eq!(rig.pool.front().map(|p| p.object), Some(created[1].object));

        // A late catch-up fires both remaining timers, one head each
        assert_eq!(rig.evict(20_000), 2);
        assert!(rig.pool.is_empty());
        assert!(created.iter().all(|p| !rig.scene.contains(p.object) && !rig.physics.contains(p.body)));
        assert_eq!(rig.spawner.evicted(), 3);
    }
}
