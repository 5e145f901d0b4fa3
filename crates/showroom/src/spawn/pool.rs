//! FIFO pool of spawned (visual object, rigid body) pairs
//!
//! Pairs are appended at the tail and only ever removed from the head. Each
//! entry holds both halves, so the visual and physical sequences cannot
//! drift out of step.

use crate::physics::{BodyHandle, PhysicsWorld};
use crate::scene::{ObjectId, SceneGraph};
use std::collections::VecDeque;
use std::time::Duration;

/// One spawned object and the body driving it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PooledPair {
    /// Visual half
    pub object: ObjectId,
    /// Physical half
    pub body: BodyHandle,
    /// Session time of creation
    pub created_at: Duration,
}

/// Insertion-ordered pool of spawned pairs
#[derive(Debug, Clone, Default)]
pub struct SpawnPool {
    pairs: VecDeque<PooledPair>,
}

impl SpawnPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair at the tail
    pub fn push(&mut self, pair: PooledPair) {
        self.pairs.push_back(pair);
    }

    /// Remove the oldest pair from the pool, the scene and the physics world.
    ///
    /// Returns `None` when the pool is empty. A half that is already gone is
    /// logged and skipped; the pair still leaves the pool.
    pub fn evict_oldest(&mut self, scene: &mut SceneGraph, physics: &mut PhysicsWorld) -> Option<PooledPair> {
        let pair = self.pairs.pop_front()?;

        if scene.remove(pair.object).is_none() {
            log::warn!("Pooled object {:?} was already gone from the scene", pair.object);
        }
        if let Err(e) = physics.remove_body(pair.body) {
            log::warn!("Pooled body could not be removed: {}", e);
        }
        Some(pair)
    }

    /// Copy every pooled body's pose onto its visual object
    pub fn sync_transforms(&self, scene: &mut SceneGraph, physics: &PhysicsWorld) -> usize {
        let mut synced = 0;
        for pair in &self.pairs {
            if let (Some((position, rotation)), Some(object)) = (physics.pose(pair.body), scene.get_mut(pair.object)) {
                object.transform.position = position;
                object.transform.rotation = rotation;
                synced += 1;
            }
        }
        synced
    }

    /// Oldest pair
    pub fn front(&self) -> Option<&PooledPair> {
        self.pairs.front()
    }

    /// Pairs oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PooledPair> {
        self.pairs.iter()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::foundation::math::Vec3;
    use crate::physics::{BodyDesc, BodyShape};
    use crate::scene::{Color, Geometry, Material, SceneObject};

    fn pair(scene: &mut SceneGraph, physics: &mut PhysicsWorld, ms: u64) -> PooledPair {
        let position = Vec3::new(0.0, 5.0, 0.0);
        PooledPair {
            object: scene.add(
                SceneObject::mesh("ball", Geometry::Sphere { radius: 1.0 }, Material::standard(Color::WHITE))
                    .at(position),
            ),
            body: physics.add_body(&BodyDesc::dynamic(BodyShape::Ball { radius: 1.0 }, 1.0).at(position)),
            created_at: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_eviction_is_fifo_and_keeps_halves_aligned() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::new(&PhysicsConfig::default()).expect("physics");
        let mut pool = SpawnPool::new();

        let pairs: Vec<_> = (0..3).map(|i| pair(&mut scene, &mut physics, i * 100)).collect();
        for p in &pairs {
            pool.push(*p);
            assert_eq!(scene.len(), pool.len());
            assert_eq!(physics.body_count(), pool.len());
        }

        for expected in &pairs {
            let evicted = pool.evict_oldest(&mut scene, &mut physics).expect("non-empty");
            assert_eq!(evicted, *expected);
            assert!(!scene.contains(expected.object));
            assert!(!physics.contains(expected.body));
            assert_eq!(scene.len(), pool.len());
            assert_eq!(physics.body_count(), pool.len());
        }

        assert_eq!(pool.evict_oldest(&mut scene, &mut physics), None);
    }

    #[test]
    fn test_eviction_survives_a_missing_body() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::new(&PhysicsConfig::default()).expect("physics");
        let mut pool = SpawnPool::new();
        let first = pair(&mut scene, &mut physics, 0);
        let second = pair(&mut scene, &mut physics, 100);
        pool.push(first);
        pool.push(second);

        physics.remove_body(first.body).expect("live body");
        assert_eq!(pool.evict_oldest(&mut scene, &mut physics), Some(first));
        assert!(!scene.contains(first.object));

        // The next head is untouched and still evicts normally
        assert_eq!(pool.front(), Some(&second));
        assert_eq!(pool.evict_oldest(&mut scene, &mut physics), Some(second));
        assert_eq!(physics.body_count(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_sync_copies_body_pose() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::new(&PhysicsConfig::default()).expect("physics");
        let mut pool = SpawnPool::new();
        let p = pair(&mut scene, &mut physics, 0);
        pool.push(p);

        for _ in 0..10 {
            physics.step();
        }
        assert_eq!(pool.sync_transforms(&mut scene, &physics), 1);

        let (position, _) = physics.pose(p.body).expect("body");
        let object = scene.get(p.object).expect("object");
        assert_eq!(object.transform.position, position);
        assert!(position.y < 5.0);
    }
}
