//! Rigid-body physics
//!
//! A thin owner of a `rapier3d` pipeline. Bodies are added from a
//! [`BodyDesc`], stepped with a fixed time step and read back as poses.

pub mod body;

pub use body::{BodyDesc, BodyKind, BodyShape, ContactMaterial};

use crate::config::PhysicsConfig;
use crate::foundation::math::{Quat, Vec3};
use rapier3d::na::{Isometry3, Translation3};
use rapier3d::prelude::*;
use thiserror::Error;

/// Handle to a body in the [`PhysicsWorld`]
pub type BodyHandle = RigidBodyHandle;

/// Physics errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    /// The handle does not refer to a live body
    #[error("Unknown rigid body {0:?}")]
    UnknownBody(BodyHandle),

    /// Time steps must be positive and finite
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f32),
}

/// Simulated rigid bodies under uniform gravity
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    steps: u64,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        let mut world = Self {
            gravity: Vec3::from(config.gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            steps: 0,
        };
        world.set_time_step(config.time_step)?;
        Ok(world)
    }

    /// Change the fixed step used by [`Self::step`]
    pub fn set_time_step(&mut self, dt: f32) -> Result<(), PhysicsError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        self.integration_parameters.dt = dt;
        Ok(())
    }

    /// Fixed step in seconds
    pub fn time_step(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Gravity vector
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Create a body and its collider
    pub fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .position(Isometry3::from_parts(Translation3::from(desc.position), desc.rotation))
            .linvel(desc.linear_velocity)
            .angvel(desc.angular_velocity)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(false)
            .build();

        let collider = match desc.shape {
            BodyShape::Ball { radius } => ColliderBuilder::ball(radius),
            BodyShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            BodyShape::Cylinder { radius, height } => ColliderBuilder::cylinder(height * 0.5, radius),
        }
        .friction(desc.contact.friction)
        .restitution(desc.contact.restitution);
        let collider = match desc.kind {
            BodyKind::Dynamic => collider.mass(desc.mass),
            BodyKind::Static => collider,
        }
        .build();

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        log::trace!("Added {:?} body {:?} at {:?}", desc.kind, handle, desc.position);
        handle
    }

    /// Remove a body together with its collider
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .map(|_| ())
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Advance the simulation by one fixed step
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.steps += 1;
    }

    /// Position and orientation of a body
    pub fn pose(&self, handle: BodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies
            .get(handle)
            .map(|body| (*body.translation(), *body.rotation()))
    }

    /// Linear velocity of a body
    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| *body.linvel())
    }

    /// Angular velocity of a body
    pub fn angular_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| *body.angvel())
    }

    /// Whether `handle` refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of live colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
