//! Rigid-body descriptions

use crate::foundation::math::{Quat, Vec3};

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Sphere
    Ball {
        /// Radius
        radius: f32,
    },
    /// Box given by half extents
    Cuboid {
        /// Half size along each axis
        half_extents: Vec3,
    },
    /// Cylinder along the local Y axis
    Cylinder {
        /// Radius of both caps
        radius: f32,
        /// Full height
        height: f32,
    },
}

/// Whether the body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// Simulated under forces
    #[default]
    Dynamic,
    /// Immovable
    Static,
}

/// Friction and restitution of a body's surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    /// Friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

/// Everything needed to create a rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Dynamic or static
    pub kind: BodyKind,
    /// Collision shape
    pub shape: BodyShape,
    /// Mass in kilograms; ignored for static bodies
    pub mass: f32,
    /// Initial position
    pub position: Vec3,
    /// Initial orientation
    pub rotation: Quat,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Initial angular velocity (rad/s)
    pub angular_velocity: Vec3,
    /// Linear velocity damping
    pub linear_damping: f32,
    /// Angular velocity damping
    pub angular_damping: f32,
    /// Surface response
    pub contact: ContactMaterial,
}

impl BodyDesc {
    /// Dynamic body with the given shape and mass, at rest at the origin
    pub fn dynamic(shape: BodyShape, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            mass,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            linear_damping: 0.01,
            angular_damping: 0.01,
            contact: ContactMaterial::default(),
        }
    }

    /// Static body with the given shape
    pub fn fixed(shape: BodyShape) -> Self {
        Self {
            kind: BodyKind::Static,
            mass: 0.0,
            ..Self::dynamic(shape, 0.0)
        }
    }

    /// Builder-style position
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder-style orientation
    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder-style angular velocity
    #[must_use]
    pub fn spinning(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Builder-style damping
    #[must_use]
    pub fn damped(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Builder-style contact material
    #[must_use]
    pub fn with_contact(mut self, contact: ContactMaterial) -> Self {
        self.contact = contact;
        self
    }
}
