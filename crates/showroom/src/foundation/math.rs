//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of geometric primitives the
//! showroom needs for picking: rays, planes, spheres and axis-aligned boxes.

pub use nalgebra::{Matrix4, Quaternion, Unit, UnitQuaternion, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder-style rotation override
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder-style uniform scale override
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Set the rotation from XYZ Euler angles (radians), matching the
    /// intrinsic X-then-Y-then-Z order used by most scene tools.
    pub fn set_euler_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = euler_xyz(x, y, z);
    }

    /// Largest scale component, used to inflate bounding spheres
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }
}

/// Build a rotation from XYZ Euler angles (radians).
pub fn euler_xyz(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::x_axis(), x)
        * Quat::from_axis_angle(&Vec3::y_axis(), y)
        * Quat::from_axis_angle(&Vec3::z_axis(), z)
}

/// A ray in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with a plane, returning the hit point.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane lies
    /// behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denominator = plane.normal.dot(&self.direction);
        if denominator.abs() < f32::EPSILON {
            // Parallel: only a hit if the origin already lies on the plane
            return (plane.distance_to_point(self.origin).abs() < f32::EPSILON)
                .then_some(self.origin);
        }

        let t = -plane.distance_to_point(self.origin) / denominator;
        (t >= 0.0).then(|| self.point_at(t))
    }

    /// Intersect with a sphere, returning the nearest non-negative distance
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(&self.direction);
        let c = oc.dot(&oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = -b - sqrt_discriminant;
        let t2 = -b + sqrt_discriminant;
        if t1 >= 0.0 {
            Some(t1)
        } else if t2 >= 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// Plane defined by a unit normal and signed distance from the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (normalized)
    pub normal: Vec3,
    /// Signed distance term: `normal · p + distance = 0` for points on the plane
    pub distance: f32,
}

impl Plane {
    /// Build the plane with the given normal passing through `point`
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(&point),
        }
    }

    /// Signed distance from a point to this plane
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at the origin with the given half extents
    pub fn from_half_extents(half_extents: Vec3) -> Self {
        Self {
            min: -half_extents,
            max: half_extents,
        }
    }

    /// Smallest box containing both `self` and `other`
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Axis-aligned box enclosing this box after `matrix` is applied
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            matrix.transform_point(&Point3::from(corner)).coords
        });

        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for corner in corners {
            min = min.inf(&corner);
            max = max.sup(&corner);
        }
        Self { min, max }
    }

    /// Test ray intersection using the slab method.
    ///
    /// Returns the distance to the entry point, or 0 if the origin is inside.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = |d: f32| if d == 0.0 { f32::INFINITY } else { 1.0 / d };
        let inv_dir = Vec3::new(inv(ray.direction.x), inv(ray.direction.y), inv(ray.direction.z));

        let t1 = (self.min.x - ray.origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray.origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray.origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray.origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray.origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray.origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_plane_through_origin() {
        let plane = Plane::from_normal_and_point(Vec3::new(0.0, 0.0, 1.0), Vec3::zeros());
        let ray = Ray::new(Vec3::new(1.0, 2.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = ray.intersect_plane(&plane).expect("ray should hit plane");
        assert_relative_eq!(hit, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_ray_misses_plane_behind_origin() {
        let plane = Plane::from_normal_and_point(Vec3::new(0.0, 0.0, 1.0), Vec3::zeros());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn test_parallel_ray_misses_plane() {
        let plane = Plane::from_normal_and_point(Vec3::new(0.0, 1.0, 0.0), Vec3::zeros());
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn test_ray_sphere_nearest_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_sphere(Vec3::zeros(), 2.0).expect("hit");
        assert_relative_eq!(t, 8.0, epsilon = 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_aabb_slab_intersection() {
        let aabb = Aabb::from_half_extents(Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(aabb.intersect_ray(&ray).expect("hit"), 4.0, epsilon = 1e-5);

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&miss).is_none());
    }

    #[test]
    fn test_aabb_transformed_by_translation_and_scale() {
        let aabb = Aabb::from_half_extents(Vec3::new(1.0, 1.0, 1.0));
        let matrix = Transform::from_position(Vec3::new(0.0, 5.0, 0.0))
            .with_uniform_scale(3.0)
            .to_matrix();
        let moved = aabb.transformed(&matrix);
        assert_relative_eq!(moved.min, Vec3::new(-3.0, 2.0, -3.0), epsilon = 1e-5);
        assert_relative_eq!(moved.max, Vec3::new(3.0, 8.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_euler_rotation_about_x() {
        let q = euler_xyz(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let rotated = q * Vec3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }
}
