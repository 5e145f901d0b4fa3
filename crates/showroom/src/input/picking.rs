//! Pointer picking and hover highlighting
//!
//! The pick point for spawning is where the cursor ray meets a plane through
//! the scene origin, facing the camera. It is recomputed only when the pointer
//! moves. Hover testing casts a fresh ray against the whole scene every frame.

use crate::foundation::math::{Plane, Ray, Vec2, Vec3};
use crate::scene::{Camera, Color, ObjectId, SceneGraph, SceneObject};

/// Plane through the origin whose normal points from the origin to the camera
pub fn reference_plane(camera: &Camera) -> Option<Plane> {
    let normal = camera.position.try_normalize(f32::EPSILON)?;
    Some(Plane::from_normal_and_point(normal, Vec3::zeros()))
}

/// World point under `ndc` on the reference plane
pub fn pick_point(ndc: Vec2, camera: &Camera) -> Option<Vec3> {
    let plane = reference_plane(camera)?;
    camera.ray_through_ndc(ndc)?.intersect_plane(&plane)
}

/// Caches the world-space point under the cursor
#[derive(Debug, Clone, Default)]
pub struct PointerPicker {
    world_point: Option<Vec3>,
}

impl PointerPicker {
    /// No point until the first pointer move
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the pick point for a pointer move
    pub fn update(&mut self, ndc: Vec2, camera: &Camera) -> Option<Vec3> {
        self.world_point = pick_point(ndc, camera);
        if self.world_point.is_none() {
            log::trace!("Pick miss at {:?}", ndc);
        }
        self.world_point
    }

    /// Last computed pick point
    pub fn world_point(&self) -> Option<Vec3> {
        self.world_point
    }
}

/// Highlights one tracked object while the pointer ray touches it.
///
/// The highlight is not latched: every update either re-asserts the highlight
/// colour or resets the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverHighlighter {
    target: ObjectId,
    highlight: Color,
}

impl HoverHighlighter {
    /// Track `target`, painting it `highlight` while hovered
    pub fn new(target: ObjectId, highlight: Color) -> Self {
        Self { target, highlight }
    }

    /// Tracked object
    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// Run one hover pass; returns whether the target is hovered
    pub fn update(&self, scene: &mut SceneGraph, ray: Option<&Ray>, default_color: Color) -> bool {
        let hovered = ray.is_some_and(|ray| {
            scene
                .intersect_ray(ray)
                .iter()
                .any(|hit| hit.object == self.target)
        });

        let color = if hovered { self.highlight } else { default_color };
        if let Some(material) = scene.get_mut(self.target).and_then(SceneObject::material_mut) {
            material.color = color;
        }
        hovered
    }
}
