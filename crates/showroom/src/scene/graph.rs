//! Scene graph
//!
//! Flat storage of every visual object keyed by a generational [`ObjectId`],
//! plus scene-wide environment state. Ray queries test each object's local
//! bounding volume and return hits nearest first.

use super::material::{Color, Material};
use crate::assets::{ModelAsset, Texture};
use crate::foundation::math::{Aabb, Point3, Ray, Transform, Vec3};
use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};
use std::rc::Rc;

new_key_type! {
    /// Identity of an object in the scene graph
    pub struct ObjectId;
}

bitflags! {
    /// Shadow participation of an object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ShadowFlags: u8 {
        /// Object occludes light
        const CAST = 0b01;
        /// Object shows shadows cast on it
        const RECEIVE = 0b10;
    }
}

/// Procedural mesh shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// UV sphere centred on the origin
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Box centred on the origin
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Torus lying in the XY plane
    Torus {
        /// Distance from the centre to the middle of the tube
        radius: f32,
        /// Tube radius
        tube: f32,
    },
}

impl Geometry {
    /// Bounding volume in object space
    pub fn bounds(&self) -> Bounds {
        match *self {
            Self::Sphere { radius } => Bounds::Sphere {
                center: Vec3::zeros(),
                radius,
            },
            Self::Box { width, height, depth } => {
                Bounds::Box(Aabb::from_half_extents(Vec3::new(width, height, depth) * 0.5))
            }
            Self::Torus { radius, tube } => {
                let outer = radius + tube;
                Bounds::Box(Aabb::from_half_extents(Vec3::new(outer, outer, tube)))
            }
        }
    }
}

/// Object-space bounding volume used for ray queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Not pickable
    None,
    /// Exact sphere
    Sphere {
        /// Sphere centre
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned box
    Box(Aabb),
}

/// Orthographic shadow camera of a directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    /// Half width and half height of the frustum
    pub extent: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
    /// Shadow map resolution (square)
    pub map_size: u32,
}

/// A light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel light shining from the object's position towards the origin
    Directional {
        /// Light colour
        color: Color,
        /// Intensity multiplier
        intensity: f32,
        /// Shadow settings, when the light casts shadows
        shadow: Option<ShadowCamera>,
    },
    /// Uniform light from every direction
    Ambient {
        /// Light colour
        color: Color,
        /// Intensity multiplier
        intensity: f32,
    },
}

/// What an object draws
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Procedural geometry
    Mesh {
        /// Shape
        geometry: Geometry,
        /// Surface
        material: Material,
    },
    /// Instance of a loaded model; every mesh uses the same material
    Model {
        /// Shared model data
        model: Rc<ModelAsset>,
        /// Surface override
        material: Material,
    },
    /// Light source
    Light(Light),
}

/// A visual object
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Debug name
    pub name: String,
    /// Placement in world space
    pub transform: Transform,
    /// Drawable or light
    pub kind: ObjectKind,
    /// Shadow participation
    pub shadows: ShadowFlags,
    /// Hidden objects are neither drawn nor picked
    pub visible: bool,
}

impl SceneObject {
    fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            shadows: ShadowFlags::empty(),
            visible: true,
        }
    }

    /// Procedural mesh
    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(name, ObjectKind::Mesh { geometry, material })
    }

    /// Model instance
    pub fn model(name: impl Into<String>, model: Rc<ModelAsset>, material: Material) -> Self {
        Self::new(name, ObjectKind::Model { model, material })
    }

    /// Light source
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, ObjectKind::Light(light))
    }

    /// Builder-style transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder-style position
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder-style shadow flags
    #[must_use]
    pub fn with_shadows(mut self, shadows: ShadowFlags) -> Self {
        self.shadows = shadows;
        self
    }

    /// Surface material, for drawables
    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            ObjectKind::Mesh { material, .. } | ObjectKind::Model { material, .. } => Some(material),
            ObjectKind::Light(_) => None,
        }
    }

    /// Mutable surface material, for drawables
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            ObjectKind::Mesh { material, .. } | ObjectKind::Model { material, .. } => Some(material),
            ObjectKind::Light(_) => None,
        }
    }

    /// Bounding volume in object space
    pub fn local_bounds(&self) -> Bounds {
        match &self.kind {
            ObjectKind::Mesh { geometry, .. } => geometry.bounds(),
            ObjectKind::Model { model, .. } => model.bounds().map_or(Bounds::None, Bounds::Box),
            ObjectKind::Light(_) => Bounds::None,
        }
    }

    /// World-space distance along `ray` at which it enters this object
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let bounds = self.local_bounds();
        if bounds == Bounds::None || !self.visible {
            return None;
        }

        let world = self.transform.to_matrix();
        let inverse = world.try_inverse()?;
        let origin = inverse.transform_point(&Point3::from(ray.origin)).coords;
        let direction = inverse.transform_vector(&ray.direction);
        if direction.norm_squared() <= f32::EPSILON {
            return None;
        }
        let local = Ray::new(origin, direction);

        let t = match bounds {
            Bounds::Sphere { center, radius } => local.intersect_sphere(center, radius),
            Bounds::Box(aabb) => aabb.intersect_ray(&local),
            Bounds::None => None,
        }?;

        let hit = world.transform_point(&Point3::from(local.point_at(t))).coords;
        Some((hit - ray.origin).norm())
    }
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Fog colour
    pub color: Color,
    /// Distance where fog starts
    pub near: f32,
    /// Distance of full fog
    pub far: f32,
}

/// Scene-wide environment
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Backdrop texture
    pub background: Option<Rc<Texture>>,
    /// Image-based lighting source
    pub environment: Option<Rc<Texture>>,
    /// Distance fog
    pub fog: Option<Fog>,
}

/// One ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Object hit
    pub object: ObjectId,
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// The set of visual objects
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: SlotMap<ObjectId, SceneObject>,
    /// Background, lighting environment and fog
    pub environment: Environment,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Remove an object, returning it if it was present
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.objects.remove(id)
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Look up an object mutably
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Whether `id` is in the scene
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over every object
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    /// Use `texture` as both backdrop and lighting environment
    pub fn set_environment_map(&mut self, texture: Rc<Texture>) {
        self.environment.background = Some(Rc::clone(&texture));
        self.environment.environment = Some(texture);
    }

    /// Every object hit by `ray`, nearest first
    pub fn intersect_ray(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits: Vec<_> = self
            .objects
            .iter()
            .filter_map(|(object, scene_object)| {
                scene_object.intersect_ray(ray).map(|distance| Intersection {
                    object,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
