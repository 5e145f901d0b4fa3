//! Scene management
//!
//! - [`graph`]: visual objects and ray queries
//! - [`material`]: surface descriptions
//! - [`camera`]: the viewing camera
//! - [`stage`]: the showroom's fixed content

pub mod camera;
pub mod graph;
pub mod material;
pub mod stage;

pub use camera::Camera;
pub use graph::{
    Bounds, Environment, Fog, Geometry, Intersection, Light, ObjectId, ObjectKind, SceneGraph,
    SceneObject, ShadowCamera, ShadowFlags,
};
pub use material::{Color, Material, PhysicalParams, Shading, Side, StandardParams, TextureBinding};
pub use stage::Stage;
