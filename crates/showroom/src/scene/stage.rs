//! The showroom's fixed content
//!
//! [`Stage::build`] populates an empty scene and physics world with the
//! ground, the two dynamic primitives, the decorative meshes and the lights.
//! Loaded models are placed later through [`place_sofa`] and [`place_logo`].

use crate::assets::ModelAsset;
use crate::config::SpawnConfig;
use crate::controls::Options;
use crate::foundation::math::{euler_xyz, Transform, Vec3};
use crate::physics::{BodyDesc, BodyHandle, BodyShape, ContactMaterial, PhysicsWorld};
use crate::scene::{
    Color, Fog, Geometry, Light, Material, ObjectId, PhysicalParams, SceneGraph, SceneObject,
    ShadowCamera, ShadowFlags, Side, StandardParams, TextureBinding,
};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::rc::Rc;

/// Ground slab height below the origin
pub const GROUND_Y: f32 = -4.0;

/// A visual object driven by a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLink {
    /// Visual half
    pub object: ObjectId,
    /// Physical half
    pub body: BodyHandle,
}

/// Handles to the fixed scene content
#[derive(Debug, Clone)]
pub struct Stage {
    /// Ground slab
    pub ground: ObjectId,
    /// Dynamic sphere
    pub sphere: ObjectId,
    /// Dynamic box
    pub cube: ObjectId,
    /// Spinning torus
    pub torus: ObjectId,
    /// Sphere tracked by the hover highlighter and the control panel
    pub hover_sphere: ObjectId,
    /// Custom-shaded sphere
    pub shader_sphere: ObjectId,
    /// Shadow-casting directional light
    pub sun: ObjectId,
    /// Ambient fill light
    pub ambient: ObjectId,
    links: Vec<BodyLink>,
}

impl Stage {
    /// Build the fixed content into `scene` and `physics`
    pub fn build(scene: &mut SceneGraph, physics: &mut PhysicsWorld, options: &Options, spawn: &SpawnConfig) -> Self {
        let mut links = Vec::with_capacity(3);
        let mut link = |scene: &mut SceneGraph, physics: &mut PhysicsWorld, object: SceneObject, body: &BodyDesc| {
            let object = scene.add(
                object.with_transform(Transform::from_position(body.position).with_rotation(body.rotation)),
            );
            let body = physics.add_body(body);
            links.push(BodyLink { object, body });
            object
        };

        let ground = link(
            scene,
            physics,
            SceneObject::mesh(
                "ground",
                Geometry::Box {
                    width: 60.0,
                    height: 60.0,
                    depth: 2.0,
                },
                Material::standard(Color::from_hex(0xf0f0f0)).with_side(Side::Double),
            )
            .with_shadows(ShadowFlags::RECEIVE),
            &BodyDesc::fixed(BodyShape::Cuboid {
                half_extents: Vec3::new(30.0, 30.0, 1.0),
            })
            .at(Vec3::new(0.0, GROUND_Y, 0.0))
            .rotated(euler_xyz(-FRAC_PI_2, 0.0, 0.0))
            .with_contact(ContactMaterial {
                friction: spawn.friction,
                restitution: spawn.restitution,
            }),
        );

        let sphere = link(
            scene,
            physics,
            SceneObject::mesh("sphere", Geometry::Sphere { radius: 2.0 }, Material::standard(Color::RED))
                .with_shadows(ShadowFlags::CAST),
            &BodyDesc::dynamic(BodyShape::Ball { radius: 2.0 }, 10.0)
                .at(Vec3::new(14.0, 10.0, 0.0))
                .damped(0.31, 0.01),
        );

        let cube = link(
            scene,
            physics,
            SceneObject::mesh(
                "box",
                Geometry::Box {
                    width: 2.0,
                    height: 2.0,
                    depth: 2.0,
                },
                Material::standard(Color::GREEN),
            )
            .with_shadows(ShadowFlags::CAST),
            &BodyDesc::dynamic(
                BodyShape::Cuboid {
                    half_extents: Vec3::new(1.0, 1.0, 1.0),
                },
                40.0,
            )
            .at(Vec3::new(15.5, 13.0, 8.0))
            .spinning(Vec3::new(0.0, 5.0, 2.0)),
        );

        let torus = scene.add(
            SceneObject::mesh(
                "torus",
                Geometry::Torus { radius: 1.0, tube: 0.4 },
                Material::standard(Color::GREEN),
            )
            .at(Vec3::new(0.0, 2.0, 0.0))
            .with_shadows(ShadowFlags::CAST),
        );

        let hover_sphere = scene.add(
            SceneObject::mesh("hoverSphere", Geometry::Sphere { radius: 1.0 }, {
                let mut material = Material::standard(options.sphere_color);
                material.wireframe = options.wireframe;
                material
            })
            .at(Vec3::new(options.x, options.y, options.z))
            .with_shadows(ShadowFlags::CAST),
        );

        let shader_sphere = scene.add(
            SceneObject::mesh("sphere2", Geometry::Sphere { radius: 2.5 }, Material::custom("sphere2"))
                .at(Vec3::new(3.0, 3.0, -5.0))
                .with_shadows(ShadowFlags::CAST),
        );

        let sun = scene.add(
            SceneObject::light(
                "sun",
                Light::Directional {
                    color: Color::WHITE,
                    intensity: 1.0,
                    shadow: Some(ShadowCamera {
                        extent: 40.0,
                        near: 0.1,
                        far: 100.0,
                        map_size: 3072,
                    }),
                },
            )
            .at(Vec3::new(10.0, 15.0, 10.0))
            .with_shadows(ShadowFlags::CAST),
        );

        let ambient = scene.add(SceneObject::light(
            "ambient",
            Light::Ambient {
                color: Color::from_hex(0xffff00),
                intensity: 0.1,
            },
        ));

        scene.environment.fog = Some(Fog {
            color: Color::WHITE,
            near: 0.2,
            far: 500.0,
        });

        log::info!("Stage built: {} objects, {} bodies", scene.len(), physics.body_count());
        Self {
            ground,
            sphere,
            cube,
            torus,
            hover_sphere,
            shader_sphere,
            sun,
            ambient,
            links,
        }
    }

    /// Objects driven by the stage's own bodies
    pub fn links(&self) -> &[BodyLink] {
        &self.links
    }

    /// Copy each linked body's pose onto its object
    pub fn sync_bodies(&self, scene: &mut SceneGraph, physics: &PhysicsWorld) -> usize {
        let mut synced = 0;
        for link in &self.links {
            if let (Some((position, rotation)), Some(object)) = (physics.pose(link.body), scene.get_mut(link.object)) {
                object.transform.position = position;
                object.transform.rotation = rotation;
                synced += 1;
            }
        }
        synced
    }
}

/// Red standard material given to the sofa
pub fn sofa_material() -> Material {
    Material::standard_with(
        Color::RED,
        StandardParams {
            metalness: 0.5,
            roughness: 0.3,
        },
    )
}

/// Add the sofa model to the scene
pub fn place_sofa(scene: &mut SceneGraph, model: Rc<ModelAsset>) -> ObjectId {
    scene.add(
        SceneObject::model("sofa", model, sofa_material())
            .with_transform(Transform::from_position(Vec3::new(0.0, 5.0, 0.0)).with_uniform_scale(3.0))
            .with_shadows(ShadowFlags::CAST | ShadowFlags::RECEIVE),
    )
}

/// Clear-coated white material for logo instances
pub fn logo_material(map: Option<TextureBinding>) -> Material {
    Material::physical(
        Color::WHITE,
        PhysicalParams {
            standard: StandardParams::default(),
            clearcoat: 0.5,
            clearcoat_roughness: 0.2,
        },
    )
    .with_map(map)
    .with_env_map_intensity(1.5)
}

/// Add the static showcase logo
pub fn place_logo(scene: &mut SceneGraph, model: Rc<ModelAsset>, material: Material) -> ObjectId {
    scene.add(
        SceneObject::model("logo", model, material)
            .with_transform(
                Transform::from_position(Vec3::new(3.0, 4.0, 7.0)).with_rotation(euler_xyz(FRAC_PI_4, 0.0, 0.0)),
            )
            .with_shadows(ShadowFlags::CAST | ShadowFlags::RECEIVE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::scene::ObjectKind;
    use approx::assert_relative_eq;

    fn build() -> (SceneGraph, PhysicsWorld, Stage) {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::new(&PhysicsConfig::default()).expect("physics");
        let stage = Stage::build(&mut scene, &mut physics, &Options::default(), &SpawnConfig::default());
        (scene, physics, stage)
    }

    #[test]
    fn test_stage_contents() {
        let (scene, physics, stage) = build();
        assert_eq!(scene.len(), 8);
        assert_eq!(physics.body_count(), 3);
        assert_eq!(stage.links().len(), 3);
        assert!(scene.environment.fog.is_some());

        let hover = scene.get(stage.hover_sphere).expect("hover sphere");
        assert_eq!(hover.transform.position, Vec3::new(4.0, 2.0, 4.0));
        assert_eq!(hover.material().map(|m| m.color), Some(Color::RED));

        let ground = scene.get(stage.ground).expect("ground");
        assert!(ground.shadows.contains(ShadowFlags::RECEIVE));
        assert!(!ground.shadows.contains(ShadowFlags::CAST));
        assert!(matches!(scene.get(stage.sun).map(|o| &o.kind), Some(ObjectKind::Light(_))));
    }

    #[test]
    fn test_dynamic_primitives_fall_and_follow_their_bodies() {
        let (mut scene, mut physics, stage) = build();
        for _ in 0..30 {
            physics.step();
        }
        assert_eq!(stage.sync_bodies(&mut scene, &physics), 3);

        let sphere = scene.get(stage.sphere).expect("sphere").transform.position;
        assert!(sphere.y < 10.0);
        assert_relative_eq!(sphere.x, 14.0, epsilon = 1e-3);

        // Ground is static, but its rotation is copied too
        let ground = &scene.get(stage.ground).expect("ground").transform;
        assert_relative_eq!(ground.position.y, GROUND_Y);
        assert_relative_eq!(ground.rotation.angle(), FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn test_model_placement() {
        use crate::assets::model::tests::logo_glb;

        let mut scene = SceneGraph::new();
        let model = Rc::new(ModelAsset::parse("untitled.glb", &logo_glb()).expect("model"));
        let sofa = place_sofa(&mut scene, Rc::clone(&model));
        let logo = place_logo(&mut scene, model, logo_material(None));

        let sofa = scene.get(sofa).expect("sofa");
        assert_relative_eq!(sofa.transform.max_scale(), 3.0);
        assert_eq!(sofa.material(), Some(&sofa_material()));

        let logo = scene.get(logo).expect("logo");
        assert_eq!(logo.transform.position, Vec3::new(3.0, 4.0, 7.0));
        assert_eq!(logo.material().map(|m| m.env_map_intensity), Some(1.5));
    }
}
