//! glTF / GLB model description
//!
//! Only what the showroom needs is kept: per-mesh bounds in model space (for
//! pointer ray queries) and the base-colour texture the logo material reuses.

use super::AssetError;
use crate::foundation::math::{Aabb, Mat4, Vec3};
use crate::scene::material::TextureBinding;

/// One mesh instance placed by the model's node hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    /// Mesh name, when the file provides one
    pub name: Option<String>,
    /// Bounds in model space, after node transforms
    pub bounds: Option<Aabb>,
    /// glTF texture index of the base-colour map
    pub base_color_texture: Option<usize>,
}

/// Parsed model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    /// Location the model was loaded from
    pub url: String,
    /// Mesh instances in traversal order
    pub meshes: Vec<ModelMesh>,
    /// Number of textures declared by the file
    pub texture_count: usize,
}

impl ModelAsset {
    /// Parse a GLB container or a glTF JSON document
    pub fn parse(url: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let document = gltf::Gltf::from_slice(bytes).map_err(|e| AssetError::Model {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let mut meshes = Vec::new();
        match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    collect_meshes(&node, &Mat4::identity(), &mut meshes);
                }
            }
            None => {
                meshes.extend(document.meshes().map(|mesh| describe_mesh(&mesh, &Mat4::identity())));
            }
        }

        log::debug!("Parsed model {}: {} mesh instance(s)", url, meshes.len());
        Ok(Self {
            url: url.to_string(),
            meshes,
            texture_count: document.textures().count(),
        })
    }

    /// Bounds enclosing every mesh
    pub fn bounds(&self) -> Option<Aabb> {
        self.meshes
            .iter()
            .filter_map(|mesh| mesh.bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// First base-colour map found while traversing the meshes
    pub fn base_color_map(&self) -> Option<TextureBinding> {
        self.meshes
            .iter()
            .find_map(|mesh| mesh.base_color_texture)
            .map(|texture| TextureBinding {
                asset: self.url.clone(),
                texture,
            })
    }
}

fn collect_meshes(node: &gltf::Node<'_>, parent: &Mat4, out: &mut Vec<ModelMesh>) {
    let world = parent * Mat4::from(node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        out.push(describe_mesh(&mesh, &world));
    }
    for child in node.children() {
        collect_meshes(&child, &world, out);
    }
}

fn describe_mesh(mesh: &gltf::Mesh<'_>, world: &Mat4) -> ModelMesh {
    let mut bounds: Option<Aabb> = None;
    let mut base_color_texture = None;

    for primitive in mesh.primitives() {
        if let Some(local) = primitive
            .get(&gltf::Semantic::Positions)
            .and_then(|accessor| accessor_bounds(&accessor))
        {
            let placed = local.transformed(world);
            bounds = Some(bounds.map_or(placed, |acc| acc.union(&placed)));
        }

        if base_color_texture.is_none() {
            base_color_texture = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
                .map(|info| info.texture().index());
        }
    }

    ModelMesh {
        name: mesh.name().map(str::to_string),
        bounds,
        base_color_texture,
    }
}

fn accessor_bounds(accessor: &gltf::Accessor<'_>) -> Option<Aabb> {
    Some(Aabb::new(json_vec3(&accessor.min()?)?, json_vec3(&accessor.max()?)?))
}

#[allow(clippy::cast_possible_truncation)]
fn json_vec3(value: &gltf::json::Value) -> Option<Vec3> {
    let components = value.as_array()?;
    let component = |i: usize| components.get(i).and_then(gltf::json::Value::as_f64);
    Some(Vec3::new(
        component(0)? as f32,
        component(1)? as f32,
        component(2)? as f32,
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Wrap a JSON document and an optional binary payload in a GLB container
    pub(crate) fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let pad = |mut chunk: Vec<u8>, fill: u8| {
            while chunk.len() % 4 != 0 {
                chunk.push(fill);
            }
            chunk
        };
        let json = pad(json.as_bytes().to_vec(), b' ');
        let bin = pad(bin.to_vec(), 0);

        let mut total = 12 + 8 + json.len();
        if !bin.is_empty() {
            total += 8 + bin.len();
        }
        let word = |n: usize| u32::try_from(n).expect("small glb").to_le_bytes();

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(b"glTF");
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&word(total));
        bytes.extend_from_slice(&word(json.len()));
        bytes.extend_from_slice(b"JSON");
        bytes.extend_from_slice(&json);
        if !bin.is_empty() {
            bytes.extend_from_slice(&word(bin.len()));
            bytes.extend_from_slice(b"BIN\0");
            bytes.extend_from_slice(&bin);
        }
        bytes
    }

    /// GLB with a single disc-shaped mesh, placed by a translated node
    pub(crate) fn logo_glb() -> Vec<u8> {
        glb(
            r#"{
            "asset": {"version": "2.0"},
            "buffers": [{"byteLength": 36}],
            "bufferViews": [{"buffer": 0, "byteLength": 36}],
            "accessors": [{
                "bufferView": 0,
                "componentType": 5126,
                "count": 3,
                "type": "VEC3",
                "min": [-1.0, -0.15, -1.0],
                "max": [1.0, 0.15, 1.0]
            }],
            "meshes": [{"name": "logo", "primitives": [{"attributes": {"POSITION": 0}}]}],
            "nodes": [{"mesh": 0, "translation": [0.0, 1.0, 0.0]}],
            "scenes": [{"nodes": [0]}],
            "scene": 0
        }"#,
            &[0; 36],
        )
    }

    /// GLB with no meshes at all
    pub(crate) fn empty_glb() -> Vec<u8> {
        glb(r#"{"asset":{"version":"2.0"}}"#, &[])
    }

    #[test]
    fn test_parse_empty_document() {
        let model = ModelAsset::parse("untitled.glb", &empty_glb()).expect("parse");
        assert!(model.meshes.is_empty());
        assert!(model.bounds().is_none());
        assert!(model.base_color_map().is_none());
    }

    #[test]
    fn test_mesh_bounds_follow_node_transform() {
        let model = ModelAsset::parse("aphos.glb", &logo_glb()).expect("parse");
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].name.as_deref(), Some("logo"));

        let bounds = model.bounds().expect("bounds");
        assert_relative_eq!(bounds.min, Vec3::new(-1.0, 0.85, -1.0), epsilon = 1e-5);
        assert_relative_eq!(bounds.max, Vec3::new(1.0, 1.15, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_bytes_are_a_model_error() {
        let err = ModelAsset::parse("broken.glb", b"glTF nonsense").expect_err("garbage");
        assert!(matches!(err, AssetError::Model { .. }));
    }
}
