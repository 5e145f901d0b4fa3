//! Surface materials for scene meshes and models

use std::fmt;

/// 24-bit RGB colour stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    /// Pure white
    pub const WHITE: Self = Self(0xffffff);
    /// Pure red
    pub const RED: Self = Self(0xff0000);
    /// Pure green
    pub const GREEN: Self = Self(0x00ff00);
    /// Pure blue
    pub const BLUE: Self = Self(0x0000ff);

    /// Build from a hex value; bits above the low 24 are dropped
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// Hex value `0xRRGGBB`
    pub const fn hex(self) -> u32 {
        self.0
    }

    /// Red, green and blue channels in `[0, 1]`
    pub fn to_rgb(self) -> [f32; 3] {
        let channel = |shift: u32| f32::from(((self.0 >> shift) & 0xff) as u8) / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Parameters of the metallic/roughness standard material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardParams {
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metalness: f32,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
}

impl Default for StandardParams {
    fn default() -> Self {
        Self {
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

/// Standard parameters plus a clear-coat layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalParams {
    /// Base metallic/roughness parameters
    pub standard: StandardParams,
    /// Clear-coat layer strength
    pub clearcoat: f32,
    /// Clear-coat layer roughness
    pub clearcoat_roughness: f32,
}

/// Shading model of a material
#[derive(Debug, Clone, PartialEq)]
pub enum Shading {
    /// Metallic/roughness PBR
    Standard(StandardParams),
    /// PBR with clear coat
    Physical(PhysicalParams),
    /// User shader program, identified by name
    Custom {
        /// Program name resolved by the renderer
        program: String,
    },
}

/// Reference to an image embedded in a loaded model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    /// Asset URL of the model carrying the image
    pub asset: String,
    /// glTF texture index inside that model
    pub texture: usize,
}

/// Which faces of a mesh are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Front faces only
    #[default]
    Front,
    /// Both faces
    Double,
}

/// A surface material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base colour
    pub color: Color,
    /// Shading model and its parameters
    pub shading: Shading,
    /// Render as wireframe
    pub wireframe: bool,
    /// Face culling
    pub side: Side,
    /// Base-colour map
    pub map: Option<TextureBinding>,
    /// Scale applied to the scene environment map's contribution
    pub env_map_intensity: f32,
}

impl Material {
    /// Standard material with the given colour and default parameters
    pub fn standard(color: Color) -> Self {
        Self::standard_with(color, StandardParams::default())
    }

    /// Standard material with explicit parameters
    pub fn standard_with(color: Color, params: StandardParams) -> Self {
        Self {
            color,
            shading: Shading::Standard(params),
            wireframe: false,
            side: Side::Front,
            map: None,
            env_map_intensity: 1.0,
        }
    }

    /// Clear-coated physical material
    pub fn physical(color: Color, params: PhysicalParams) -> Self {
        Self {
            shading: Shading::Physical(params),
            ..Self::standard(color)
        }
    }

    /// Material rendered by a named shader program
    pub fn custom(program: impl Into<String>) -> Self {
        Self {
            shading: Shading::Custom {
                program: program.into(),
            },
            ..Self::standard(Color::WHITE)
        }
    }

    /// Builder-style face culling override
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Builder-style base-colour map
    #[must_use]
    pub fn with_map(mut self, map: Option<TextureBinding>) -> Self {
        self.map = map;
        self
    }

    /// Builder-style environment intensity
    #[must_use]
    pub fn with_env_map_intensity(mut self, intensity: f32) -> Self {
        self.env_map_intensity = intensity;
        self
    }
}
