//! Floating-point textures decoded with the `image` crate

use super::AssetError;
use image::ImageFormat;

/// How a texture is projected onto geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureMapping {
    /// Ordinary UV mapping
    #[default]
    Uv,
    /// Equirectangular panorama sampled by reflection direction
    EquirectangularReflection,
}

/// Decoded RGBA32F image
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Location the texture was loaded from
    pub url: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA samples
    pub pixels: Vec<f32>,
    /// Projection used when sampling
    pub mapping: TextureMapping,
}

impl Texture {
    /// Decode an OpenEXR image
    pub fn decode_exr(url: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        Self::decode(url, bytes, ImageFormat::OpenExr)
    }

    /// Decode an image of a known format into RGBA32F
    pub fn decode(url: &str, bytes: &[u8], format: ImageFormat) -> Result<Self, AssetError> {
        let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            AssetError::Texture {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        let rgba = image.into_rgba32f();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            url: url.to_string(),
            width,
            height,
            pixels: rgba.into_raw(),
            mapping: TextureMapping::Uv,
        })
    }

    /// Builder-style mapping override
    #[must_use]
    pub fn with_mapping(mut self, mapping: TextureMapping) -> Self {
        self.mapping = mapping;
        self
    }
}
