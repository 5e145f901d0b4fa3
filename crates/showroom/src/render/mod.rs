//! Rendering contract
//!
//! The showroom never draws anything itself. A [`RenderBackend`] consumes the
//! scene graph and camera once per frame and must not mutate either.
//! [`HeadlessRenderer`] is the in-crate backend: it records what it was
//! asked to draw, which is all the host-independent code and tests need.

use crate::foundation::math::Vec3;
use crate::scene::{Camera, ObjectKind, SceneGraph, ShadowFlags};
use thiserror::Error;

/// Rendering errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The output surface is gone
    #[error("Render surface lost: {0}")]
    SurfaceLost(String),

    /// The backend failed to draw
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Tone curve applied before output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    /// Clamp only
    None,
    /// ACES filmic curve
    #[default]
    AcesFilmic,
}

/// Renderer-wide output settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Tone curve
    pub tone_mapping: ToneMapping,
    /// Exposure fed to the tone curve
    pub exposure: f32,
    /// Shadow mapping enabled
    pub shadows: bool,
    /// Multisample antialiasing enabled
    pub antialias: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.0,
            shadows: true,
            antialias: true,
        }
    }
}

impl RenderSettings {
    /// Exposure used once an HDR environment map lights the scene
    pub const ENVIRONMENT_EXPOSURE: f32 = 0.1;
}

/// Main rendering backend trait
pub trait RenderBackend {
    /// Apply output settings; takes effect from the next frame
    fn configure(&mut self, settings: &RenderSettings);

    /// Resize the output surface
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Draw one frame
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), RenderError>;
}

/// What one frame contained
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Visible meshes and model instances
    pub drawables: usize,
    /// Lights
    pub lights: usize,
    /// Drawables casting shadows
    pub shadow_casters: usize,
    /// Whether an environment map was bound
    pub environment: bool,
    /// Camera position
    pub camera_position: Vec3,
}

impl FrameStats {
    /// Summarise a scene as seen from `camera`
    pub fn collect(scene: &SceneGraph, camera: &Camera) -> Self {
        let mut stats = Self {
            environment: scene.environment.environment.is_some(),
            camera_position: camera.position,
            ..Self::default()
        };
        for (_, object) in scene.iter().filter(|(_, object)| object.visible) {
            match &object.kind {
                ObjectKind::Light(_) => stats.lights += 1,
                ObjectKind::Mesh { .. } | ObjectKind::Model { .. } => {
                    stats.drawables += 1;
                    if object.shadows.contains(ShadowFlags::CAST) {
                        stats.shadow_casters += 1;
                    }
                }
            }
        }
        stats
    }
}

/// Backend that records frames instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    settings: RenderSettings,
    viewport: (u32, u32),
    frames: u64,
    last_frame: Option<FrameStats>,
}

impl HeadlessRenderer {
    /// Headless backend for a viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            ..Self::default()
        }
    }

    /// Current settings
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Current viewport size
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Frames rendered
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Contents of the most recent frame
    pub fn last_frame(&self) -> Option<&FrameStats> {
        self.last_frame.as_ref()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn configure(&mut self, settings: &RenderSettings) {
        self.settings = *settings;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.viewport = (width, height);
        Ok(())
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), RenderError> {
        self.last_frame = Some(FrameStats::collect(scene, camera));
        self.frames += 1;
        Ok(())
    }
}
