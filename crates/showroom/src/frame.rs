//! Per-frame tick
//!
//! One [`FrameLoop::tick`] is one unit of work per display refresh:
//!
//! 1. advance physics by one fixed step, regardless of wall time
//! 2. copy body poses onto the stage objects and every pooled pair
//! 3. run procedural animation
//! 4. hover detection against a fresh pointer ray
//! 5. submit scene and camera to the renderer
//!
//! Simulation speed is therefore tied to the frame rate.

use crate::controls::Options;
use crate::foundation::math::Vec2;
use crate::foundation::time::FrameTimer;
use crate::input::HoverHighlighter;
use crate::physics::PhysicsWorld;
use crate::render::{RenderBackend, RenderError};
use crate::scene::{Camera, SceneGraph, Stage};
use crate::spawn::SpawnPool;
use std::time::Duration;

/// Everything one tick reads or writes
pub struct FrameContext<'a> {
    /// Visual objects
    pub scene: &'a mut SceneGraph,
    /// Rigid bodies
    pub physics: &'a mut PhysicsWorld,
    /// Fixed content and its body links
    pub stage: &'a Stage,
    /// Spawned pairs
    pub pool: &'a SpawnPool,
    /// Hover tracker
    pub hover: &'a HoverHighlighter,
    /// Live options
    pub options: &'a Options,
    /// Viewing camera
    pub camera: &'a Camera,
    /// Pointer position in NDC
    pub pointer: Vec2,
    /// Output
    pub renderer: &'a mut dyn RenderBackend,
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Index of this frame, starting at 1
    pub frame: u64,
    /// Objects whose transform was copied from a body
    pub synced: usize,
    /// Whether the hover target was under the pointer
    pub hovered: bool,
}

/// Drives the per-frame tick
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    timer: FrameTimer,
    oscillation: f32,
}

impl FrameLoop {
    /// Create a loop that has not ticked yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame at session time `now`
    pub fn tick(&mut self, now: Duration, ctx: FrameContext<'_>) -> Result<FrameReport, RenderError> {
        self.timer.advance(now);

        ctx.physics.step();

        let synced = ctx.stage.sync_bodies(ctx.scene, ctx.physics) + ctx.pool.sync_transforms(ctx.scene, ctx.physics);

        self.animate(now, ctx.scene, ctx.stage, ctx.options);

        let ray = ctx.camera.ray_through_ndc(ctx.pointer);
        let hovered = ctx.hover.update(ctx.scene, ray.as_ref(), ctx.options.sphere_color);

        ctx.renderer.render(ctx.scene, ctx.camera)?;

        let frame = self.timer.frame_count();
        if frame % 600 == 0 {
            log::debug!(
                "Frame {}: {:.1} fps, {} bodies",
                frame,
                self.timer.current_fps(),
                ctx.physics.body_count()
            );
        }

        Ok(FrameReport { frame, synced, hovered })
    }

    fn animate(&mut self, now: Duration, scene: &mut SceneGraph, stage: &Stage, options: &Options) {
        let seconds = now.as_secs_f32();
        if let Some(torus) = scene.get_mut(stage.torus) {
            torus.transform.set_euler_xyz(seconds, seconds, 0.0);
        }

        self.oscillation += options.speed;
        if let Some(sphere) = scene.get_mut(stage.hover_sphere) {
            sphere.transform.position.y = options.y + 2.0 * self.oscillation.sin().abs();
        }
    }

    /// Accumulated oscillation phase of the hover sphere
    pub fn oscillation(&self) -> f32 {
        self.oscillation
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Measured frame rate
    pub fn fps(&self) -> f32 {
        self.timer.current_fps()
    }
}
