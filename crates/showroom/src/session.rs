//! The explicitly owned application context
//!
//! A [`Session`] owns every piece of showroom state: scene, physics, pool,
//! caches, options and the local executor running asset loads. The host
//! forwards input events to it and calls [`Session::frame`] once per display
//! refresh. Session time is a [`Duration`] supplied by the host, so the whole
//! session can be driven deterministically.

use crate::assets::{AssetError, AssetLoader, AssetSource, LoadEvent, LoadingProgress, ModelAsset, Texture};
use crate::config::{ConfigError, ShowroomConfig};
use crate::controls::{ControlError, ControlPanel, OptionName, Options};
use crate::foundation::math::Vec3;
use crate::frame::{FrameContext, FrameLoop, FrameReport};
use crate::input::{HoverHighlighter, PointerButton, PointerPicker, PointerState};
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::render::{RenderBackend, RenderError, RenderSettings};
use crate::scene::stage::{logo_material, place_logo, place_sofa};
use crate::scene::{Camera, Color, ObjectId, SceneGraph, Stage};
use crate::spawn::{SpawnOutcome, SpawnPool, SpawnTemplate, Spawner};
use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::executor::LocalPool;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Cache key of the environment map
pub const BACKGROUND_KEY: &str = "background";
/// Cache key of the sofa model
pub const SOFA_KEY: &str = "sofaModel";
/// Cache key of the logo model
pub const LOGO_KEY: &str = "logoModel";

/// Radians of orbit per pixel of secondary-button drag
const ORBIT_SPEED: f32 = 0.005;
/// Zoom factor per scroll notch
const ZOOM_STEP: f32 = 0.9;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Asset request could not be scheduled
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Physics world rejected an operation
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Renderer failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Control panel rejected an edit
    #[error("Control error: {0}")]
    Control(#[from] ControlError),
}

/// Models placed once their load completes
#[derive(Debug, Clone, Copy, Default)]
struct Placed {
    sofa: Option<ObjectId>,
    logo: Option<ObjectId>,
}

/// One running showroom
pub struct Session {
    config: ShowroomConfig,
    scene: SceneGraph,
    physics: PhysicsWorld,
    stage: Stage,
    camera: Camera,
    pointer: PointerState,
    picker: PointerPicker,
    hover: HoverHighlighter,
    spawner: Spawner,
    pool: SpawnPool,
    controls: ControlPanel,
    frames: FrameLoop,
    renderer: Box<dyn RenderBackend>,
    render_settings: RenderSettings,
    executor: LocalPool,
    loader: AssetLoader,
    events: UnboundedReceiver<LoadEvent>,
    progress: LoadingProgress,
    placed: Placed,
}

impl Session {
    /// Build the stage and wire every subsystem; no assets are requested yet
    pub fn new(
        config: ShowroomConfig,
        source: Rc<dyn AssetSource>,
        mut renderer: Box<dyn RenderBackend>,
    ) -> Result<Self, SessionError> {
        log::info!("Starting showroom session");

        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::new(&config.physics)?;
        let options = Options::default();
        let stage = Stage::build(&mut scene, &mut physics, &options, &config.spawn);

        let (width, height) = (config.window.width, config.window.height);
        let render_settings = RenderSettings::default();
        renderer.configure(&render_settings);
        renderer.resize(width, height)?;

        let executor = LocalPool::new();
        let (tx, events) = mpsc::unbounded();
        let loader = AssetLoader::new(source, executor.spawner(), tx);

        Ok(Self {
            camera: Camera::from_config(&config.camera, width, height),
            pointer: PointerState::new(width, height),
            picker: PointerPicker::new(),
            hover: HoverHighlighter::new(stage.hover_sphere, Color::from_hex(config.hover.highlight_color)),
            spawner: Spawner::new(config.spawn.clone()),
            pool: SpawnPool::new(),
            controls: ControlPanel::new(stage.hover_sphere, options),
            frames: FrameLoop::new(),
            renderer,
            render_settings,
            executor,
            loader,
            events,
            progress: LoadingProgress::new(),
            placed: Placed::default(),
            config,
            scene,
            physics,
            stage,
        })
    }

    /// Request the environment map and both models
    pub fn start_loading(&mut self) -> Result<(), SessionError> {
        let assets = &self.config.assets;
        self.loader.load_environment(BACKGROUND_KEY, &assets.background)?;
        self.loader.load_model(SOFA_KEY, &assets.sofa)?;
        self.loader.load_model(LOGO_KEY, &assets.logo)?;
        self.apply_load_events();
        Ok(())
    }

    /// Pointer moved to window pixel `(x, y)`
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.pointer.move_to(x, y);
        if self.pointer.secondary_down {
            #[allow(clippy::cast_possible_truncation)]
            self.camera.orbit(-dx as f32 * ORBIT_SPEED, -dy as f32 * ORBIT_SPEED);
        }
        self.picker.update(self.pointer.ndc(), &self.camera);
    }

    /// Button pressed at session time `now`
    pub fn pointer_pressed(&mut self, button: PointerButton, now: Duration) -> SpawnOutcome {
        self.pointer.set_button(button, true);
        if button != PointerButton::Primary {
            return SpawnOutcome::Idle;
        }
        self.spawner.press();
        self.try_spawn(now)
    }

    /// Button released
    pub fn pointer_released(&mut self, button: PointerButton) {
        self.pointer.set_button(button, false);
        if button == PointerButton::Primary {
            self.spawner.release();
        }
    }

    /// Scroll by `notches`; positive zooms in
    pub fn scrolled(&mut self, notches: f32) {
        self.camera.zoom(ZOOM_STEP.powf(notches));
        self.picker.update(self.pointer.ndc(), &self.camera);
    }

    /// Window resized
    pub fn resized(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        self.pointer.set_viewport(width, height);
        self.camera.set_viewport(width, height);
        self.renderer.resize(width, height)?;
        log::debug!("Viewport resized to {}x{}", width, height);
        Ok(())
    }

    /// Run everything due at session time `now`, then tick one frame
    pub fn frame(&mut self, now: Duration) -> Result<FrameReport, SessionError> {
        self.loader.resume_reads();
        self.executor.run_until_stalled();
        self.apply_load_events();

        self.spawner
            .fire_due_evictions(now, &mut self.scene, &mut self.physics, &mut self.pool);
        if self.spawner.is_held() {
            self.try_spawn(now);
        }

        let report = self.frames.tick(
            now,
            FrameContext {
                scene: &mut self.scene,
                physics: &mut self.physics,
                stage: &self.stage,
                pool: &self.pool,
                hover: &self.hover,
                options: self.controls.options(),
                camera: &self.camera,
                pointer: self.pointer.ndc(),
                renderer: self.renderer.as_mut(),
            },
        )?;
        Ok(report)
    }

    fn try_spawn(&mut self, now: Duration) -> SpawnOutcome {
        self.spawner.try_spawn(
            now,
            self.picker.world_point(),
            &mut self.scene,
            &mut self.physics,
            &mut self.pool,
        )
    }

    fn apply_load_events(&mut self) {
        while let Ok(Some(event)) = self.events.try_next() {
            self.progress.observe(&event);
            match event {
                LoadEvent::TextureLoaded { texture, .. } => self.apply_environment(texture),
                LoadEvent::ModelLoaded { key, model, .. } => self.apply_model(&key, model),
                LoadEvent::Started { .. } | LoadEvent::Progress { .. } | LoadEvent::Failed { .. } => {}
            }
        }
    }

    fn apply_environment(&mut self, texture: Rc<Texture>) {
        self.scene.set_environment_map(texture);
        self.render_settings.exposure = RenderSettings::ENVIRONMENT_EXPOSURE;
        self.renderer.configure(&self.render_settings);
    }

    fn apply_model(&mut self, key: &str, model: Rc<ModelAsset>) {
        match key {
            SOFA_KEY => {
                if self.placed.sofa.is_none() {
                    self.placed.sofa = Some(place_sofa(&mut self.scene, model));
                }
            }
            LOGO_KEY => {
                let material = logo_material(model.base_color_map());
                if self.placed.logo.is_none() {
                    self.placed.logo = Some(place_logo(&mut self.scene, Rc::clone(&model), material.clone()));
                }
                self.spawner.set_template(SpawnTemplate { model, material });
            }
            other => log::warn!("No placement for model '{}'", other),
        }
    }

    /// Set a numeric option through its control
    pub fn set_option(&mut self, name: OptionName, value: f32) -> Result<f32, SessionError> {
        Ok(self.controls.set_number(name, value, &mut self.scene)?)
    }

    /// Move a numeric option by whole steps
    pub fn nudge_option(&mut self, name: OptionName, steps: i32) -> Result<f32, SessionError> {
        Ok(self.controls.nudge(name, steps, &mut self.scene)?)
    }

    /// Set the hover sphere's default colour
    pub fn set_sphere_color(&mut self, color: Color) {
        self.controls.set_color(color, &mut self.scene);
    }

    /// Advance the hover sphere's colour through the palette
    pub fn cycle_sphere_color(&mut self) -> Color {
        self.controls.cycle_color(&mut self.scene)
    }

    /// Flip the hover sphere's wireframe flag
    pub fn toggle_wireframe(&mut self) -> bool {
        self.controls.toggle_wireframe(&mut self.scene)
    }

    /// Environment map, once cached
    pub fn cached_environment(&mut self) -> Option<Rc<Texture>> {
        self.loader.cached_texture(BACKGROUND_KEY)
    }

    /// Model cached under `key`, once loaded
    pub fn cached_model(&mut self, key: &str) -> Option<Rc<ModelAsset>> {
        self.loader.cached_model(key)
    }

    /// Underlying asset loads started
    pub fn loads_started(&self) -> usize {
        self.loader.loads_started()
    }

    /// Loading indicator state
    pub fn progress(&self) -> &LoadingProgress {
        &self.progress
    }

    /// Visual objects
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Rigid bodies
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Fixed content handles
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Spawned pairs, oldest first
    pub fn pool(&self) -> &SpawnPool {
        &self.pool
    }

    /// Spawner state
    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Current option values
    pub fn options(&self) -> &Options {
        self.controls.options()
    }

    /// Viewing camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Renderer settings last applied
    pub fn render_settings(&self) -> &RenderSettings {
        &self.render_settings
    }

    /// World point under the cursor, if any
    pub fn pick_point(&self) -> Option<Vec3> {
        self.picker.world_point()
    }

    /// Configuration the session was built with
    pub fn config(&self) -> &ShowroomConfig {
        &self.config
    }
}
