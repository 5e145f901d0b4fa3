//! # Showroom
//!
//! An interactive physics showroom: a lit scene with an environment map,
//! two loaded models, rigid bodies that fall onto a ground slab and a pool
//! of logos spawned under the pointer while the primary button is held.
//!
//! ## Features
//!
//! - **Asset Loading**: async fetch of an EXR environment map and GLB models with
//!   progress tracking and an idempotent cache
//! - **Scene Graph**: slotmap-backed visual objects with ray queries
//! - **Physics**: rigid bodies simulated by `rapier3d` at a fixed step per frame
//! - **Spawning**: rate-limited FIFO pool with timed eviction
//! - **Picking**: pointer-to-world projection and non-latching hover highlight
//! - **Controls**: range- and step-enforced live tuning
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use showroom::prelude::*;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), SessionError> {
//!     let config = ShowroomConfig::default();
//!     let source = Rc::new(FileSource::new(&config.assets.root));
//!     let renderer = Box::new(HeadlessRenderer::new(config.window.width, config.window.height));
//!
//!     let mut session = Session::new(config, source, renderer)?;
//!     session.start_loading()?;
//!     session.pointer_moved(640.0, 360.0);
//!     session.pointer_pressed(PointerButton::Primary, Duration::ZERO);
//!     session.frame(Duration::from_millis(16))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod scene;
pub mod physics;
pub mod input;
pub mod spawn;
pub mod controls;
pub mod render;
pub mod frame;
pub mod session;

pub use session::{Session, SessionError};

#[cfg(test)]
mod tests;

/// Common imports for showroom users
pub mod prelude {
    pub use crate::{
        Session, SessionError,
        assets::{AssetError, AssetSource, FileSource, LoadingProgress, MemorySource},
        config::{Config, ConfigError, ShowroomConfig},
        controls::{ControlError, OptionName, Options},
        foundation::math::{Transform, Vec2, Vec3},
        frame::FrameReport,
        input::PointerButton,
        render::{HeadlessRenderer, RenderBackend, RenderError, RenderSettings},
        scene::{Camera, Color, SceneGraph},
        spawn::SpawnOutcome,
    };
}
