//! Asset management system
//!
//! Assets are fetched from an [`AssetSource`] as futures running on the
//! session's local executor. Results land in per-type [`AssetCache`]s and
//! are announced to the session through a [`LoadEvent`] channel that it
//! drains once per frame. Chunked reads take one chunk per frame, paced by a
//! [`FramePacer`] the session resumes before running the executor.

pub mod cache;
pub mod loader;
pub mod model;
pub mod progress;
pub mod source;
pub mod texture;

pub use cache::AssetCache;
pub use loader::{AssetLoader, LoadEvent};
pub use model::{ModelAsset, ModelMesh};
pub use progress::LoadingProgress;
pub use source::{AssetSource, FileSource, FramePacer, MemorySource, ProgressSink};
pub use texture::{Texture, TextureMapping};

use thiserror::Error;

/// Asset loading errors
///
/// Errors carry messages rather than source errors so that one failed load
/// can be handed to every waiter of a shared request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Nothing exists at the requested location
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Reading the asset failed
    #[error("Failed to read {url}: {message}")]
    Io {
        /// Requested location
        url: String,
        /// Underlying error
        message: String,
    },

    /// The bytes are not a decodable image
    #[error("Failed to decode texture {url}: {message}")]
    Texture {
        /// Requested location
        url: String,
        /// Decoder error
        message: String,
    },

    /// The bytes are not a valid glTF document
    #[error("Failed to parse model {url}: {message}")]
    Model {
        /// Requested location
        url: String,
        /// Parser error
        message: String,
    },

    /// The executor refused the load task
    #[error("Failed to schedule load of {url}: {message}")]
    Spawn {
        /// Requested location
        url: String,
        /// Executor error
        message: String,
    },
}
