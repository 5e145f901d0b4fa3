//! Asynchronous asset loader
//!
//! Every request becomes a task on the session's local executor. The task
//! awaits the cache's shared load and reports the outcome as a [`LoadEvent`];
//! the session applies those events to the scene on its own schedule.

use super::cache::AssetCache;
use super::model::ModelAsset;
use super::source::{AssetSource, FramePacer, ProgressSink};
use super::texture::{Texture, TextureMapping};
use super::AssetError;
use futures::channel::mpsc::UnboundedSender;
use futures::executor::LocalSpawner;
use futures::future::FutureExt;
use futures::task::LocalSpawnExt;
use std::rc::Rc;

/// Notifications emitted while assets load
#[derive(Debug, Clone)]
pub enum LoadEvent {
    /// A fetch for `url` has begun
    Started {
        /// Requested location
        url: String,
    },
    /// Bytes received for `url`
    Progress {
        /// Requested location
        url: String,
        /// Bytes received so far
        loaded: u64,
        /// Expected size, when known
        total: Option<u64>,
    },
    /// An environment texture is ready
    TextureLoaded {
        /// Logical cache key
        key: String,
        /// Requested location
        url: String,
        /// Cached texture
        texture: Rc<Texture>,
    },
    /// A model is ready
    ModelLoaded {
        /// Logical cache key
        key: String,
        /// Requested location
        url: String,
        /// Cached model
        model: Rc<ModelAsset>,
    },
    /// A load failed; other loads are unaffected
    Failed {
        /// Logical cache key
        key: String,
        /// Requested location
        url: String,
        /// What went wrong
        error: AssetError,
    },
}

/// Asset types the loader knows how to decode
pub trait LoadableAsset: Sized + 'static {
    /// Decode fetched bytes
    fn decode(url: &str, bytes: &[u8]) -> Result<Self, AssetError>;

    /// Event announcing a successful load
    fn loaded_event(key: String, url: String, asset: Rc<Self>) -> LoadEvent;
}

impl LoadableAsset for Texture {
    fn decode(url: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        // Textures requested through the loader are environment panoramas
        Ok(Self::decode_exr(url, bytes)?.with_mapping(TextureMapping::EquirectangularReflection))
    }

    fn loaded_event(key: String, url: String, texture: Rc<Self>) -> LoadEvent {
        LoadEvent::TextureLoaded { key, url, texture }
    }
}

impl LoadableAsset for ModelAsset {
    fn decode(url: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        Self::parse(url, bytes)
    }

    fn loaded_event(key: String, url: String, model: Rc<Self>) -> LoadEvent {
        LoadEvent::ModelLoaded { key, url, model }
    }
}

struct LoaderContext {
    source: Rc<dyn AssetSource>,
    spawner: LocalSpawner,
    events: UnboundedSender<LoadEvent>,
    pacer: FramePacer,
}

impl LoaderContext {
    fn start<V: LoadableAsset>(&self, cache: &mut AssetCache<V>, key: &str, url: &str) -> Result<(), AssetError> {
        let source = Rc::clone(&self.source);
        let progress = ProgressSink::new(url, self.events.clone()).paced(self.pacer.clone());
        let fetch_url = url.to_string();

        let (load, started) = cache.get_or_load(key, move || {
            async move {
                let bytes = source.fetch(&fetch_url, progress).await?;
                V::decode(&fetch_url, &bytes)
            }
            .boxed_local()
        });

        if started {
            log::info!("Loading file: {}", url);
            self.send(LoadEvent::Started { url: url.to_string() });
        } else {
            log::debug!("Serving '{}' from cache", key);
        }

        let events = self.events.clone();
        let key = key.to_string();
        let task_url = url.to_string();
        self.spawner
            .spawn_local(async move {
                let event = match load.await {
                    Ok(asset) => {
                        log::info!("Loaded {} as '{}'", task_url, key);
                        V::loaded_event(key, task_url, asset)
                    }
                    Err(error) => {
                        log::error!("Error loading file {}: {}", task_url, error);
                        LoadEvent::Failed {
                            key,
                            url: task_url,
                            error,
                        }
                    }
                };
                let _ = events.unbounded_send(event);
            })
            .map_err(|e| AssetError::Spawn {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn send(&self, event: LoadEvent) {
        let _ = self.events.unbounded_send(event);
    }
}

/// Loads environment maps and models through per-type caches
pub struct AssetLoader {
    context: LoaderContext,
    textures: AssetCache<Texture>,
    models: AssetCache<ModelAsset>,
}

impl AssetLoader {
    /// Create a loader that spawns onto `spawner` and reports into `events`
    pub fn new(source: Rc<dyn AssetSource>, spawner: LocalSpawner, events: UnboundedSender<LoadEvent>) -> Self {
        Self {
            context: LoaderContext {
                source,
                spawner,
                events,
                pacer: FramePacer::new(),
            },
            textures: AssetCache::new(),
            models: AssetCache::new(),
        }
    }

    /// Request the environment map at `url`, cached under `key`
    pub fn load_environment(&mut self, key: &str, url: &str) -> Result<(), AssetError> {
        self.context.start(&mut self.textures, key, url)
    }

    /// Request the model at `url`, cached under `key`
    pub fn load_model(&mut self, key: &str, url: &str) -> Result<(), AssetError> {
        self.context.start(&mut self.models, key, url)
    }

    /// Environment map cached under `key`, once loaded
    pub fn cached_texture(&mut self, key: &str) -> Option<Rc<Texture>> {
        self.textures.get(key)
    }

    /// Model cached under `key`, once loaded
    pub fn cached_model(&mut self, key: &str) -> Option<Rc<ModelAsset>> {
        self.models.get(key)
    }

    /// Let every paced read take its next chunk; call once per frame
    pub fn resume_reads(&self) -> usize {
        self.context.pacer.resume()
    }

    /// Underlying loads started across both caches
    pub fn loads_started(&self) -> usize {
        self.textures.loads_started() + self.models.loads_started()
    }
}
