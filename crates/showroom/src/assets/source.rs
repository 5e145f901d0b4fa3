//! Where asset bytes come from

use super::loader::LoadEvent;
use super::AssetError;
use futures::channel::mpsc::UnboundedSender;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct PacerState {
    frame: u64,
    parked: Vec<Waker>,
}

/// Hands out one slice of work per frame to long-running reads.
///
/// A read awaits [`FramePacer::next_frame`] between chunks and stays parked
/// until the session calls [`FramePacer::resume`] on its next frame.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    state: Rc<RefCell<PacerState>>,
}

impl FramePacer {
    /// Pacer with nothing parked
    pub fn new() -> Self {
        Self::default()
    }

    /// Future that completes once the next frame has begun
    pub fn next_frame(&self) -> NextFrame {
        NextFrame {
            state: Rc::clone(&self.state),
            after: self.state.borrow().frame,
        }
    }

    /// Begin a frame, waking every parked read. Returns how many were woken.
    pub fn resume(&self) -> usize {
        let parked = {
            let mut state = self.state.borrow_mut();
            state.frame += 1;
            std::mem::take(&mut state.parked)
        };
        let woken = parked.len();
        parked.into_iter().for_each(Waker::wake);
        woken
    }

    /// Reads currently waiting for a frame
    pub fn parked(&self) -> usize {
        self.state.borrow().parked.len()
    }
}

/// See [`FramePacer::next_frame`]
#[derive(Debug)]
pub struct NextFrame {
    state: Rc<RefCell<PacerState>>,
    after: u64,
}

impl Future for NextFrame {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.state.borrow_mut();
        if state.frame > self.after {
            return Poll::Ready(());
        }
        if !state.parked.iter().any(|waker| waker.will_wake(cx.waker())) {
            state.parked.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

/// Receives byte counts while a fetch is running
#[derive(Debug, Clone)]
pub struct ProgressSink {
    url: String,
    events: Option<UnboundedSender<LoadEvent>>,
    pacer: Option<FramePacer>,
}

impl ProgressSink {
    /// Sink forwarding progress for `url` into the loader's event channel
    pub fn new(url: impl Into<String>, events: UnboundedSender<LoadEvent>) -> Self {
        Self {
            url: url.into(),
            events: Some(events),
            pacer: None,
        }
    }

    /// Sink that drops every report
    pub fn detached(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: None,
            pacer: None,
        }
    }

    /// Builder-style pacer; chunked sources then yield to it between chunks
    #[must_use]
    pub fn paced(mut self, pacer: FramePacer) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// Wait for the next frame when paced, otherwise continue immediately
    pub async fn yield_chunk(&self) {
        if let Some(pacer) = &self.pacer {
            pacer.next_frame().await;
        }
    }

    /// Report `loaded` bytes out of an optional known total
    pub fn report(&self, loaded: u64, total: Option<u64>) {
        if let Some(events) = &self.events {
            // A closed channel means the session is gone; nobody is watching.
            let _ = events.unbounded_send(LoadEvent::Progress {
                url: self.url.clone(),
                loaded,
                total,
            });
        }
    }
}

/// Asynchronous byte source addressed by URL
pub trait AssetSource {
    /// Fetch the full contents at `url`, reporting progress along the way
    fn fetch(&self, url: &str, progress: ProgressSink) -> LocalBoxFuture<'static, Result<Vec<u8>, AssetError>>;
}

/// Reads assets from a directory on disk, one chunk per frame when paced
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    chunk_size: usize,
}

impl FileSource {
    /// Default read chunk
    pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

    /// Source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Builder-style chunk size override; zero is treated as one byte
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl AssetSource for FileSource {
    fn fetch(&self, url: &str, progress: ProgressSink) -> LocalBoxFuture<'static, Result<Vec<u8>, AssetError>> {
        let path = self.root.join(url);
        let chunk_size = self.chunk_size;
        let url = url.to_string();

        async move {
            let io_error = |e: std::io::Error| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssetError::NotFound(url.clone())
                } else {
                    AssetError::Io {
                        url: url.clone(),
                        message: e.to_string(),
                    }
                }
            };

            let mut file = std::fs::File::open(&path).map_err(io_error)?;
            let total = file.metadata().ok().map(|meta| meta.len());
            let mut bytes = Vec::with_capacity(total.and_then(|t| usize::try_from(t).ok()).unwrap_or(0));
            let mut chunk = vec![0; chunk_size];

            loop {
                let read = file.read(&mut chunk).map_err(io_error)?;
                if read == 0 {
                    break;
                }
                bytes.extend_from_slice(&chunk[..read]);
                progress.report(bytes.len() as u64, total);
                progress.yield_chunk().await;
            }

            Ok(bytes)
        }
        .boxed_local()
    }
}

/// In-memory source that counts fetches per URL
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
    fetches: RefCell<HashMap<String, usize>>,
}

impl MemorySource {
    /// Empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry insertion
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }

    /// Store `bytes` under `url`
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(url.into(), bytes);
    }

    /// How many times `url` has been fetched
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.borrow().get(url).copied().unwrap_or(0)
    }

    /// Fetches across all URLs
    pub fn total_fetches(&self) -> usize {
        self.fetches.borrow().values().sum()
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, url: &str, progress: ProgressSink) -> LocalBoxFuture<'static, Result<Vec<u8>, AssetError>> {
        *self.fetches.borrow_mut().entry(url.to_string()).or_insert(0) += 1;

        let result = self
            .entries
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(url.to_string()));
        if let Ok(bytes) = &result {
            let len = bytes.len() as u64;
            progress.report(len, Some(len));
        }

        futures::future::ready(result).boxed_local()
    }
}
