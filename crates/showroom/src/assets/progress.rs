//! Loading progress indicator state

use super::loader::LoadEvent;
use std::collections::BTreeMap;

/// Byte counts of one outstanding item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemProgress {
    /// Bytes received so far
    pub loaded: u64,
    /// Expected size, when known
    pub total: Option<u64>,
}

/// Aggregate progress over every item started this session.
///
/// A failed item counts as settled, so one broken asset never keeps the
/// indicator up.
#[derive(Debug, Clone, Default)]
pub struct LoadingProgress {
    items_total: usize,
    items_loaded: usize,
    items_failed: usize,
    outstanding: BTreeMap<String, ItemProgress>,
}

impl LoadingProgress {
    /// Nothing started yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one loader event into the counters
    pub fn observe(&mut self, event: &LoadEvent) {
        match event {
            LoadEvent::Started { url } => self.item_started(url),
            LoadEvent::Progress { url, loaded, total } => self.item_progress(url, *loaded, *total),
            LoadEvent::TextureLoaded { url, .. } | LoadEvent::ModelLoaded { url, .. } => {
                self.item_settled(url, true);
            }
            LoadEvent::Failed { url, .. } => self.item_settled(url, false),
        }
    }

    fn item_started(&mut self, url: &str) {
        if self.outstanding.insert(url.to_string(), ItemProgress::default()).is_none() {
            self.items_total += 1;
            log::debug!("Loaded {} of {} files", self.items_loaded, self.items_total);
        }
    }

    fn item_progress(&mut self, url: &str, loaded: u64, total: Option<u64>) {
        if let Some(item) = self.outstanding.get_mut(url) {
            item.loaded = loaded;
            item.total = total;
        }
    }

    fn item_settled(&mut self, url: &str, ok: bool) {
        if self.outstanding.remove(url).is_none() {
            return;
        }

        self.items_loaded += 1;
        if !ok {
            self.items_failed += 1;
        }
        log::debug!("Progress: {:.0}%", self.fraction() * 100.0);
        if self.is_complete() {
            log::info!("Loading complete!");
        }
    }

    /// Items started this session
    pub fn items_total(&self) -> usize {
        self.items_total
    }

    /// Items settled, failures included
    pub fn items_loaded(&self) -> usize {
        self.items_loaded
    }

    /// Items that failed
    pub fn items_failed(&self) -> usize {
        self.items_failed
    }

    /// Byte progress of an outstanding item
    pub fn item(&self, url: &str) -> Option<ItemProgress> {
        self.outstanding.get(url).copied()
    }

    /// Settled fraction in `[0, 1]`; 1 when nothing was started
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.items_total == 0 {
            1.0
        } else {
            self.items_loaded as f32 / self.items_total as f32
        }
    }

    /// Whether every started item has settled
    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Whether the indicator should be shown
    pub fn is_visible(&self) -> bool {
        !self.is_complete()
    }
}
