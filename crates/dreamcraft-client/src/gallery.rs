//! The portfolio gallery page: filtered grid plus lightbox.

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;

use dreamcraft_manifest::{Manifest, PortfolioImageEntry};

use crate::categories::CategoryFilter;
use crate::keyboard::{Key, KeyboardHub};
use crate::lightbox::Lightbox;
use crate::source::{FetchError, ManifestSource};

/// Message shown when a loaded gallery has nothing in the selected category.
pub const EMPTY_MESSAGE: &str = "No images uploaded for this category yet.";

/// Proof that a load was started; only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What happened to a manifest load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The manifest replaced the page's entries
    Applied { entries: usize },
    /// The fetch failed; the page now shows an empty set
    Failed,
    /// A newer load was started since; the result was ignored
    Stale,
    /// The page was gone by the time the result arrived
    Discarded,
}

/// Empty-state text for the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: &'static str,
    /// Folder where images for the category belong
    pub folder_hint: String,
}

/// State of the gallery page.
#[derive(Debug)]
pub struct GalleryPage {
    keys: KeyboardHub,
    filter: CategoryFilter,
    entries: Vec<PortfolioImageEntry>,
    loading: bool,
    generation: u64,
    lightbox: Option<Lightbox>,
}

impl GalleryPage {
    /// A page that has not loaded its manifest yet.
    pub fn new(keys: KeyboardHub, filter: CategoryFilter) -> Self {
        Self {
            keys,
            filter,
            entries: Vec::new(),
            loading: true,
            generation: 0,
            lightbox: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Every loaded entry, unfiltered.
    pub fn entries(&self) -> &[PortfolioImageEntry] {
        &self.entries
    }

    /// Entries in the selected category, in manifest order.
    pub fn filtered(&self) -> Vec<&PortfolioImageEntry> {
        self.filter.apply(&self.entries)
    }

    /// Start a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of the load identified by `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Manifest, FetchError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Ignoring manifest load {} (current is {})",
                ticket.generation,
                self.generation
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        self.lightbox = None;

        match result {
            Ok(manifest) => {
                self.entries = manifest.into_entries();
                LoadOutcome::Applied {
                    entries: self.entries.len(),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load portfolio images: {}", e);
                self.entries.clear();
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch from `source` and apply the result.
    pub async fn load(&mut self, source: &dyn ManifestSource) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = source.fetch().await;
        self.finish_load(ticket, result)
    }

    /// Switch category. Closes the lightbox.
    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.close();
        self.filter = filter;
    }

    /// Open the lightbox at `index` in the filtered set.
    pub fn open(&mut self, index: usize) -> bool {
        self.lightbox = Lightbox::open(index, self.filtered().len(), &self.keys);
        self.lightbox.is_some()
    }

    pub fn close(&mut self) {
        self.lightbox = None;
    }

    pub fn next(&mut self) {
        if let Some(lightbox) = self.lightbox.as_mut() {
            lightbox.next();
        }
    }

    pub fn prev(&mut self) {
        if let Some(lightbox) = self.lightbox.as_mut() {
            lightbox.prev();
        }
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn lightbox_mut(&mut self) -> Option<&mut Lightbox> {
        self.lightbox.as_mut()
    }

    /// The entry shown in the lightbox.
    pub fn active_entry(&self) -> Option<&PortfolioImageEntry> {
        let index = self.lightbox.as_ref()?.index();
        self.filtered().get(index).copied()
    }

    /// Apply pending key presses to the open lightbox.
    ///
    /// Returns how many presses were handled.
    pub fn handle_keys(&mut self) -> usize {
        let mut handled = 0;
        while let Some(key) = self.lightbox.as_mut().and_then(Lightbox::take_key) {
            handled += 1;
            match key {
                Key::ArrowLeft => self.prev(),
                Key::ArrowRight => self.next(),
                Key::Escape => self.close(),
                Key::Other(_) => {}
            }
        }
        handled
    }

    /// Empty-state text, once loading is over and nothing matches.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.loading || !self.filtered().is_empty() {
            return None;
        }
        Some(EmptyState {
            message: EMPTY_MESSAGE,
            folder_hint: format!("/public/portfolio/{}", self.filter.id()),
        })
    }
}

/// Load into a page shared with its UI, without keeping the page alive.
///
/// The lock is released while the fetch is in flight. If the page was
/// dropped meanwhile the result is discarded; if another load started it is
/// stale.
pub async fn load_shared(
    page: Weak<Mutex<GalleryPage>>,
    source: Arc<dyn ManifestSource>,
) -> LoadOutcome {
    let Some(shared) = page.upgrade() else {
        return LoadOutcome::Discarded;
    };
    let ticket = shared.lock().await.begin_load();
    drop(shared);

    let result = source.fetch().await;

    let Some(shared) = page.upgrade() else {
        tracing::debug!("Gallery closed before its manifest arrived");
        return LoadOutcome::Discarded;
    };
    let outcome = shared.lock().await.finish_load(ticket, result);
    outcome
}
