//! Auto-rotating category previews.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dreamcraft_manifest::{encode_segment, Manifest, PortfolioImageEntry};

use crate::scheduler::{Scheduler, TimerHandle};

/// Most progress dots a card shows.
pub const MAX_DOTS: usize = 5;

/// Where a preview is shown; decides rotation speed and link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewVariant {
    /// Home-page category card
    CategoryCard,
    /// Product listing card with manual stepping
    ProductCard,
}

impl PreviewVariant {
    pub fn period(&self) -> Duration {
        match self {
            PreviewVariant::CategoryCard => Duration::from_secs(4),
            PreviewVariant::ProductCard => Duration::from_secs(5),
        }
    }

    fn target(&self, category: &str) -> String {
        let base = match self {
            PreviewVariant::CategoryCard => "/portfolio",
            PreviewVariant::ProductCard => "/products",
        };
        format!("{}?category={}", base, encode_segment(category))
    }
}

/// A mounted preview over the entries of one category.
///
/// With two or more entries it owns a rotation timer, which is cancelled
/// when the card is dropped.
#[derive(Debug)]
pub struct PreviewCard {
    title: String,
    category: String,
    variant: PreviewVariant,
    entries: Vec<PortfolioImageEntry>,
    index: Arc<AtomicUsize>,
    timer: Option<TimerHandle>,
}

impl PreviewCard {
    pub fn mount(
        title: impl Into<String>,
        category: impl Into<String>,
        variant: PreviewVariant,
        entries: Vec<PortfolioImageEntry>,
        scheduler: &dyn Scheduler,
    ) -> Self {
        let index = Arc::new(AtomicUsize::new(0));
        let len = entries.len();

        let timer = (len > 1).then(|| {
            let index = Arc::clone(&index);
            scheduler.every(
                variant.period(),
                Box::new(move || advance(&index, len, 1)),
            )
        });

        Self {
            title: title.into(),
            category: category.into(),
            variant,
            entries,
            index,
            timer,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn variant(&self) -> PreviewVariant {
        self.variant
    }

    pub fn entries(&self) -> &[PortfolioImageEntry] {
        &self.entries
    }

    /// Whether there is anything to render.
    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_rotating(&self) -> bool {
        self.timer.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<&PortfolioImageEntry> {
        self.entries.get(self.current_index())
    }

    /// Step forward by hand. Only product cards allow this.
    pub fn next(&self) -> bool {
        self.step(1)
    }

    /// Step back by hand. Only product cards allow this.
    pub fn prev(&self) -> bool {
        self.step(self.entries.len().saturating_sub(1))
    }

    fn step(&self, by: usize) -> bool {
        if self.variant != PreviewVariant::ProductCard || self.entries.len() < 2 {
            return false;
        }
        advance(&self.index, self.entries.len(), by);
        true
    }

    /// Navigation target when the card is activated.
    pub fn target(&self) -> String {
        self.variant.target(&self.category)
    }

    pub fn label(&self) -> &'static str {
        if self.category == "office space" {
            "Commercial"
        } else {
            "Residential"
        }
    }

    /// Progress dots; `true` marks the one currently shown.
    pub fn dots(&self) -> Vec<bool> {
        if self.entries.len() < 2 {
            return Vec::new();
        }
        let current = self.current_index();
        (0..self.entries.len().min(MAX_DOTS))
            .map(|i| i == current)
            .collect()
    }
}

fn advance(index: &AtomicUsize, len: usize, by: usize) {
    // The closure always returns Some, so this cannot fail.
    let _ = index.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| Some((i + by) % len));
}

/// A fixed card on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSpec {
    pub title: &'static str,
    /// Gallery category the card links to
    pub category: &'static str,
    /// Case-insensitive substring selecting entries by category
    pub keyword: &'static str,
}

pub const HOME_CARDS: &[CardSpec] = &[
    CardSpec {
        title: "Modular Kitchens",
        category: "kitchens",
        keyword: "kitchen",
    },
    CardSpec {
        title: "Bedrooms & Wardrobes",
        category: "bedrooms",
        keyword: "bedroom",
    },
    CardSpec {
        title: "Office Spaces",
        category: "office space",
        keyword: "office",
    },
];

impl CardSpec {
    pub fn select(&self, manifest: &Manifest) -> Vec<PortfolioImageEntry> {
        manifest
            .iter()
            .filter(|e| e.category.to_lowercase().contains(self.keyword))
            .cloned()
            .collect()
    }
}

/// Mount the home-page category cards.
pub fn home_cards(manifest: &Manifest, scheduler: &dyn Scheduler) -> Vec<PreviewCard> {
    HOME_CARDS
        .iter()
        .map(|spec| {
            PreviewCard::mount(
                spec.title,
                spec.category,
                PreviewVariant::CategoryCard,
                spec.select(manifest),
                scheduler,
            )
        })
        .collect()
}
