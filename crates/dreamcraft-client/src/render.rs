//! HTML fragments for the portfolio pages.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::categories::GALLERY_CATEGORIES;
use crate::gallery::GalleryPage;
use crate::preview::PreviewCard;

/// An image in a rendered view.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
}

/// Context for `card.html`.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub title: String,
    pub label: String,
    pub target: String,
    pub image: ImageView,
    pub count: usize,
    pub dots: Vec<bool>,
}

impl CardView {
    /// `None` when the card has nothing to show.
    pub fn from_card(card: &PreviewCard) -> Option<Self> {
        let current = card.current()?;
        Some(Self {
            title: card.title().to_string(),
            label: card.label().to_string(),
            target: card.target(),
            image: ImageView {
                src: current.src.clone(),
                alt: current.alt.clone(),
            },
            count: card.entries().len(),
            dots: card.dots(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterButton {
    pub id: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LightboxView {
    pub image: ImageView,
    pub caption: String,
    pub position: String,
    pub scale: f32,
}

/// Context for `gallery.html`.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub loading: bool,
    pub filters: Vec<FilterButton>,
    pub images: Vec<ImageView>,
    pub empty_message: Option<String>,
    pub folder_hint: Option<String>,
    pub lightbox: Option<LightboxView>,
}

impl GalleryView {
    pub fn from_page(page: &GalleryPage) -> Self {
        let active = page.filter().id();
        let filters = GALLERY_CATEGORIES
            .iter()
            .map(|c| FilterButton {
                id: c.id,
                label: c.label,
                active: c.id == active,
            })
            .collect();

        let images = page
            .filtered()
            .into_iter()
            .map(|e| ImageView {
                src: e.src.clone(),
                alt: e.alt.clone(),
            })
            .collect();

        let lightbox = page
            .lightbox()
            .zip(page.active_entry())
            .map(|(lightbox, entry)| LightboxView {
                image: ImageView {
                    src: entry.src.clone(),
                    alt: entry.alt.clone(),
                },
                caption: page.filter().caption().to_string(),
                position: lightbox.position_label(),
                scale: lightbox.zoom().scale(),
            });

        let empty = page.empty_state();

        Self {
            loading: page.is_loading(),
            filters,
            images,
            empty_message: empty.as_ref().map(|e| e.message.to_string()),
            folder_hint: empty.map(|e| e.folder_hint),
            lightbox,
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("card.html", CARD_TEMPLATE)
            .expect("Failed to add card template");
        env.add_template("lightbox.html", LIGHTBOX_TEMPLATE)
            .expect("Failed to add lightbox template");
        env.add_template("gallery.html", GALLERY_TEMPLATE)
            .expect("Failed to add gallery template");

        Self { env }
    }

    /// Render a category card, or nothing for an empty one.
    pub fn render_card(&self, card: &PreviewCard) -> Result<Option<String>, minijinja::Error> {
        let Some(view) = CardView::from_card(card) else {
            return Ok(None);
        };
        let tmpl = self.env.get_template("card.html")?;
        tmpl.render(context! { card => view }).map(Some)
    }

    /// Render the gallery grid with its lightbox, if open.
    pub fn render_gallery(&self, page: &GalleryPage) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("gallery.html")?;
        tmpl.render(context! { gallery => GalleryView::from_page(page) })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const CARD_TEMPLATE: &str = r##"<a class="category-card" href="{{ card.target }}">
  <div class="category-card-image">
    <img src="{{ card.image.src }}" alt="{{ card.image.alt }}" loading="lazy">
    <span class="category-card-label">{{ card.label }}</span>
  </div>
  <div class="category-card-body">
    <h3>{{ card.title }}</h3>
    <p>{{ card.count }} project{% if card.count != 1 %}s{% endif %}</p>
    {% if card.dots %}
    <div class="category-card-dots">
      {% for active in card.dots %}<span class="dot{% if active %} active{% endif %}"></span>{% endfor %}
    </div>
    {% endif %}
  </div>
</a>"##;

const LIGHTBOX_TEMPLATE: &str = r##"<div class="lightbox" role="dialog" aria-modal="true">
  <button class="lightbox-close" aria-label="Close">&times;</button>
  <button class="lightbox-prev" aria-label="Previous">&lsaquo;</button>
  <figure class="lightbox-figure">
    <img src="{{ lightbox.image.src }}" alt="{{ lightbox.image.alt }}" style="transform: scale({{ lightbox.scale }})">
    <figcaption>
      <span class="lightbox-alt">{{ lightbox.image.alt }}</span>
      <span class="lightbox-caption">{{ lightbox.caption }}</span>
      <span class="lightbox-position">{{ lightbox.position }}</span>
    </figcaption>
  </figure>
  <button class="lightbox-next" aria-label="Next">&rsaquo;</button>
</div>"##;

const GALLERY_TEMPLATE: &str = r##"<section class="gallery">
  <div class="gallery-filters">
    {% for filter in gallery.filters %}<button data-category="{{ filter.id }}"{% if filter.active %} class="active"{% endif %}>{{ filter.label }}</button>
    {% endfor %}
  </div>
  {% if gallery.loading %}
  <p class="gallery-loading">Loading projects...</p>
  {% elif gallery.empty_message %}
  <div class="gallery-empty">
    <p>{{ gallery.empty_message }}</p>
    <code>{{ gallery.folder_hint }}</code>
  </div>
  {% else %}
  <div class="gallery-grid">
    {% for image in gallery.images %}<button class="gallery-item" data-index="{{ loop.index0 }}">
      <img src="{{ image.src }}" alt="{{ image.alt }}" loading="lazy">
    </button>
    {% endfor %}
  </div>
  {% endif %}
  {% if gallery.lightbox %}{% with lightbox = gallery.lightbox %}{% include "lightbox.html" %}{% endwith %}{% endif %}
</section>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryFilter;
    use crate::keyboard::KeyboardHub;
    use crate::preview::PreviewVariant;
    use crate::scheduler::ManualClock;
    use dreamcraft_manifest::{Manifest, PortfolioImageEntry};

    fn manifest() -> Manifest {
        Manifest::new(vec![
            PortfolioImageEntry::new(1, "kitchens", "k1.jpg"),
            PortfolioImageEntry::new(2, "bedrooms", "b1.jpg"),
            PortfolioImageEntry::new(3, "kitchens", "k2.jpg"),
        ])
    }

    #[test]
    fn empty_card_renders_nothing() {
        let clock = ManualClock::new();
        let card = PreviewCard::mount(
            "Office Spaces",
            "office space",
            PreviewVariant::CategoryCard,
            Vec::new(),
            &clock,
        );

        assert_eq!(TemplateEngine::new().render_card(&card).unwrap(), None);
    }

    #[test]
    fn renders_card_with_dots() {
        let clock = ManualClock::new();
        let card = PreviewCard::mount(
            "Bedrooms & Wardrobes",
            "kitchens",
            PreviewVariant::CategoryCard,
            manifest().in_category("kitchens").into_iter().cloned().collect(),
            &clock,
        );

        let html = TemplateEngine::new().render_card(&card).unwrap().unwrap();

        assert!(html.contains("Bedrooms &amp; Wardrobes"));
        assert!(html.contains("Residential"));
        assert!(html.contains("2 projects"));
        assert!(html.contains("kitchens project 2"));
        assert_eq!(html.matches("class=\"dot").count(), 2);
        assert_eq!(html.matches("dot active").count(), 1);
    }

    #[tokio::test]
    async fn renders_loading_then_grid() {
        let engine = TemplateEngine::new();
        let mut page = GalleryPage::new(KeyboardHub::new(), CategoryFilter::from_id("kitchens"));

        assert!(engine.render_gallery(&page).unwrap().contains("Loading projects"));

        page.load(&manifest()).await;
        let html = engine.render_gallery(&page).unwrap();

        assert!(!html.contains("Loading projects"));
        assert_eq!(html.matches("class=\"gallery-item\"").count(), 2);
        assert!(html.contains("data-category=\"kitchens\" class=\"active\""));
        assert!(!html.contains("lightbox"));
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let engine = TemplateEngine::new();
        let mut page =
            GalleryPage::new(KeyboardHub::new(), CategoryFilter::from_id("office space"));
        page.load(&manifest()).await;

        let html = engine.render_gallery(&page).unwrap();

        assert!(html.contains("No images uploaded for this category yet."));
        assert!(html.contains("office space"));
    }

    #[tokio::test]
    async fn renders_open_lightbox() {
        let engine = TemplateEngine::new();
        let mut page = GalleryPage::new(KeyboardHub::new(), CategoryFilter::All);
        page.load(&manifest()).await;
        page.open(1);

        let html = engine.render_gallery(&page).unwrap();

        assert!(html.contains("role=\"dialog\""));
        assert!(html.contains("bedrooms project 3"));
        assert!(html.contains("Portfolio"));
        assert!(html.contains("2 of 3"));
    }
}
