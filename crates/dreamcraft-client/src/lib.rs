//! Client-side state for the Dreamcraft site.
//!
//! Holds the behavior behind the portfolio pages: rotating category
//! previews, the filterable gallery with its lightbox, keyboard bindings,
//! manifest loading and the contact form. Rendering to HTML goes through
//! [`render::TemplateEngine`].

pub mod categories;
pub mod contact;
pub mod gallery;
pub mod keyboard;
pub mod lightbox;
pub mod preview;
pub mod render;
pub mod scheduler;
pub mod source;

pub use categories::{Category, CategoryFilter, GALLERY_CATEGORIES};
pub use contact::{ContactClient, ContactError, ContactForm, Notification, NotificationKind};
pub use gallery::{load_shared, GalleryPage, LoadOutcome, LoadTicket};
pub use keyboard::{Key, KeyboardHub};
pub use lightbox::{Lightbox, Zoom};
pub use preview::{home_cards, CardSpec, PreviewCard, PreviewVariant, HOME_CARDS};
pub use render::TemplateEngine;
pub use scheduler::{ManualClock, Scheduler, TimerHandle, TokioScheduler};
pub use source::{FetchError, FileManifestSource, HttpManifestSource, ManifestSource};
