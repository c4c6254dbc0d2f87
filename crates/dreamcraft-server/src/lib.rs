//! HTTP server for the Dreamcraft site.
//!
//! Serves the portfolio API, a few demo endpoints and the site's static
//! files, and can keep the portfolio manifest current while images change.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod watcher;

pub use config::{Environment, ServerConfig};
pub use error::ApiError;
pub use routes::{router, AppState};
pub use server::{Server, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
