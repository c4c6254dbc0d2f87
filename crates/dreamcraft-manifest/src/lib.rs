//! Portfolio manifest generation.
//!
//! Scans a portfolio directory laid out as `<root>/<category>/<image>` and
//! produces the ordered JSON manifest the gallery pages consume.

pub mod encode;
pub mod entry;
pub mod generator;

pub use encode::{encode_segment, portfolio_src, PORTFOLIO_PREFIX};
pub use entry::{Manifest, PortfolioImageEntry};
pub use generator::{
    is_image_file, scan, GenerateConfig, GenerateReport, ManifestError, ManifestGenerator,
    ScanSummary, IMAGE_EXTENSIONS,
};
