//! Portfolio directory scanning and manifest writing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::{DirEntry, WalkDir};

use crate::entry::{Manifest, PortfolioImageEntry};

/// File extensions recognized as portfolio images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Configuration for generating a manifest file.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory holding one subdirectory per category
    pub root: PathBuf,

    /// Manifest file to write
    pub output: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public/portfolio"),
            output: PathBuf::from("public/portfolio.json"),
        }
    }
}

/// Errors that can occur while generating a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read portfolio directory {path}: {source}")]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read category directory {path}: {source}")]
    ReadCategory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of scanning a portfolio directory.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Discovered images in id order
    pub manifest: Manifest,

    /// Number of category directories visited
    pub categories: usize,

    /// Files ignored because they are not images
    pub skipped: usize,
}

/// Result of a generate operation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Number of entries written
    pub entries: usize,

    /// Number of category directories visited
    pub categories: usize,

    /// Files ignored because they are not images
    pub skipped: usize,

    /// Total time in milliseconds
    pub duration_ms: u64,

    /// Manifest file written
    pub output: PathBuf,
}

/// Writes the portfolio manifest for a directory tree.
pub struct ManifestGenerator {
    config: GenerateConfig,
}

impl ManifestGenerator {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    /// Scan the portfolio root and overwrite the manifest file.
    ///
    /// Nothing is written when the scan fails, so a previous manifest is
    /// never replaced by a partial one.
    pub fn generate(&self) -> Result<GenerateReport, ManifestError> {
        let start = Instant::now();

        let summary = scan(&self.config.root)?;
        let json = summary.manifest.to_json_pretty()?;

        if let Some(parent) = self.config.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(&self.config.output, json).map_err(|source| ManifestError::Write {
            path: self.config.output.clone(),
            source,
        })?;

        tracing::info!(
            "Generated {} with {} images",
            self.config.output.display(),
            summary.manifest.len()
        );

        Ok(GenerateReport {
            entries: summary.manifest.len(),
            categories: summary.categories,
            skipped: summary.skipped,
            duration_ms: start.elapsed().as_millis() as u64,
            output: self.config.output.clone(),
        })
    }
}

/// Scan `root` for `<category>/<image>` files.
///
/// A missing root yields an empty manifest. Categories and files are visited
/// in file-name order and ids are assigned from 1 in that order.
pub fn scan(root: &Path) -> Result<ScanSummary, ManifestError> {
    let mut summary = ScanSummary::default();

    if !root.exists() {
        tracing::warn!(
            "Portfolio directory not found: {}; writing an empty manifest",
            root.display()
        );
        return Ok(summary);
    }

    let mut entries = Vec::new();
    let mut next_id: u64 = 1;

    for category in list_children(root) {
        let category = category.map_err(|source| ManifestError::ReadRoot {
            path: root.to_path_buf(),
            source,
        })?;

        if !category.file_type().is_dir() {
            continue;
        }

        let Some(dir_name) = utf8_name(&category) else {
            continue;
        };

        summary.categories += 1;

        for file in list_children(category.path()) {
            let file = match file {
                Ok(file) => file,
                Err(source) if is_skippable(&source) => {
                    tracing::debug!("Skipping unreadable non-image entry: {}", source);
                    summary.skipped += 1;
                    continue;
                }
                Err(source) => {
                    return Err(ManifestError::ReadCategory {
                        path: category.path().to_path_buf(),
                        source,
                    })
                }
            };

            if !file.file_type().is_file() {
                continue;
            }

            if !is_image_file(file.path()) {
                summary.skipped += 1;
                continue;
            }

            let Some(filename) = utf8_name(&file) else {
                continue;
            };

            entries.push(PortfolioImageEntry::new(next_id, dir_name, filename));
            next_id += 1;
        }
    }

    if summary.skipped > 0 {
        tracing::debug!("Skipped {} non-image files", summary.skipped);
    }

    summary.manifest = Manifest::new(entries);
    Ok(summary)
}

/// Whether the file name of `path` ends in `.` plus one of the
/// [`IMAGE_EXTENSIONS`]. A bare `.jpg` counts.
pub fn is_image_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        name.strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// A failure on a single entry inside a category that would not have been
/// an image anyway. Failures reading the category itself never are.
fn is_skippable(err: &walkdir::Error) -> bool {
    err.depth() > 0 && err.path().is_some_and(|path| !is_image_file(path))
}

/// Immediate children of `dir`, sorted by file name.
fn list_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}

fn utf8_name(entry: &DirEntry) -> Option<&str> {
    let name = entry.file_name().to_str();
    if name.is_none() {
        tracing::warn!("Skipping non UTF-8 name: {}", entry.path().display());
    }
    name
}
