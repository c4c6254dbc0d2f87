//! Manifest generation command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dreamcraft_manifest::ManifestGenerator;

use crate::config::SiteConfig;

/// Run the generate command.
pub async fn run(config: &SiteConfig, root: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let mut generate = config.generate_config();
    if let Some(root) = root {
        generate.root = root;
    }
    if let Some(output) = output {
        generate.output = output;
    }

    let generator = ManifestGenerator::new(generate);
    let report = tokio::task::spawn_blocking(move || generator.generate())
        .await
        .context("Manifest generation task failed")?
        .context("Failed to generate portfolio manifest")?;

    tracing::info!(
        "Generated {} entries across {} categories in {}ms",
        report.entries,
        report.categories,
        report.duration_ms
    );
    if report.skipped > 0 {
        tracing::info!("Skipped {} non-image files", report.skipped);
    }
    tracing::info!("Output: {}", report.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use dreamcraft_manifest::Manifest;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_manifest_to_override_paths() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("portfolio");
        fs::create_dir_all(root.join("Kitchens")).unwrap();
        fs::write(root.join("Kitchens/a.jpg"), b"img").unwrap();
        fs::write(root.join("Kitchens/notes.txt"), b"txt").unwrap();
        let output = temp.path().join("out/portfolio.json");

        run(&SiteConfig::default(), Some(root), Some(output.clone()))
            .await
            .unwrap();

        let manifest = Manifest::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].category, "kitchens");
        assert_eq!(manifest.entries()[0].src, "/portfolio/Kitchens/a.jpg");
    }
}
