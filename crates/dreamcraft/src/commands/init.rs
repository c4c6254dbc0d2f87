//! Scaffold a site: config file and portfolio folders.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Category folders created under the portfolio root.
const CATEGORY_DIRS: &[&str] = &["kitchens", "bedrooms", "office space"];

/// Run the init command.
pub async fn run(config_path: &Path, portfolio_root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing dreamcraft...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    } else {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    for category in CATEGORY_DIRS {
        let dir = portfolio_root.join(category);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            tracing::info!("Created {}", dir.display());
        }
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Add images under {} and run 'dreamcraft generate'.", portfolio_root.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Dreamcraft Configuration

[portfolio]
# Folder holding one sub-folder per category
root = "public/portfolio"

# Manifest read by the gallery pages
output = "public/portfolio.json"

[server]
host = "127.0.0.1"
port = 3001

# "development" serves public/, "production" serves dist/
environment = "development"
public_dir = "public"
dist_dir = "dist"

# Leave empty for the environment defaults
allowed_origins = []

[contact]
# webhook_url = "https://example.com/hooks/contact"
timeout_secs = 30
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    #[tokio::test]
    async fn scaffolds_config_and_folders() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("dreamcraft.toml");
        let root = temp.path().join("public/portfolio");

        run(&config_path, &root, false).await.unwrap();

        let config = SiteConfig::load(&config_path).unwrap();
        assert_eq!(config.server.port, 3001);
        assert!(root.join("kitchens").is_dir());
        assert!(root.join("bedrooms").is_dir());
        assert!(root.join("office space").is_dir());
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("dreamcraft.toml");
        fs::write(&config_path, "[server]\nport = 9999\n").unwrap();

        run(&config_path, &temp.path().join("portfolio"), false)
            .await
            .unwrap();
        assert_eq!(SiteConfig::load(&config_path).unwrap().server.port, 9999);

        run(&config_path, &temp.path().join("portfolio"), true)
            .await
            .unwrap();
        assert_eq!(SiteConfig::load(&config_path).unwrap().server.port, 3001);
    }
}
