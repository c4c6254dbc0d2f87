//! Site server command.

use anyhow::Result;
use dreamcraft_manifest::ManifestGenerator;
use dreamcraft_server::{Environment, Server};

use crate::config::SiteConfig;

/// Command-line overrides for the server.
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<Environment>,
    pub watch: bool,
    pub open: bool,
}

/// Run the serve command.
pub async fn run(config: &SiteConfig, options: ServeOptions) -> Result<()> {
    let mut server = config.server_config();
    if let Some(host) = options.host {
        server.host = host;
    }
    if let Some(port) = options.port {
        server.port = port;
    }
    if let Some(environment) = options.environment {
        server.environment = environment;
    }
    server.watch = options.watch;
    server.open = options.open;

    if server.watch {
        // Start from a fresh manifest; later changes are picked up by the watcher.
        let generator = ManifestGenerator::new(config.generate_config());
        match tokio::task::spawn_blocking(move || generator.generate()).await? {
            Ok(report) => tracing::info!("Generated {} portfolio entries", report.entries),
            Err(e) => tracing::warn!("Initial manifest generation failed: {}", e),
        }
    }

    tracing::info!("Starting {} server on port {}", server.environment, server.port);

    Server::new(server).start().await?;

    Ok(())
}
