//! Server lifecycle.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use dreamcraft_manifest::{GenerateConfig, ManifestGenerator};

use crate::config::ServerConfig;
use crate::routes::router;
use crate::watcher::FileWatcher;

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    Serve(String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// The site's HTTP server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Server running on http://{}", addr);
        tracing::info!("Health check: http://{}/api/health", addr);
        tracing::info!("Environment: {}", self.config.environment);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let _watcher = if self.config.watch {
            Some(self.spawn_manifest_watcher()?)
        } else {
            None
        };

        let app = router(&self.config);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))
    }

    /// Regenerate the manifest whenever the portfolio tree changes.
    ///
    /// The returned watcher must stay alive for events to keep flowing.
    fn spawn_manifest_watcher(&self) -> Result<FileWatcher, ServerError> {
        let root = &self.config.portfolio_dir;
        if !root.exists() {
            // notify can only watch paths that exist.
            std::fs::create_dir_all(root).map_err(|e| {
                ServerError::WatchError(format!("cannot create {}: {}", root.display(), e))
            })?;
            tracing::info!("Created portfolio directory {}", root.display());
        }

        let generator = Arc::new(ManifestGenerator::new(GenerateConfig {
            root: self.config.portfolio_dir.clone(),
            output: self.config.manifest_output.clone(),
        }));

        let (watcher, mut rx) = FileWatcher::new(&[self.config.portfolio_dir.clone()])
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let output = self.config.manifest_output.clone();

        tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                if batch.iter().all(|e| e.path() == output) {
                    continue;
                }
                for event in &batch {
                    tracing::debug!("Portfolio change: {:?}", event);
                }

                let generator = Arc::clone(&generator);
                match tokio::task::spawn_blocking(move || generator.generate()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => tracing::warn!("Failed to regenerate portfolio manifest: {}", e),
                    Err(e) => tracing::warn!("Manifest regeneration task failed: {}", e),
                }
            }
        });

        tracing::info!(
            "Watching {} for portfolio changes",
            self.config.portfolio_dir.display()
        );

        Ok(watcher)
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
