//! Where the gallery gets its manifest from.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use dreamcraft_manifest::Manifest;

/// Default request timeout for manifest fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching a manifest.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A provider of the portfolio manifest.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<Manifest, FetchError>;
}

/// Fetches the manifest over HTTP, e.g. `/portfolio.json` or `/api/portfolio-images`.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
}

impl HttpManifestSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<Manifest, FetchError> {
        tracing::debug!("Fetching manifest from {}", self.url);
        let manifest = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Manifest>()
            .await?;
        Ok(manifest)
    }
}

/// Reads a manifest file from disk.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    path: PathBuf,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    async fn fetch(&self) -> Result<Manifest, FetchError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(Manifest::from_json(&json)?)
    }
}

#[async_trait]
impl ManifestSource for Manifest {
    async fn fetch(&self) -> Result<Manifest, FetchError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use dreamcraft_manifest::PortfolioImageEntry;
    use dreamcraft_server::{Server, ServerConfig};
    use tempfile::{tempdir, TempDir};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn sample() -> Manifest {
        Manifest::new(vec![
            PortfolioImageEntry::new(1, "kitchens", "a.jpg"),
            PortfolioImageEntry::new(2, "bedrooms", "b.jpg"),
        ])
    }

    /// Serve a public dir holding `portfolio.json` and one image.
    async fn spawn_site() -> (TempDir, String, oneshot::Sender<()>) {
        let temp = tempdir().unwrap();
        let public = temp.path().join("public");
        fs::create_dir_all(public.join("portfolio/kitchens")).unwrap();
        fs::write(public.join("portfolio/kitchens/a.jpg"), b"img").unwrap();
        fs::write(
            public.join("portfolio.json"),
            sample().to_json_pretty().unwrap(),
        )
        .unwrap();

        let config = ServerConfig {
            public_dir: public.clone(),
            portfolio_dir: public.join("portfolio"),
            ..Default::default()
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(Server::new(config).serve(listener, async move {
            let _ = rx.await;
        }));

        (temp, base, tx)
    }

    #[tokio::test]
    async fn fetches_static_manifest() {
        let (_temp, base, _shutdown) = spawn_site().await;

        let source = HttpManifestSource::new(format!("{base}/portfolio.json")).unwrap();
        let manifest = source.fetch().await.unwrap();

        assert_eq!(manifest, sample());
    }

    #[tokio::test]
    async fn fetches_live_scan() {
        let (_temp, base, _shutdown) = spawn_site().await;

        let source = HttpManifestSource::new(format!("{base}/api/portfolio-images")).unwrap();
        let manifest = source.fetch().await.unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].src, "/portfolio/kitchens/a.jpg");
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let (_temp, base, _shutdown) = spawn_site().await;

        let source = HttpManifestSource::new(format!("{base}/api/missing")).unwrap();

        assert!(matches!(source.fetch().await, Err(FetchError::Http(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpManifestSource::with_timeout(
            format!("http://{addr}/portfolio.json"),
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn reads_manifest_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("portfolio.json");
        fs::write(&path, sample().to_json_pretty().unwrap()).unwrap();

        let manifest = FileManifestSource::new(&path).fetch().await.unwrap();

        assert_eq!(manifest, sample());
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("portfolio.json");
        fs::write(&path, "{not json").unwrap();

        let result = FileManifestSource::new(&path).fetch().await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let temp = tempdir().unwrap();

        let result = FileManifestSource::new(temp.path().join("nope.json"))
            .fetch()
            .await;

        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
