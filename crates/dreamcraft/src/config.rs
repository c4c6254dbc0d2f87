//! Site configuration (`dreamcraft.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use dreamcraft_manifest::GenerateConfig;
use dreamcraft_server::{Environment, ServerConfig};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid {name}: {message}")]
    InvalidEnv { name: &'static str, message: String },
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub portfolio: PortfolioSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub contact: ContactSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioSection {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSection {
    pub webhook_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_root() -> PathBuf {
    PathBuf::from("public/portfolio")
}
fn default_output() -> PathBuf {
    PathBuf::from("public/portfolio.json")
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for PortfolioSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            output: default_output(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            public_dir: default_public_dir(),
            dist_dir: default_dist_dir(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for ContactSection {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SiteConfig {
    /// Load `path` if it exists, otherwise use defaults.
    /// A file that exists but is malformed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `PORT` and `APP_ENV` (or `NODE_ENV`) from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply `PORT` and `APP_ENV` as returned by `lookup`.
    ///
    /// `NODE_ENV` is read when `APP_ENV` is unset.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT",
                message: format!("'{}' is not a port number", port),
            })?;
        }

        if let Some(env) = lookup("APP_ENV") {
            self.server.environment = env.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "APP_ENV",
                message: format!("{}", e),
            })?;
        } else if let Some(env) = lookup("NODE_ENV") {
            // Only "production" switches mode; other values such as "test" mean development.
            self.server.environment = match env.parse() {
                Ok(Environment::Production) => Environment::Production,
                _ => Environment::Development,
            };
        }

        Ok(())
    }

    pub fn generate_config(&self) -> GenerateConfig {
        GenerateConfig {
            root: self.portfolio.root.clone(),
            output: self.portfolio.output.clone(),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            environment: self.server.environment,
            public_dir: self.server.public_dir.clone(),
            dist_dir: self.server.dist_dir.clone(),
            portfolio_dir: self.portfolio.root.clone(),
            manifest_output: self.portfolio.output.clone(),
            allowed_origins: self.server.allowed_origins.clone(),
            watch: false,
            open: false,
        }
    }

    pub fn contact_timeout(&self) -> Duration {
        Duration::from_secs(self.contact.timeout_secs)
    }
}
