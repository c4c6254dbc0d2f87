//! Server configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Deployment mode of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Serves `public/` and exposes error details
    #[default]
    Development,

    /// Serves the built site with an `index.html` fallback and hides error details
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Whether error details may be sent to clients.
    pub fn exposes_errors(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Origins allowed by CORS when none are configured.
    pub fn default_origins(&self) -> Vec<String> {
        match self {
            Environment::Development => vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            Environment::Production => vec!["https://yourdomain.com".to_string()],
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown environment '{0}' (expected development or production)")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Deployment mode
    pub environment: Environment,

    /// Static files served in development (holds `portfolio/` and `portfolio.json`)
    pub public_dir: PathBuf,

    /// Built site served in production
    pub dist_dir: PathBuf,

    /// Portfolio root scanned by `/api/portfolio-images`
    pub portfolio_dir: PathBuf,

    /// Manifest file rewritten in watch mode
    pub manifest_output: PathBuf,

    /// CORS origins; empty means the environment defaults
    pub allowed_origins: Vec<String>,

    /// Regenerate the manifest when portfolio images change
    pub watch: bool,

    /// Open a browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            environment: Environment::Development,
            public_dir: PathBuf::from("public"),
            dist_dir: PathBuf::from("dist"),
            portfolio_dir: PathBuf::from("public/portfolio"),
            manifest_output: PathBuf::from("public/portfolio.json"),
            allowed_origins: Vec::new(),
            watch: false,
            open: false,
        }
    }
}

impl ServerConfig {
    /// The CORS origins in effect.
    pub fn origins(&self) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            self.environment.default_origins()
        } else {
            self.allowed_origins.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_names() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(" Dev ".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn falls_back_to_environment_origins() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert_eq!(config.origins(), vec!["https://yourdomain.com"]);

        let config = ServerConfig {
            allowed_origins: vec!["https://example.com".to_string()],
            ..Default::default()
        };
        assert_eq!(config.origins(), vec!["https://example.com"]);
    }

    #[test]
    fn only_development_exposes_errors() {
        assert!(Environment::Development.exposes_errors());
        assert!(!Environment::Production.exposes_errors());
    }
}
