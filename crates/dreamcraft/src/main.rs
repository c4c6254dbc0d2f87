//! Dreamcraft CLI - portfolio manifest generator and site server.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use dreamcraft_client::ContactForm;
use dreamcraft_server::Environment;

mod commands;
mod config;

use commands::serve::ServeOptions;
use config::SiteConfig;

#[derive(Parser)]
#[command(name = "dreamcraft")]
#[command(about = "Portfolio manifest generator and site server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to dreamcraft.toml config file
    #[arg(short, long, default_value = "dreamcraft.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file and the portfolio category folders
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Scan the portfolio folder and write the manifest
    Generate {
        /// Portfolio root (defaults to config or "public/portfolio")
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Manifest file (defaults to config or "public/portfolio.json")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the site server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// development or production
        #[arg(short, long)]
        env: Option<Environment>,

        /// Regenerate the manifest when portfolio images change
        #[arg(short, long)]
        watch: bool,

        /// Open a browser
        #[arg(long)]
        open: bool,
    },

    /// Send a message to the contact webhook
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        message: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Webhook URL (defaults to config)
        #[arg(long)]
        webhook: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Failed to load .env file: {}", e);
        }
    }

    let mut config = SiteConfig::load(&cli.config)?;
    config.apply_env()?;

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, &config.portfolio.root, yes).await?;
        }
        Commands::Generate { root, output } => {
            commands::generate::run(&config, root, output).await?;
        }
        Commands::Serve {
            host,
            port,
            env,
            watch,
            open,
        } => {
            let options = ServeOptions {
                host,
                port,
                environment: env,
                watch,
                open,
            };
            commands::serve::run(&config, options).await?;
        }
        Commands::Contact {
            name,
            message,
            phone,
            email,
            webhook,
        } => {
            let form = ContactForm {
                name,
                phone,
                email,
                message,
            };
            commands::contact::run(&config, webhook, form).await?;
        }
    }

    Ok(())
}
