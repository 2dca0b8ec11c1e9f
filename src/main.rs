//! CLI entry point for cms-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cms-site")]
#[command(version)]
#[command(about = "A server-rendered site and blog backed by a headless content store", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    cwd: Option<PathBuf>,

    /// Configuration file, relative to the base directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List content from the store
    List {
        /// Type of content to list (post, category, author)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Validate configuration and query the store once
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "cms_site=debug,info"
    } else {
        "cms_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip, open } => {
            let site = cms_site::Site::load(&base_dir, cli.config.as_deref())?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            cms_site::server::start(site, &ip, port, open).await?;
        }

        Commands::List { r#type } => {
            let site = cms_site::Site::load(&base_dir, cli.config.as_deref())?;
            cms_site::commands::list::run(&site, &r#type).await?;
        }

        Commands::Check => {
            let site = cms_site::Site::load(&base_dir, cli.config.as_deref())?;
            cms_site::commands::check::run(&site).await?;
        }

        Commands::Version => {
            println!("cms-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
