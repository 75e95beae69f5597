//! Storefront CLI - form-driven storefront website generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::feed::FeedKind;
use commands::generate::{API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL};

mod commands;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Form-driven storefront website generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter site.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Preview the site with live reload
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Zip archive path (defaults to build.archive in the config)
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Serve a built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to build.output in the config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Draft headline, about and feature copy with an AI model
    Generate {
        /// What the business does
        #[arg(short, long)]
        describe: String,

        /// OpenAI-compatible chat completions URL
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Model name
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },

    /// Fetch a feed and render it the way the site would
    Feed {
        /// Feed URL or file (defaults to the configured feed)
        source: Option<String>,

        /// Schema to render rows with
        #[arg(short, long, value_enum, default_value = "products")]
        kind: FeedKind,

        /// Image for rows without one
        #[arg(long, value_name = "URL")]
        fallback: Option<String>,

        /// Print the rendered markup
        #[arg(long)]
        html: bool,
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

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Dev { port, no_open } => {
            commands::dev::run(cli.config, port, !no_open).await?;
        }
        Commands::Build {
            output,
            zip,
            no_minify,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, zip, minify).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(&cli.config, port, dir).await?;
        }
        Commands::Generate {
            describe,
            endpoint,
            model,
        } => {
            let api_key = std::env::var(API_KEY_ENV).ok();
            commands::generate::run(&cli.config, &describe, &endpoint, &model, api_key).await?;
        }
        Commands::Feed {
            source,
            kind,
            fallback,
            html,
        } => {
            commands::feed::run(&cli.config, source, kind, fallback, html).await?;
        }
    }

    Ok(())
}
