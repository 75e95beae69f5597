//! Static serving of a built site.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use storefront_site::SiteConfig;
use tower_http::services::ServeDir;

/// A built site ready to be served.
#[derive(Debug, PartialEq)]
struct BuiltSite {
    name: String,
    dir: PathBuf,
}

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let site = locate(config_path, dir)?;

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!(
        "Serving {} from {} at http://{}",
        site.name,
        site.dir.display(),
        addr
    );

    let app = Router::new().fallback_service(ServeDir::new(&site.dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let _ = open::that(format!("http://{}", addr));

    axum::serve(listener, app).await?;

    Ok(())
}

/// Find the output directory: the one given, else the configured one.
///
/// A missing `site.toml` is fine when a directory is given; the directory
/// itself must exist and hold a home page.
fn locate(config_path: &Path, dir: Option<PathBuf>) -> Result<BuiltSite> {
    let config = if config_path.exists() {
        SiteConfig::load(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else if dir.is_some() {
        SiteConfig::default()
    } else {
        anyhow::bail!(
            "No {} and no --dir given. Run 'storefront init' first.",
            config_path.display()
        );
    };

    let dir = dir.unwrap_or_else(|| config.build.output.clone());
    if !dir.join("index.html").is_file() {
        anyhow::bail!(
            "No built site in {}. Run 'storefront build' first.",
            dir.display()
        );
    }

    Ok(BuiltSite {
        name: config.identity.name,
        dir,
    })
}
