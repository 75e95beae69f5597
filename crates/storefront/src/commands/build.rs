//! Static site build command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use storefront_site::{BuildOptions, SiteBuilder, SiteConfig};

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    zip: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Building site...");
    let start = Instant::now();

    let config = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    tracing::info!("Loaded config from {}", config_path.display());

    let output_dir = output.unwrap_or_else(|| config.build.output.clone());
    let archive = zip.or_else(|| config.build.archive_path());
    let options = BuildOptions {
        minify: minify.unwrap_or(config.build.minify),
        ..Default::default()
    };

    let bundle = SiteBuilder::new(config, options)?.build()?;
    let result = bundle.write_dir(&output_dir)?;

    tracing::info!(
        "Built {} pages ({} files) in {}ms",
        result.pages,
        result.files,
        start.elapsed().as_millis()
    );
    tracing::info!("Output: {}", result.output_dir.display());

    if let Some(archive) = archive {
        bundle.write_archive(&archive)?;
        tracing::info!("Archive: {}", archive.display());
    }

    Ok(())
}
