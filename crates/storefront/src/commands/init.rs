//! Write a starter site configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use storefront_site::STARTER_CONFIG;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing storefront...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(config_path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'storefront dev' to preview the site.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_starter_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("shop").join("site.toml");

        run(&path, false).await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), STARTER_CONFIG);
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[identity]\nname = \"Mine\"\n").unwrap();

        run(&path, false).await.unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Mine"));

        run(&path, true).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), STARTER_CONFIG);
    }
}
