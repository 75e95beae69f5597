//! Live preview command.

use std::path::PathBuf;

use anyhow::Result;
use storefront_server::{DevServer, DevServerConfig};

/// Run the preview server.
pub async fn run(config_path: PathBuf, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting preview server on port {}", port);

    let config = DevServerConfig {
        config_path,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
