//! Live preview server for storefront sites.
//!
//! Serves a site built in memory from `site.toml`, rebuilds it when the file
//! changes and tells open pages to reload over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{build_download, build_preview, DevServer, DevServerConfig, ServerError};
pub use watcher::{ConfigWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage, DOWNLOAD_PATH};
