//! Live preview server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as UrlPath, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::sync::RwLock;

use storefront_site::{BuildError, BuildOptions, ConfigError, SiteBuilder, SiteBundle, SiteConfig};

use crate::watcher::{ConfigWatcher, WatchEvent};
use crate::websocket::{
    hmr_client_script, HmrHub, HmrMessage, DOWNLOAD_PATH, HMR_SCRIPT_PATH, HMR_SOCKET_PATH,
};

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site configuration file to build and watch
    pub config_path: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("site.toml"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Shared server state.
struct ServerState {
    config_path: PathBuf,
    bundle: SiteBundle,
    hmr: HmrHub,
}

type SharedState = Arc<RwLock<ServerState>>;

/// Live preview server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new preview server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build the site and serve it until the process is stopped.
    ///
    /// The first build must succeed. Later failed rebuilds are reported to
    /// open pages and the last good build keeps being served.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{}: {}", self.config.host, e)))?;

        let bundle = build_preview(&self.config.config_path)?;
        tracing::info!("Built preview: {} pages", bundle.pages());

        let state = Arc::new(RwLock::new(ServerState {
            config_path: self.config.config_path.clone(),
            bundle,
            hmr: HmrHub::new(),
        }));

        let (watcher, mut rx) = ConfigWatcher::new(&self.config.config_path)
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state);

        tracing::info!("Starting preview server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Load the configuration at `config_path` and build it for preview.
pub fn build_preview(config_path: &Path) -> Result<SiteBundle, ServerError> {
    let config = SiteConfig::load(config_path)?;

    let options = BuildOptions {
        minify: false,
        preview: true,
        extra_scripts: vec![HMR_SCRIPT_PATH.trim_start_matches('/').to_string()],
    };

    Ok(SiteBuilder::new(config, options)?.build()?)
}

/// Load the configuration and zip the site as `storefront build` would
/// publish it. Returns the archive file name and its bytes.
pub fn build_download(config_path: &Path) -> Result<(String, Vec<u8>), ServerError> {
    let config = SiteConfig::load(config_path)?;

    let file_name = config
        .build
        .archive_path()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| DOWNLOAD_PATH.trim_start_matches('/').to_string());

    let options = BuildOptions {
        minify: config.build.minify,
        ..Default::default()
    };
    let bundle = SiteBuilder::new(config, options)?.build()?;

    Ok((file_name, bundle.to_zip()?))
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(HMR_SOCKET_PATH, get(ws_handler))
        .route(HMR_SCRIPT_PATH, get(hmr_script_handler))
        .route(DOWNLOAD_PATH, get(download_handler))
        .route("/{*path}", get(file_handler))
        .with_state(state)
}

/// Handle config watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::Changed(path) => {
            tracing::info!("Config changed: {}", path.display());
            rebuild(state).await;
        }

        WatchEvent::Removed(path) => {
            tracing::warn!("Config removed: {}; serving last build", path.display());
        }
    }
}

/// Rebuild the site, swapping the bundle only on success.
async fn rebuild(state: &SharedState) {
    let config_path = state.read().await.config_path.clone();

    let result = tokio::task::spawn_blocking(move || build_preview(&config_path)).await;

    match result {
        Ok(Ok(bundle)) => {
            let mut state = state.write().await;
            tracing::info!("Rebuilt preview: {} pages", bundle.pages());
            state.bundle = bundle;
            state.hmr.send(HmrMessage::Reload);
        }
        Ok(Err(e)) => {
            tracing::warn!("Rebuild failed: {}", e);
            state.read().await.hmr.send(HmrMessage::BuildFailed {
                message: e.to_string(),
            });
        }
        Err(e) => {
            tracing::warn!("Rebuild task failed: {}", e);
        }
    }
}

/// Map a request path onto a bundle path.
fn bundle_path(request: &str) -> String {
    let path = request.trim_start_matches('/');
    if path.is_empty() || path.ends_with('/') {
        format!("{}index.html", path)
    } else {
        path.to_string()
    }
}

/// Content type for a bundle path.
fn content_type(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

    match extension {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

async fn serve_from_bundle(state: &SharedState, request: &str) -> Response {
    let path = bundle_path(request);
    let state = state.read().await;

    match state.bundle.get(&path) {
        Some(contents) => (
            [(header::CONTENT_TYPE, content_type(&path))],
            contents.to_vec(),
        )
            .into_response(),
        None => {
            tracing::debug!("Not in bundle: {}", path);
            (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>")).into_response()
        }
    }
}

/// Handler for the index page.
async fn index_handler(State(state): State<SharedState>) -> Response {
    serve_from_bundle(&state, "").await
}

/// Handler for every other site file.
async fn file_handler(State(state): State<SharedState>, UrlPath(path): UrlPath<String>) -> Response {
    serve_from_bundle(&state, &path).await
}

/// Handler for the site download.
async fn download_handler(State(state): State<SharedState>) -> Response {
    let config_path = state.read().await.config_path.clone();

    match tokio::task::spawn_blocking(move || build_download(&config_path)).await {
        Ok(Ok((file_name, bytes))) => {
            tracing::info!("Serving {} ({} bytes)", file_name, bytes.len());
            (
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Ok(Err(e)) => {
            tracing::warn!("Download build failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!("Download task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.hmr.subscribe()
    };

    let Ok(msg) = serde_json::to_string(&HmrMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    // Forward messages to the page
    while let Ok(hmr_msg) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&hmr_msg) else {
            continue;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the live reload client script.
async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        hmr_client_script(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SITE: &str = r#"
[identity]
name = "Lamp Shop"
"#;

    fn state_for(config_path: &Path) -> SharedState {
        Arc::new(RwLock::new(ServerState {
            config_path: config_path.to_path_buf(),
            bundle: build_preview(config_path).unwrap(),
            hmr: HmrHub::new(),
        }))
    }

    async fn spawn(state: SharedState) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        addr
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.config_path, PathBuf::from("site.toml"));
    }

    #[test]
    fn maps_request_paths() {
        assert_eq!(bundle_path(""), "index.html");
        assert_eq!(bundle_path("/"), "index.html");
        assert_eq!(bundle_path("blog.html"), "blog.html");
        assert_eq!(bundle_path("assets/theme.css"), "assets/theme.css");
        assert_eq!(bundle_path("docs/"), "docs/index.html");
    }

    #[test]
    fn picks_content_types() {
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("assets/storefront.js"), "application/javascript; charset=utf-8");
        assert_eq!(content_type("manifest.json"), "application/json");
        assert_eq!(content_type("sitemap.xml"), "application/xml");
        assert_eq!(content_type("LICENSE"), "application/octet-stream");
    }

    #[test]
    fn preview_build_injects_reload_script() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, SITE).unwrap();

        let bundle = build_preview(&config).unwrap();
        let index = String::from_utf8(bundle.get("index.html").unwrap().to_vec()).unwrap();

        assert!(index.contains("__hmr.js"));
        assert!(index.contains("Lamp Shop"));
    }

    #[test]
    fn preview_build_reports_bad_config() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, "[theme]\nprimary = \"blue\"\n").unwrap();

        let result = build_preview(&config);

        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[tokio::test]
    async fn serves_bundle_files() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, SITE).unwrap();

        let addr = spawn(state_for(&config)).await;
        let client = reqwest::Client::new();

        let index = client.get(format!("http://{}/", addr)).send().await.unwrap();
        assert_eq!(index.status(), 200);
        assert_eq!(
            index.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        assert!(index.text().await.unwrap().contains("Lamp Shop"));

        let css = client
            .get(format!("http://{}/assets/theme.css", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(css.status(), 200);
        assert!(css.text().await.unwrap().contains("--p"));

        let script = client
            .get(format!("http://{}/__hmr.js", addr))
            .send()
            .await
            .unwrap();
        assert!(script.text().await.unwrap().contains("WebSocket"));

        let missing = client
            .get(format!("http://{}/missing.html", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), 404);
    }

    #[test]
    fn download_is_the_published_build() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, format!("{}\n[build]\narchive = \"out/lamps.zip\"\n", SITE)).unwrap();

        let (file_name, bytes) = build_download(&config).unwrap();

        assert_eq!(file_name, "lamps.zip");
        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut index = String::new();
        std::io::Read::read_to_string(&mut zip.by_name("index.html").unwrap(), &mut index).unwrap();
        assert!(index.contains("Lamp Shop"));
        assert!(!index.contains("__hmr.js"));
    }

    #[tokio::test]
    async fn serves_site_download() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, SITE).unwrap();

        let addr = spawn(state_for(&config)).await;

        let response = reqwest::get(format!("http://{}/site.zip", addr)).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "application/zip");
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"site.zip\""
        );
        assert!(response.bytes().await.unwrap().starts_with(b"PK"));
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_last_good_build() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, SITE).unwrap();

        let state = state_for(&config);
        let mut rx = state.read().await.hmr.subscribe();

        fs::write(&config, "[identity\nname = ").unwrap();
        rebuild(&state).await;

        assert!(matches!(rx.try_recv(), Ok(HmrMessage::BuildFailed { .. })));
        assert!(state.read().await.bundle.contains("index.html"));

        fs::write(&config, "[identity]\nname = \"Candle Shop\"\n").unwrap();
        rebuild(&state).await;

        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
        let state = state.read().await;
        let index = String::from_utf8(state.bundle.get("index.html").unwrap().to_vec()).unwrap();
        assert!(index.contains("Candle Shop"));
    }
}
