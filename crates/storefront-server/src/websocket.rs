//! WebSocket live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path the live reload socket is served on.
pub const HMR_SOCKET_PATH: &str = "/__hmr";

/// Path the live reload client script is served on.
pub const HMR_SCRIPT_PATH: &str = "/__hmr.js";

/// Path the published site is downloaded from as a zip.
pub const DOWNLOAD_PATH: &str = "/site.zip";

/// Messages sent to preview pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// The site was rebuilt; reload the page
    Reload,

    /// The configuration could not be loaded or built.
    /// The previous build keeps being served.
    BuildFailed {
        /// Human-readable failure
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to every open page.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    /// Create a new hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected pages.
    pub fn send(&self, msg: HmrMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side live reload script.
///
/// The socket URL is derived from the page's own host, so the script works
/// on whatever address the server was bound to. The script also pins a
/// download link for the published site to the page.
pub fn hmr_client_script() -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const protocol = location.protocol === 'https:' ? 'wss:' : 'ws:';
  const ws = new WebSocket(protocol + '//' + location.host + '{path}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  function showError(message) {{
    let banner = document.getElementById('__hmr-error');
    if (!banner) {{
      banner = document.createElement('pre');
      banner.id = '__hmr-error';
      banner.style.cssText = 'position:fixed;left:0;right:0;bottom:0;margin:0;padding:1rem;' +
        'background:#7f1d1d;color:#fff;font:13px monospace;white-space:pre-wrap;z-index:99999';
      document.body.appendChild(banner);
    }}
    banner.textContent = message;
  }}

  function addDownloadLink() {{
    const link = document.createElement('a');
    link.id = '__site-download';
    link.href = '{download}';
    link.textContent = 'Download site';
    link.style.cssText = 'position:fixed;left:1rem;bottom:1rem;padding:.6rem 1rem;border-radius:6px;' +
      'background:#111827;color:#fff;font:600 13px system-ui,sans-serif;text-decoration:none;z-index:99998';
    document.body.appendChild(link);
  }}

  if (document.body) {{
    addDownloadLink();
  }} else {{
    document.addEventListener('DOMContentLoaded', addDownloadLink);
  }}

  ws.onopen = function() {{
    console.log('[HMR] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);
    console.log('[HMR]', msg.type);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'build_failed':
        showError('Build failed: ' + msg.message);
        break;

      case 'connected':
        console.log('[HMR] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[HMR] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        console.log('[HMR] Reconnecting...');
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[HMR] WebSocket error:', e);
  }};
}})();
"#,
        path = HMR_SOCKET_PATH,
        download = DOWNLOAD_PATH
    )
}
