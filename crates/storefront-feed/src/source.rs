//! Feed sources and fetching.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::delimited::parse_table;
use crate::table::Table;

/// Where a delimited feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Published spreadsheet export (or any HTTP(S) URL)
    Url(Url),
    /// Local file, for previews and offline checks
    File(PathBuf),
}

/// Errors that can occur when loading a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Feed {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read feed file {path}: {message}")]
    Read { path: String, message: String },
}

impl FeedSource {
    /// Interpret a user-supplied location: `http(s)://` URLs are fetched,
    /// anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        match Url::parse(location) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Self::Url(url),
            _ => Self::File(PathBuf::from(location)),
        }
    }

    /// Fetch the raw feed text.
    pub async fn fetch_text(&self, client: &reqwest::Client) -> Result<String, FeedError> {
        match self {
            Self::Url(url) => {
                tracing::debug!("Fetching feed {}", url);

                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| FeedError::Request {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FeedError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }

                response.text().await.map_err(|e| FeedError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Self::File(path) => {
                tracing::debug!("Reading feed {}", path.display());

                tokio::fs::read_to_string(path).await.map_err(|e| FeedError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Fetch and parse the feed into a table.
    pub async fn load(&self, client: &reqwest::Client) -> Result<Table, FeedError> {
        let text = self.fetch_text(client).await?;
        let table = parse_table(&text);
        tracing::debug!("Parsed {} rows from {}", table.len(), self);
        Ok(table)
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
