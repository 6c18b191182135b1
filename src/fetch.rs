//! Retrieval of per-item news documents and extraction of their list fragment.
//!
//! Every published news post carries a commented-out copy of its listing
//! entry near the top of the `user_content` block:
//!
//! ```text
//! <!-- Quicknr-news-list-item-block
//! <h2><a href="news/launch.html">Launch</a></h2>
//! <p>We shipped.</p>
//! -->
//! ```
//!
//! The loader fetches the post, pulls that block out and appends it to the
//! listing page.
//!
//! # Fetchers
//!
//! | Type | Resolves `news/<file>` against |
//! |------|--------------------------------|
//! | [`FileFetcher`] | a site directory on disk (e.g. `public_html`) |
//! | [`HttpFetcher`] | the base URL of the published site |

use crate::error::{NewsError, Result};
use crate::utils::preview_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};
use url::Url;

static FRAGMENT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!-- Quicknr-news-list-item-block\s+(.+?)\s+-->")
        .expect("fragment pattern is valid")
});

/// Transport for site documents addressed by site-relative path.
pub trait Fetcher {
    /// Return the full text of the document at `path`.
    async fn fetch(&self, path: &str) -> Result<String>;
}

/// Site-relative path of a news post.
pub fn news_item_url(news_dir: &str, filename: &str) -> String {
    format!("{}/{}", news_dir.trim_end_matches('/'), filename)
}

/// The content of the first list-item comment block in `document`.
///
/// Surrounding whitespace inside the comment is not part of the fragment.
pub fn extract_fragment(document: &str) -> Option<&str> {
    FRAGMENT_BLOCK
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Fetch `path` and extract its fragment, or `""` if either step fails.
#[instrument(level = "debug", skip(fetcher))]
pub async fn fetch_fragment<F: Fetcher>(fetcher: &F, path: &str) -> String {
    match fetcher.fetch(path).await {
        Ok(document) => match extract_fragment(&document) {
            Some(fragment) => {
                debug!(
                    bytes = fragment.len(),
                    preview = %preview_for_log(fragment, 80),
                    "Extracted news fragment"
                );
                fragment.to_string()
            }
            None => {
                warn!(
                    bytes = document.len(),
                    head = %preview_for_log(&document, 120),
                    "News document has no list-item block"
                );
                String::new()
            }
        },
        Err(e) => {
            warn!(error = %e, "News document fetch failed");
            String::new()
        }
    }
}

/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    /// Serve paths relative to `root`, usually the site's `public_html`.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory that `news/<file>` paths are joined to
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for FileFetcher {
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| NewsError::Io { path: full, source })
    }
}

/// Requests documents over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// `base` should be the URL of the listing page or the site root; paths
    /// are joined to it the way a browser resolves relative links.
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self {
            base: Url::parse(base)?,
            client: reqwest::Client::new(),
        })
    }

    /// Absolute URL for a site-relative `path`.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(base = %self.base))]
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        let to_error = |source| NewsError::Http {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(to_error)?;
        response.text().await.map_err(to_error)
    }
}
