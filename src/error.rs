//! Error types for the news helpers.
//!
//! Most failures in this crate are deliberately local: a fragment that cannot
//! be fetched degrades to an empty string inside the loader. The variants here
//! surface the cases a caller may want to act on, such as a missing DOM target
//! or a malformed `news.js` header.

use std::io;
use std::path::PathBuf;

/// Errors produced by the news helpers.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("no element matching {0}")]
    MissingElement(String),

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("news.js header error: {0}")]
    Script(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, NewsError>;
