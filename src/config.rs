//! Site configuration for the news list and news post pages.
//!
//! The values mirror what a Quicknr site template provides to the page: the
//! newest-first list of news files, the page size, link labels and the class
//! and id names the page markup is built around. Every field has a default, so
//! a YAML file only needs to name what differs.
//!
//! # Example
//!
//! ```yaml
//! page_size: 10
//! prev_link_text: "&lt; Older"
//! news_files:
//!   - "2025-05-06-launch.html"
//!   - "2025-04-01-beta.html"
//! ```

use crate::error::{NewsError, Result};
use crate::news::script::NewsScriptHeader;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration consumed by the loader, the navigator and entry dispatch.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// News filenames, newest first.
    pub news_files: Vec<String>,
    /// Number of items shown per page on the news listing.
    pub page_size: usize,
    /// Label of the link to the older neighbour.
    pub prev_link_text: String,
    /// Label of the link to the newer neighbour.
    pub next_link_text: String,
    /// Text inside the "load more" trigger.
    pub loader_button_text: String,
    /// Class of the element news fragments are appended to.
    pub container_class: String,
    /// Id of the block wrapping the trigger.
    pub loader_block_id: String,
    /// Id of the clickable trigger itself.
    pub loader_button_id: String,
    /// Class of the element that receives prev/next link markup.
    pub links_class: String,
    /// Directory name that holds the per-item news documents.
    pub news_dir: String,
    /// Filenames that identify the news listing page.
    pub index_names: Vec<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            news_files: Vec::new(),
            page_size: 50,
            prev_link_text: "&lt; Older".to_string(),
            next_link_text: "Newer &gt;".to_string(),
            loader_button_text: "Load More".to_string(),
            container_class: "user_content".to_string(),
            loader_block_id: "NewsLoaderBlock".to_string(),
            loader_button_id: "LoadMoreNewsBtn".to_string(),
            links_class: "news_links".to_string(),
            news_dir: "news".to_string(),
            index_names: vec![
                "news.html".to_string(),
                "news.php".to_string(),
                "news.htm".to_string(),
            ],
        }
    }
}

impl NewsConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: NewsConfig = serde_yaml::from_str(text)?;
        debug!(
            files = config.news_files.len(),
            page_size = config.page_size,
            "Parsed news config"
        );
        Ok(config)
    }

    /// Load a configuration from a YAML file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Io`] if the file cannot be read and
    /// [`NewsError::Config`] if it is not valid YAML for this struct.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| NewsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml_str(&text)?;
        info!(files = config.news_files.len(), "Loaded news config");
        Ok(config)
    }

    /// Overlay the values a generated `news.js` header carries.
    pub fn apply_script_header(&mut self, header: NewsScriptHeader) {
        self.prev_link_text = header.prev_link_text;
        self.next_link_text = header.next_link_text;
        self.news_files = header.news_files;
        if let Some(items) = header.page_size {
            self.page_size = items;
        }
    }

    /// True when `filename` names the news listing page.
    pub fn is_index_name(&self, filename: &str) -> bool {
        self.index_names.iter().any(|name| name == filename)
    }
}
