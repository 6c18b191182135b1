//! The generated header of `res/js/news.js`.
//!
//! When news posts change, the generator rewrites everything above the marker
//! line with the link labels and the newest-first file list; the rest of the
//! script is preserved byte for byte.
//!
//! ```text
//! var news_prev_link_text = "&lt; Older";
//! var news_next_link_text = "Newer &gt;";
//! var news_files_list = ["b.html", "a.html"];
//!
//! //==DO_NOT_EDIT_THIS_LINE
//! ...
//! ```

use crate::config::NewsConfig;
use crate::error::{NewsError, Result};
use crate::models::NewsFileRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

/// Separates the generated header from the hand-maintained script.
pub const MARKER: &str = "//==DO_NOT_EDIT_THIS_LINE";

static VAR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*var\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.+?)\s*;\s*$")
        .expect("var line pattern is valid")
});

/// Values carried by the generated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsScriptHeader {
    pub prev_link_text: String,
    pub next_link_text: String,
    /// Newest first.
    pub news_files: Vec<String>,
    /// `news_list_items`, when the template defines it in the header.
    pub page_size: Option<usize>,
}

/// Filenames ordered newest first.
///
/// Records published at the same moment are ordered by filename, descending.
pub fn newest_first(records: &[NewsFileRecord]) -> Vec<String> {
    let mut sorted: Vec<&NewsFileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.published
            .cmp(&a.published)
            .then_with(|| b.filename.cmp(&a.filename))
    });
    sorted.into_iter().map(|r| r.filename.clone()).collect()
}

/// Build a complete `news.js` from header values and the text after the
/// marker.
pub fn render_header(
    prev_link_text: &str,
    next_link_text: &str,
    news_files: &[String],
    rest: &str,
) -> Result<String> {
    let files = news_files
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?
        .join(", ");
    Ok(format!(
        "\nvar news_prev_link_text = {};\nvar news_next_link_text = {};\nvar news_files_list = [{}];\n\n{}{}",
        serde_json::to_string(prev_link_text)?,
        serde_json::to_string(next_link_text)?,
        files,
        MARKER,
        rest
    ))
}

/// Regenerate the header of an existing `news.js` from `config`.
///
/// # Errors
///
/// Returns [`NewsError::Script`] if `existing` has no marker line.
#[instrument(level = "info", skip_all, fields(files = config.news_files.len()))]
pub fn update_script(existing: &str, config: &NewsConfig) -> Result<String> {
    let (_, rest) = existing
        .split_once(MARKER)
        .ok_or_else(|| NewsError::Script("marker line not found".to_string()))?;
    render_header(
        &config.prev_link_text,
        &config.next_link_text,
        &config.news_files,
        rest,
    )
}

/// Read the header values from a `news.js`.
///
/// Missing link labels fall back to the [`NewsConfig`] defaults.
///
/// # Errors
///
/// Returns [`NewsError::Script`] if the marker or `news_files_list` is
/// missing, or a value is not a valid literal.
pub fn parse_header(text: &str) -> Result<NewsScriptHeader> {
    let (head, _) = text
        .split_once(MARKER)
        .ok_or_else(|| NewsError::Script("marker line not found".to_string()))?;

    let defaults = NewsConfig::default();
    let mut header = NewsScriptHeader {
        prev_link_text: defaults.prev_link_text,
        next_link_text: defaults.next_link_text,
        news_files: Vec::new(),
        page_size: None,
    };
    let mut saw_files = false;

    for caps in VAR_LINE.captures_iter(head) {
        let value = &caps[2];
        match &caps[1] {
            "news_prev_link_text" => header.prev_link_text = string_literal(value)?,
            "news_next_link_text" => header.next_link_text = string_literal(value)?,
            "news_files_list" => {
                header.news_files = serde_json::from_str(value)
                    .map_err(|e| NewsError::Script(format!("news_files_list: {e}")))?;
                saw_files = true;
            }
            "news_list_items" => {
                let items = value
                    .parse::<usize>()
                    .map_err(|e| NewsError::Script(format!("news_list_items: {e}")))?;
                header.page_size = Some(items);
            }
            other => debug!(name = other, "Ignoring unknown header variable"),
        }
    }

    if !saw_files {
        return Err(NewsError::Script("news_files_list not found".to_string()));
    }
    debug!(files = header.news_files.len(), "Parsed news.js header");
    Ok(header)
}

fn string_literal(value: &str) -> Result<String> {
    serde_json::from_str(value).map_err(|e| NewsError::Script(format!("string literal {value}: {e}")))
}
