//! Prev/next links between news posts.
//!
//! The news file list is ordered newest first, so "previous" points to the
//! next entry in the list (an older post) and "next" to the one before it.

use crate::config::NewsConfig;
use crate::dom::Dom;
use crate::error::Result;
use tracing::{debug, info, instrument};

/// Filenames of the posts adjacent to the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsNeighbours {
    /// Older post.
    pub previous: Option<String>,
    /// Newer post.
    pub next: Option<String>,
}

impl NewsNeighbours {
    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}

/// Locate `current` in `files` and return its neighbours.
pub fn neighbours(files: &[String], current: &str) -> NewsNeighbours {
    let Some(index) = files.iter().position(|file| file == current) else {
        return NewsNeighbours::default();
    };
    let last = files.len() - 1;
    let (previous, next) = if index == 0 {
        (files.get(1), None)
    } else if index == last {
        (None, files.get(index - 1))
    } else {
        (files.get(index + 1), files.get(index - 1))
    };
    NewsNeighbours {
        previous: previous.cloned(),
        next: next.cloned(),
    }
}

/// Markup placed before the existing links.
pub fn previous_link_markup(target: &str, label: &str) -> String {
    format!("\n<span class=\"prev_link\"><a href=\"{target}\">{label}</a></span>")
}

/// Markup placed after the existing links.
pub fn next_link_markup(target: &str, label: &str) -> String {
    format!("<span class=\"next_link\"><a href=\"{target}\">{label}</a></span>\n")
}

/// Wrap the links container's content with prev/next links for `current`.
///
/// The container keeps its existing content (typically the link back to the
/// listing). Calling this twice on the same page duplicates the links.
///
/// # Errors
///
/// Returns [`crate::NewsError::MissingElement`] if no element carries the
/// configured links class.
#[instrument(level = "info", skip(dom, config), fields(files = config.news_files.len()))]
pub fn render_links<D: Dom + ?Sized>(
    dom: &mut D,
    config: &NewsConfig,
    current: &str,
) -> Result<NewsNeighbours> {
    let found = neighbours(&config.news_files, current);
    let links = dom
        .find_by_class(&config.links_class, None)
        .found_or_missing(&format!(".{}", config.links_class))?;
    if found.is_empty() {
        debug!("Current page is not in the news list");
        return Ok(found);
    }

    let mut markup = dom.inner_html(links);
    if let Some(previous) = &found.previous {
        markup.insert_str(0, &previous_link_markup(previous, &config.prev_link_text));
    }
    if let Some(next) = &found.next {
        markup.push_str(&next_link_markup(next, &config.next_link_text));
    }
    dom.set_inner_html(links, &markup);
    info!(previous = ?found.previous, next = ?found.next, "Rendered news links");
    Ok(found)
}
