//! Page-load entry point.
//!
//! Decides from the page location which news feature the page gets:
//!
//! | Page | Condition | Installs |
//! |------|-----------|----------|
//! | `news.html` / `news.php` / `news.htm` | more files than one page | loader trigger |
//! | any page inside `news/` | more than one file | prev/next links |
//!
//! The two are mutually exclusive; the listing check wins.

use crate::config::NewsConfig;
use crate::dom::Dom;
use crate::error::Result;
use crate::news::loader::NewsLoader;
use crate::news::navigator::{NewsNeighbours, render_links};
use tracing::{debug, info, instrument};

/// Directory and filename of the current page, derived from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Last path segment before the filename.
    pub dir: String,
    /// Everything after the last `/`; may be empty.
    pub filename: String,
}

impl PageLocation {
    pub fn from_href(href: &str) -> Self {
        let (dir_path, filename) = href.rsplit_once('/').unwrap_or(("", href));
        let dir = dir_path.rsplit_once('/').map_or(dir_path, |(_, last)| last);
        Self {
            dir: dir.to_string(),
            filename: filename.to_string(),
        }
    }
}

/// What the entry point installed on the page.
#[derive(Debug)]
pub enum Dispatched {
    /// The listing page got a loader trigger; feed clicks to the loader.
    Loader(NewsLoader),
    /// A news post got prev/next links.
    Navigator(NewsNeighbours),
    Nothing,
}

/// Install the news feature that fits `location`.
///
/// # Errors
///
/// Propagates [`crate::NewsError::MissingElement`] when the chosen feature's
/// container is missing from the page.
#[instrument(level = "info", skip(dom, config), fields(files = config.news_files.len()))]
pub fn run<D: Dom + ?Sized>(
    dom: &mut D,
    config: &NewsConfig,
    location: &PageLocation,
) -> Result<Dispatched> {
    let files = config.news_files.len();
    if config.is_index_name(&location.filename) && files > config.page_size {
        let loader = NewsLoader::new(config.clone());
        loader.install(dom)?;
        info!("News listing page; loader installed");
        return Ok(Dispatched::Loader(loader));
    }
    if location.dir == config.news_dir && files > 1 {
        let found = render_links(dom, config, &location.filename)?;
        info!("News post page; links rendered");
        return Ok(Dispatched::Navigator(found));
    }
    debug!("No news feature for this page");
    Ok(Dispatched::Nothing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDom;

    const LISTING: &str = r#"<html><body><div class="user_content"><p>one</p></div></body></html>"#;
    const POST: &str = r#"<html><body><div class="user_content"></div><div class="news_links"></div></body></html>"#;

    fn config(total: usize, page_size: usize) -> NewsConfig {
        NewsConfig {
            news_files: (0..total).map(|i| format!("n{i}.html")).collect(),
            page_size,
            ..NewsConfig::default()
        }
    }

    #[test]
    fn test_location_from_href() {
        let loc = PageLocation::from_href("https://example.org/site/news/n1.html");
        assert_eq!(loc.dir, "news");
        assert_eq!(loc.filename, "n1.html");

        let loc = PageLocation::from_href("https://example.org/site/");
        assert_eq!(loc.dir, "site");
        assert_eq!(loc.filename, "");

        let loc = PageLocation::from_href("news.html");
        assert_eq!(loc.dir, "");
        assert_eq!(loc.filename, "news.html");
    }

    #[test]
    fn test_listing_installs_loader() {
        let mut dom = MemoryDom::parse_document(LISTING);
        let loc = PageLocation::from_href("https://example.org/news.php");
        let dispatched = run(&mut dom, &config(5, 2), &loc).unwrap();
        assert!(matches!(dispatched, Dispatched::Loader(ref l) if l.state().loaded() == 2));
        assert!(dom.find_by_id("NewsLoaderBlock", None).is_found());
    }

    #[test]
    fn test_short_listing_gets_nothing() {
        let mut dom = MemoryDom::parse_document(LISTING);
        let loc = PageLocation::from_href("https://example.org/news.html");
        let dispatched = run(&mut dom, &config(2, 2), &loc).unwrap();
        assert!(matches!(dispatched, Dispatched::Nothing));
        assert!(!dom.find_by_id("NewsLoaderBlock", None).is_found());
    }

    #[test]
    fn test_post_renders_links() {
        let mut dom = MemoryDom::parse_document(POST);
        let loc = PageLocation::from_href("https://example.org/news/n1.html");
        let dispatched = run(&mut dom, &config(3, 50), &loc).unwrap();
        match dispatched {
            Dispatched::Navigator(found) => {
                assert_eq!(found.previous.as_deref(), Some("n2.html"));
                assert_eq!(found.next.as_deref(), Some("n0.html"));
            }
            other => panic!("expected navigator, got {other:?}"),
        }
        assert!(dom.find_by_class("prev_link", None).is_found());
    }

    #[test]
    fn test_single_post_gets_no_links() {
        let mut dom = MemoryDom::parse_document(POST);
        let loc = PageLocation::from_href("https://example.org/news/n0.html");
        let dispatched = run(&mut dom, &config(1, 50), &loc).unwrap();
        assert!(matches!(dispatched, Dispatched::Nothing));
        assert!(!dom.find_by_class("prev_link", None).is_found());
    }

    #[test]
    fn test_other_pages_get_nothing() {
        let mut dom = MemoryDom::parse_document(LISTING);
        let loc = PageLocation::from_href("https://example.org/about.html");
        assert!(matches!(
            run(&mut dom, &config(5, 2), &loc).unwrap(),
            Dispatched::Nothing
        ));
    }

    #[tokio::test]
    async fn test_listing_session_against_site_directory() {
        let dir = tempfile::tempdir().unwrap();
        let news = dir.path().join("news");
        std::fs::create_dir_all(&news).unwrap();
        let config = config(10, 3);
        for file in &config.news_files {
            let body = format!(
                "<html><body><div class=\"user_content\">\n\
                 <!-- Quicknr-news-list-item-block\n<div class=\"entry\">{file}</div>\n-->\n\
                 </div></body></html>"
            );
            std::fs::write(news.join(file), body).unwrap();
        }

        let mut dom = MemoryDom::parse_document(LISTING);
        let loc = PageLocation::from_href("https://example.org/news.html");
        let Dispatched::Loader(mut loader) = run(&mut dom, &config, &loc).unwrap() else {
            panic!("expected loader");
        };
        let fetcher = crate::fetch::FileFetcher::new(dir.path());

        let first = loader.load_more(&mut dom, &fetcher).await.unwrap();
        assert_eq!((first.loaded, first.exhausted), (6, false));
        let second = loader.load_more(&mut dom, &fetcher).await.unwrap();
        assert_eq!((second.loaded, second.exhausted), (10, true));

        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        let entries: Vec<String> = dom
            .children(container)
            .iter()
            .filter(|c| dom.attr(**c, "class") == Some("entry"))
            .map(|c| dom.text_content(*c))
            .collect();
        let expected: Vec<String> = config.news_files[3..].to_vec();
        assert_eq!(entries, expected);
        assert!(!dom.find_by_id("NewsLoaderBlock", None).is_found());
    }

    #[test]
    fn test_missing_container_propagates() {
        let mut dom = MemoryDom::parse_document("<html><body></body></html>");
        let loc = PageLocation::from_href("https://example.org/news/n1.html");
        assert!(run(&mut dom, &config(3, 50), &loc).is_err());
    }
}
