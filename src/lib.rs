//! # Quicknr News
//!
//! Page-side helpers for the news section of a Quicknr static site: a
//! "load more" paginator for the news listing, prev/next links between news
//! posts, and a handful of generic DOM and geometry utilities.
//!
//! ## Features
//!
//! - Appends further news items to the listing page, fetching each post's
//!   embedded list-item block in order
//! - Snaps to the end of the list when less than half a page would remain
//! - Renders prev/next links around a post's existing link block
//! - Reads and regenerates the `news.js` header carrying the file list
//! - Mobile user-agent detection, offset-parent position walks, image preloads
//!
//! ## Usage
//!
//! ```no_run
//! use quicknr_news::dispatch::{self, Dispatched, PageLocation};
//! use quicknr_news::dom::memory::MemoryDom;
//! use quicknr_news::fetch::FileFetcher;
//! use quicknr_news::NewsConfig;
//!
//! # async fn demo() -> quicknr_news::Result<()> {
//! let config = NewsConfig::load("site/news.yaml").await?;
//! let html = tokio::fs::read_to_string("site/public_html/news.html").await.unwrap_or_default();
//! let mut dom = MemoryDom::parse_document(&html);
//! let location = PageLocation::from_href("https://example.org/news.html");
//!
//! if let Dispatched::Loader(mut loader) = dispatch::run(&mut dom, &config, &location)? {
//!     let fetcher = FileFetcher::new("site/public_html");
//!     loader.load_more(&mut dom, &fetcher).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The browser is modelled as capabilities so the same logic runs against a
//! live page or a parsed file:
//! 1. **Document**: [`dom::Dom`], implemented by [`dom::memory::MemoryDom`]
//! 2. **Transport**: [`fetch::Fetcher`], implemented for the file system and HTTP
//! 3. **Image cache**: [`preload::ImageSink`]

pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod models;
pub mod news;
pub mod preload;
pub mod telemetry;
pub mod utils;

pub use config::NewsConfig;
pub use error::{NewsError, Result};
pub use news::loader::{LoadOutcome, NewsLoader};
pub use news::navigator::NewsNeighbours;
