//! News list components.
//!
//! # Submodules
//!
//! - [`loader`]: "load more" pagination on the news listing page
//! - [`navigator`]: prev/next links on individual news posts
//! - [`script`]: the generated `news.js` header carrying the file list
//!
//! # Site Layout
//!
//! ```text
//! public_html/
//! ├── news.html            # Listing: first page of items + loader trigger
//! ├── news/
//! │   ├── 2025-05-06.html  # Post; embeds its own list-item block
//! │   └── 2025-04-01.html
//! └── res/js/news.js       # Header with news_files_list, newest first
//! ```

pub mod loader;
pub mod navigator;
pub mod script;
