//! Incremental loading of news items on the listing page.
//!
//! The listing page is generated with the first `page_size` items. Clicking
//! the loader trigger appends the next batch, fetched one post at a time from
//! the news directory. The trigger is detached while a batch is inserted and
//! put back at the end of the container only while items remain.

use crate::config::NewsConfig;
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::fetch::{Fetcher, fetch_fragment, news_item_url};
use crate::models::PaginationState;
use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

/// What a single [`NewsLoader::load_more`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Items fetched in this batch.
    pub requested: usize,
    /// Items whose fragment was non-empty and got appended.
    pub appended: usize,
    /// Pagination counter after the batch.
    pub loaded: usize,
    /// True once every item is rendered and the trigger is gone.
    pub exhausted: bool,
}

/// Pagination state for one listing page session.
#[derive(Debug, Clone)]
pub struct NewsLoader {
    config: NewsConfig,
    state: PaginationState,
}

impl NewsLoader {
    /// Create a loader for the listing page described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration; `news_files` and `page_size` seed the counter
    ///
    /// # Returns
    ///
    /// A loader whose counter starts with the first page rendered.
    pub fn new(config: NewsConfig) -> Self {
        let state = PaginationState::new(config.news_files.len(), config.page_size);
        Self { config, state }
    }

    /// Snapshot of the pagination counter.
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// The configuration the loader was built with.
    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// Markup of the trigger block appended by [`NewsLoader::install`].
    pub fn trigger_markup(&self) -> String {
        format!(
            r#"<div id="{}"><span id="{}">{}</span></div>"#,
            self.config.loader_block_id, self.config.loader_button_id, self.config.loader_button_text
        )
    }

    /// Append the trigger to the end of the news container.
    ///
    /// Returns the trigger block node.
    #[instrument(level = "info", skip_all, fields(container = %self.config.container_class))]
    pub fn install<D: Dom + ?Sized>(&self, dom: &mut D) -> Result<NodeId> {
        let container = self.container(dom)?;
        dom.append_html(container, &self.trigger_markup());
        let block = dom
            .find_by_id(&self.config.loader_block_id, Some(container))
            .found_or_missing(&format!("#{}", self.config.loader_block_id))?;
        info!(
            loaded = self.state.loaded(),
            total = self.state.total(),
            "Installed news loader trigger"
        );
        Ok(block)
    }

    /// Append the next batch of news items.
    ///
    /// Items are fetched and appended strictly in list order, one at a time.
    /// A post that cannot be fetched, or lacks a list-item block, adds nothing
    /// and does not stop the batch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NewsError::MissingElement`] if the news container is
    /// not in the document; nothing is changed in that case.
    #[instrument(level = "info", skip_all, fields(loaded = self.state.loaded(), total = self.state.total()))]
    pub async fn load_more<D, F>(&mut self, dom: &mut D, fetcher: &F) -> Result<LoadOutcome>
    where
        D: Dom + ?Sized,
        F: Fetcher,
    {
        let container = self.container(dom)?;
        let trigger = dom
            .find_by_id(&self.config.loader_block_id, None)
            .into_option();
        if let Some(trigger) = trigger {
            dom.detach(trigger);
        }

        let start = self.state.loaded();
        let end = self.state.batch_end();
        let mut outcome = LoadOutcome {
            requested: 0,
            appended: 0,
            loaded: start,
            exhausted: self.state.is_exhausted(),
        };
        if end <= start {
            debug!("News list already exhausted");
            return Ok(outcome);
        }

        let news_dir = self.config.news_dir.as_str();
        let (requested, appended) = stream::iter(&self.config.news_files[start..end])
            .then(|file| async move {
                let path = news_item_url(news_dir, file);
                fetch_fragment(fetcher, &path).await
            })
            .fold((0usize, 0usize), |(requested, appended), fragment| {
                let appended = if fragment.is_empty() {
                    appended
                } else {
                    dom.append_html(container, &fragment);
                    appended + 1
                };
                future::ready((requested + 1, appended))
            })
            .await;

        self.state.advance_to(end);
        if let Some(trigger) = trigger {
            if !self.state.is_exhausted() {
                dom.append_child(container, trigger);
            }
        }

        outcome.requested = requested;
        outcome.appended = appended;
        outcome.loaded = self.state.loaded();
        outcome.exhausted = self.state.is_exhausted();
        info!(
            requested,
            appended,
            loaded = outcome.loaded,
            exhausted = outcome.exhausted,
            "Loaded news batch"
        );
        Ok(outcome)
    }

    fn container<D: Dom + ?Sized>(&self, dom: &D) -> Result<NodeId> {
        dom.find_by_class(&self.config.container_class, None)
            .found_or_missing(&format!(".{}", self.config.container_class))
    }
}
