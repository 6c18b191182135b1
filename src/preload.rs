//! Image cache warming for a specific page.
//!
//! A page can ask for the images of a later page to be fetched ahead of time
//! so they are cached when the reader gets there. Nothing waits on the
//! fetches and failures are ignored.

use tracing::{debug, info, instrument};
use url::Url;

/// Something that can start loading an image into the browser cache.
pub trait ImageSink {
    fn preload(&self, url: &str);
}

/// Which page to warm images on, and which images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadRequest {
    /// Filename of the page the images are meant for.
    pub page: String,
    /// Image URLs in preload order.
    pub urls: Vec<String>,
    /// First index in `urls` to preload.
    pub start: usize,
}

/// Preload `request.urls[start..]` if the current page is `request.page`.
///
/// Returns the number of preloads issued.
#[instrument(level = "info", skip_all, fields(page = %request.page, current = %current_filename))]
pub fn preload_images<S: ImageSink + ?Sized>(
    current_filename: &str,
    request: &PreloadRequest,
    sink: &S,
) -> usize {
    if current_filename != request.page {
        debug!("Not the target page; skipping preload");
        return 0;
    }
    let pending = request.urls.get(request.start..).unwrap_or_default();
    for url in pending {
        sink.preload(url);
    }
    info!(count = pending.len(), "Issued image preloads");
    pending.len()
}

/// Warms images with fire-and-forget GET requests.
///
/// Each preload spawns a task on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpImageWarmer {
    base: Url,
    client: reqwest::Client,
}

impl HttpImageWarmer {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            client: reqwest::Client::new(),
        }
    }
}

impl ImageSink for HttpImageWarmer {
    fn preload(&self, url: &str) {
        let Ok(resolved) = self.base.join(url) else {
            debug!(%url, "Unresolvable image URL");
            return;
        };
        let request = self.client.get(resolved);
        tokio::spawn(async move {
            // Only the cache side effect matters; the body is discarded.
            if let Ok(response) = request.send().await {
                let _ = response.bytes().await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl ImageSink for RecordingSink {
        fn preload(&self, url: &str) {
            self.0.lock().unwrap().push(url.to_string());
        }
    }

    fn request(start: usize) -> PreloadRequest {
        PreloadRequest {
            page: "gallery.html".to_string(),
            urls: vec![
                "img/1.jpg".to_string(),
                "img/2.jpg".to_string(),
                "img/3.jpg".to_string(),
            ],
            start,
        }
    }

    #[test]
    fn test_preload_on_matching_page() {
        let sink = RecordingSink::default();
        let count = preload_images("gallery.html", &request(1), &sink);
        assert_eq!(count, 2);
        assert_eq!(*sink.0.lock().unwrap(), vec!["img/2.jpg", "img/3.jpg"]);
    }

    #[test]
    fn test_preload_skipped_on_other_page() {
        let sink = RecordingSink::default();
        assert_eq!(preload_images("index.html", &request(0), &sink), 0);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_start_past_end_preloads_nothing() {
        let sink = RecordingSink::default();
        assert_eq!(preload_images("gallery.html", &request(3), &sink), 0);
        assert_eq!(preload_images("gallery.html", &request(9), &sink), 0);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_warmer_ignores_bad_urls() {
        let base = Url::parse("http://127.0.0.1:9/site/").unwrap();
        let warmer = HttpImageWarmer::new(base);
        // Neither call may panic; the connection failure is swallowed.
        warmer.preload("img/a.png");
        warmer.preload("http://[::1");
        tokio::task::yield_now().await;
    }
}
