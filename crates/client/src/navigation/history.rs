//! Browser-facing collaborator seams for navigation.
//!
//! The controller never touches `window.history` or the analytics script
//! directly; both sit behind traits so the engine runs headless in tests
//! and native builds.

use super::Page;

/// The browser address bar and scroll position.
pub trait HistorySink: Send + Sync {
    /// Path component of the current location, e.g. `/jobs`.
    fn current_path(&self) -> String;

    /// Raw query string of the current location, without the leading `?`
    /// (empty when there is none).
    fn current_query(&self) -> String;

    /// Push a new path onto the history stack without reloading.
    fn push(&self, path: &str);

    /// Reset the viewport scroll position to the top.
    fn scroll_to_top(&self);
}

/// Page-view tracking collaborator.
pub trait PageViewSink: Send + Sync {
    /// Record that a logical page was entered.
    fn page_view(&self, page: Page, path: &str);
}

/// [`PageViewSink`] that drops every event, for hosts without analytics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl PageViewSink for NoopAnalytics {
    fn page_view(&self, _page: Page, _path: &str) {}
}
