//! 無限スクロールのページ送り状態
//!
//! Idle ─submit─▶ FetchingFirstPage ─▶ Idle | Exhausted
//! Idle ─scroll─▶ FetchingNextPage  ─▶ Idle | Exhausted
//! fetching ─failure─▶ Error
//!
//! Exhausted と Error は次の検索送信まで抜けない。

use serde::{Deserialize, Serialize};

/// Distance from the bottom of the scroll container that triggers the next page.
pub const SCROLL_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    FetchingFirstPage,
    FetchingNextPage,
    Exhausted,
    Error,
}

impl Phase {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::FetchingFirstPage | Self::FetchingNextPage)
    }
}

/// Scroll position of the gallery container, as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - SCROLL_THRESHOLD_PX
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    phase: Phase,
    current_page: u32,
    has_more: bool,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationController {
    /// Nothing has been searched yet, so scrolling does nothing.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            current_page: 1,
            has_more: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_fetching()
    }

    /// Resets to page 1 and enters `FetchingFirstPage`. Allowed from any phase.
    pub fn start_search(&mut self) -> u32 {
        self.current_page = 1;
        self.has_more = true;
        self.phase = Phase::FetchingFirstPage;
        self.current_page
    }

    /// Ends the query without fetching anything.
    pub fn exhaust(&mut self) {
        self.current_page = 1;
        self.has_more = false;
        self.phase = Phase::Exhausted;
    }

    /// Returns the page to fetch when the scroll position is close enough to
    /// the bottom and no fetch is in flight.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<u32> {
        if self.phase != Phase::Idle || !self.has_more || !metrics.near_bottom() {
            return None;
        }

        self.current_page += 1;
        self.phase = Phase::FetchingNextPage;
        Some(self.current_page)
    }

    /// Records a successful fetch.
    pub fn finish(&mut self, has_more: bool) {
        if !self.phase.is_fetching() {
            tracing::warn!("Fetch finished while in {:?}; ignoring", self.phase);
            return;
        }

        self.has_more = has_more;
        self.phase = if has_more { Phase::Idle } else { Phase::Exhausted };
    }

    /// Records a failed fetch. Sticky until the next `start_search`.
    pub fn fail(&mut self) {
        if !self.phase.is_fetching() {
            tracing::warn!("Fetch failed while in {:?}; ignoring", self.phase);
            return;
        }

        self.has_more = false;
        self.phase = Phase::Error;
    }
}
