use crate::pagination::{PaginationController, Phase, ScrollMetrics};
use anyhow::Result;
use gallery_core::{LikeStatus, LikeStatusMap, Record, ResultPage};
use likes::LikeStatusSource;
use search::SolutionSearcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Message shown in place of the gallery when a search fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching solutions";

/// 空クエリの扱い (プロジェクト全体で 1 つに固定する)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueryPolicy {
    /// Fetch the whole index, newest first.
    #[default]
    ListAll,
    /// Clear the gallery and fetch nothing.
    Clear,
}

impl EmptyQueryPolicy {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "list_all" => Some(Self::ListAll),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListAll => "list_all",
            Self::Clear => "clear",
        }
    }
}

/// A fetch the caller has to run. Results are applied with
/// [`GallerySession::complete_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

/// 1 画面ぶんのギャラリー状態
///
/// Query, result set, like map and pagination are reset together on every
/// submission. Each submission bumps `generation`; results carrying an older
/// generation are dropped.
#[derive(Debug, Clone)]
pub struct GallerySession {
    policy: EmptyQueryPolicy,
    generation: u64,
    query: Option<String>,
    results: Vec<Record>,
    likes: LikeStatusMap,
    pagination: PaginationController,
    error: Option<String>,
}

impl GallerySession {
    pub fn new(policy: EmptyQueryPolicy) -> Self {
        Self {
            policy,
            generation: 0,
            query: None,
            results: Vec::new(),
            likes: LikeStatusMap::new(),
            pagination: PaginationController::new(),
            error: None,
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn records(&self) -> &[Record] {
        &self.results
    }

    pub fn likes(&self) -> &LikeStatusMap {
        &self.likes
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn phase(&self) -> Phase {
        self.pagination.phase()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// New search submission. Returns the first-page fetch to run, or `None`
    /// when the empty-query policy says not to fetch.
    pub fn submit(&mut self, query: &str) -> Option<FetchTicket> {
        self.generation += 1;
        self.results.clear();
        self.likes.clear();
        self.error = None;
        self.query = Some(query.to_string());

        if query.trim().is_empty() && self.policy == EmptyQueryPolicy::Clear {
            tracing::debug!("Empty query submitted; clearing gallery");
            self.pagination.exhaust();
            return None;
        }

        let page = self.pagination.start_search();
        tracing::info!("Search submitted: {:?} (generation {})", query, self.generation);
        Some(self.ticket(page))
    }

    /// Scroll event. Returns the next-page fetch when one should start.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<FetchTicket> {
        self.query.as_ref()?;
        let page = self.pagination.on_scroll(metrics)?;
        tracing::debug!("Scrolled near bottom; loading page {}", page);
        Some(self.ticket(page))
    }

    fn ticket(&self, page: u32) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.query.clone().unwrap_or_default(),
            page,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Applies a finished fetch. Returns the ids of the new records when the
    /// result was applied, so their like state can be looked up.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ResultPage>,
    ) -> Option<Vec<String>> {
        if !self.is_current(ticket.generation) {
            tracing::debug!(
                "Dropping stale page {} for {:?} (generation {} != {})",
                ticket.page,
                ticket.query,
                ticket.generation,
                self.generation
            );
            return None;
        }

        match outcome {
            Ok(page) => {
                let ids = page.ids();
                if ticket.page == 1 {
                    self.results = page.records;
                } else {
                    self.results.extend(page.records);
                }
                self.pagination.finish(page.has_more);
                tracing::info!(
                    "Loaded page {} for {:?}: {} records total (has_more={})",
                    ticket.page,
                    ticket.query,
                    self.results.len(),
                    page.has_more
                );
                Some(ids)
            }
            Err(e) => {
                tracing::error!("Search failed for {:?} page {}: {:#}", ticket.query, ticket.page, e);
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                self.pagination.fail();
                None
            }
        }
    }

    /// Merges a like batch fetched for `generation`. Stale batches are ignored.
    pub fn apply_like_statuses(&mut self, generation: u64, statuses: Vec<LikeStatus>) -> bool {
        if !self.is_current(generation) {
            tracing::debug!("Dropping stale like statuses (generation {})", generation);
            return false;
        }
        self.likes.merge(statuses);
        true
    }
}

/// セッションはタブ単位で共有し、取得中はロックを手放す
pub type SharedSession = Arc<Mutex<GallerySession>>;

/// Runs `ticket` to completion: fetches the page, applies it, then backfills
/// like state for the new records.
///
/// The session lock is taken only to apply results, never across a request.
pub async fn run_ticket<S, L>(
    session: &Mutex<GallerySession>,
    searcher: &S,
    like_source: &L,
    ticket: FetchTicket,
) where
    S: SolutionSearcher + ?Sized,
    L: LikeStatusSource + ?Sized,
{
    let outcome = search::fetch_page(searcher, &ticket.query, ticket.page).await;
    let Some(ids) = session.lock().await.complete_fetch(&ticket, outcome) else {
        return;
    };

    let statuses = likes::fetch_statuses(like_source, &ids).await;
    session
        .lock()
        .await
        .apply_like_statuses(ticket.generation, statuses);
}
