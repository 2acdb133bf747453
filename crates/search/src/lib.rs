pub mod api;
pub mod structs;

use anyhow::{Context, Result};
use gallery_core::{page_offset, ResultPage, PAGE_SIZE};

pub use api::{MeiliSearcher, SolutionSearcher};

/// Fetches one page (1-based) of `query` and normalizes the hits.
///
/// Zero hits is a normal result with `has_more == false`. Failures are returned
/// as-is; nothing is retried.
pub async fn fetch_page<S>(searcher: &S, query: &str, page: u32) -> Result<ResultPage>
where
    S: SolutionSearcher + ?Sized,
{
    if page == 0 {
        anyhow::bail!("Page numbers start at 1");
    }

    let offset = page_offset(page);
    let hits = searcher
        .search(query, PAGE_SIZE, offset)
        .await
        .with_context(|| format!("Failed to fetch page {} for {:?}", page, query))?;

    let result = ResultPage::from_hits(hits);
    tracing::debug!(
        "Fetched page {} for {:?}: {} hits (has_more={})",
        page,
        query,
        result.hit_count,
        result.has_more
    );
    Ok(result)
}
