pub mod api;

use gallery_core::LikeStatus;
use std::collections::HashSet;

pub use api::{LikeStatusSource, LikesApi};

/// Looks up liked state for one batch of ids.
///
/// Only entries for ids in the batch are kept. A failed lookup is logged and
/// yields an empty batch; the gallery then shows those cards as not liked.
pub async fn fetch_statuses<S>(source: &S, ids: &[String]) -> Vec<LikeStatus>
where
    S: LikeStatusSource + ?Sized,
{
    if ids.is_empty() {
        return Vec::new();
    }

    match source.like_statuses(ids).await {
        Ok(statuses) => {
            let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
            statuses
                .into_iter()
                .filter(|s| requested.contains(s.solution_id.as_str()))
                .collect()
        }
        Err(e) => {
            tracing::warn!("Failed to fetch like status for {} solutions: {:#}", ids.len(), e);
            Vec::new()
        }
    }
}
