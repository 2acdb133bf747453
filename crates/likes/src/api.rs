use anyhow::{Context, Result};
use async_trait::async_trait;
use gallery_core::{LikeStatus, Record};
use reqwest::Client;
use serde::Serialize;

/// いいね状態を持つバックエンド
#[async_trait]
pub trait LikeStatusSource: Send + Sync {
    /// Liked state for exactly `ids`. Entries may come back in any order and
    /// ids the backend does not know about may be missing.
    async fn like_statuses(&self, ids: &[String]) -> Result<Vec<LikeStatus>>;

    /// Every solution the current user has liked.
    async fn liked_solutions(&self) -> Result<Vec<Record>>;
}

#[derive(Serialize, Debug)]
struct LikedQueryRequest<'a> {
    user_id: &'a str,
    solution_ids: &'a [String],
}

#[derive(Clone, Debug)]
pub struct LikesApi {
    client: Client,
    base_url: String,
    user_id: Option<String>,
}

impl LikesApi {
    pub fn new(client: Client, base_url: &str, user_id: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.filter(|id| !id.is_empty()),
        }
    }
}

#[async_trait]
impl LikeStatusSource for LikesApi {
    async fn like_statuses(&self, ids: &[String]) -> Result<Vec<LikeStatus>> {
        let Some(user_id) = self.user_id.as_deref() else {
            tracing::debug!("No user identity configured; skipping like status lookup");
            return Ok(Vec::new());
        };

        let url = format!("{}/api/solutions/liked/query", self.base_url);
        let res = self
            .client
            .post(url)
            .json(&LikedQueryRequest {
                user_id,
                solution_ids: ids,
            })
            .send()
            .await
            .context("Failed to send like status request")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Like status API failed: {} - {}", status, text);
        }

        res.json()
            .await
            .context("Failed to parse like status response")
    }

    async fn liked_solutions(&self) -> Result<Vec<Record>> {
        let user_id = self
            .user_id
            .as_deref()
            .context("No user identity configured")?;

        let url = format!("{}/api/users/{}/liked", self.base_url, user_id);
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send liked solutions request")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Liked solutions API failed: {} - {}", status, text);
        }

        let hits: Vec<serde_json::Value> = res
            .json()
            .await
            .context("Failed to parse liked solutions response")?;
        Ok(hits.into_iter().filter_map(Record::from_hit).collect())
    }
}
