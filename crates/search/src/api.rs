use crate::structs::{SearchRequest, SearchResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use gallery_core::SORT_BY_TIMESTAMP_DESC;
use reqwest::Client;
use serde_json::Value;

/// 検索インデックスへの問い合わせ口
#[async_trait]
pub trait SolutionSearcher: Send + Sync {
    /// Raw hits for `query`, newest first.
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Result<Vec<Value>>;
}

/// MeiliSearch の HTTP API を叩く実装
#[derive(Clone, Debug)]
pub struct MeiliSearcher {
    client: Client,
    host: String,
    index: String,
    api_key: Option<String>,
}

impl MeiliSearcher {
    pub fn new(client: Client, host: &str, index: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            host: normalize_host(host),
            index: index.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/indexes/{}/search", self.host, self.index)
    }
}

/// Adds `http://` to scheme-less hosts and trims trailing slashes.
pub fn normalize_host(host: &str) -> String {
    let mut host = host.trim().to_string();
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{}", host);
    }
    while host.ends_with('/') {
        host.pop();
    }
    host
}

#[async_trait]
impl SolutionSearcher for MeiliSearcher {
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Result<Vec<Value>> {
        let body = SearchRequest {
            q: query,
            limit,
            offset,
            sort: vec![SORT_BY_TIMESTAMP_DESC],
        };

        let mut req = self.client.post(self.search_url()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let res = req.send().await.context("Failed to send search request")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Search API failed: {} - {}", status, text);
        }

        let search_res: SearchResponse = res
            .json()
            .await
            .context("Failed to parse search response")?;
        Ok(search_res.hits)
    }
}
