use crate::sessions::{SessionLimits, SessionStore};
use gallery::EmptyQueryPolicy;
use likes::{LikeStatusSource, LikesApi};
use search::{api::normalize_host, MeiliSearcher, SolutionSearcher};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SEARCH_INDEX: &str = "solution_id";
pub const DEFAULT_PORT: u16 = 3000;

/// `?width=` on view endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub width: Option<u32>,
}

/// 起動時に一度だけ読み込む設定
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub search_host: String,
    pub search_api_key: Option<String>,
    pub search_index: String,
    pub api_url: String,
    pub user_id: Option<String>,
    pub empty_query_policy: EmptyQueryPolicy,
    pub session_limits: SessionLimits,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let search_host = match get("SEARCH_HOST") {
            Some(host) => normalize_host(&host),
            None => derive_search_host(&api_url),
        };

        let empty_query_policy = match get("EMPTY_QUERY_POLICY") {
            Some(value) => EmptyQueryPolicy::from_str(&value).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid EMPTY_QUERY_POLICY {:?} (expected \"list_all\" or \"clear\")",
                    value
                )
            })?,
            None => EmptyQueryPolicy::default(),
        };

        let defaults = SessionLimits::default();
        let session_limits = SessionLimits {
            idle_ttl: get("SESSION_IDLE_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_ttl),
            max_sessions: get("MAX_SESSIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_sessions),
        };

        let port = get("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            search_host,
            search_api_key: get("SEARCH_API_KEY"),
            search_index: get("SEARCH_INDEX").unwrap_or_else(|| DEFAULT_SEARCH_INDEX.to_string()),
            api_url: api_url.trim_end_matches('/').to_string(),
            user_id: get("GALLERY_USER_ID"),
            empty_query_policy,
            session_limits,
            port,
        })
    }
}

/// The search service runs next to the backend on port 7700.
pub fn derive_search_host(api_url: &str) -> String {
    normalize_host(&api_url.replace(":5000", ":7700"))
}

pub type SharedState = AppState;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub likes: Arc<dyn LikeStatusSource>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig, http_client: reqwest::Client) -> Self {
        let searcher = MeiliSearcher::new(
            http_client.clone(),
            &config.search_host,
            &config.search_index,
            config.search_api_key.clone(),
        );
        let likes = LikesApi::new(http_client, &config.api_url, config.user_id.clone());
        Self::with_sources(config, Arc::new(searcher), Arc::new(likes))
    }

    /// Wires the session store to the given search and like backends.
    pub fn with_sources(
        config: AppConfig,
        searcher: Arc<dyn SolutionSearcher>,
        likes: Arc<dyn LikeStatusSource>,
    ) -> Self {
        let sessions = SessionStore::new(
            config.empty_query_policy,
            config.session_limits,
            searcher,
            likes.clone(),
        );

        Self {
            config,
            likes,
            sessions,
        }
    }
}
