use gallery::{
    run_ticket, EmptyQueryPolicy, FetchTicket, GallerySession, GalleryView, SharedSession,
};
use likes::LikeStatusSource;
use search::SolutionSearcher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

pub type SessionId = Uuid;

pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// 閉じたタブは DELETE を送らないので、放置されたセッションはここで捨てる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

struct SessionEntry {
    session: SharedSession,
    last_seen: Instant,
}

/// ブラウザのタブごとのギャラリー状態
///
/// Fetches run on their own task, so a dropped request still brings the
/// session back to a settled phase.
#[derive(Clone)]
pub struct SessionStore {
    policy: EmptyQueryPolicy,
    limits: SessionLimits,
    searcher: Arc<dyn SolutionSearcher>,
    like_source: Arc<dyn LikeStatusSource>,
    inner: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
}

impl SessionStore {
    pub fn new(
        policy: EmptyQueryPolicy,
        limits: SessionLimits,
        searcher: Arc<dyn SolutionSearcher>,
        like_source: Arc<dyn LikeStatusSource>,
    ) -> Self {
        Self {
            policy,
            limits,
            searcher,
            like_source,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Evicts idle sessions (and the oldest ones over the cap) before adding.
    pub async fn create(&self) -> SessionId {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.limits.idle_ttl);
        while !sessions.is_empty() && sessions.len() >= self.limits.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => sessions.remove(&oldest),
                None => break,
            };
        }
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!("Evicted {} gallery sessions", evicted);
        }

        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(GallerySession::new(self.policy))),
                last_seen: now,
            },
        );
        tracing::debug!("Created gallery session {}", id);
        id
    }

    pub async fn remove(&self, id: SessionId) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Looks up a live session and marks it as used. Expired sessions are
    /// dropped on the way.
    async fn touch(&self, id: SessionId) -> Option<SharedSession> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(&id)?;
        if now.duration_since(entry.last_seen) >= self.limits.idle_ttl {
            sessions.remove(&id);
            tracing::debug!("Gallery session {} expired", id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.session.clone())
    }

    pub async fn view(&self, id: SessionId, width: Option<u32>) -> Option<GalleryView> {
        let session = self.touch(id).await?;
        let session = session.lock().await;
        Some(GalleryView::from_session(&session, width))
    }

    /// Runs `f` against the session under its lock.
    pub async fn with_session<R, F>(&self, id: SessionId, f: F) -> Option<R>
    where
        F: FnOnce(&mut GallerySession) -> R,
    {
        let session = self.touch(id).await?;
        let mut session = session.lock().await;
        Some(f(&mut session))
    }

    /// Fetches the ticket's page, applies it, then backfills like state.
    ///
    /// The work is spawned and awaited: if the caller is dropped the task still
    /// finishes. A session superseded by a new search or deleted meanwhile
    /// simply ignores the result.
    pub async fn run(&self, id: SessionId, ticket: FetchTicket) {
        let Some(session) = self.touch(id).await else {
            return;
        };
        let searcher = self.searcher.clone();
        let like_source = self.like_source.clone();

        let handle = tokio::spawn(async move {
            run_ticket(&session, searcher.as_ref(), like_source.as_ref(), ticket).await;
        });
        if let Err(e) = handle.await {
            tracing::error!("Fetch task for session {} failed: {}", id, e);
        }
    }
}
