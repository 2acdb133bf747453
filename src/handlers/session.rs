use crate::error::AppError;
use crate::sessions::SessionId;
use crate::state::{SharedState, ViewQuery};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use gallery::{GalleryView, ScrollMetrics};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: SessionId,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    pub width: Option<u32>,
}

#[derive(Deserialize)]
pub struct ScrollRequest {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub width: Option<u32>,
}

impl ScrollRequest {
    fn metrics(&self) -> Result<ScrollMetrics, AppError> {
        let values = [self.scroll_top, self.scroll_height, self.client_height];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AppError::BadRequest(
                "Scroll metrics must be finite and non-negative".to_string(),
            ));
        }

        Ok(ScrollMetrics {
            scroll_top: self.scroll_top,
            scroll_height: self.scroll_height,
            client_height: self.client_height,
        })
    }
}

fn session_not_found(id: SessionId) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

async fn current_view(
    state: &SharedState,
    id: SessionId,
    width: Option<u32>,
) -> Result<Json<GalleryView>, AppError> {
    state
        .sessions
        .view(id, width)
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

pub async fn create_session(
    State(state): State<SharedState>,
) -> (StatusCode, Json<CreatedSession>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreatedSession { session_id }))
}

pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<GalleryView>, AppError> {
    current_view(&state, id, params.width).await
}

pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// 検索の送信: 結果といいね状態をリセットして 1 ページ目を取得する
pub async fn search(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<GalleryView>, AppError> {
    tracing::info!("Search request for session {}: {:?}", id, payload.query);

    let ticket = state
        .sessions
        .with_session(id, |session| session.submit(&payload.query))
        .await
        .ok_or_else(|| session_not_found(id))?;

    if let Some(ticket) = ticket {
        state.sessions.run(id, ticket).await;
    }

    current_view(&state, id, payload.width).await
}

/// スクロール通知: 底に近ければ次のページを取得する
pub async fn scroll(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<ScrollRequest>,
) -> Result<Json<GalleryView>, AppError> {
    let metrics = payload.metrics()?;

    let ticket = state
        .sessions
        .with_session(id, |session| session.on_scroll(metrics))
        .await
        .ok_or_else(|| session_not_found(id))?;

    if let Some(ticket) = ticket {
        tracing::debug!("Session {} loading page {}", id, ticket.page);
        state.sessions.run(id, ticket).await;
    }

    current_view(&state, id, payload.width).await
}
