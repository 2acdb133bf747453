use crate::error::AppError;
use crate::state::{SharedState, ViewQuery};
use axum::{
    extract::{Query, State},
    response::Json,
};
use gallery::{render_cards, Card};
use serde::Serialize;

#[derive(Serialize)]
pub struct FavoritesView {
    pub total: usize,
    pub column_count: usize,
    pub columns: Vec<Vec<Card>>,
}

/// お気に入り一覧 (設定されたユーザーのいいね済みソリューション)
pub async fn favorites(
    State(state): State<SharedState>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<FavoritesView>, AppError> {
    if state.config.user_id.is_none() {
        return Err(AppError::Unauthorized(
            "No user identity configured".to_string(),
        ));
    }

    let records = state.likes.liked_solutions().await?;
    tracing::debug!("Loaded {} liked solutions", records.len());

    let columns = render_cards(&records, |_| true, params.width);
    Ok(Json(FavoritesView {
        total: records.len(),
        column_count: columns.len(),
        columns,
    }))
}
