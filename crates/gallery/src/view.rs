use crate::layout::{column_count, estimated_height, masonry};
use crate::pagination::Phase;
use crate::session::GallerySession;
use chrono::{DateTime, Utc};
use gallery_core::{LikeStatusMap, Record};
use serde::Serialize;

/// ギャラリーの 1 枚
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    /// Position in the result set.
    pub index: usize,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub liked: bool,
    pub content: Record,
}

impl Card {
    fn new(index: usize, record: &Record, liked: bool) -> Self {
        Self {
            index,
            id: record.id.clone(),
            title: record.title().map(str::to_string),
            image: record.image().map(str::to_string),
            published_at: record.timestamp(),
            liked,
            content: record.clone(),
        }
    }
}

/// Lays out records as masonry columns of cards.
pub fn render_cards<F>(records: &[Record], is_liked: F, viewport_width: Option<u32>) -> Vec<Vec<Card>>
where
    F: Fn(&str) -> bool,
{
    let cards: Vec<Card> = records
        .iter()
        .enumerate()
        .map(|(index, record)| Card::new(index, record, is_liked(&record.id)))
        .collect();

    let columns = column_count(cards.len(), viewport_width);
    masonry(cards, columns, |card| estimated_height(&card.content))
}

/// Same as [`render_cards`] with liked flags from `likes` (missing = not liked).
pub fn render(records: &[Record], likes: &LikeStatusMap, viewport_width: Option<u32>) -> Vec<Vec<Card>> {
    render_cards(records, |id| likes.is_liked(id), viewport_width)
}

/// Everything the browser needs to draw one gallery.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub phase: Phase,
    pub query: Option<String>,
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    /// "Loading...", "Loading more..." or the error message.
    pub status: Option<String>,
    pub total: usize,
    pub column_count: usize,
    pub columns: Vec<Vec<Card>>,
}

impl GalleryView {
    pub fn from_session(session: &GallerySession, viewport_width: Option<u32>) -> Self {
        let pagination = session.pagination();
        let status = match session.phase() {
            Phase::FetchingFirstPage => Some("Loading...".to_string()),
            Phase::FetchingNextPage => Some("Loading more...".to_string()),
            Phase::Error => session.error().map(str::to_string),
            Phase::Idle | Phase::Exhausted => None,
        };

        let columns = render(session.records(), session.likes(), viewport_width);

        Self {
            phase: session.phase(),
            query: session.query().map(str::to_string),
            page: pagination.current_page(),
            has_more: pagination.has_more(),
            loading: pagination.is_loading(),
            status,
            total: session.records().len(),
            column_count: columns.len(),
            columns,
        }
    }
}
