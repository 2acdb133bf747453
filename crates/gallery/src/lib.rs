pub mod layout;
pub mod pagination;
pub mod session;
pub mod view;

pub use pagination::{PaginationController, Phase, ScrollMetrics, SCROLL_THRESHOLD_PX};
pub use session::{
    run_ticket, EmptyQueryPolicy, FetchTicket, GallerySession, SharedSession, FETCH_ERROR_MESSAGE,
};
pub use view::{render, render_cards, Card, GalleryView};
