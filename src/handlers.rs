mod common;
mod favorites;
mod session;

pub use common::{health, root};
pub use favorites::favorites;
pub use session::{create_session, delete_session, get_session, scroll, search};
