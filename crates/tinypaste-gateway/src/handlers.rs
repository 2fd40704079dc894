mod health;
mod paste;

pub use health::health_handler;
pub use paste::{create_paste_handler, get_paste_handler, list_pastes_handler, raw_paste_handler};
