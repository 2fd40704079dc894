mod paste;

pub use paste::{ApiResponse, CreatePasteRequest, HealthResponse, ListPastesQuery};
