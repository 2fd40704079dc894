//! HTTP gateway for the tinypaste service.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod rate_limit;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
