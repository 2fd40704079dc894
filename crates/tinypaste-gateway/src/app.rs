use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_paste_handler, get_paste_handler, health_handler, list_pastes_handler,
    raw_paste_handler,
};
use crate::rate_limit::rate_limit;
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        // Only the JSON API is rate limited.
        let pastes = Router::new()
            .route(
                "/pastes",
                get(list_pastes_handler).post(create_paste_handler),
            )
            .route(
                "/pastes/",
                get(list_pastes_handler).post(create_paste_handler),
            )
            .route("/pastes/{paste_id}", get(get_paste_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

        Router::new()
            .route("/health", get(health_handler))
            .route("/{paste_id}", get(raw_paste_handler))
            .merge(pastes)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
