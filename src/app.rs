use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn router(state: AppState, assets_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/shows", get(handlers::get_shows))
        .route("/api/prefs", get(handlers::get_prefs).post(handlers::update_prefs))
        .route("/api/player", get(handlers::get_player))
        .route("/api/player/action", post(handlers::player_action))
        .route("/api/player/media", post(handlers::player_media))
        .route("/api/player/scrub", post(handlers::player_scrub))
        .route("/api/booking", post(handlers::submit_booking))
        .route("/api/availability", get(handlers::get_availability))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
