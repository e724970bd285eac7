use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with the memo API and the static front page.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut api = Router::new().route(
        "/api/word",
        get(handler::list_words)
            .post(handler::add_word)
            .delete(handler::remove_word),
    );
    if config.enable_notes {
        api = api.route(
            "/api/note",
            get(handler::list_notes).put(handler::replace_notes),
        );
    }

    api.with_state(state)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
