pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/todos", get(handlers::api::list_todos))
        .route("/api/todos", post(handlers::api::create_new_todo))
        .route("/api/todos/{id}", put(handlers::api::update_existing_todo))
        .route(
            "/api/todos/{id}",
            delete(handlers::api::delete_existing_todo),
        )
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state)
}
