use axum::{Router, routing::get};

pub mod groups;
pub mod system;
pub mod wallet;

/// Router for all endpoints that act as a principal.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/groups", groups::router())
        .nest("/wallet", wallet::router())
}
