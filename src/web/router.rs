use axum::{
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};

use super::handlers::{create_paste, get_paste, health, view_paste};
use crate::state::AppState;

const CSP: &str = "script-src 'self' 'unsafe-inline'";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/healthz", get(health))
        .route("/api/pastes", post(create_paste))
        .route("/api/pastes/:id", get(get_paste))
        .route("/p/:id", get(view_paste))
        .layer(middleware::map_response(set_csp))
        .with_state(state)
}

async fn set_csp(mut res: Response) -> Response {
    res.headers_mut()
        .insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    res
}
