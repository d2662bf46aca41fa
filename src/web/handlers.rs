use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::domain::paste::{FetchOutcome, NewPaste};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::web::views::{render_html, ApiView};

pub const TEST_NOW_HEADER: &str = "x-test-now-ms";

pub async fn health(State(state): State<AppState>) -> Response {
    match state.pastes.ping().await {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "ok": false }))).into_response()
        }
    }
}

pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            let msg = format!("invalid JSON body: {}", rejection.body_text());
            return Ok((StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response());
        }
    };
    let paste = NewPaste::from_json(&body).map_err(AppError::InvalidArgument)?;
    let now = request_now(&state, &headers);
    let record = state.pastes.create_at(paste, now).await?;

    let url = format!("{}/p/{}", origin(&headers), record.id);
    Ok(Json(json!({ "id": record.id, "url": url })).into_response())
}

pub async fn get_paste(State(state): State<AppState>, Path(id): Path<String>, headers: HeaderMap) -> Result<Response> {
    let now = request_now(&state, &headers);
    let reason = match state.pastes.fetch_at(&id, now).await? {
        FetchOutcome::Success(paste) => return Ok(Json(ApiView::try_from(paste)?).into_response()),
        FetchOutcome::NotFound => "not found",
        FetchOutcome::Expired => "expired",
        FetchOutcome::ViewLimitExceeded => "view limit exceeded",
    };
    Ok((StatusCode::NOT_FOUND, Json(json!({ "error": reason }))).into_response())
}

pub async fn view_paste(State(state): State<AppState>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let now = request_now(&state, &headers);
    let outcome = match state.pastes.fetch_at(&id, now).await {
        Ok(outcome) => outcome,
        Err(e) => return AppError::from(e).into_text_response(),
    };
    let reason = match outcome {
        FetchOutcome::Success(paste) => {
            return match render_html(&paste) {
                Ok(html) => Html(html).into_response(),
                Err(e) => AppError::from(e).into_text_response(),
            };
        }
        FetchOutcome::NotFound => "Not Found",
        FetchOutcome::Expired => "Expired",
        FetchOutcome::ViewLimitExceeded => "View Limit Exceeded",
    };
    (StatusCode::NOT_FOUND, reason).into_response()
}

// test mode lets `x-test-now-ms` pin the clock per request
fn request_now(state: &AppState, headers: &HeaderMap) -> i64 {
    if state.test_mode {
        let pinned = headers
            .get(TEST_NOW_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());
        if let Some(now) = pinned {
            return now;
        }
    }
    state.pastes.now_ms()
}

fn origin(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}
