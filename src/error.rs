use axum::{http::StatusCode, response::{IntoResponse, Json}};
use serde_json::json;
use thiserror::Error;

use crate::domain::paste::InvalidField;
use crate::services::lifecycle::PasteError;
use crate::web::views::UnrepresentableExpiry;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidArgument(InvalidField),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error(transparent)]
    Render(#[from] UnrepresentableExpiry),
}

impl From<PasteError> for AppError {
    fn from(err: PasteError) -> Self {
        match err {
            PasteError::InvalidArgument(field) => AppError::InvalidArgument(field),
            PasteError::CorruptRecord(e) => AppError::CorruptRecord(e.to_string()),
            PasteError::StoreUnavailable(e) => AppError::StoreUnavailable(e.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::CorruptRecord(_) | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn log(&self) {
        match self {
            AppError::InvalidArgument(_) => {}
            AppError::CorruptRecord(m) => tracing::error!(error = %m, "undecodable paste record"),
            AppError::StoreUnavailable(m) => tracing::warn!(error = %m, "store call failed"),
            AppError::Render(e) => tracing::error!(error = %e, "cannot render paste"),
        }
    }

    pub fn into_text_response(self) -> axum::response::Response {
        self.log();
        let msg = match &self {
            AppError::InvalidArgument(field) => field.message(),
            AppError::CorruptRecord(_) | AppError::Render(_) => "Internal Server Error",
            AppError::StoreUnavailable(_) => "Service Unavailable",
        };
        (self.status(), msg).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        let msg = match &self {
            AppError::InvalidArgument(field) => field.message().to_string(),
            AppError::CorruptRecord(_) | AppError::Render(_) => "internal error".into(),
            AppError::StoreUnavailable(_) => "store unavailable".into(),
        };
        (self.status(), Json(json!({ "error": msg }))).into_response()
    }
}
