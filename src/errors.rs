use axum::http::StatusCode;
use thiserror::Error;

/// Failures talking to the upstream collaborators (sheet, form, calendar).
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("{0} is outside the supported date range")]
    DateOutOfRange(chrono::NaiveDate),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
