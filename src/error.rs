use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Failed to get recommendations")]
    Recommendation(#[from] RecommendError),
}

/// Failures reported by the account store
///
/// Storage engines differ in how they signal a uniqueness violation; the
/// store translates its own codes into `DuplicateEmail` so callers never
/// inspect driver errors.
#[derive(thiserror::Error, Debug)]
pub enum AccountError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("account not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Failures of the recommendation pipeline
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Recommendation service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API responded with status: {status}")]
    Upstream { status: u16, body: String },

    #[error("Malformed recommendation response: {0}")]
    MalformedResponse(String),

    #[error("Invalid recommendation input: {0}")]
    InvalidInput(String),
}

impl RecommendError {
    /// Detail string safe to show callers; transport errors name the
    /// upstream endpoint, so only the log gets those.
    pub fn client_details(&self) -> String {
        match self {
            RecommendError::Transport(_) => "Recommendation service unreachable".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateEmail => AppError::DuplicateEmail,
            AccountError::NotFound => AppError::NotFound("User not found".to_string()),
            AccountError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid credentials" }),
            ),
            AppError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Email already exists" }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error" }),
                )
            }
            AppError::Hashing(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server error" }),
                )
            }
            AppError::Recommendation(e) => {
                match &e {
                    RecommendError::Upstream { status, body } => tracing::error!(
                        status = status,
                        body = %body,
                        "Recommendation service returned an error status"
                    ),
                    other => tracing::error!(error = %other, "Recommendation request failed"),
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "Failed to get recommendations",
                        "details": e.client_details(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
