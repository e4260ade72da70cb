/// Unified Error Handling Module
///
/// Every failure the auth core can produce maps to exactly one variant here,
/// and every variant maps 1:1 to an HTTP status and a stable machine-checkable
/// error code. Route handlers never construct ad-hoc error bodies.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Authentication and session failures.
///
/// These are expected, client-recoverable outcomes. They carry no internal
/// detail by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    DuplicateUser,
    UserNotFound,
    InvalidCredentials,
    SessionNotFound,
    TokenInvalid,
    TokenExpired,
    MissingToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::DuplicateUser => write!(f, "User already exists"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::SessionNotFound => write!(f, "Session not found"),
            AuthError::TokenInvalid => write!(f, "Invalid token"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
        }
    }
}

impl StdError for AuthError {}

impl AuthError {
    /// Stable error code surfaced in the JSON body.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::DuplicateUser => "DUPLICATE_USER",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::SessionNotFound => "SESSION_NOT_FOUND",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::MissingToken => "MISSING_TOKEN",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials
            | AuthError::SessionNotFound
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Central application error type.
#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    /// Unexpected failures (store connectivity, hashing, token encoding).
    /// The detail is logged server-side and never exposed to the client.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(format!("database error: {}", err))
    }
}

/// Error response body, identical shape for every failure.
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique id for correlating the response with server-side logs.
    pub error_id: String,
    pub message: String,
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    fn to_response_parts(&self, error_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = match self {
            AppError::Auth(e) => (e.status_code(), e.code().to_string(), e.to_string()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "Internal server error".to_string(),
            ),
        };

        let body = ErrorResponse::new(error_id.to_string(), message, code, status.as_u16());
        (status, body)
    }

    fn log(&self, error_id: &str) {
        match self {
            AppError::Auth(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Authentication failure");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log(&error_id);

        let (status, body) = self.to_response_parts(&error_id);
        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => e.status_code(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
