use axum::http::StatusCode;
use db::error::DomainError;
use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// Every endpoint returns this structure:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` is a boolean indicating operation status.
/// - `message` provides a human-readable context string.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Maps a domain error onto the HTTP status its message ships with.
///
/// Validation-style failures are all client errors; only storage failures
/// become a 500, and their message is not forwarded to the client.
pub fn domain_error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidInput(_)
        | DomainError::Conflict(_)
        | DomainError::DeadlineExceeded
        | DomainError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
        DomainError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders a domain error as the standard envelope.
pub fn domain_error_response<T>(err: DomainError) -> (StatusCode, axum::Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    let status = domain_error_status(&err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "Database error while handling request");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, axum::Json(ApiResponse::error(message)))
}
