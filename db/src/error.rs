use thiserror::Error;

/// Error taxonomy shared by every domain operation.
///
/// Route handlers translate these into the response envelope exactly once, at
/// the operation boundary; nothing is retried internally.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Deadline has passed. Submission is not allowed.")]
    DeadlineExceeded,

    #[error("Invalid grade {grade}. Must be between 0 and {max_marks}.")]
    OutOfRange { grade: f64, max_marks: f64 },

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
