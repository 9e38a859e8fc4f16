use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use db::models::user::Role;

/// Flattens `validator` errors into one human-readable message string.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub user_code: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::user::Model> for UserResponse {
    fn from(user: db::models::user::Model) -> Self {
        Self {
            id: user.id,
            user_code: user.user_code,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
