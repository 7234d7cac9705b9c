use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid user pair: {0}")]
    InvalidPair(String),

    #[error("User {user_id} cannot be connected with {blocked_user_id}")]
    Blocked {
        user_id: String,
        blocked_user_id: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_pair(message: impl Into<String>) -> Self {
        AppError::InvalidPair(message.into())
    }

    pub fn blocked(user_id: impl Into<String>, blocked_user_id: impl Into<String>) -> Self {
        AppError::Blocked {
            user_id: user_id.into(),
            blocked_user_id: blocked_user_id.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    /// Any failure that originated in the backing row store.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::NotFound(_)
                | AppError::Conflict(_)
                | AppError::Internal(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    /// Errors the caller should surface to the end user instead of treating as a bug.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::Blocked { .. })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound(err.to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_store_errors() {
        assert!(AppError::Database("disk".into()).is_store_error());
        assert!(AppError::conflict("dup").is_store_error());
        assert!(!AppError::invalid_pair("self").is_store_error());
        assert!(!AppError::blocked("u1", "u2").is_store_error());
    }

    #[test]
    fn only_blocks_are_user_facing() {
        assert!(AppError::blocked("u1", "u2").is_user_facing());
        assert!(!AppError::NotFound("m1".into()).is_user_facing());
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}
