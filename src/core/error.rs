use thiserror::Error;

use crate::models::UserId;
use crate::services::StoreError;

/// Errors surfaced by the compatibility engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("No answers recorded for user {0}")]
    NotFound(UserId),

    #[error("Answer vectors have different lengths ({left} vs {right})")]
    SchemaMismatch { left: usize, right: usize },

    #[error("Answer vector is empty")]
    EmptyVector,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("User {0} has already submitted the quiz")]
    AlreadySubmitted(UserId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<StoreError> for MatchError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(user_id) => MatchError::NotFound(user_id),
            other => MatchError::PersistenceFailure(other.to_string()),
        }
    }
}
