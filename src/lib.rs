//! Quiz Match - compatibility scoring and mutual-like matching
//!
//! Users answer a fixed quiz; each user is shown the others whose answers
//! agree with theirs the most, and two users who like each other become a match.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compatibility_score, rank, CompatibilityEngine, LikeCoordinator, MatchError, RankResult};
pub use models::{AnswerVector, CompatibilityEntry, LikeEdge, LikeOutcome, LikeStatus, QuizSchema, UserId};
pub use services::{AnswerStore, LikeStore, MemoryStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let a = AnswerVector::new(vec![1, 2, 3]);
        assert_eq!(compatibility_score(&a, &a).unwrap(), 100);
    }
}
