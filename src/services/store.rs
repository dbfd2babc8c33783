//! Storage seams used by the compatibility engine.
//!
//! The engine only ever talks to these traits; PostgreSQL backs them in
//! production and [`MemoryStore`](super::MemoryStore) in development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AnswerVector, LikeEdge, UserId};

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(UserId),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Answer vectors, one per user
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Answers of `user_id`, or [`StoreError::NotFound`] if the quiz is incomplete
    async fn get_answers(&self, user_id: &UserId) -> Result<AnswerVector, StoreError>;

    /// Every stored answer vector except the one owned by `user_id`
    async fn get_all_answers_except(
        &self,
        user_id: &UserId,
    ) -> Result<HashMap<UserId, AnswerVector>, StoreError>;

    /// Store a quiz attempt
    ///
    /// Returns `false` without writing when the user already has one.
    async fn insert_answers(
        &self,
        user_id: &UserId,
        answers: &AnswerVector,
    ) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Directed like edges, at most one per ordered pair
#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn get_edge(&self, from: &UserId, to: &UserId) -> Result<Option<LikeEdge>, StoreError>;

    /// Insert or replace the edge for `(edge.from, edge.to)`
    async fn put_edge(&self, edge: &LikeEdge) -> Result<(), StoreError>;

    /// Insert the edge unless one already exists for the pair
    ///
    /// Returns `true` when the edge was created.
    async fn insert_edge_if_absent(&self, edge: &LikeEdge) -> Result<bool, StoreError>;

    /// Upsert both edges as one unit: either both are persisted or neither is
    async fn put_edge_pair(&self, first: &LikeEdge, second: &LikeEdge) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
