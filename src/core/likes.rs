use crate::core::error::MatchError;
use crate::models::{LikeEdge, LikeOutcome, LikeStatus, UserId};
use crate::services::LikeStore;

/// Records likes and promotes reciprocal pairs to matches
///
/// The two match flags of a pair are only ever written together through
/// [`LikeStore::put_edge_pair`], so they are always equal once persisted.
pub struct LikeCoordinator<'a> {
    store: &'a dyn LikeStore,
}

impl<'a> LikeCoordinator<'a> {
    pub fn new(store: &'a dyn LikeStore) -> Self {
        Self { store }
    }

    /// Register `from` liking `to`
    ///
    /// Idempotent: repeating a like never duplicates the edge and never
    /// clears an existing match.
    pub async fn like(&self, from: &UserId, to: &UserId) -> Result<LikeOutcome, MatchError> {
        if from == to {
            return Err(MatchError::InvalidInput("users cannot like themselves".to_string()));
        }

        let own = match self.store.get_edge(from, to).await? {
            Some(edge) => edge,
            None => {
                let edge = LikeEdge::new(from.clone(), to.clone());
                if self.store.insert_edge_if_absent(&edge).await? {
                    tracing::debug!("Created like edge {} -> {}", from, to);
                    edge
                } else {
                    // Lost a race with a concurrent like for the same pair
                    self.store
                        .get_edge(from, to)
                        .await?
                        .unwrap_or(edge)
                }
            }
        };

        // Read the reciprocal only after our own edge is persisted
        let Some(reciprocal) = self.store.get_edge(to, from).await? else {
            return Ok(LikeOutcome::Liked);
        };

        if own.is_match && reciprocal.is_match {
            return Ok(LikeOutcome::Matched);
        }

        self.store
            .put_edge_pair(&own.matched(), &reciprocal.matched())
            .await?;

        tracing::info!("Match between {} and {}", from, to);

        Ok(LikeOutcome::Matched)
    }

    /// Relation from the viewer `from` towards `to`
    pub async fn status_of(&self, from: &UserId, to: &UserId) -> Result<LikeStatus, MatchError> {
        let status = match self.store.get_edge(from, to).await? {
            Some(edge) if edge.is_match => LikeStatus::Matched,
            Some(_) => LikeStatus::Liked,
            None => LikeStatus::Normal,
        };
        Ok(status)
    }
}
