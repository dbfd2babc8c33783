use std::sync::Arc;

use crate::core::error::MatchError;
use crate::core::likes::LikeCoordinator;
use crate::core::ranker::{rank, RankResult};
use crate::models::{
    AnswerVector, CompatibilityEntry, LikeOutcome, LikeStatus, QuizSchema, RankedCandidate, UserId,
};
use crate::services::{AnswerStore, LikeStore};

/// Entry point used by the HTTP layer
///
/// Ties the answer store, the like store and the quiz schema together.
#[derive(Clone)]
pub struct CompatibilityEngine {
    answers: Arc<dyn AnswerStore>,
    likes: Arc<dyn LikeStore>,
    schema: QuizSchema,
}

impl CompatibilityEngine {
    pub fn new(answers: Arc<dyn AnswerStore>, likes: Arc<dyn LikeStore>, schema: QuizSchema) -> Self {
        Self {
            answers,
            likes,
            schema,
        }
    }

    /// Validate and store a user's single quiz attempt
    pub async fn submit_answers(&self, user_id: &UserId, raw: Vec<i32>) -> Result<AnswerVector, MatchError> {
        let answers = self.validate_answers(raw)?;

        if !self.answers.insert_answers(user_id, &answers).await? {
            return Err(MatchError::AlreadySubmitted(user_id.clone()));
        }

        tracing::info!("Stored {} answers for user {}", answers.len(), user_id);
        Ok(answers)
    }

    fn validate_answers(&self, raw: Vec<i32>) -> Result<AnswerVector, MatchError> {
        if raw.len() != self.schema.question_count {
            return Err(MatchError::InvalidInput(format!(
                "expected {} answers, got {}",
                self.schema.question_count,
                raw.len()
            )));
        }

        if let Some((index, value)) = raw
            .iter()
            .enumerate()
            .find(|(_, value)| !(0..self.schema.option_count).contains(*value))
        {
            return Err(MatchError::InvalidInput(format!(
                "answer {} is {}, must be in 0..{}",
                index, value, self.schema.option_count
            )));
        }

        Ok(AnswerVector::new(raw))
    }

    /// Rank every other user against `user_id`, keeping `n` entries
    ///
    /// Fails with [`MatchError::NotFound`] when the user has not taken the quiz.
    pub async fn rank_for(&self, user_id: &UserId, n: usize) -> Result<RankResult, MatchError> {
        let own = self.answers.get_answers(user_id).await?;
        let corpus = self.answers.get_all_answers_except(user_id).await?;

        let result = rank(user_id, &own, &corpus, n);

        if result.skipped > 0 {
            tracing::warn!(
                "Skipped {} of {} candidates for {} due to schema faults",
                result.skipped,
                result.total_candidates,
                user_id
            );
        }

        Ok(result)
    }

    /// Attach the viewer's like status to each ranked candidate
    pub async fn annotate(
        &self,
        user_id: &UserId,
        ranked: Vec<RankedCandidate>,
    ) -> Result<Vec<CompatibilityEntry>, MatchError> {
        let coordinator = LikeCoordinator::new(self.likes.as_ref());
        let mut entries = Vec::with_capacity(ranked.len());

        for candidate in ranked {
            let status = coordinator.status_of(user_id, &candidate.user_id).await?;
            entries.push(CompatibilityEntry {
                user_id: candidate.user_id,
                percentage: candidate.percentage,
                status,
            });
        }

        Ok(entries)
    }

    /// Ranked and annotated shortlist of the `n` most compatible users
    pub async fn compute_top(&self, user_id: &UserId, n: usize) -> Result<Vec<CompatibilityEntry>, MatchError> {
        let result = self.rank_for(user_id, n).await?;
        self.annotate(user_id, result.ranked).await
    }

    pub async fn register_like(&self, from: &UserId, to: &UserId) -> Result<LikeOutcome, MatchError> {
        LikeCoordinator::new(self.likes.as_ref()).like(from, to).await
    }

    pub async fn status_of(&self, from: &UserId, to: &UserId) -> Result<LikeStatus, MatchError> {
        LikeCoordinator::new(self.likes.as_ref()).status_of(from, to).await
    }

    /// Both stores answered their health checks
    pub async fn health_check(&self) -> bool {
        let answers_ok = self.answers.health_check().await.unwrap_or(false);
        let likes_ok = self.likes.health_check().await.unwrap_or(false);
        answers_ok && likes_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;

    fn uid(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn engine(schema: QuizSchema) -> CompatibilityEngine {
        let store = Arc::new(MemoryStore::new());
        CompatibilityEngine::new(store.clone(), store, schema)
    }

    const THREE_QUESTIONS: QuizSchema = QuizSchema {
        question_count: 3,
        option_count: 10,
    };

    #[tokio::test]
    async fn test_submit_rejects_wrong_length() {
        let engine = engine(THREE_QUESTIONS);
        let result = engine.submit_answers(&uid("a"), vec![1, 2]).await;
        assert!(matches!(result, Err(MatchError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_option() {
        let engine = engine(QuizSchema {
            question_count: 2,
            option_count: 4,
        });
        assert!(engine.submit_answers(&uid("a"), vec![0, 4]).await.is_err());
        assert!(engine.submit_answers(&uid("a"), vec![-1, 0]).await.is_err());
        assert!(engine.submit_answers(&uid("a"), vec![3, 0]).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_submission_rejected() {
        let engine = engine(THREE_QUESTIONS);
        engine.submit_answers(&uid("a"), vec![1, 2, 3]).await.unwrap();

        let result = engine.submit_answers(&uid("a"), vec![3, 2, 1]).await;

        assert!(matches!(result, Err(MatchError::AlreadySubmitted(_))));
    }

    #[tokio::test]
    async fn test_compute_top_without_answers() {
        let engine = engine(THREE_QUESTIONS);
        let result = engine.compute_top(&uid("nobody"), 5).await;
        assert!(matches!(result, Err(MatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_compute_top_annotates_status() {
        let engine = engine(THREE_QUESTIONS);
        let (me, liked, matched, other) = (uid("me"), uid("liked"), uid("matched"), uid("other"));
        for user in [&me, &liked, &matched, &other] {
            engine.submit_answers(user, vec![1, 2, 3]).await.unwrap();
        }

        engine.register_like(&me, &liked).await.unwrap();
        engine.register_like(&me, &matched).await.unwrap();
        engine.register_like(&matched, &me).await.unwrap();

        let entries = engine.compute_top(&me, 5).await.unwrap();
        let status = |id: &UserId| entries.iter().find(|e| &e.user_id == id).unwrap().status;

        assert_eq!(entries.len(), 3);
        assert_eq!(status(&liked), LikeStatus::Liked);
        assert_eq!(status(&matched), LikeStatus::Matched);
        assert_eq!(status(&other), LikeStatus::Normal);
    }
}
