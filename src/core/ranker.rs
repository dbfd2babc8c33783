use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::scoring::compatibility_score;
use crate::models::{AnswerVector, RankedCandidate, UserId};

/// Result of a ranking pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankResult {
    pub ranked: Vec<RankedCandidate>,
    /// Candidates considered, self excluded
    pub total_candidates: usize,
    /// Candidates dropped because their answers could not be compared
    pub skipped: usize,
}

/// Rank every other user by compatibility with `self_answers`
///
/// # Pipeline Stages
/// 1. Drop the caller's own entry
/// 2. Score each remaining candidate, skipping (and logging) schema faults
/// 3. Sort by percentage descending, then by user id ascending
/// 4. Keep the first `n`
pub fn rank(
    self_id: &UserId,
    self_answers: &AnswerVector,
    corpus: &HashMap<UserId, AnswerVector>,
    n: usize,
) -> RankResult {
    let mut skipped = 0;
    let mut total_candidates = 0;

    let mut ranked: Vec<RankedCandidate> = corpus
        .iter()
        .filter(|(user_id, _)| *user_id != self_id)
        .filter_map(|(user_id, answers)| {
            total_candidates += 1;
            match compatibility_score(self_answers, answers) {
                Ok(percentage) => Some(RankedCandidate {
                    user_id: user_id.clone(),
                    percentage,
                }),
                Err(e) => {
                    tracing::warn!(
                        "Skipping candidate {} while ranking for {}: {}",
                        user_id,
                        self_id,
                        e
                    );
                    skipped += 1;
                    None
                }
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    ranked.truncate(n);

    RankResult {
        ranked,
        total_candidates,
        skipped,
    }
}
