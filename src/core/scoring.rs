use crate::core::error::MatchError;
use crate::models::AnswerVector;

/// Calculate the compatibility percentage (0-100) between two answer vectors
///
/// Counts positions holding the same answer and rounds `matches / len * 100`
/// half up, in integer arithmetic: 1/3 -> 33, 2/3 -> 67, 1/8 -> 13.
///
/// Vectors of different length belong to different quiz schemas and are
/// rejected with [`MatchError::SchemaMismatch`].
pub fn compatibility_score(a: &AnswerVector, b: &AnswerVector) -> Result<u8, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::SchemaMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(MatchError::EmptyVector);
    }

    let matches = count_matches(a.as_slice(), b.as_slice());

    Ok(round_percentage(matches, a.len()))
}

#[inline]
fn count_matches(a: &[i32], b: &[i32]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x == y).count()
}

/// floor(matches * 100 / total + 1/2), with total > 0 and matches <= total
#[inline]
fn round_percentage(matches: usize, total: usize) -> u8 {
    let scaled = (matches as u64 * 200 + total as u64) / (2 * total as u64);
    scaled.min(100) as u8
}
