use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::MatchError;

/// Opaque user identifier
///
/// Never interpreted by the engine; only compared, hashed and ordered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Build a user id from untrusted input, trimming surrounding whitespace
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MatchError::InvalidInput("user id must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's quiz answers, indexed by question position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerVector(Vec<i32>);

impl AnswerVector {
    pub fn new(answers: Vec<i32>) -> Self {
        Self(answers)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }
}

impl From<Vec<i32>> for AnswerVector {
    fn from(answers: Vec<i32>) -> Self {
        Self(answers)
    }
}

/// Shape every submitted answer vector must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSchema {
    pub question_count: usize,
    pub option_count: i32,
}

impl Default for QuizSchema {
    fn default() -> Self {
        Self {
            question_count: 10,
            option_count: 4,
        }
    }
}

/// Directed like from one user to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEdge {
    pub from: UserId,
    pub to: UserId,
    #[serde(rename = "match")]
    pub is_match: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl LikeEdge {
    /// Fresh, unmatched edge
    pub fn new(from: UserId, to: UserId) -> Self {
        Self {
            from,
            to,
            is_match: false,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn matched(mut self) -> Self {
        self.is_match = true;
        self
    }
}

/// How the viewer relates to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeStatus {
    Normal,
    Liked,
    Matched,
}

/// Result of registering a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeOutcome {
    Liked,
    Matched,
}

/// Ranked candidate before status annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub percentage: u8,
}

/// Ranked candidate as shown to the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub percentage: u8,
    pub status: LikeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_trims_and_rejects_empty() {
        assert_eq!(UserId::parse("  abc ").unwrap().as_str(), "abc");
        assert!(UserId::parse("   ").is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LikeStatus::Matched).unwrap(), "\"matched\"");
        assert_eq!(serde_json::to_string(&LikeOutcome::Liked).unwrap(), "\"liked\"");
    }

    #[test]
    fn test_edge_match_field_name() {
        let edge = LikeEdge::new(UserId::parse("a").unwrap(), UserId::parse("b").unwrap());
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["match"], false);
    }
}
