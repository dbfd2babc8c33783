use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to store a completed quiz attempt
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub answers: Vec<i32>,
}

/// Query for the compatibility shortlist
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TopMatchesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

/// Request to like another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Query for the relation between two users
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeStatusQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}
