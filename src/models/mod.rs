// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnswerVector, CompatibilityEntry, LikeEdge, LikeOutcome, LikeStatus, QuizSchema,
    RankedCandidate, UserId,
};
pub use requests::{LikeRequest, LikeStatusQuery, SubmitAnswersRequest, TopMatchesQuery};
pub use responses::{
    ErrorResponse, HealthResponse, LikeResponse, LikeStatusResponse, SubmitAnswersResponse,
    TopMatchesResponse,
};
