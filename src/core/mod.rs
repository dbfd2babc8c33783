// Core algorithm exports
pub mod engine;
pub mod error;
pub mod likes;
pub mod ranker;
pub mod scoring;

pub use engine::CompatibilityEngine;
pub use error::MatchError;
pub use likes::LikeCoordinator;
pub use ranker::{rank, RankResult};
pub use scoring::compatibility_score;
