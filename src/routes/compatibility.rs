use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::RankingSettings;
use crate::core::{CompatibilityEngine, MatchError, RankResult};
use crate::models::{
    ErrorResponse, HealthResponse, LikeRequest, LikeResponse, LikeStatusQuery, LikeStatusResponse,
    SubmitAnswersRequest, SubmitAnswersResponse, TopMatchesQuery, TopMatchesResponse, UserId,
};
use crate::services::{CacheError, CacheKey, CacheManager};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: CompatibilityEngine,
    pub cache: Option<Arc<CacheManager>>,
    pub ranking: RankingSettings,
}

/// Configure all compatibility and like routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/answers", web::post().to(submit_answers))
        .route("/compatibility/top", web::get().to(top_matches))
        .route("/likes", web::post().to(register_like))
        .route("/likes/status", web::get().to(like_status));
}

fn error_response(err: &MatchError) -> HttpResponse {
    let (status, label) = match err {
        MatchError::NotFound(_) => (StatusCode::NOT_FOUND, "Quiz not completed"),
        MatchError::AlreadySubmitted(_) => (StatusCode::CONFLICT, "Quiz already submitted"),
        MatchError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        MatchError::SchemaMismatch { .. } | MatchError::EmptyVector => {
            (StatusCode::BAD_REQUEST, "Invalid answers")
        }
        MatchError::PersistenceFailure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage failure"),
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: label.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Validate a raw id or produce the 400 response for it
fn parse_user_id(raw: &str) -> Result<UserId, HttpResponse> {
    UserId::parse(raw).map_err(|e| error_response(&e))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.engine.health_check().await { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Submit quiz answers
///
/// POST /api/v1/answers
///
/// Request body:
/// ```json
/// { "userId": "string", "answers": [0, 3, 1] }
/// ```
async fn submit_answers(
    state: web::Data<AppState>,
    req: web::Json<SubmitAnswersRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for submit_answers request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let user_id = match parse_user_id(&req.user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.engine.submit_answers(&user_id, req.answers).await {
        Ok(answers) => {
            // New answers change everybody's ranking
            if let Some(cache) = &state.cache {
                if let Err(e) = cache.invalidate_pattern(CacheKey::all_rankings()).await {
                    tracing::warn!("Failed to invalidate ranking cache: {}", e);
                }
            }

            HttpResponse::Created().json(SubmitAnswersResponse {
                success: true,
                question_count: answers.len(),
            })
        }
        Err(e) => {
            tracing::info!("Rejected answers from {}: {}", user_id, e);
            error_response(&e)
        }
    }
}

/// Usable ranking from a cache read; misses are silent, faults are logged
fn cache_hit(read: Result<RankResult, CacheError>, user_id: &UserId) -> Option<RankResult> {
    match read {
        Ok(result) => Some(result),
        Err(CacheError::CacheMiss(_)) => None,
        Err(e) => {
            tracing::warn!("Failed to read ranking cache for {}: {}", user_id, e);
            None
        }
    }
}

/// Ranking for a user, served from cache when possible
async fn cached_ranking(
    state: &AppState,
    user_id: &UserId,
    limit: usize,
) -> Result<RankResult, MatchError> {
    let key = CacheKey::ranking(user_id, limit);

    if let Some(cache) = &state.cache {
        if let Some(result) = cache_hit(cache.get::<RankResult>(&key).await, user_id) {
            return Ok(result);
        }
    }

    let result = state.engine.rank_for(user_id, limit).await?;

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set(&key, &result).await {
            tracing::warn!("Failed to cache ranking for {}: {}", user_id, e);
        }
    }

    Ok(result)
}

/// Most compatible users
///
/// GET /api/v1/compatibility/top?userId={userId}&limit={limit}
async fn top_matches(
    state: web::Data<AppState>,
    query: web::Query<TopMatchesQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let user_id = match parse_user_id(&query.user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let limit = query
        .limit
        .map(usize::from)
        .unwrap_or(state.ranking.top_n)
        .min(state.ranking.max_limit);

    tracing::info!("Ranking compatibility for user: {}, limit: {}", user_id, limit);

    let result = match cached_ranking(&state, &user_id, limit).await {
        Ok(result) => result,
        Err(e) => {
            if !matches!(e, MatchError::NotFound(_)) {
                tracing::error!("Failed to rank candidates for {}: {}", user_id, e);
            }
            return error_response(&e);
        }
    };

    let total_candidates = result.total_candidates;

    match state.engine.annotate(&user_id, result.ranked).await {
        Ok(entries) => {
            tracing::info!(
                "Returning {} entries for user {} (from {} candidates)",
                entries.len(),
                user_id,
                total_candidates
            );

            HttpResponse::Ok().json(TopMatchesResponse {
                user_id,
                entries,
                total_candidates,
            })
        }
        Err(e) => {
            tracing::error!("Failed to load like statuses for {}: {}", user_id, e);
            error_response(&e)
        }
    }
}

/// Like another user
///
/// POST /api/v1/likes
///
/// Request body:
/// ```json
/// { "userId": "string", "targetUserId": "string" }
/// ```
async fn register_like(
    state: web::Data<AppState>,
    req: web::Json<LikeRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let (from, to) = match (parse_user_id(&req.user_id), parse_user_id(&req.target_user_id)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    match state.engine.register_like(&from, &to).await {
        Ok(status) => {
            tracing::debug!("Like {} -> {}: {:?}", from, to, status);
            HttpResponse::Ok().json(LikeResponse { status })
        }
        Err(MatchError::InvalidInput(reason)) => {
            tracing::info!("Rejected like {} -> {}: {}", from, to, reason);
            error_response(&MatchError::InvalidInput(reason))
        }
        Err(e) => {
            tracing::error!("Failed to register like {} -> {}: {}", from, to, e);
            error_response(&e)
        }
    }
}

/// Relation between two users
///
/// GET /api/v1/likes/status?userId={userId}&targetUserId={targetUserId}
async fn like_status(
    state: web::Data<AppState>,
    query: web::Query<LikeStatusQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let (from, to) = match (parse_user_id(&query.user_id), parse_user_id(&query.target_user_id)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    match state.engine.status_of(&from, &to).await {
        Ok(status) => HttpResponse::Ok().json(LikeStatusResponse { status }),
        Err(e) => {
            tracing::error!("Failed to read like status {} -> {}: {}", from, to, e);
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LikeOutcome, QuizSchema};
    use crate::services::MemoryStore;
    use actix_web::{test, App};

    fn state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState {
            engine: CompatibilityEngine::new(
                store.clone(),
                store,
                QuizSchema {
                    question_count: 3,
                    option_count: 10,
                },
            ),
            cache: None,
            ranking: RankingSettings::default(),
        }
    }

    #[actix_web::test]
    async fn test_error_status_codes() {
        let user = UserId::parse("u").unwrap();
        assert_eq!(error_response(&MatchError::NotFound(user.clone())).status(), StatusCode::NOT_FOUND);
        assert_eq!(error_response(&MatchError::AlreadySubmitted(user)).status(), StatusCode::CONFLICT);
        assert_eq!(error_response(&MatchError::EmptyVector).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_response(&MatchError::PersistenceFailure("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_cache_faults_fall_through_to_recompute() {
        let user = UserId::parse("u").unwrap();
        let cached = RankResult {
            total_candidates: 3,
            ..RankResult::default()
        };

        let hit = cache_hit(Ok(cached), &user);
        assert_eq!(hit.map(|r| r.total_candidates), Some(3));

        assert!(cache_hit(Err(CacheError::CacheMiss("ranking:u:5".into())), &user).is_none());

        let corrupt = serde_json::from_str::<RankResult>("not json").unwrap_err();
        assert!(cache_hit(Err(CacheError::SerializationError(corrupt)), &user).is_none());
    }

    #[actix_web::test]
    async fn test_top_before_quiz_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/compatibility/top?userId=nobody")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_like_flow_over_http() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/likes")
            .set_json(serde_json::json!({ "userId": "a", "targetUserId": "b" }))
            .to_request();
        let resp: LikeResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, LikeOutcome::Liked);

        let req = test::TestRequest::post()
            .uri("/likes")
            .set_json(serde_json::json!({ "userId": "b", "targetUserId": "a" }))
            .to_request();
        let resp: LikeResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, LikeOutcome::Matched);
    }
}
