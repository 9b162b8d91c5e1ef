use crate::auth::Identity;
use crate::core::{FilterCriteria, SearchSession};
use crate::models::{HealthResponse, ScoredProfile, SearchResponse};
use crate::routes::{ApiError, AppState};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure search and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search_profiles));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store = state.store();
    let healthy = match store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: store.name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search the profile directory
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "ageRange": [25, 35],
///   "religion": "islam",
///   "location": "",
///   "education": ""
/// }
/// ```
///
/// Each returned profile carries a `matchPercentage`. When the store rejects
/// the query the response is 502 with an empty `profiles` list and the
/// store's message in `error`.
async fn search_profiles(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<FilterCriteria>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request from {}: {}", identity.user_id, errors);
        return Err(errors.into());
    }

    let mut session = SearchSession::new(req.into_inner());

    tracing::info!(
        "Searching profiles for user: {}, filters: {:?}",
        identity.user_id,
        session.filters()
    );

    session.begin();
    let outcome = state.directory.search(&identity.user_id, session.filters()).await;
    session.resolve(outcome);

    let (filters, profiles, error) = session.into_parts();

    let scored: Vec<ScoredProfile> = profiles
        .into_iter()
        .map(|profile| {
            let match_percentage = state.scorer.score(&profile, &filters);
            ScoredProfile {
                profile,
                match_percentage,
            }
        })
        .collect();

    let response = SearchResponse {
        total: scored.len(),
        profiles: scored,
        error,
    };

    if let Some(message) = &response.error {
        tracing::error!("Search failed for user {}: {}", identity.user_id, message);
        return Ok(HttpResponse::BadGateway().json(response));
    }

    tracing::info!(
        "Returning {} profiles for user {}",
        response.total,
        identity.user_id
    );

    Ok(HttpResponse::Ok().json(response))
}
