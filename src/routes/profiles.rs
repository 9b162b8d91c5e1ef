use crate::auth::Identity;
use crate::models::{CreateProfileRequest, UpdateProfileRequest};
use crate::routes::{ApiError, AppState};
use crate::services::ProfileStore;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles", web::post().to(create_profile))
        .route("/profiles/me", web::get().to(get_own_profile))
        .route("/profiles/me", web::patch().to(update_own_profile))
        .route("/profiles/{id}", web::get().to(get_profile));
}

/// Fetch the caller's profile
///
/// GET /api/v1/profiles/me
async fn get_own_profile(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .store()
        .get_profile(&identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile not found for user {}", identity.user_id)))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Complete the caller's profile
///
/// POST /api/v1/profiles
///
/// Request body:
/// ```json
/// {
///   "age": 29,
///   "gender": "female",
///   "location": "Dubai",
///   "religion": "islam",
///   "education": "masters",
///   "profession": "Architect",
///   "bio": "...",
///   "hobbies": "reading, hiking",
///   "lookingFor": "marriage"
/// }
/// ```
async fn create_profile(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let new_profile = req
        .into_inner()
        .into_new_profile(identity.name.clone(), identity.email.clone());

    let profile = state
        .store()
        .create_profile(&identity.user_id, &new_profile)
        .await?;

    tracing::info!("Created profile for user {}", identity.user_id);

    Ok(HttpResponse::Created().json(profile))
}

/// Partially update the caller's profile
///
/// PATCH /api/v1/profiles/me
async fn update_own_profile(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let update = req.into_inner().into_update();
    if update.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let profile = state
        .store()
        .update_profile(&identity.user_id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile not found for user {}", identity.user_id)))?;

    tracing::info!("Updated profile for user {}", identity.user_id);

    Ok(HttpResponse::Ok().json(profile))
}

/// Fetch another user's profile
///
/// GET /api/v1/profiles/{id}
async fn get_profile(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let profile = state
        .store()
        .get_profile(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile not found for user {}", id)))?;

    Ok(HttpResponse::Ok().json(profile))
}
