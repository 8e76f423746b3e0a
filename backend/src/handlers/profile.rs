//! HTTP handlers for profile management endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::UpdateProfileInput;
use crate::services::AuthService;
use crate::AppState;
use crate::models::UserProfile;

/// Retrieve the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let profile = auth_service.get_profile(current_user.0.user_id).await?;
    Ok(Json(profile))
}

/// Apply a partial update to the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<Json<UserProfile>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let profile = auth_service
        .update_profile(current_user.0.user_id, input)
        .await?;
    Ok(Json(profile))
}
