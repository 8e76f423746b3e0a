//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::external::mailer::MailClient;
use crate::middleware::CurrentUser;
use crate::services::auth::SignupInput;
use crate::services::AuthService;
use crate::AppState;
use crate::models::UserProfile;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenResponse,
    pub user: UserProfile,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Signup endpoint handler
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupInput>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let user = auth_service.signup(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let (tokens, user) = auth_service.login(&body.username, &body.password).await?;

    Ok(Json(LoginResponse {
        tokens: TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        },
        user,
    }))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.refresh_token(&body.refresh_token).await?;

    Ok(Json(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
    }))
}

/// Request a password reset link by email
pub async fn password_reset_request(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let mailer = MailClient::new(&state.config.mail);

    auth_service
        .request_password_reset(&body.email, &state.config.server.frontend_url, &mailer)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset link sent!".to_string(),
    }))
}

/// Confirm a password reset with the emailed token
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetConfirmRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if body.password != body.confirm_password {
        return Err(AppError::ValidationError(
            "Passwords do not match".to_string(),
        ));
    }

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service
        .confirm_password_reset(&body.token, &body.password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful!".to_string(),
    }))
}

/// Change password for the authenticated user
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service
        .change_password(
            current_user.0.user_id,
            &body.current_password,
            &body.new_password,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
