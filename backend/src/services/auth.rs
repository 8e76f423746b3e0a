//! Authentication service for signup, login, token management, and
//! password recovery

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::mailer::MailClient;
use shared::models::{initials, UserProfile};
use shared::validation::{validate_email, validate_password, validate_username};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    reset_token_expiry: i64,
}

/// Input for creating a new account
#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Input for partial profile updates
#[derive(Debug, Deserialize)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar_url: Option<String>,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User row from database
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
}

impl UserRow {
    pub fn into_profile(self) -> UserProfile {
        let initials = initials(&self.first_name, &self.last_name);
        UserProfile {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            avatar_url: self.avatar_url,
            initials,
        }
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, avatar_url, is_active";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
            reset_token_expiry: config.jwt.reset_token_expiry,
        }
    }

    /// Register a new user account
    pub async fn signup(&self, input: SignupInput) -> AppResult<UserProfile> {
        validate_username(&input.username).map_err(|msg| AppError::Validation {
            field: "username".to_string(),
            message: msg.to_string(),
        })?;
        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "All fields are required".to_string(),
            ));
        }

        let username_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = $1",
        )
        .bind(&input.username)
        .fetch_one(&self.db)
        .await?;

        if username_taken > 0 {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let email_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;

        if email_taken > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(&self.db)
        .await?;

        Ok(user.into_profile())
    }

    /// Authenticate user with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(AuthTokens, UserProfile)> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1",
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;

        let tokens = self.generate_tokens(user.id, &user.username)?;
        self.store_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        Ok((tokens, user.into_profile()))
    }

    /// Refresh access token using refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = Self::hash_token(refresh_token);

        let token_record = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT rt.user_id, u.username
            FROM refresh_tokens rt
            JOIN users u ON u.id = rt.user_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
              AND u.is_active = true
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        let (user_id, username) = token_record;

        // Rotate: revoke the old token before issuing a new pair
        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        let tokens = self.generate_tokens(user_id, &username)?;
        self.store_refresh_token(user_id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }

    /// Change password after verifying the current one
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validate_password(new_password).map_err(|msg| AppError::Validation {
            field: "new_password".to_string(),
            message: msg.to_string(),
        })?;

        let password_hash =
            sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let valid = verify(current_password, &password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::ValidationError(
                "Current password is incorrect".to_string(),
            ));
        }

        self.set_password(user_id, new_password).await
    }

    /// Issue a password reset token and email the reset link
    pub async fn request_password_reset(
        &self,
        email: &str,
        frontend_url: &str,
        mailer: &MailClient,
    ) -> AppResult<()> {
        let user_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("No user is associated with this email".to_string())
            })?;

        let reset_token = Uuid::new_v4().to_string();
        let token_hash = Self::hash_token(&reset_token);
        let expires_at = Utc::now() + Duration::seconds(self.reset_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        let reset_link = format!("{}/reset-password/{}", frontend_url, reset_token);
        mailer
            .send(
                email,
                "Password Reset",
                &format!("Click the link to reset your password: {}", reset_link),
            )
            .await?;

        Ok(())
    }

    /// Consume a reset token and set the new password
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        validate_password(new_password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;

        let token_hash = Self::hash_token(token);

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id FROM password_reset_tokens
            WHERE token_hash = $1
              AND expires_at > NOW()
              AND used_at IS NULL
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::ValidationError("Invalid or expired token".to_string()))?;

        sqlx::query("UPDATE password_reset_tokens SET used_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        self.set_password(user_id, new_password).await
    }

    /// Fetch the authenticated user's profile
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user.into_profile())
    }

    /// Apply a partial profile update
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> AppResult<UserProfile> {
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;

            let taken = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2",
            )
            .bind(email)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

            if taken > 0 {
                return Err(AppError::DuplicateEntry("email".to_string()));
            }
        }

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                avatar_url = COALESCE($5, avatar_url)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.avatar_url)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        if let Some(password) = &input.password {
            validate_password(password).map_err(|msg| AppError::Validation {
                field: "password".to_string(),
                message: msg.to_string(),
            })?;
            self.set_password(user_id, password).await?;
        }

        Ok(user.into_profile())
    }

    async fn set_password(&self, user_id: Uuid, password: &str) -> AppResult<()> {
        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, username: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let access_claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (opaque random token, stored hashed)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(token);
        let expires_at: DateTime<Utc> = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Hash a token for storage
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_stable_and_opaque() {
        let a = AuthService::hash_token("token-one");
        let b = AuthService::hash_token("token-one");
        let c = AuthService::hash_token("token-two");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.contains("token-one"));
        assert_eq!(a.len(), 64); // hex-encoded sha256
    }
}
