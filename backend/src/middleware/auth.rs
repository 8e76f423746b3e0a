//! Authentication middleware
//!
//! JWT validation for protected routes

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub username: String,
}

/// Validates the bearer token and stashes the user in request
/// extensions. The secret comes from the environment so the layer can
/// be applied without access to application state.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let user = match authenticate(&request) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn authenticate(request: &Request) -> Result<AuthUser, AppError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must be a bearer token".to_string())
    })?;

    let secret = std::env::var("SKYWATCH__JWT__SECRET")
        .or_else(|_| std::env::var("SKYWATCH_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = decode_jwt(token, &secret)?;

    let user_id = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
    })
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    username: String,
    exp: i64,
    iat: i64,
}

fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

/// Extractor for the authenticated user inserted by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "ada".to_string(),
            exp,
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_decodes() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = decode_jwt(&token("s3cret", exp), "s3cret").unwrap();
        assert_eq!(claims.username, "ada");
    }

    #[test]
    fn test_expired_token_maps_to_token_expired() {
        let exp = (Utc::now() - Duration::hours(2)).timestamp();
        let err = decode_jwt(&token("s3cret", exp), "s3cret").unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let err = decode_jwt(&token("s3cret", exp), "other").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
