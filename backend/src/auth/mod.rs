pub mod admin;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::config_loader;

/// Session token claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// External subject id.
    pub clerk_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

// Tell axum how to convert `AuthError` into a response.
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

pub fn validate_jwt(token: &str) -> Result<SessionClaims, AuthError> {
    let secret = config_loader::get_auth_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load auth config: {}", e))?
        .jwt_secret;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        "Missing or invalid Authorization header".to_string(),
                    )
                })?;

        let claims = validate_jwt(bearer.token())
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;

        if claims.sub.trim().is_empty() {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid subject in token".to_string(),
            ));
        }

        Ok(AuthUser {
            clerk_id: claims.sub,
            email: claims.email.filter(|email| !email.trim().is_empty()),
            name: claims.name.filter(|name| !name.trim().is_empty()),
        })
    }
}
