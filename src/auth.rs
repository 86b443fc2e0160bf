use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::staff_profile::StaffRole;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (staff profile ID)
    pub username: String,     // Staff username
    pub role: StaffRole,      // Staff role
    pub store_id: Option<i64>, // Home store; None grants cross-store visibility
    pub jti: String,          // JWT ID
    pub iat: i64,             // Issued at time
    pub exp: i64,             // Expiration time
}

/// Authenticated staff member extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStaff {
    pub staff_id: i64,
    pub username: String,
    pub role: StaffRole,
    pub store_id: Option<i64>,
}

impl AuthStaff {
    /// Check if the staff member is an admin
    pub fn is_admin(&self) -> bool {
        matches!(self.role, StaffRole::Admin)
    }

    /// Whether this staff member sees records from every store. Admins and
    /// staff with no home store assignment are unrestricted.
    pub fn sees_all_stores(&self) -> bool {
        self.is_admin() || self.store_id.is_none()
    }

    /// The store filter to apply for this staff member, if any.
    pub fn store_filter(&self) -> Option<i64> {
        if self.sees_all_stores() {
            None
        } else {
            self.store_id
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_secs: usize,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration_secs: usize) -> Self {
        Self {
            jwt_secret,
            token_expiration_secs,
        }
    }
}

/// Authentication service that handles token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Generate a JWT token for a staff member
    pub fn generate_token(&self, staff: &AuthStaff) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + ChronoDuration::seconds(self.config.token_expiration_secs as i64);

        let claims = Claims {
            sub: staff.staff_id.to_string(),
            username: staff.username.clone(),
            role: staff.role.clone(),
            store_id: staff.store_id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient permissions")]
    Forbidden,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuth | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Extracts the authenticated staff member from the Authorization header.
#[async_trait]
impl<S> FromRequestParts<S> for AuthStaff
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = Arc::<AuthService>::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingAuth)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingAuth)?
            .trim();

        let claims = auth_service.validate_token(token)?;
        let staff_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthStaff {
            staff_id,
            username: claims.username,
            role: claims.role,
            store_id: claims.store_id,
        })
    }
}

/// Admin-only guard. Extraction fails with 403 for non-admin staff.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthStaff);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let staff = AuthStaff::from_request_parts(parts, state).await?;
        if !staff.is_admin() {
            return Err(AuthError::Forbidden);
        }
        Ok(RequireAdmin(staff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> AuthService {
        AuthService::new(AuthConfig::new(
            "a_sufficiently_long_test_secret_for_hs256_signing".into(),
            3600,
        ))
    }

    fn staff(role: StaffRole, store_id: Option<i64>) -> AuthStaff {
        AuthStaff {
            staff_id: 7,
            username: "mechanic".into(),
            role,
            store_id,
        }
    }

    #[test]
    fn round_trips_claims_through_token() {
        let svc = test_service();
        let token = svc
            .generate_token(&staff(StaffRole::Staff, Some(3)))
            .unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.store_id, Some(3));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = AuthService::new(AuthConfig::new(
            "a_completely_different_secret_used_by_an_attacker".into(),
            3600,
        ));
        let token = other
            .generate_token(&staff(StaffRole::Staff, None))
            .unwrap();
        assert!(matches!(
            test_service().validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn admin_sees_all_stores() {
        assert!(staff(StaffRole::Admin, Some(1)).sees_all_stores());
        assert_eq!(staff(StaffRole::Admin, Some(1)).store_filter(), None);
    }

    #[test]
    fn unassigned_staff_sees_all_stores() {
        assert!(staff(StaffRole::Staff, None).sees_all_stores());
    }

    #[test]
    fn assigned_staff_filters_to_home_store() {
        assert_eq!(staff(StaffRole::Staff, Some(4)).store_filter(), Some(4));
    }
}
