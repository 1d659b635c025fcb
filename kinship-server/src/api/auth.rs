//! Authentication for the Kinship API
//!
//! A login creates a session record and a JWT that carries the session id.
//! Every authenticated request checks both the token signature and that the
//! session record still exists and has not expired, so logging out revokes a
//! token immediately.

use std::sync::Arc;

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, Method, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kinship::KinshipError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ServerError, unauthenticated},
    state::AppState,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Session ID
    pub sid: String,
    /// Issued at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// Authenticated caller, inserted into request extensions by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub username: String,
    pub session_id: String,
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| unauthenticated("Must be logged in!"))
    }
}

/// Caller identity on endpoints that also serve anonymous callers
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<AuthContext>().cloned()))
    }
}

/// Authentication middleware
///
/// Public endpoints still receive an [`AuthContext`] when a valid token is
/// presented, so handlers can tell logged-in callers apart.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let path = request.uri().path().to_string();
    let public = is_public_endpoint(request.method(), &path);

    match headers.typed_get::<Authorization<Bearer>>() {
        Some(bearer) => match authenticate(&state, bearer.token()).await {
            Ok(context) => {
                request.extensions_mut().insert(context);
            }
            Err(e) if public => {
                debug!("Ignoring invalid token on public path {}: {}", path, e);
            }
            Err(e) => return Err(e),
        },
        None if !public => return Err(unauthenticated("Must be logged in!")),
        None => {}
    }

    Ok(next.run(request).await)
}

/// Check if an endpoint can be called without logging in
///
/// Reading users and posts, searching, and sending a notification are open to
/// anonymous callers, as are registration and login.
fn is_public_endpoint(method: &Method, path: &str) -> bool {
    let path = path.strip_prefix("/api").unwrap_or(path);
    let single_segment = |prefix: &str| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
    };

    if *method == Method::GET {
        matches!(path, "/health" | "/users" | "/posts" | "/search") || single_segment("/users/")
    } else if *method == Method::POST {
        matches!(path, "/login" | "/users") || single_segment("/notifications/")
    } else {
        false
    }
}

/// Resolve a bearer token to the caller it was issued to
async fn authenticate(state: &AppState, token: &str) -> Result<AuthContext, ServerError> {
    let claims = validate_jwt_token(token, &state.config.jwt_secret)?;

    let session = state.kinship.sessions().validate(&claims.sid).await?;
    if session.user_id != claims.sub {
        return Err(unauthenticated("Invalid token"));
    }

    let user = state.kinship.users().get(&session.user_id).await.map_err(|e| match e {
        KinshipError::NotFound(_) => unauthenticated("Must be logged in!"),
        other => other.into(),
    })?;

    Ok(AuthContext {
        user_id: user.id,
        username: user.username,
        session_id: session.id,
    })
}

/// Validate a JWT token and return its claims
pub fn validate_jwt_token(token: &str, secret: &str) -> Result<Claims, ServerError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| ServerError::Auth(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Generate a JWT token for a session
pub fn generate_jwt_token(
    user_id: &str,
    session_id: &str,
    secret: &str,
    expires_at: DateTime<Utc>,
) -> Result<String, ServerError> {
    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ServerError::Internal(format!("Failed to generate token: {}", e)))
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, ServerError> {
    bcrypt::hash(password, cost)
        .map_err(|e| ServerError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ServerError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_endpoints() {
        assert!(is_public_endpoint(&Method::GET, "/health"));
        assert!(is_public_endpoint(&Method::POST, "/api/login"));
        assert!(is_public_endpoint(&Method::POST, "/users"));
        assert!(is_public_endpoint(&Method::GET, "/users"));
        assert!(is_public_endpoint(&Method::GET, "/api/users/alice"));
        assert!(is_public_endpoint(&Method::GET, "/posts"));
        assert!(is_public_endpoint(&Method::GET, "/search"));
        assert!(is_public_endpoint(&Method::POST, "/api/notifications/alice"));
        assert!(!is_public_endpoint(&Method::GET, "/users/alice/restrictions"));
        assert!(!is_public_endpoint(&Method::GET, "/users/alice/screentime/feed"));
        assert!(!is_public_endpoint(&Method::GET, "/users/"));
        assert!(!is_public_endpoint(&Method::PATCH, "/users"));
        assert!(!is_public_endpoint(&Method::POST, "/posts"));
        assert!(!is_public_endpoint(&Method::GET, "/notifications"));
        assert!(!is_public_endpoint(&Method::PATCH, "/notifications/n1"));
        assert!(!is_public_endpoint(&Method::POST, "/logout"));
        assert!(!is_public_endpoint(&Method::GET, "/follow"));
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter22", 4).unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let token = generate_jwt_token("user-1", "session-1", "secret-a", expires).unwrap();

        let claims = validate_jwt_token(&token, "secret-a").unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.sid, "session-1");

        let err = validate_jwt_token(&token, "secret-b").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
