//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::infrastructure::crypto::jwt::{verify_token, Claims, JwtConfig};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

/// Authentication state for the middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// The authenticated principal, injected as a request extension.
///
/// Engine calls always receive an explicit principal; nothing reads
/// ambient session state.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub customer_id: i32,
    pub email: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let customer_id = claims.sub.parse().ok()?;
        Some(Self {
            customer_id,
            email: claims.email,
            role: claims.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT bearer authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            let Some(user) = AuthenticatedUser::from_claims(claims) else {
                return auth_error_response(AuthError::InvalidToken);
            };
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Build the error response for a failed authentication.
pub fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authorization token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InsufficientPermissions => {
            (StatusCode::FORBIDDEN, "Insufficient permissions")
        }
    };

    (
        status,
        Json(json!({
            "success": false,
            "data": null,
            "error": message,
        })),
    )
        .into_response()
}

/// Guard for admin-only handlers.
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), Response> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(auth_error_response(AuthError::InsufficientPermissions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Basic dXNlcg=="), None);
    }

    #[test]
    fn claims_with_numeric_subject_convert() {
        let claims = Claims {
            sub: "17".to_string(),
            email: "driver@example.com".to_string(),
            role: "customer".to_string(),
            exp: 0,
            iat: 0,
            iss: "parkhub".to_string(),
        };
        let user = AuthenticatedUser::from_claims(claims).unwrap();
        assert_eq!(user.customer_id, 17);
        assert!(!user.is_admin());
    }

    #[test]
    fn claims_with_bad_subject_are_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            email: "x@y.z".to_string(),
            role: "customer".to_string(),
            exp: 0,
            iat: 0,
            iss: "parkhub".to_string(),
        };
        assert!(AuthenticatedUser::from_claims(claims).is_none());
    }
}
