//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            expiration_hours: 24,
            issuer: "parkhub".to_string(),
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (customer ID)
    pub sub: String,
    /// Customer email
    pub email: String,
    /// Account role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create new claims for a customer
    pub fn new(customer_id: i32, email: &str, role: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: customer_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check if the account has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Create a JWT token for a customer
pub fn create_token(
    customer_id: i32,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(customer_id, email, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "parkhub".to_string(),
        }
    }

    #[test]
    fn create_and_verify_roundtrip() {
        let config = test_config();
        let token = create_token(42, "driver@example.com", "customer", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "driver@example.com");
        assert_eq!(claims.role, "customer");
        assert!(!claims.is_expired());
        assert!(!claims.is_admin());
    }

    #[test]
    fn admin_role_is_recognized() {
        let config = test_config();
        let token = create_token(1, "admin@example.com", "admin", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert!(claims.is_admin());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = create_token(1, "a@b.c", "customer", &config).unwrap();

        let other = JwtConfig {
            secret: "different-secret".to_string(),
            ..test_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let token = create_token(1, "a@b.c", "customer", &config).unwrap();

        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
