use crate::auth::models::JwtClaims;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tubely_core::AppError;
use uuid::Uuid;

/// Mint an HS256 access token for `user_id`.
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    issuer: &str,
    ttl: Duration,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        iss: issuer.to_string(),
        iat: now,
        exp: now + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))
}

/// Validate signature, expiry and issuer; returns the user id from `sub`.
pub fn validate_access_token(token: &str, secret: &str, issuer: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                AppError::Unauthorized("Invalid token issuer".to_string())
            }
            _ => AppError::Unauthorized("Couldn't validate JWT".to_string()),
        }
    })?;

    Ok(token_data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
    const ISSUER: &str = "tubely-access";

    #[test]
    fn test_issued_token_validates() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, ISSUER, Duration::from_secs(3600)).unwrap();
        assert_eq!(validate_access_token(&token, SECRET, ISSUER).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            issue_access_token(Uuid::new_v4(), SECRET, ISSUER, Duration::from_secs(3600)).unwrap();
        let result = validate_access_token(&token, "another-secret-that-is-long-enough-too", ISSUER);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token =
            issue_access_token(Uuid::new_v4(), SECRET, "someone-else", Duration::from_secs(3600))
                .unwrap();
        match validate_access_token(&token, SECRET, ISSUER) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token issuer"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        match validate_access_token(&token, SECRET, ISSUER) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_access_token("not.a.jwt", SECRET, ISSUER).is_err());
    }
}
