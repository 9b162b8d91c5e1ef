//! Requester identity
//!
//! Tokens are issued by the external authentication provider; this service
//! only verifies them and reads the user id out of `sub`. An [`Identity`]
//! exists for exactly as long as the request carries a valid token, and is
//! handed to every operation as an explicit argument.

use crate::routes::{ApiError, AppState};
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// Claims read from the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: usize,
}

/// Authenticated requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Verifies HS256 bearer tokens with a shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Identity, ApiError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        if data.claims.sub.is_empty() {
            return Err(ApiError::Unauthorized("Token has no subject".to_string()));
        }

        Ok(Identity {
            user_id: data.claims.sub,
            email: data.claims.email,
            name: data.claims.name,
        })
    }

    /// Identity from an `Authorization: Bearer ...` header
    pub fn identify(&self, req: &HttpRequest) -> Result<Identity, ApiError> {
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

        self.verify(token.trim())
    }
}

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.verifier.identify(req),
            None => Err(ApiError::Internal("Application state not configured".to_string())),
        };

        if let Err(e) = &result {
            tracing::debug!("Rejected request to {}: {}", req.path(), e);
        }

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, sub: &str, exp: usize) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            email: Some(format!("{}@example.com", sub)),
            name: Some("Test".to_string()),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_valid_token() {
        let verifier = TokenVerifier::new("secret");
        let identity = verifier.verify(&token("secret", "u1", far_future())).unwrap();

        assert_eq!(identity.user_id, "u1");
        assert_eq!(identity.email.as_deref(), Some("u1@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = TokenVerifier::new("secret");
        assert!(verifier.verify(&token("other", "u1", far_future())).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::new("secret");
        let expired = (chrono::Utc::now().timestamp() - 3600) as usize;
        assert!(verifier.verify(&token("secret", "u1", expired)).is_err());
    }

    #[test]
    fn test_header_parsing() {
        let verifier = TokenVerifier::new("secret");
        let bearer = format!("Bearer {}", token("secret", "u7", far_future()));

        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, bearer))
            .to_http_request();
        assert_eq!(verifier.identify(&req).unwrap().user_id, "u7");

        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert!(verifier.identify(&req).is_err());

        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(verifier.identify(&req).is_err());
    }
}
