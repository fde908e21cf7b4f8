use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when identifying the caller
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    MissingToken,

    #[error("Not authorized, token failed: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Not authorized, token carries no user id")]
    MissingUserId,
}

/// Claims the item API puts in its session tokens
///
/// Older tokens carry `userId`, newer ones `id`; `sub` is accepted as a last resort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: usize,
}

impl Claims {
    /// First non-empty claim among `id`, `userId` and `sub`
    pub fn subject(&self) -> Option<&str> {
        [&self.id, &self.user_id, &self.sub]
            .into_iter()
            .filter_map(|claim| claim.as_deref())
            .find(|id| !id.is_empty())
    }
}

/// Validates HS256 bearer tokens and extracts the caller's user id
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

    /// Verify a raw token and return the user id it was issued to
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        data.claims
            .subject()
            .map(str::to_string)
            .ok_or(AuthError::MissingUserId)
    }

    /// Verify an `Authorization` header value of the form `Bearer <token>`
    pub fn verify_header(&self, header: Option<&str>) -> Result<String, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn future_exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_verify_id_claim() {
        let claims = Claims { id: Some("u42".into()), user_id: None, sub: None, exp: future_exp() };
        let header = format!("Bearer {}", token_for(&claims, SECRET));

        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify_header(Some(&header)).unwrap(), "u42");
    }

    #[test]
    fn test_verify_user_id_claim() {
        let claims = Claims { id: None, user_id: Some("u7".into()), sub: None, exp: future_exp() };
        let verifier = TokenVerifier::new(SECRET);

        assert_eq!(verifier.verify(&token_for(&claims, SECRET)).unwrap(), "u7");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims { id: Some("u42".into()), user_id: None, sub: None, exp: future_exp() };
        let verifier = TokenVerifier::new(SECRET);

        assert!(matches!(
            verifier.verify(&token_for(&claims, "other")),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_missing_header() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(verifier.verify_header(None), Err(AuthError::MissingToken)));
        assert!(matches!(verifier.verify_header(Some("Bearer ")), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_empty_id_falls_back_to_user_id() {
        let claims = Claims { id: Some(String::new()), user_id: Some("u7".into()), sub: None, exp: future_exp() };
        let verifier = TokenVerifier::new(SECRET);

        assert_eq!(verifier.verify(&token_for(&claims, SECRET)).unwrap(), "u7");
    }

    #[test]
    fn test_scheme_needs_separator() {
        let claims = Claims { id: Some("u42".into()), user_id: None, sub: None, exp: future_exp() };
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer{}", token_for(&claims, SECRET));

        assert!(matches!(verifier.verify_header(Some(&header)), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_token_without_user_id() {
        let claims = Claims { id: None, user_id: None, sub: None, exp: future_exp() };
        let verifier = TokenVerifier::new(SECRET);

        assert!(matches!(
            verifier.verify(&token_for(&claims, SECRET)),
            Err(AuthError::MissingUserId)
        ));
    }
}
