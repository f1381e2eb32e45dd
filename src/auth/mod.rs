use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Claims we require from the identity provider's tokens. The provider adds
/// more; we only care about the email and the expiry.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    email: String,
    exp: i64,
}

/// The caller's verified identity, as established by the Identity Verifier.
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
}

/// Validates bearer credentials issued by the external identity provider and
/// extracts the email claim. Pure check, no storage access.
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl IdentityVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Verify the raw value of an `Authorization` header. Missing header,
    /// missing `Bearer ` prefix, bad signature and expired tokens all fail
    /// the same way; callers get no detail about which.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Identity> {
        let header = header.ok_or(AppError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;
        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Identity {
            email: data.claims.email,
        })
    }

    /// Issue a token the verifier will accept. The real deployment gets its
    /// tokens from the identity provider; this exists for the seed binary
    /// and for tests.
    pub fn issue(&self, email: &str, valid_for: Duration) -> Result<String> {
        let claims = Claims {
            email: email.to_string(),
            exp: (Utc::now() + valid_for).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let verifier = IdentityVerifier::new("secret");
        let token = verifier.issue("alice@example.com", Duration::hours(1)).unwrap();
        let identity = verifier.verify(&token).unwrap();
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn header_without_bearer_prefix_is_rejected() {
        let verifier = IdentityVerifier::new("secret");
        let token = verifier.issue("alice@example.com", Duration::hours(1)).unwrap();

        assert!(matches!(
            verifier.verify_header(Some(&token)),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verifier.verify_header(None),
            Err(AppError::Unauthorized)
        ));
        assert!(verifier.verify_header(Some(&format!("Bearer {}", token))).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = IdentityVerifier::new("secret");
        let token = verifier.issue("alice@example.com", Duration::hours(-2)).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = IdentityVerifier::new("secret-a");
        let verifier = IdentityVerifier::new("secret-b");
        let token = issuer.issue("alice@example.com", Duration::hours(1)).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let verifier = IdentityVerifier::new("secret");
        assert!(matches!(verifier.verify("not-a-jwt"), Err(AppError::Unauthorized)));
    }
}
