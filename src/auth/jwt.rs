//! HS256 access tokens. The subject claim carries the username; refresh
//! tokens are opaque database rows and never touch this module.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token is bound to.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtProvider {
    secret: String,
    expiration_minutes: i64,
}

impl JwtProvider {
    #[must_use]
    pub const fn new(secret: String, expiration_minutes: i64) -> Self {
        Self {
            secret,
            expiration_minutes,
        }
    }

    /// Issue an access token for a username. Returns the token together
    /// with its expiry instant so callers can echo it to the client.
    pub fn generate_token(
        &self,
        username: &str,
    ) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.expiration_minutes);

        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok((token, expires_at))
    }

    /// Decode and validate a token, returning the username it is bound to.
    pub fn decode_username(&self, token: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_username() {
        let provider = JwtProvider::new("test-secret".to_string(), 15);
        let (token, expires_at) = provider.generate_token("kara").unwrap();

        assert!(expires_at > Utc::now());
        assert_eq!(provider.decode_username(&token).unwrap(), "kara");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let provider = JwtProvider::new("test-secret".to_string(), 15);
        let (token, _) = provider.generate_token("kara").unwrap();

        let other = JwtProvider::new("other-secret".to_string(), 15);
        assert!(other.decode_username(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Far enough in the past to clear the default validation leeway.
        let provider = JwtProvider::new("test-secret".to_string(), -5);
        let (token, _) = provider.generate_token("kara").unwrap();

        assert!(provider.decode_username(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let provider = JwtProvider::new("test-secret".to_string(), 15);
        assert!(provider.decode_username("not.a.token").is_err());
    }
}
