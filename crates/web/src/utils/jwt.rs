use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // User ID
    pub exp: usize, // Expiration timestamp
}

/// HS256 signing material derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign a new token for a user.
    pub fn sign(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let expiration = (Utc::now() + self.ttl).timestamp();

        let claims = Claims {
            sub: user_id,
            exp: expiration as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify and decode a token.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(
            token,
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_round_trip() {
        let keys = JwtKeys::new("test-secret", 24);
        let user_id = Uuid::new_v4();

        let token = keys.sign(user_id).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let keys = JwtKeys::new("test-secret", 24);
        let other = JwtKeys::new("other-secret", 24);

        let token = keys.sign(Uuid::new_v4()).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::new("test-secret", -1);

        let token = keys.sign(Uuid::new_v4()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let keys = JwtKeys::new("test-secret", 24);
        assert!(keys.verify("not-a-token").is_err());
    }
}
