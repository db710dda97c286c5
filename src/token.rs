/// Access and refresh token issuance
use crate::{
    config::TokenConfig,
    db::user::User,
    error::{ApiError, ApiResult},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Freshly issued access/refresh pair with the access-token expiry
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub expiration: DateTime<Utc>,
    pub refresh_token: String,
}

/// Signs access tokens and generates opaque refresh tokens
#[derive(Clone)]
pub struct TokenIssuer {
    config: TokenConfig,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Create a signed access token for a user, paired with a new refresh token
    pub fn create_access_token(&self, user: &User) -> ApiResult<IssuedTokens> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = AccessClaims {
            sub: user.id.clone(),
            name: user.user_name.clone(),
            email: user.email.clone(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.security_key.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok(IssuedTokens {
            access_token,
            expiration,
            refresh_token: self.create_refresh_token(),
        })
    }

    /// Generate an opaque refresh token: 32 bytes from the thread CSPRNG,
    /// base64-encoded
    pub fn create_refresh_token(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        BASE64.encode(bytes)
    }

    /// Decode and validate an access token, no clock-skew leeway
    pub fn decode_access_token(&self, token: &str) -> ApiResult<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.config.security_key.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::Authentication("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::Authentication("Invalid token signature".to_string())
            }
            _ => ApiError::Authentication(format!("Invalid token: {}", e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(TokenConfig {
            security_key: "unit-test-signing-key-0123456789abcdef".to_string(),
            issuer: "https://id.test".to_string(),
            audience: "https://id.test".to_string(),
            expiration_minutes: 15,
        })
    }

    fn test_user() -> User {
        User {
            id: "b9a5be6c-9f23-4c78-8c1d-0d6a4f1f9d11".to_string(),
            user_name: "jane".to_string(),
            normalized_user_name: "JANE".to_string(),
            email: "jane@x.com".to_string(),
            normalized_email: "JANE@X.COM".to_string(),
            name_surname: "Jane Doe".to_string(),
            password_hash: "hash".to_string(),
            refresh_token: None,
            refresh_token_expiry: None,
            password_reset_token: None,
            password_reset_token_expiry: None,
            failed_login_attempts: 0,
            lockout_until: None,
            lockout_enabled: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_roundtrips_claims() {
        let issuer = test_issuer();
        let user = test_user();

        let issued = issuer.create_access_token(&user).unwrap();
        assert!(issued.expiration > Utc::now());

        let claims = issuer.decode_access_token(&issued.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "jane");
        assert_eq!(claims.email, "jane@x.com");
    }

    #[test]
    fn refresh_tokens_are_unique_and_32_bytes() {
        let issuer = test_issuer();

        let first = issuer.create_refresh_token();
        let second = issuer.create_refresh_token();

        assert_ne!(first, second);
        assert_eq!(BASE64.decode(&first).unwrap().len(), 32);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = test_issuer();
        let issued = issuer.create_access_token(&test_user()).unwrap();

        let mut tampered = issued.access_token.clone();
        tampered.pop();
        assert!(issuer.decode_access_token(&tampered).is_err());
    }

    #[test]
    fn token_for_wrong_audience_is_rejected() {
        let issuer = test_issuer();
        let other = TokenIssuer::new(TokenConfig {
            security_key: "unit-test-signing-key-0123456789abcdef".to_string(),
            issuer: "https://other.test".to_string(),
            audience: "https://other.test".to_string(),
            expiration_minutes: 15,
        });

        let issued = other.create_access_token(&test_user()).unwrap();
        assert!(issuer.decode_access_token(&issued.access_token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = test_issuer();
        let user = test_user();

        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.clone(),
            name: user.user_name.clone(),
            email: user.email.clone(),
            iss: "https://id.test".to_string(),
            aud: "https://id.test".to_string(),
            iat: (now - Duration::minutes(30)).timestamp(),
            exp: (now - Duration::minutes(15)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("unit-test-signing-key-0123456789abcdef".as_bytes()),
        )
        .unwrap();

        assert!(issuer.decode_access_token(&token).is_err());
    }
}
