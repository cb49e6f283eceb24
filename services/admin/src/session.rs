//! Session token codec
//!
//! Encodes and decodes the signed, expiring session payload carried by the
//! `session` cookie. Tokens are signed with HS256 using a symmetric secret
//! held only by the server process; a token is either fully valid or
//! rejected outright. The server keeps no session table, so an outstanding
//! token cannot be revoked before its natural expiry.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::User;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Symmetric signing secret
    pub secret: String,
    /// Token lifetime in seconds (default: 24 hours)
    pub ttl_seconds: u64,
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: Symmetric signing secret (required)
    /// - `SESSION_TTL_SECONDS`: Token lifetime in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        let ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        Ok(SessionConfig {
            secret,
            ttl_seconds,
        })
    }
}

/// User identity embedded in the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

/// Session claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Embedded user identity
    pub user: SessionUser,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Session token codec
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl SessionService {
    /// Initialize a new session service from a config
    pub fn new(config: &SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expired means expired: no clock leeway on verification
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        SessionService {
            encoding_key,
            decoding_key,
            validation,
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Mint a token embedding the given user with a fresh expiry
    pub fn mint(&self, user: &SessionUser) -> Result<String> {
        let now = unix_now()?;

        let claims = Claims {
            user: user.clone(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token and return its claims
    ///
    /// Fails on signature mismatch, malformed input, or past expiry.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Re-mint a verified session with a fresh expiry (sliding window)
    pub fn refresh(&self, claims: &Claims) -> Result<String> {
        self.mint(&claims.user)
    }

    /// Get the configured token lifetime in seconds
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

/// Seconds since the Unix epoch
fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service() -> SessionService {
        SessionService::new(&SessionConfig {
            secret: "test-secret-for-session-codec".to_string(),
            ttl_seconds: 86400,
        })
    }

    fn admin_user() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_session_config_from_env() {
        unsafe {
            std::env::set_var("SESSION_SECRET", "env-secret");
            std::env::remove_var("SESSION_TTL_SECONDS");
        }

        let config = SessionConfig::from_env().expect("Failed to create session config");
        assert_eq!(config.secret, "env-secret");
        assert_eq!(config.ttl_seconds, 86400);

        unsafe {
            std::env::set_var("SESSION_TTL_SECONDS", "3600");
        }
        let config = SessionConfig::from_env().expect("Failed to create session config");
        assert_eq!(config.ttl_seconds, 3600);

        unsafe {
            std::env::remove_var("SESSION_SECRET");
            std::env::remove_var("SESSION_TTL_SECONDS");
        }
        assert!(SessionConfig::from_env().is_err());
    }

    #[test]
    fn test_mint_verify_round_trip() {
        let service = service();
        let user = admin_user();

        let token = service.mint(&user).expect("mint failed");
        let claims = service.verify(&token).expect("verify failed");

        assert_eq!(claims.user, user);
        assert!(claims.exp > unix_now().unwrap());
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let now = unix_now().unwrap();

        // Hand-encode claims whose expiry is already in the past
        let claims = Claims {
            user: admin_user(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-for-session-codec"),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let token = service.mint(&admin_user()).expect("mint failed");

        // Flip a single character anywhere in the token
        for pos in [10, token.len() / 2, token.len() - 1] {
            let mut chars: Vec<char> = token.chars().collect();
            chars[pos] = if chars[pos] == 'A' { 'B' } else { 'A' };
            let tampered: String = chars.into_iter().collect();
            if tampered == token {
                continue;
            }
            assert!(service.verify(&tampered).is_err(), "tamper at {}", pos);
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().mint(&admin_user()).expect("mint failed");

        let other = SessionService::new(&SessionConfig {
            secret: "a-different-secret".to_string(),
            ttl_seconds: 86400,
        });

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_refresh_extends_expiry() {
        let service = service();
        let user = admin_user();

        let token = service.mint(&user).expect("mint failed");
        let mut claims = service.verify(&token).expect("verify failed");

        // Pretend the token was minted an hour ago, then refresh it
        claims.exp -= 3600;
        let refreshed = service.refresh(&claims).expect("refresh failed");
        let renewed = service.verify(&refreshed).expect("verify failed");

        assert_eq!(renewed.user, user);
        assert!(renewed.exp > claims.exp);
    }
}
