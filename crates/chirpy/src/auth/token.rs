//! HS256 bearer tokens.
//!
//! Access and refresh tokens are both JWTs signed with the same secret. They
//! are told apart by issuer, so a refresh token is never accepted where an
//! access token is expected, and vice versa.

use crate::domain::UserId;
use crate::error::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issuer claim of access tokens.
pub const ACCESS_ISSUER: &str = "chirpy-access";

/// Issuer claim of refresh tokens.
pub const REFRESH_ISSUER: &str = "chirpy-refresh";

/// Which of the two token families a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived token authorizing API calls
    Access,
    /// Long-lived token exchanged for new access tokens
    Refresh,
}

impl TokenKind {
    /// The `iss` claim for this kind.
    #[must_use]
    pub const fn issuer(self) -> &'static str {
        match self {
            Self::Access => ACCESS_ISSUER,
            Self::Refresh => REFRESH_ISSUER,
        }
    }
}

/// Registered claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, one of [`ACCESS_ISSUER`] or [`REFRESH_ISSUER`]
    pub iss: String,
    /// Subject: the user id in decimal
    pub sub: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Signs and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer for `secret` with the default lifetime of each kind.
    #[must_use]
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Default lifetime of access tokens.
    #[must_use]
    pub const fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Default lifetime of refresh tokens.
    #[must_use]
    pub const fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issues a token of `kind` for `user` with the kind's default lifetime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Token` if signing fails.
    pub fn issue(&self, user: UserId, kind: TokenKind) -> Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        self.issue_with_ttl(user, kind, ttl)
    }

    /// Issues a token of `kind` for `user` that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Token` if signing fails.
    pub fn issue_with_ttl(&self, user: UserId, kind: TokenKind, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            iss: kind.issuer().to_string(),
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verifies a token of `kind` and returns the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `Error::Token` if the signature, issuer or expiry check fails,
    /// or the subject is not a user id.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[kind.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let id = data
            .claims
            .sub
            .parse::<u64>()
            .map_err(|_| jsonwebtoken::errors::Error::from(ErrorKind::InvalidSubject))?;
        Ok(UserId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::hours(1), Duration::days(60))
    }

    #[test]
    fn access_token_round_trip() {
        let issuer = issuer();
        let token = issuer.issue(UserId(7), TokenKind::Access).unwrap();

        assert_eq!(issuer.verify(&token, TokenKind::Access).unwrap(), UserId(7));
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let issuer = issuer();
        let access = issuer.issue(UserId(1), TokenKind::Access).unwrap();
        let refresh = issuer.issue(UserId(1), TokenKind::Refresh).unwrap();

        assert!(issuer.verify(&access, TokenKind::Refresh).is_err());
        assert!(issuer.verify(&refresh, TokenKind::Access).is_err());
        assert!(issuer.verify(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_with_ttl(UserId(1), TokenKind::Access, Duration::seconds(-10))
            .unwrap();

        let err = issuer.verify(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, Error::Token(_)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = issuer().issue(UserId(1), TokenKind::Access).unwrap();
        let other = TokenIssuer::new("other", Duration::hours(1), Duration::days(1));

        assert!(other.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn debug_hides_keys() {
        let debug = format!("{:?}", issuer());
        assert!(!debug.contains("test-secret"));
    }
}
