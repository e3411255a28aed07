//! Service configuration.
//!
//! Tunables live in an optional YAML file with kebab-case keys; any key left
//! out takes its default. Secrets never go in that file: they arrive through
//! the command line or environment and are held in [`Secrets`].
//!
//! ```yaml
//! listen-addr: 127.0.0.1:8080
//! database-file: data/database.json
//! banned-words: [kerfuffle, sharbert, fornax]
//! ```

use crate::auth::TokenIssuer;
use crate::error::{Error, Result};
use crate::moderation::{ChirpFilter, DEFAULT_BANNED_WORDS, DEFAULT_MAX_CHIRP_LENGTH};
use chrono::Duration;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default address the server binds to
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default backing file for the datastore
pub const DEFAULT_DATABASE_FILE: &str = "database.json";

/// Default lifetime of access tokens (one hour)
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 60 * 60;

/// Default lifetime of refresh tokens (sixty days)
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 60 * 24 * 60 * 60;

/// Longest token lifetime accepted from configuration (ten years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Configuration file structure for chirpy
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ChirpyConfig {
    /// Socket address to listen on
    pub listen_addr: String,

    /// Path to the JSON datastore file
    pub database_file: PathBuf,

    /// Directory served under `/app`
    pub static_dir: PathBuf,

    /// Longest accepted chirp body, in characters
    pub max_chirp_length: usize,

    /// Words masked in chirp bodies
    pub banned_words: Vec<String>,

    /// Default and maximum lifetime of access tokens
    pub access_token_ttl_secs: u64,

    /// Lifetime of refresh tokens
    pub refresh_token_ttl_secs: u64,
}

impl Default for ChirpyConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
            static_dir: PathBuf::from("."),
            max_chirp_length: DEFAULT_MAX_CHIRP_LENGTH,
            banned_words: DEFAULT_BANNED_WORDS.iter().map(ToString::to_string).collect(),
            access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: DEFAULT_REFRESH_TOKEN_TTL_SECS,
        }
    }
}

impl ChirpyConfig {
    /// Load configuration from a file and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it does not parse or fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(Error::Config("listen-addr cannot be empty".to_string()));
        }
        if self.database_file.as_os_str().is_empty() {
            return Err(Error::Config("database-file cannot be empty".to_string()));
        }
        if self.max_chirp_length == 0 {
            return Err(Error::Config(
                "max-chirp-length must be at least 1".to_string(),
            ));
        }
        for (key, secs) in [
            ("access-token-ttl-secs", self.access_token_ttl_secs),
            ("refresh-token-ttl-secs", self.refresh_token_ttl_secs),
        ] {
            if secs == 0 || secs > MAX_TOKEN_TTL_SECS {
                return Err(Error::Config(format!(
                    "{key} must be between 1 and {MAX_TOKEN_TTL_SECS}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the chirp filter described by this configuration.
    #[must_use]
    pub fn chirp_filter(&self) -> ChirpFilter {
        ChirpFilter::new(&self.banned_words, self.max_chirp_length)
    }

    /// Builds a token issuer signing with `secrets.jwt_secret`.
    #[must_use]
    pub fn token_issuer(&self, secrets: &Secrets) -> TokenIssuer {
        TokenIssuer::new(
            &secrets.jwt_secret,
            Duration::seconds(secs_to_i64(self.access_token_ttl_secs)),
            Duration::seconds(secs_to_i64(self.refresh_token_ttl_secs)),
        )
    }
}

fn secs_to_i64(secs: u64) -> i64 {
    i64::try_from(secs.min(MAX_TOKEN_TTL_SECS)).unwrap_or(i64::MAX)
}

/// Credentials supplied out of band.
#[derive(Clone)]
pub struct Secrets {
    /// HMAC key for bearer tokens
    pub jwt_secret: String,

    /// Shared key the payment provider presents on webhooks
    pub polka_key: String,
}

impl Secrets {
    /// Bundles the two secrets, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if either secret is empty.
    pub fn new(jwt_secret: impl Into<String>, polka_key: impl Into<String>) -> Result<Self> {
        let secrets = Self {
            jwt_secret: jwt_secret.into(),
            polka_key: polka_key.into(),
        };
        if secrets.jwt_secret.trim().is_empty() {
            return Err(Error::Config("JWT secret cannot be empty".to_string()));
        }
        if secrets.polka_key.trim().is_empty() {
            return Err(Error::Config("Polka key cannot be empty".to_string()));
        }
        Ok(secrets)
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("jwt_secret", &"<redacted>")
            .field("polka_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = ChirpyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chirp_length, 140);
        assert_eq!(config.banned_words, ["kerfuffle", "sharbert", "fornax"]);
    }

    #[tokio::test]
    async fn partial_file_takes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chirpy.yaml");
        std::fs::write(&path, "listen-addr: 127.0.0.1:9000\nmax-chirp-length: 50\n").unwrap();

        let config = ChirpyConfig::load(&path).await.unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.max_chirp_length, 50);
        assert_eq!(config.database_file, PathBuf::from("database.json"));
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chirpy.yaml");
        std::fs::write(&path, "jwt-secret: oops\n").unwrap();

        let err = ChirpyConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[rstest]
    #[case::empty_addr(ChirpyConfig { listen_addr: " ".to_string(), ..ChirpyConfig::default() })]
    #[case::zero_length(ChirpyConfig { max_chirp_length: 0, ..ChirpyConfig::default() })]
    #[case::zero_access_ttl(ChirpyConfig { access_token_ttl_secs: 0, ..ChirpyConfig::default() })]
    #[case::zero_refresh_ttl(ChirpyConfig { refresh_token_ttl_secs: 0, ..ChirpyConfig::default() })]
    #[case::huge_refresh_ttl(ChirpyConfig { refresh_token_ttl_secs: u64::MAX, ..ChirpyConfig::default() })]
    fn invalid_settings_are_rejected(#[case] config: ChirpyConfig) {
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn secrets_must_not_be_blank() {
        assert!(Secrets::new("", "key").is_err());
        assert!(Secrets::new("secret", " ").is_err());

        let secrets = Secrets::new("secret", "key").unwrap();
        let debug = format!("{secrets:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"secret\""));
        assert!(!debug.contains("\"key\""));
    }

    #[test]
    fn token_issuer_uses_configured_ttls() {
        let config = ChirpyConfig {
            access_token_ttl_secs: 30,
            ..ChirpyConfig::default()
        };
        let issuer = config.token_issuer(&Secrets::new("s", "k").unwrap());

        assert_eq!(issuer.access_ttl(), Duration::seconds(30));
        assert_eq!(issuer.refresh_ttl(), Duration::days(60));
    }
}
