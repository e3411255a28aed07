//! Command-line interface of the server binary.
//!
//! Tunables come from an optional YAML file, then individual flags override
//! them. Secrets are read from flags or their environment variables and never
//! from the file.

use chirpy::config::{ChirpyConfig, Secrets};
use clap::Parser;
use std::path::PathBuf;

/// Chirpy HTTP API server
#[derive(Parser, Debug, Clone)]
#[command(name = "chirpy-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "CHIRPY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration file
    #[arg(short, long)]
    pub addr: Option<String>,

    /// JSON datastore file, overriding the configuration file
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Directory served under /app, overriding the configuration file
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// HMAC secret for bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// API key the payment provider presents on webhooks
    #[arg(long, env = "POLKA_KEY", hide_env_values = true)]
    pub polka_key: String,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Loads the configuration file if one was given and applies overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the result
    /// fails validation.
    pub async fn resolve_config(&self) -> chirpy::Result<ChirpyConfig> {
        let mut config = match &self.config {
            Some(path) => ChirpyConfig::load(path).await?,
            None => ChirpyConfig::default(),
        };

        if let Some(addr) = &self.addr {
            config.listen_addr.clone_from(addr);
        }
        if let Some(database) = &self.database {
            config.database_file.clone_from(database);
        }
        if let Some(static_dir) = &self.static_dir {
            config.static_dir.clone_from(static_dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Bundles the secrets.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if either secret is blank.
    pub fn secrets(&self) -> chirpy::Result<Secrets> {
        Secrets::new(self.jwt_secret.as_str(), self.polka_key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["chirpy-server", "--jwt-secret", "s", "--polka-key", "k"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn defaults_without_config_file() {
        let cli = parse(&[]);

        let config = cli.resolve_config().await.unwrap();

        assert_eq!(config, ChirpyConfig::default());
    }

    #[tokio::test]
    async fn flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chirpy.yaml");
        std::fs::write(&path, "listen-addr: 127.0.0.1:1\ndatabase-file: from-file.json\n").unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = parse(&["--config", path_arg, "--addr", "127.0.0.1:2"]);
        let config = cli.resolve_config().await.unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:2");
        assert_eq!(config.database_file, PathBuf::from("from-file.json"));
    }

    #[test]
    fn blank_secret_is_rejected() {
        let cli = Cli::try_parse_from([
            "chirpy-server",
            "--jwt-secret",
            "",
            "--polka-key",
            "k",
        ])
        .unwrap();

        assert!(cli.secrets().is_err());
    }
}
