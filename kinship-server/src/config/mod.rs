//! Server configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// Lifetime of a login, in hours. Applies to both the JWT and the session record.
    pub jwt_expiration_hours: u64,

    /// bcrypt work factor for stored passwords
    pub password_cost: u32,

    /// Path to the Kinship library configuration file
    pub config_file_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            max_request_size: 2 * 1024 * 1024, // 2MB
            jwt_secret: "".to_string(),        // Generated at runtime if not provided
            jwt_expiration_hours: 24,
            password_cost: bcrypt::DEFAULT_COST,
            config_file_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables
    /// CLI arguments take precedence over environment variables
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Ok(port) = env::var("KINSHIP_PORT") {
            config.port = port.parse()?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Ok(max_size) = env::var("KINSHIP_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size.parse()?;
        }

        if let Some(jwt_secret) = cli_args.jwt_secret {
            config.jwt_secret = jwt_secret;
        } else if let Ok(jwt_secret) = env::var("KINSHIP_JWT_SECRET") {
            config.jwt_secret = jwt_secret;
        }
        if config.jwt_secret.is_empty() {
            config.jwt_secret = generate_secret();
        }

        if let Some(exp_hours) = cli_args.jwt_expiration_hours {
            config.jwt_expiration_hours = exp_hours;
        } else if let Ok(exp_hours) = env::var("KINSHIP_JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = exp_hours.parse()?;
        }
        if config.jwt_expiration_hours == 0 {
            anyhow::bail!("JWT expiration must be at least one hour");
        }

        if let Ok(cost) = env::var("KINSHIP_PASSWORD_COST") {
            config.password_cost = cost.parse()?;
        }

        if let Some(config_path) = cli_args.config_file {
            config.config_file_path = Some(config_path);
        } else if let Ok(config_path) = env::var("KINSHIP_CONFIG_FILE") {
            config.config_file_path = Some(PathBuf::from(config_path));
        }

        Ok(config)
    }

    /// Session and token lifetime
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt_expiration_hours as i64)
    }
}

/// Random 64 character signing secret
fn generate_secret() -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;

    #[test]
    fn test_cli_args_take_precedence() {
        let args = CliArgs {
            port: Some(8081),
            jwt_secret: Some("cli-secret".to_string()),
            jwt_expiration_hours: Some(2),
            max_request_size: Some(1024),
            ..CliArgs::default()
        };

        let config = ServerConfig::from_cli_and_env(args).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.jwt_secret, "cli-secret");
        assert_eq!(config.max_request_size, 1024);
        assert_eq!(config.session_ttl(), chrono::Duration::hours(2));
    }

    #[test]
    fn test_zero_expiration_is_rejected() {
        let args = CliArgs {
            jwt_secret: Some("secret".to_string()),
            jwt_expiration_hours: Some(0),
            ..CliArgs::default()
        };

        assert!(ServerConfig::from_cli_and_env(args).is_err());
    }

    #[test]
    fn test_generated_secret() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_secret());
    }
}
