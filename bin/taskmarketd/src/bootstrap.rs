//! Bootstrap — first-start configuration checks.
//!
//! Missing secrets are an operator error and must stop the server
//! before it accepts a single request, distinct from any runtime
//! verification failure.

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.login.widget_secret.is_empty() {
        anyhow::bail!("login widget secret is empty in configuration");
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("storage data_dir is empty in configuration");
    }
    if config.login.max_assertion_age_secs <= 0 {
        anyhow::bail!("login max_assertion_age_secs must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BotConfig, JwtConfig, LoginConfig, StorageConfig};

    fn config() -> ServerConfig {
        ServerConfig {
            storage: StorageConfig {
                data_dir: "/tmp".to_string(),
            },
            jwt: JwtConfig {
                secret: "s".to_string(),
                session_ttl_secs: 3600,
            },
            login: LoginConfig {
                widget_secret: "w".to_string(),
                max_assertion_age_secs: 86400,
            },
            bot: BotConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(verify_config(&config()).is_ok());
    }

    #[test]
    fn test_empty_secrets_fail() {
        let mut c = config();
        c.login.widget_secret.clear();
        assert!(verify_config(&c).is_err());

        let mut c = config();
        c.jwt.secret.clear();
        assert!(verify_config(&c).is_err());

        let mut c = config();
        c.storage.data_dir.clear();
        assert!(verify_config(&c).is_err());
    }

    #[test]
    fn test_nonpositive_freshness_window_fails() {
        let mut c = config();
        c.login.max_assertion_age_secs = 0;
        assert!(verify_config(&c).is_err());
    }
}
