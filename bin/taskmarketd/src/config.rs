//! Server configuration, loaded from a TOML file.
//!
//! The context name resolves to `/etc/taskmarket/<name>.toml`;
//! anything containing a `/` or `.` is treated as a literal path.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub login: LoginConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Session credential signing secret.
    pub secret: String,
    /// Session credential lifetime in seconds (default: 30 days).
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginConfig {
    /// Shared secret the login widget signs assertions with.
    pub widget_secret: String,
    /// Maximum accepted assertion age in seconds (default: 24h).
    #[serde(default = "default_assertion_age")]
    pub max_assertion_age_secs: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// Whether role-assignment notifications are dispatched at all.
    #[serde(default)]
    pub enabled: bool,
}

fn default_session_ttl() -> i64 {
    30 * 24 * 3600
}

fn default_assertion_age() -> i64 {
    86400
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/taskmarket/{}.toml", name_or_path))
        }
    }

    /// Load and parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/taskmarket/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/opt/tm/config.toml"),
            PathBuf::from("/opt/tm/config.toml")
        );
    }

    #[test]
    fn test_load_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
data_dir = "/var/lib/taskmarket"

[jwt]
secret = "s3cret"

[login]
widget_secret = "widget-s3cret"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/taskmarket");
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.session_ttl_secs, 30 * 24 * 3600);
        assert_eq!(config.login.max_assertion_age_secs, 86400);
        assert!(!config.bot.enabled);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ServerConfig::load(Path::new("/nonexistent/x.toml")).is_err());
    }
}
