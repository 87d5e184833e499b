//! Application configuration management.
//!
//! Sources are layered, later ones winning:
//! 1. struct defaults
//! 2. `config/default.toml` and `config/{RUN_MODE}.toml`
//! 3. `LEDGERLY__SECTION__KEY` environment variables
//! 4. the deployment variables `BK_HOST`, `BK_PORT` and `POSTGRES_URL`

use serde::Deserialize;

/// Port used when `BK_PORT` is absent or not a usable port number.
pub const DEFAULT_PORT: u16 = 3000;

/// Host used when `BK_HOST` is absent or empty.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Log every statement through `tracing`.
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Parses a `BK_PORT` value.
///
/// Returns `None` for missing, non-numeric, out-of-range or zero values so
/// that the caller falls back to [`DEFAULT_PORT`].
#[must_use]
pub fn parse_port(raw: Option<&str>) -> Option<u16> {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the merged result
    /// is missing required keys (the database URL).
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let port = parse_port(std::env::var("BK_PORT").ok().as_deref());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERLY").separator("__"))
            .set_override_option("server.host", non_empty_var("BK_HOST"))?
            .set_override_option("server.port", port.map(i64::from))?
            .set_override_option("database.url", non_empty_var("POSTGRES_URL"))?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some("8080"), Some(8080))]
    #[case(Some(" 4000 "), Some(4000))]
    #[case(Some("0"), None)]
    #[case(Some("abc"), None)]
    #[case(Some("70000"), None)]
    #[case(Some(""), None)]
    fn test_parse_port(#[case] raw: Option<&str>, #[case] expected: Option<u16>) {
        assert_eq!(parse_port(raw), expected);
    }

    #[test]
    fn test_load_uses_defaults_without_bk_vars() {
        temp_env::with_vars(
            [
                ("BK_HOST", None),
                ("BK_PORT", None),
                ("POSTGRES_URL", Some("postgres://localhost/ledgerly")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.host, DEFAULT_HOST);
                assert_eq!(config.server.port, DEFAULT_PORT);
                assert_eq!(config.database.url, "postgres://localhost/ledgerly");
                assert_eq!(config.database.max_connections, 10);
            },
        );
    }

    #[test]
    fn test_load_reads_bk_host_and_port() {
        temp_env::with_vars(
            [
                ("BK_HOST", Some("0.0.0.0")),
                ("BK_PORT", Some("8081")),
                ("POSTGRES_URL", Some("postgres://localhost/ledgerly")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.bind_address(), "0.0.0.0:8081");
            },
        );
    }

    #[test]
    fn test_load_ignores_garbage_port() {
        temp_env::with_vars(
            [
                ("BK_HOST", Some("")),
                ("BK_PORT", Some("not-a-port")),
                ("POSTGRES_URL", Some("postgres://localhost/ledgerly")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.host, DEFAULT_HOST);
                assert_eq!(config.server.port, DEFAULT_PORT);
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars(
            [
                ("POSTGRES_URL", None::<&str>),
                ("LEDGERLY__DATABASE__URL", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
