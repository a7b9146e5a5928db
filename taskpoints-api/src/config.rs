/// Server configuration
///
/// Everything comes from environment variables, read once at startup and
/// immutable afterwards. In particular the token signing secret lives
/// here: rotating it means restarting the process, and the restart
/// invalidates every token signed with the old secret.
///
/// | Variable                   | Meaning                          | Default   |
/// |----------------------------|----------------------------------|-----------|
/// | `DATABASE_URL`             | PostgreSQL connection string     | required  |
/// | `DATABASE_MAX_CONNECTIONS` | pool upper bound                 | `10`      |
/// | `API_HOST`                 | bind host                        | `0.0.0.0` |
/// | `API_PORT`                 | bind port                        | `8080`    |
/// | `JWT_SECRET`               | signing secret, 32 bytes minimum | required  |
/// | `CORS_ORIGINS`             | comma-separated origins          | `*`       |

use serde::{Deserialize, Serialize};
use std::env;

/// Top-level configuration, grouped by concern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    pub api: ApiConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// Token signing settings
    pub jwt: JwtConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Allowed CORS origins; a literal `*` entry switches the layer to
    /// permissive mode
    pub cors_origins: Vec<String>,
}

/// Database settings consumed by the pool builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Pool upper bound
    pub max_connections: u32,
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret; `openssl rand -hex 32` produces a good one
    pub secret: String,
}

impl Config {
    /// Reads configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when
    /// present.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` or `JWT_SECRET` is absent, when a
    /// numeric variable does not parse, or when the secret is shorter
    /// than 32 bytes.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes");
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            jwt: JwtConfig { secret },
        })
    }

    /// `host:port` string for the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The environment is process-global; every from_env test runs under
    // this lock and restores what it touched.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const MANAGED_VARS: [&str; 6] = [
        "API_HOST",
        "API_PORT",
        "CORS_ORIGINS",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "JWT_SECRET",
    ];

    fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<(&str, Option<String>)> = MANAGED_VARS
            .iter()
            .map(|k| (*k, env::var(k).ok()))
            .collect();

        for k in MANAGED_VARS {
            env::remove_var(k);
        }
        for (k, v) in vars {
            env::set_var(k, v);
        }

        let result = f();

        for (k, v) in saved {
            match v {
                Some(v) => env::set_var(k, v),
                None => env::remove_var(k),
            }
        }

        result
    }

    #[test]
    fn from_env_fails_without_jwt_secret() {
        let err = with_env(
            &[("DATABASE_URL", "postgresql://localhost/taskpoints")],
            || Config::from_env().unwrap_err(),
        );

        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn from_env_rejects_short_jwt_secret() {
        let err = with_env(
            &[
                ("DATABASE_URL", "postgresql://localhost/taskpoints"),
                ("JWT_SECRET", "too-short"),
            ],
            || Config::from_env().unwrap_err(),
        );

        assert!(err.to_string().contains("32"));
    }

    #[test]
    fn from_env_fails_without_database_url() {
        let err = with_env(
            &[("JWT_SECRET", "a-signing-secret-of-at-least-32-bytes")],
            || Config::from_env().unwrap_err(),
        );

        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn from_env_applies_defaults() {
        let config = with_env(
            &[
                ("DATABASE_URL", "postgresql://localhost/taskpoints"),
                ("JWT_SECRET", "a-signing-secret-of-at-least-32-bytes"),
            ],
            || Config::from_env().unwrap(),
        );

        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn from_env_reads_explicit_values() {
        let config = with_env(
            &[
                ("API_HOST", "127.0.0.1"),
                ("API_PORT", "9090"),
                (
                    "CORS_ORIGINS",
                    "https://app.example.com, https://admin.example.com",
                ),
                ("DATABASE_URL", "postgresql://localhost/taskpoints"),
                ("DATABASE_MAX_CONNECTIONS", "5"),
                ("JWT_SECRET", "a-signing-secret-of-at-least-32-bytes"),
            ],
            || Config::from_env().unwrap(),
        );

        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(
            config.api.cors_origins,
            vec![
                "https://app.example.com".to_string(),
                "https://admin.example.com".to_string()
            ]
        );
    }
}
