use axum::http::HeaderValue;
use gatepass_core::status::TransitionPolicy;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which parts of the system this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    /// Visitor and security routes in one process; the `app` security
    /// channel appends to the local log.
    #[default]
    Unified,
    /// Visitor routes only; the `app` security channel forwards to
    /// `SECURITY_APP_URL`.
    Backend,
    /// Security notification routes only; no database.
    Security,
}

impl DeploymentMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unified" => Some(DeploymentMode::Unified),
            "backend" => Some(DeploymentMode::Backend),
            "security" => Some(DeploymentMode::Security),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentMode::Unified => "unified",
            DeploymentMode::Backend => "backend",
            DeploymentMode::Security => "security",
        }
    }

    pub fn serves_visitors(self) -> bool {
        !matches!(self, DeploymentMode::Security)
    }

    pub fn serves_security(self) -> bool {
        !matches!(self, DeploymentMode::Backend)
    }

    /// Whether the `app` security channel must go over HTTP.
    pub fn forwards_app(self) -> bool {
        matches!(self, DeploymentMode::Backend)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Notification
/// channels are configured separately through
/// [`NotificationConfig`](gatepass_events::NotificationConfig).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Which routes this process serves.
    pub mode: DeploymentMode,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pool size (default: `20`).
    pub database_max_connections: u32,
    /// Rules for re-deciding a visit.
    pub status_policy: TransitionPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `5000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5000`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DEPLOYMENT_MODE`          | `unified`                  |
    /// | `DATABASE_URL`             | unset (in-memory store)    |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                       |
    /// | `VISIT_STATUS_POLICY`      | `permissive`               |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = parse_or("PORT", get("PORT"), 5000u16, "a valid port number")?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5000".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                    key: "CORS_ORIGINS",
                    value: origin.to_string(),
                    expected: "a comma-separated list of origins",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = parse_or(
            "REQUEST_TIMEOUT_SECS",
            get("REQUEST_TIMEOUT_SECS"),
            30u64,
            "a number of seconds",
        )?;

        let mode = match get("DEPLOYMENT_MODE") {
            Some(raw) => DeploymentMode::parse(&raw).ok_or(ConfigError::Invalid {
                key: "DEPLOYMENT_MODE",
                value: raw,
                expected: "one of unified, backend, security",
            })?,
            None => DeploymentMode::default(),
        };

        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            20u32,
            "a positive integer",
        )?;

        let status_policy = match get("VISIT_STATUS_POLICY") {
            Some(raw) => TransitionPolicy::parse(&raw).ok_or(ConfigError::Invalid {
                key: "VISIT_STATUS_POLICY",
                value: raw,
                expected: "permissive or strict",
            })?,
            None => TransitionPolicy::default(),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            mode,
            database_url: get("DATABASE_URL"),
            database_max_connections,
            status_policy,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value,
            expected,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.cors_origins, vec![HeaderValue::from_static("http://localhost:5000")]);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.mode, DeploymentMode::Unified);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.database_max_connections, 20);
        assert_eq!(cfg.status_policy, TransitionPolicy::Permissive);
    }

    #[test]
    fn overrides() {
        let cfg = load(&[
            ("PORT", "5001"),
            ("CORS_ORIGINS", "http://a.example, http://b.example"),
            ("DEPLOYMENT_MODE", "Security"),
            ("DATABASE_URL", "postgres://localhost/gatepass"),
            ("VISIT_STATUS_POLICY", "strict"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.cors_origins.len(), 2);
        assert_eq!(cfg.mode, DeploymentMode::Security);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/gatepass"));
        assert_eq!(cfg.status_policy, TransitionPolicy::Strict);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        );
        assert_matches!(
            load(&[("DEPLOYMENT_MODE", "kiosk")]),
            Err(ConfigError::Invalid { key: "DEPLOYMENT_MODE", .. })
        );
        assert_matches!(
            load(&[("VISIT_STATUS_POLICY", "lenient")]),
            Err(ConfigError::Invalid { key: "VISIT_STATUS_POLICY", .. })
        );
    }

    #[test]
    fn empty_database_url_selects_memory_store() {
        let cfg = load(&[("DATABASE_URL", "")]).unwrap();
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn mode_route_selection() {
        assert!(DeploymentMode::Unified.serves_visitors());
        assert!(DeploymentMode::Unified.serves_security());
        assert!(!DeploymentMode::Unified.forwards_app());
        assert!(!DeploymentMode::Backend.serves_security());
        assert!(DeploymentMode::Backend.forwards_app());
        assert!(!DeploymentMode::Security.serves_visitors());
    }
}
