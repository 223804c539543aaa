use serde::{Deserialize, Serialize};
use std::env;

/// Secret used when JWT_SECRET is not set. Startup logs a warning whenever
/// this one is in effect.
pub const DEV_JWT_SECRET: &str = "roster-api-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Credential accepted by the login route. A single configured login is
    /// all this service needs; user records themselves carry no password.
    pub login_email: String,
    pub login_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// When set, the Postgres backend is used; otherwise records live in
    /// process memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("LOGIN_EMAIL") {
            self.security.login_email = v;
        }
        if let Ok(v) = env::var("LOGIN_PASSWORD") {
            self.security.login_password = v;
        }

        // Store overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.store.database_url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.store.max_connections = v.parse().unwrap_or(self.store.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.store.connection_timeout = v.parse().unwrap_or(self.store.connection_timeout);
        }

        self
    }

    pub fn defaults() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4040,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                login_email: "react@example.com".to_string(),
                login_password: "express".to_string(),
            },
            store: StoreConfig {
                database_url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults();
        assert_eq!(config.server.port, 4040);
        assert_eq!(config.security.jwt_secret, DEV_JWT_SECRET);
        assert!(config.store.database_url.is_none());
    }

    #[test]
    fn test_overrides_keep_defaults_on_bad_values() {
        let mut config = AppConfig::defaults();
        // mirrors the parse().unwrap_or fallback used for every numeric var
        config.server.port = "not-a-port".parse().unwrap_or(config.server.port);
        assert_eq!(config.server.port, 4040);
    }
}
