//! Configuration module for the PDP API.
//!
//! Handles loading and validating application configuration from
//! environment variables, with sensible defaults for local development.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub bus: BusConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// Server (REST + gRPC) bind configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub grpc_port: u16,
    pub request_timeout_secs: u64,
    pub read_header_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Persistence backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory://` selects the in-memory adapter; anything else is handed
    /// to `SurrealStore::connect` (requires the `store-surreal` feature).
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Optional read-replica endpoint; unused by the in-memory adapter.
    pub read_replica_url: Option<String>,
}

/// Bus (L2 cache + pub/sub) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// `memory://` selects the in-memory bus; anything else is treated as
    /// a Redis URL.
    pub address: String,
    pub password: Option<String>,
}

/// Cache layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub l1_max_entries: u64,
}

/// Authentication mode and associated settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// One of `none`, `jwt`, `kerberos`.
    pub mode: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_tenant: Option<String>,
    pub jwt_client_id: Option<String>,
    pub keytab_path: Option<String>,
    pub service_principal: Option<String>,
}

/// Per-caller rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins; `*` permits any origin.
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            bus: BusConfig::default(),
            cache: CacheConfig::default(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            grpc_port: 50051,
            request_timeout_secs: 15,
            read_header_timeout_secs: 5,
            idle_timeout_secs: 60,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "memory://".to_string(),
            namespace: "hodei".to_string(),
            database: "pdp".to_string(),
            read_replica_url: None,
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            address: "memory://".to_string(),
            password: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 5,
            l1_max_entries: 10_000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: "none".to_string(),
            jwt_issuer: None,
            jwt_audience: None,
            jwt_tenant: None,
            jwt_client_id: None,
            keytab_path: None,
            service_principal: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 600,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = env::var("APP_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(host) = env::var("APP_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("APP_GRPC_PORT") {
            if let Ok(port) = port.parse() {
                config.server.grpc_port = port;
            }
        }
        if let Ok(timeout) = env::var("APP_REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                config.server.request_timeout_secs = timeout;
            }
        }

        if let Ok(url) = env::var("APP_STORE_URL") {
            config.store.url = url;
        }
        if let Ok(ns) = env::var("APP_STORE_NAMESPACE") {
            config.store.namespace = ns;
        }
        if let Ok(db) = env::var("APP_STORE_DATABASE") {
            config.store.database = db;
        }
        if let Ok(replica) = env::var("APP_STORE_READ_REPLICA_URL") {
            config.store.read_replica_url = Some(replica);
        }

        if let Ok(address) = env::var("APP_BUS_ADDRESS") {
            config.bus.address = address;
        }
        if let Ok(password) = env::var("APP_BUS_PASSWORD") {
            config.bus.password = Some(password);
        }

        if let Ok(ttl) = env::var("APP_CACHE_TTL_SECS") {
            if let Ok(ttl) = ttl.parse() {
                config.cache.ttl_secs = ttl;
            }
        }

        if let Ok(mode) = env::var("APP_AUTH_MODE") {
            config.auth.mode = mode;
        }
        if let Ok(issuer) = env::var("APP_JWT_ISSUER") {
            config.auth.jwt_issuer = Some(issuer);
        }
        if let Ok(audience) = env::var("APP_JWT_AUDIENCE") {
            config.auth.jwt_audience = Some(audience);
        }
        if let Ok(tenant) = env::var("APP_JWT_TENANT") {
            config.auth.jwt_tenant = Some(tenant);
        }
        if let Ok(client_id) = env::var("APP_JWT_CLIENT_ID") {
            config.auth.jwt_client_id = Some(client_id);
        }
        if let Ok(keytab) = env::var("APP_KEYTAB_PATH") {
            config.auth.keytab_path = Some(keytab);
        }
        if let Ok(spn) = env::var("APP_SERVICE_PRINCIPAL") {
            config.auth.service_principal = Some(spn);
        }

        if let Ok(window) = env::var("APP_RATE_LIMIT_WINDOW_SECS") {
            if let Ok(window) = window.parse() {
                config.rate_limit.window_secs = window;
            }
        }
        if let Ok(requests) = env::var("APP_RATE_LIMIT_MAX_REQUESTS") {
            if let Ok(requests) = requests.parse() {
                config.rate_limit.max_requests = requests;
            }
        }

        if let Ok(origins) = env::var("APP_CORS_ORIGINS") {
            config.cors.allowed_origins = origins;
        }

        if let Ok(level) = env::var("APP_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = env::var("APP_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    /// Validates the configuration, returning a description of the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server port cannot be 0".to_string());
        }
        if self.server.grpc_port == 0 {
            return Err("gRPC port cannot be 0".to_string());
        }
        if self.server.request_timeout_secs == 0 {
            return Err("request timeout cannot be 0".to_string());
        }
        if self.store.url.is_empty() {
            return Err("store URL cannot be empty".to_string());
        }

        let valid_modes = ["none", "jwt", "kerberos"];
        if !valid_modes.contains(&self.auth.mode.as_str()) {
            return Err(format!(
                "invalid auth mode '{}'. Valid values: {}",
                self.auth.mode,
                valid_modes.join(", ")
            ));
        }
        if self.auth.mode == "jwt" && self.auth.jwt_issuer.is_none() {
            return Err("APP_JWT_ISSUER is required when APP_AUTH_MODE=jwt".to_string());
        }
        if self.auth.mode == "kerberos" && self.auth.keytab_path.is_none() {
            return Err("APP_KEYTAB_PATH is required when APP_AUTH_MODE=kerberos".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "invalid log level '{}'. Valid values: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(format!(
                "invalid log format '{}'. Valid values: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn grpc_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.grpc_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.grpc_port, 50051);
        assert_eq!(config.auth.mode, "none");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_jwt_mode_without_issuer() {
        let mut config = Config::default();
        config.auth.mode = "jwt".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_address() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9000;
        assert_eq!(config.server_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_from_env() {
        unsafe {
            env::set_var("APP_PORT", "9090");
            env::set_var("APP_LOG_LEVEL", "debug");
            env::set_var("APP_AUTH_MODE", "none");
        }

        let config = Config::from_env();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.level, "debug");

        unsafe {
            env::remove_var("APP_PORT");
            env::remove_var("APP_LOG_LEVEL");
            env::remove_var("APP_AUTH_MODE");
        }
    }
}
