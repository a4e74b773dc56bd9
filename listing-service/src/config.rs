//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: LISTING_, nested keys separated by `__`,
//!    e.g. `LISTING_BACKEND__URL`, `LISTING_BACKEND__KEY`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/listing-service/{service_name}/config.toml
//! 4. System directory: /etc/listing-service/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LISTING_";

/// Directory name used under XDG and /etc
const CONFIG_DIR: &str = "listing-service";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Session carrier names
    #[serde(default)]
    pub auth: AuthConfig,

    /// Backing store configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Route table: one list endpoint per entry
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// CORS configuration (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

/// Names of the cookies whose presence admits a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Primary (customer or staff) session cookie
    #[serde(default = "default_primary_cookie")]
    pub primary_cookie: String,

    /// Administrative session cookie
    #[serde(default = "default_admin_cookie")]
    pub admin_cookie: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            primary_cookie: default_primary_cookie(),
            admin_cookie: default_admin_cookie(),
        }
    }
}

/// Which store implementation serves the routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// PostgREST-compatible HTTP backend
    #[default]
    Rest,
    /// In-process collections, optionally seeded from a JSON file
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Backing store configuration
///
/// `url` and `key` are optional on purpose: a service started without them
/// still runs and answers list requests with a redacted 500.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Store implementation
    #[serde(default)]
    pub kind: BackendKind,

    /// Backend endpoint URL
    #[serde(default)]
    pub url: Option<String>,

    /// Privileged access key
    #[serde(default)]
    pub key: Option<String>,

    /// Per-request timeout for the remote store in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,

    /// JSON file with initial collections for the in-memory store
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: None,
            key: None,
            timeout_secs: default_backend_timeout(),
            seed_path: None,
        }
    }
}

// Hand-written so the key never lands in logs
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("seed_path", &self.seed_path)
            .finish()
    }
}

/// One list endpoint: a request path and the collection it reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Request path, e.g. `/api/orders/prepaid`
    pub path: String,

    /// Collection identifier in the backing store
    pub collection: String,
}

impl RouteConfig {
    /// Create a route entry
    pub fn new(path: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            collection: collection.into(),
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_primary_cookie() -> String {
    "session_token".to_string()
}

fn default_admin_cookie() -> String {
    "admin_session".to_string()
}

fn default_backend_timeout() -> u64 {
    10
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/api/orders", "orders"),
        RouteConfig::new("/api/orders/prepaid", "prepaid_orders"),
        RouteConfig::new("/api/orders/cash-on-delivery", "cod_orders"),
        RouteConfig::new("/api/orders/self-pickup", "pickup_orders"),
    ]
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name used for file lookup is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| CONFIG_DIR.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later merges win
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract()?)
    }

    /// Load configuration from a specific file, bypassing the search path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Candidate config file paths, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_DIR);
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_DIR)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: CONFIG_DIR.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            auth: AuthConfig::default(),
            backend: BackendConfig::default(),
            routes: default_routes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.auth.primary_cookie, "session_token");
        assert_eq!(config.auth.admin_cookie, "admin_session");
        assert_eq!(config.backend.kind, BackendKind::Rest);
        assert!(config.backend.url.is_none());
        assert!(config.backend.key.is_none());
        assert_eq!(config.routes.len(), 4);
        assert!(config
            .routes
            .iter()
            .all(|r| crate::store::is_valid_collection_name(&r.collection)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[service]
name = "back-office"
port = 9100

[auth]
admin_cookie = "console_session"

[backend]
kind = "memory"
url = "https://db.internal"
key = "service-role"

[[routes]]
path = "/api/refunds"
collection = "refunds"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "back-office");
        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.auth.primary_cookie, "session_token");
        assert_eq!(config.auth.admin_cookie, "console_session");
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.backend.url.as_deref(), Some("https://db.internal"));
        assert_eq!(config.routes, vec![RouteConfig::new("/api/refunds", "refunds")]);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_from("/nonexistent/listing.toml").unwrap();
        assert_eq!(config.service.name, "listing-service");
        assert!(config.backend.url.is_none());
    }

    #[test]
    fn test_backend_debug_redacts_key() {
        let backend = BackendConfig {
            key: Some("service-role-secret".to_string()),
            ..BackendConfig::default()
        };
        let debug = format!("{:?}", backend);
        assert!(!debug.contains("service-role-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Rest.to_string(), "rest");
        assert_eq!(BackendKind::Memory.to_string(), "memory");
    }
}
