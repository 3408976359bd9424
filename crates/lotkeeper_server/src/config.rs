//! Server configuration.

use crate::error::{ServerError, ServerResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Time allowed for a client to deliver its request.
    pub request_timeout: Duration,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Number of entries returned by `GET /api/history`.
    pub history_limit: usize,
    /// Whether to send permissive CORS headers.
    pub cors: bool,
    /// Directory served for non-API paths (`None` = no static files).
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            max_connections: 1000,
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 64 * 1024,
            history_limit: 20,
            cors: true,
            static_dir: None,
        }
    }

    /// Sets the maximum concurrent connections.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the maximum request body size.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Sets how many history entries the history endpoint returns.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Enables or disables CORS headers.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Serves static files from `dir`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Checks that a server can run with this configuration.
    pub fn validate(&self) -> ServerResult<()> {
        if self.max_connections == 0 {
            return Err(ServerError::invalid_configuration(
                "max_connections must be at least 1",
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ServerError::invalid_configuration(
                "max_body_bytes must be at least 1",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ServerError::invalid_configuration(
                "request_timeout must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 5001)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5001);
        assert_eq!(config.max_connections, 1000);
        assert_eq!(config.history_limit, 20);
        assert!(config.cors);
        assert!(config.static_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unservable_limits() {
        let config = ServerConfig::default().with_max_connections(0);
        assert!(matches!(
            config.validate(),
            Err(ServerError::InvalidConfiguration { .. })
        ));

        let config = ServerConfig::default().with_max_body_bytes(0);
        assert!(config.validate().is_err());

        let config = ServerConfig::default().with_request_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_max_connections(500)
            .with_history_limit(5)
            .with_max_body_bytes(1024)
            .with_cors(false)
            .with_static_dir("frontend");

        assert_eq!(config.max_connections, 500);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_body_bytes, 1024);
        assert!(!config.cors);
        assert_eq!(config.static_dir, Some(PathBuf::from("frontend")));
    }
}
