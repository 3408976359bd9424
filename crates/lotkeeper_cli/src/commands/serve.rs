//! Serve command implementation.

use lotkeeper_core::LotConfig;
use lotkeeper_server::{ParkingServer, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

/// Options for the serve command.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Listen address.
    pub bind: SocketAddr,
    /// Number of spots.
    pub capacity: u32,
    /// Entries returned by the history endpoint.
    pub history_limit: usize,
    /// History retention bound.
    pub history_retention: Option<usize>,
    /// Frontend directory.
    pub static_dir: Option<PathBuf>,
    /// Whether CORS headers are sent.
    pub cors: bool,
    /// Maximum concurrent connections.
    pub max_connections: usize,
}

impl ServeOptions {
    /// Lot configuration for these options.
    pub fn lot_config(&self) -> LotConfig {
        let lot = LotConfig::new().capacity(self.capacity);
        match self.history_retention {
            Some(entries) => lot.history_retention(entries),
            None => lot,
        }
    }

    /// Server configuration for these options.
    pub fn server_config(&self) -> ServerConfig {
        let config = ServerConfig::new(self.bind)
            .with_history_limit(self.history_limit)
            .with_max_connections(self.max_connections)
            .with_cors(self.cors);
        match &self.static_dir {
            Some(dir) => config.with_static_dir(dir.clone()),
            None => config,
        }
    }
}

/// Runs the server until Ctrl-C.
pub fn run(options: &ServeOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &options.static_dir {
        if !dir.is_dir() {
            return Err(format!("Static directory not found: {}", dir.display()).into());
        }
    }

    let server = ParkingServer::with_lot(options.server_config(), options.lot_config())?;
    let tracker = std::sync::Arc::clone(server.tracker());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = server.bind().await?;
        server
            .serve(listener, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(error = %err, "failed to listen for Ctrl-C");
                }
            })
            .await
    })?;

    let stats = tracker.stats();
    info!(
        admissions = stats.admissions(),
        releases = stats.releases(),
        rejections = stats.rejections(),
        occupied = tracker.status().occupied_spots,
        "server stopped"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ServeOptions {
        ServeOptions {
            bind: "127.0.0.1:8080".parse().unwrap(),
            capacity: 12,
            history_limit: 5,
            history_retention: None,
            static_dir: None,
            cors: true,
            max_connections: 10,
        }
    }

    #[test]
    fn builds_lot_config() {
        let lot = options().lot_config();
        assert_eq!(lot.capacity, 12);
        assert_eq!(lot.history_retention, None);

        let lot = ServeOptions {
            history_retention: Some(100),
            ..options()
        }
        .lot_config();
        assert_eq!(lot.history_retention, Some(100));
    }

    #[test]
    fn builds_server_config() {
        let config = ServeOptions {
            cors: false,
            static_dir: Some(PathBuf::from("frontend")),
            ..options()
        }
        .server_config();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_connections, 10);
        assert!(!config.cors);
        assert_eq!(config.static_dir, Some(PathBuf::from("frontend")));
    }

    #[test]
    fn missing_static_dir_is_an_error() {
        let options = ServeOptions {
            static_dir: Some(PathBuf::from("/definitely/not/here")),
            ..options()
        };
        assert!(run(&options).is_err());
    }

    #[test]
    fn zero_capacity_is_an_error() {
        let options = ServeOptions {
            capacity: 0,
            ..options()
        };
        assert!(run(&options).is_err());
    }

    #[test]
    fn zero_connection_cap_is_an_error() {
        let options = ServeOptions {
            max_connections: 0,
            ..options()
        };
        let err = run(&options).unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }
}
