//! The HTTP server.

use crate::api::ApiReply;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, RequestHandler};
use crate::http::{read_request, write_response, HttpResponse};
use crate::router::Router;
use lotkeeper_core::{LotConfig, OccupancyTracker};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// The parking API server.
///
/// Owns the router and a handle to the shared tracker. Each accepted
/// connection is served on its own task; at most
/// [`max_connections`](ServerConfig::max_connections) are served at once and
/// extra connections get a 503.
///
/// # Example
///
/// ```
/// use lotkeeper_core::OccupancyTracker;
/// use lotkeeper_server::{ParkingServer, ServerConfig};
/// use std::sync::Arc;
///
/// let tracker = Arc::new(OccupancyTracker::with_capacity(10).unwrap());
/// let server = ParkingServer::new(ServerConfig::default(), tracker);
/// assert_eq!(server.tracker().capacity(), 10);
/// ```
pub struct ParkingServer {
    router: Arc<Router>,
    context: Arc<HandlerContext>,
}

impl ParkingServer {
    /// Creates a server around an existing tracker.
    pub fn new(config: ServerConfig, tracker: Arc<OccupancyTracker>) -> Self {
        let context = Arc::new(HandlerContext::new(config, tracker));
        let router = Arc::new(Router::new(RequestHandler::new(Arc::clone(&context))));

        Self { router, context }
    }

    /// Builds the tracker from `lot` and creates a server around it.
    ///
    /// # Errors
    ///
    /// Fails if either configuration is invalid.
    pub fn with_lot(config: ServerConfig, lot: LotConfig) -> ServerResult<Self> {
        config.validate()?;
        let tracker = Arc::new(OccupancyTracker::new(lot)?);
        Ok(Self::new(config, tracker))
    }

    /// Returns the shared tracker.
    pub fn tracker(&self) -> &Arc<OccupancyTracker> {
        &self.context.tracker
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let listener = TcpListener::bind(self.context.config.bind_addr).await?;
        Ok(listener)
    }

    /// Accepts connections on `listener` until `shutdown` resolves.
    ///
    /// Requests already in flight when `shutdown` resolves are allowed to
    /// finish on their own tasks.
    ///
    /// # Errors
    ///
    /// Fails before accepting anything if the server configuration is invalid.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        let config = &self.context.config;
        config.validate()?;
        let local_addr = listener.local_addr()?;
        let permits = Arc::new(Semaphore::new(config.max_connections));
        let timeout = config.request_timeout;
        let max_body = config.max_body_bytes;

        info!(
            addr = %local_addr,
            capacity = self.context.tracker.capacity(),
            "parking server listening"
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("parking server shutting down");
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(err) => {
                            warn!(error = %err, "failed to accept connection");
                            continue;
                        }
                    };

                    let router = Arc::clone(&self.router);
                    match Arc::clone(&permits).try_acquire_owned() {
                        Ok(permit) => {
                            tokio::spawn(async move {
                                let _permit = permit;
                                if let Err(err) =
                                    serve_connection(stream, &router, timeout, max_body).await
                                {
                                    debug!(%peer, error = %err, "connection ended with error");
                                }
                            });
                        }
                        Err(_) => {
                            warn!(%peer, "connection limit reached, refusing");
                            tokio::spawn(async move {
                                if let Err(err) = refuse_connection(stream, &router).await {
                                    debug!(%peer, error = %err, "failed to refuse connection");
                                }
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Serves one request on `stream`.
async fn serve_connection(
    stream: TcpStream,
    router: &Router,
    timeout: Duration,
    max_body: usize,
) -> ServerResult<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let response = match tokio::time::timeout(timeout, read_request(&mut reader, max_body)).await {
        Err(_) => router.error_response(&ServerError::Timeout),
        Ok(Ok(None)) => return Ok(()),
        Ok(Ok(Some(request))) => router.dispatch(&request).await,
        Ok(Err(err)) => router.error_response(&err),
    };

    write_response(&mut write_half, &response).await?;
    Ok(())
}

async fn refuse_connection(stream: TcpStream, router: &Router) -> ServerResult<()> {
    let (_, mut write_half) = stream.into_split();
    let busy = HttpResponse::json(503, &ApiReply::<()>::failure("Server busy, try again"));
    let busy = router.finish(busy);
    write_response(&mut write_half, &busy).await?;
    Ok(())
}
