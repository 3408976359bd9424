//! # Lotkeeper Server
//!
//! HTTP API in front of an [`OccupancyTracker`](lotkeeper_core::OccupancyTracker).
//!
//! This crate provides:
//! - Transport-agnostic request handlers (park, exit, status, vehicles, history)
//! - A router mapping HTTP requests onto those handlers, with CORS
//! - Optional static file serving for a frontend bundle
//! - A minimal HTTP/1.1 listener on tokio
//!
//! # Architecture
//!
//! The tracker is built once by the caller and injected as an
//! `Arc<OccupancyTracker>`; there is no process-wide singleton. Each
//! connection carries one request and is closed after the response.
//!
//! ```rust,no_run
//! use lotkeeper_core::OccupancyTracker;
//! use lotkeeper_server::{ParkingServer, ServerConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = Arc::new(OccupancyTracker::with_capacity(50)?);
//! let server = ParkingServer::new(ServerConfig::default(), tracker);
//! let listener = server.bind().await?;
//! server.serve(listener, async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Endpoints
//!
//! | Method | Path            | Reply                                   |
//! |--------|-----------------|-----------------------------------------|
//! | POST   | `/api/park`     | `{success, data: record}` or `{success, message}` |
//! | POST   | `/api/exit`     | `{success, data: summary}` or `{success, message}` |
//! | GET    | `/api/status`   | capacity, free, occupied, occupancy rate |
//! | GET    | `/api/vehicles` | active records                           |
//! | GET    | `/api/history`  | most recent activity                     |

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod api;
mod config;
mod error;
mod handler;
pub mod http;
mod router;
mod server;
mod static_files;

pub use api::{ApiReply, ExitRequest, ParkRequest};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use router::Router;
pub use server::ParkingServer;
pub use static_files::{content_type, StaticFiles};
