//! Request handlers for the API endpoints.

use crate::api::{ApiReply, ExitRequest, ParkRequest};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use lotkeeper_core::{
    HistoryEntry, LotStatus, OccupancyRecord, OccupancyTracker, ReleaseSummary, VehicleId,
};
use std::sync::Arc;
use tracing::info;

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// The lot (shared across all handlers).
    pub tracker: Arc<OccupancyTracker>,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, tracker: Arc<OccupancyTracker>) -> Self {
        Self { config, tracker }
    }
}

/// Handler for API requests.
///
/// Handlers validate the request, call the tracker and wrap the outcome.
/// Missing input is an `Err` (HTTP 400); business rejections are
/// `Ok(ApiReply { success: false, .. })`.
#[derive(Clone)]
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Returns the handler context.
    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Handles `POST /api/park`.
    pub fn handle_park(&self, request: ParkRequest) -> ServerResult<ApiReply<OccupancyRecord>> {
        let vehicle = require_plate(request.license_plate.as_deref())?;
        let vehicle_type = request.vehicle_type.as_deref().unwrap_or_default();

        let outcome = self.context.tracker.admit(vehicle.clone(), vehicle_type);
        match &outcome {
            Ok(record) => info!(plate = %vehicle, spot = %record.spot_number, "parked"),
            Err(rejection) => info!(plate = %vehicle, reason = %rejection, "park refused"),
        }
        Ok(outcome.into())
    }

    /// Handles `POST /api/exit`.
    pub fn handle_exit(&self, request: ExitRequest) -> ServerResult<ApiReply<ReleaseSummary>> {
        let vehicle = require_plate(request.license_plate.as_deref())?;

        let outcome = self.context.tracker.release(&vehicle);
        match &outcome {
            Ok(summary) => info!(
                plate = %vehicle,
                spot = %summary.spot_number,
                minutes = summary.duration_minutes,
                "exited"
            ),
            Err(rejection) => info!(plate = %vehicle, reason = %rejection, "exit refused"),
        }
        Ok(outcome.into())
    }

    /// Handles `GET /api/status`.
    pub fn handle_status(&self) -> LotStatus {
        self.context.tracker.status()
    }

    /// Handles `GET /api/vehicles`.
    pub fn handle_vehicles(&self) -> Vec<OccupancyRecord> {
        self.context.tracker.list_occupied()
    }

    /// Handles `GET /api/history`.
    pub fn handle_history(&self) -> Vec<HistoryEntry> {
        self.context
            .tracker
            .recent_history(self.context.config.history_limit)
    }
}

fn require_plate(raw: Option<&str>) -> ServerResult<VehicleId> {
    raw.and_then(VehicleId::parse)
        .ok_or(ServerError::MissingLicensePlate)
}
