//! JSON request and reply bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/park`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkRequest {
    /// Raw plate as typed by the operator.
    #[serde(default)]
    pub license_plate: Option<String>,
    /// Vehicle category; missing or blank means the lot default.
    #[serde(default)]
    pub vehicle_type: Option<String>,
}

impl ParkRequest {
    /// Creates a park request.
    pub fn new(license_plate: impl Into<String>) -> Self {
        Self {
            license_plate: Some(license_plate.into()),
            vehicle_type: None,
        }
    }

    /// Sets the vehicle category.
    pub fn with_vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = Some(vehicle_type.into());
        self
    }
}

/// Body of `POST /api/exit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRequest {
    /// Raw plate as typed by the operator.
    #[serde(default)]
    pub license_plate: Option<String>,
}

impl ExitRequest {
    /// Creates an exit request.
    pub fn new(license_plate: impl Into<String>) -> Self {
        Self {
            license_plate: Some(license_plate.into()),
        }
    }
}

/// Envelope for park/exit replies and error bodies.
///
/// Exactly one of `data` (on success) and `message` (on rejection or error)
/// is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiReply<T> {
    /// Whether the operation took effect.
    pub success: bool,
    /// Result payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable reason for failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiReply<T> {
    /// A successful reply carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A failed reply carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Business rejections become failure replies carrying their message.
impl<T, E: std::fmt::Display> From<Result<T, E>> for ApiReply<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
