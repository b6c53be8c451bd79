use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

pub const SERVICE_NAME: &str = "appointment-webhook-service";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    pub service: String,
}

impl HealthCheckResponse {
    pub fn healthy(now: DateTime<Utc>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            service: SERVICE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub webhook: String,
    pub health: String,
}

/// Body of the root endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceIndex {
    pub message: String,
    pub endpoints: Endpoints,
    pub timestamp: String,
}

impl ServiceIndex {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            message: "Appointment webhook service is running".to_string(),
            endpoints: Endpoints {
                webhook: "POST /appointment-created".to_string(),
                health: "GET /health".to_string(),
            },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
