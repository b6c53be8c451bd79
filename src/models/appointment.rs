use serde_json::Value;

use crate::{
    error::ValidationError,
    models::document::{Document, first_text_field},
};

const ID_ALIASES: &[&str] = &["$id", "id"];
const USER_ALIASES: &[&str] = &["userId", "userid", "user_id"];
const DOCTOR_ALIASES: &[&str] = &["doctorId", "doctorid", "doctor_id"];
const PHYSICIAN_ALIASES: &[&str] = &["primaryPhysician", "primary_physician"];

/// Webhook payload for a newly created appointment, with every known field
/// alias collapsed onto one canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentEvent {
    pub id: String,
    pub token: Option<Value>,
    pub user_id: Option<String>,
    pub doctor_id: Option<String>,
    pub schedule: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
    pub primary_physician: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// The two references every event must carry before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventReferences<'a> {
    pub user_id: &'a str,
    pub doctor_id: &'a str,
}

impl AppointmentEvent {
    /// Normalizes a raw payload. Fails only when the payload is not an object
    /// or carries no identifier; the remaining checks are left to the caller
    /// so they can run in order.
    pub fn normalize(payload: &Value) -> Result<Self, ValidationError> {
        let document = payload
            .as_object()
            .ok_or(ValidationError::MalformedPayload)?;

        let id = first_text_field(document, ID_ALIASES).ok_or(ValidationError::MissingId)?;

        Ok(Self {
            id,
            token: document.get("token").filter(|v| !v.is_null()).cloned(),
            user_id: first_text_field(document, USER_ALIASES),
            doctor_id: first_text_field(document, DOCTOR_ALIASES),
            schedule: field(document, "schedule"),
            reason: field(document, "reason"),
            status: field(document, "status"),
            note: field(document, "note"),
            primary_physician: first_text_field(document, PHYSICIAN_ALIASES),
            name: field(document, "name"),
            phone: field(document, "phone"),
            address: field(document, "address"),
        })
    }

    /// A non-null dedupe token means a prior delivery was already handled.
    pub fn is_already_processed(&self) -> bool {
        self.token.is_some()
    }

    pub fn references(&self) -> Result<EventReferences<'_>, ValidationError> {
        match (self.user_id.as_deref(), self.doctor_id.as_deref()) {
            (Some(user_id), Some(doctor_id)) => Ok(EventReferences { user_id, doctor_id }),
            _ => Err(ValidationError::MissingReferences),
        }
    }
}

fn field(document: &Document, key: &str) -> Option<String> {
    first_text_field(document, &[key])
}
