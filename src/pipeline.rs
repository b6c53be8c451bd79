use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    clients::mailer::DispatchTransport,
    error::ValidationError,
    models::{
        appointment::AppointmentEvent,
        status::{PipelineOutcome, PipelineState},
    },
    renderer::render_context,
    resolver::RecordResolver,
};

/// Validates, resolves, renders and dispatches one appointment event.
///
/// Holds no state between invocations, so one instance serves concurrent
/// webhook deliveries. Deduplication relies solely on the upstream token:
/// two concurrent deliveries of the same untokened event both dispatch.
#[derive(Clone)]
pub struct IntakePipeline {
    resolver: RecordResolver,
    transport: Arc<dyn DispatchTransport>,
    recipients: Vec<String>,
}

impl IntakePipeline {
    pub fn new(
        resolver: RecordResolver,
        transport: Arc<dyn DispatchTransport>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            resolver,
            transport,
            recipients,
        }
    }

    /// Entry point for raw request bodies. Empty or non-JSON bodies are rejected.
    pub async fn process_payload(&self, payload: &[u8]) -> PipelineOutcome {
        match serde_json::from_slice::<Value>(payload) {
            Ok(value) => self.process(&value).await,
            Err(e) => {
                warn!(error = %e, "Rejecting webhook with unreadable body");
                PipelineOutcome::Rejected(ValidationError::MalformedPayload)
            }
        }
    }

    pub async fn process(&self, payload: &Value) -> PipelineOutcome {
        debug!(state = %PipelineState::Received, "Webhook payload received");

        let event = match AppointmentEvent::normalize(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(state = %PipelineState::Rejected, error = %e, "Invalid webhook payload");
                return PipelineOutcome::Rejected(e);
            }
        };

        debug!(appointment_id = %event.id, state = %PipelineState::Validated, "Payload normalized");

        if event.is_already_processed() {
            info!(
                appointment_id = %event.id,
                state = %PipelineState::Ignored,
                token = ?event.token,
                "Appointment already processed, ignoring"
            );
            return PipelineOutcome::Ignored;
        }

        if let Err(e) = event.references() {
            warn!(
                appointment_id = %event.id,
                state = %PipelineState::Rejected,
                user_id = ?event.user_id,
                doctor_id = ?event.doctor_id,
                "Missing required fields: userId or doctorId"
            );
            return PipelineOutcome::Rejected(e);
        }

        info!(
            appointment_id = %event.id,
            state = %PipelineState::DedupeChecked,
            user_id = ?event.user_id,
            doctor_id = ?event.doctor_id,
            "Processing appointment"
        );

        let context = self.resolver.resolve(event).await;

        debug!(
            appointment_id = %context.event.id,
            state = %PipelineState::Resolved,
            patient_resolved = context.patient.is_some(),
            doctor_resolved = context.doctor.is_some(),
            "Records resolved"
        );

        let content = render_context(&context);

        debug!(
            appointment_id = %context.event.id,
            state = %PipelineState::Rendered,
            subject = %content.subject,
            "Notification rendered"
        );

        match self.transport.send(&content, &self.recipients).await {
            Ok(receipt) => {
                info!(
                    appointment_id = %context.event.id,
                    state = %PipelineState::Dispatched,
                    message_id = %receipt.message_id,
                    "Appointment notification dispatched"
                );
                PipelineOutcome::Dispatched(receipt)
            }
            Err(e) => {
                error!(
                    appointment_id = %context.event.id,
                    state = %PipelineState::Failed,
                    error = %e,
                    "Failed to dispatch appointment notification"
                );
                PipelineOutcome::Failed(e)
            }
        }
    }
}
