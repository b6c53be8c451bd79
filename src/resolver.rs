use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    clients::store::{Lookup, RecordStore},
    config::Config,
    models::{
        appointment::{AppointmentEvent, EventReferences},
        records::{Doctor, Patient, ResolvedContext},
    },
};

/// Where patient and doctor records live and which fields carry external ids.
#[derive(Debug, Clone)]
pub struct CollectionSettings {
    pub patient_collection: String,
    pub doctor_collection: String,
    pub patient_user_field: String,
    pub doctor_external_field: String,
}

impl CollectionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            patient_collection: config.patient_col.clone(),
            doctor_collection: config.doctor_col.clone(),
            patient_user_field: config.patient_user_field.clone(),
            doctor_external_field: config.doctor_external_field.clone(),
        }
    }
}

/// Turns event references into records. Lookup failures never escape: a
/// record that cannot be resolved comes back as `None`.
#[derive(Clone)]
pub struct RecordResolver {
    store: Arc<dyn RecordStore>,
    settings: CollectionSettings,
}

impl RecordResolver {
    pub fn new(store: Arc<dyn RecordStore>, settings: CollectionSettings) -> Self {
        Self { store, settings }
    }

    /// Resolves both records concurrently and bundles them with the event.
    /// An event without references resolves to no records at all.
    pub async fn resolve(&self, event: AppointmentEvent) -> ResolvedContext {
        let (patient, doctor) = match event.references() {
            Ok(EventReferences { user_id, doctor_id }) => tokio::join!(
                self.resolve_patient(user_id),
                self.resolve_doctor(doctor_id)
            ),
            Err(_) => (None, None),
        };

        ResolvedContext {
            event,
            patient,
            doctor,
        }
    }

    pub async fn resolve_patient(&self, user_id: &str) -> Option<Patient> {
        let collection = &self.settings.patient_collection;

        match self
            .store
            .query_by_field(collection, &self.settings.patient_user_field, user_id)
            .await
        {
            Ok(Lookup::Found(document)) => {
                let patient = Patient::from_document(&document);
                debug!(user_id, name = ?patient.name, "Patient resolved");
                Some(patient)
            }
            Ok(Lookup::NotFound) => {
                warn!(collection = %collection, user_id, "No patient record found for user");
                None
            }
            Err(e) => {
                warn!(
                    collection = %collection,
                    user_id,
                    error = %e,
                    "Patient lookup failed, continuing without patient record"
                );
                None
            }
        }
    }

    /// Tries the store's own document id first, then the external doctor id
    /// field. The second lookup only runs when the first answered not-found.
    pub async fn resolve_doctor(&self, doctor_id: &str) -> Option<Doctor> {
        let collection = &self.settings.doctor_collection;

        match self.store.get_by_id(collection, doctor_id).await {
            Ok(Lookup::Found(document)) => {
                let doctor = Doctor::from_document(&document);
                debug!(doctor_id, name = ?doctor.name, "Doctor resolved by document id");
                return Some(doctor);
            }
            Ok(Lookup::NotFound) => {
                debug!(doctor_id, "Doctor not found by document id, trying external id");
            }
            Err(e) => {
                warn!(
                    collection = %collection,
                    doctor_id,
                    error = %e,
                    "Doctor lookup failed, continuing without doctor record"
                );
                return None;
            }
        }

        match self
            .store
            .query_by_field(collection, &self.settings.doctor_external_field, doctor_id)
            .await
        {
            Ok(lookup) => {
                let doctor = lookup.into_found().map(|d| Doctor::from_document(&d));
                if doctor.is_none() {
                    warn!(collection = %collection, doctor_id, "No doctor record found");
                }
                doctor
            }
            Err(e) => {
                warn!(
                    collection = %collection,
                    doctor_id,
                    error = %e,
                    "Doctor query failed, continuing without doctor record"
                );
                None
            }
        }
    }
}
