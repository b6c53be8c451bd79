use crate::models::{
    appointment::AppointmentEvent,
    document::{Document, text_field},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Patient {
    pub fn from_document(document: &Document) -> Self {
        Self {
            name: text_field(document, "name"),
            phone: text_field(document, "phone"),
            address: text_field(document, "address"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctor {
    pub name: Option<String>,
    pub clinic_name: Option<String>,
    pub clinic_address: Option<String>,
    pub clinic_phone: Option<String>,
}

impl Doctor {
    pub fn from_document(document: &Document) -> Self {
        Self {
            name: text_field(document, "name"),
            clinic_name: text_field(document, "clinicName"),
            clinic_address: text_field(document, "clinicAddress"),
            clinic_phone: text_field(document, "clinicPhone"),
        }
    }
}

/// Everything rendering needs for one event. Built per event and dropped once
/// the notification has been dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    pub event: AppointmentEvent,
    pub patient: Option<Patient>,
    pub doctor: Option<Doctor>,
}
