use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use appointment_notifier::{
    clients::{
        mailer::DispatchTransport,
        store::{Lookup, RecordStore},
    },
    error::{DispatchError, StoreError},
    models::{
        document::Document,
        notification::{DispatchReceipt, NotificationContent},
    },
    pipeline::IntakePipeline,
    resolver::{CollectionSettings, RecordResolver},
};
use async_trait::async_trait;
use serde_json::Value;

pub const PATIENT_COL: &str = "patients";
pub const DOCTOR_COL: &str = "doctors";

pub fn document(value: Value) -> Document {
    value
        .as_object()
        .cloned()
        .expect("test documents must be JSON objects")
}

/// One recorded store call: (operation, collection, key).
pub type StoreCall = (&'static str, String, String);

/// In-memory record store that counts every call.
#[derive(Default)]
pub struct FakeStore {
    by_id: HashMap<(String, String), Document>,
    by_field: HashMap<(String, String, String), Document>,
    failing_collections: Vec<String>,
    failing_queries: Vec<String>,
    calls: Mutex<Vec<StoreCall>>,
    call_count: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, collection: &str, id: &str, value: Value) -> Self {
        self.by_id
            .insert((collection.to_string(), id.to_string()), document(value));
        self
    }

    pub fn with_field_match(mut self, collection: &str, field: &str, value: &str, record: Value) -> Self {
        self.by_field.insert(
            (collection.to_string(), field.to_string(), value.to_string()),
            document(record),
        );
        self
    }

    /// Every call against `collection` fails as if the store were down.
    pub fn failing(mut self, collection: &str) -> Self {
        self.failing_collections.push(collection.to_string());
        self
    }

    /// Only field queries against `collection` fail; id lookups still answer.
    pub fn failing_queries(mut self, collection: &str) -> Self {
        self.failing_queries.push(collection.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, collection: &str) -> Vec<StoreCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c, _)| c == collection)
            .cloned()
            .collect()
    }

    fn record(&self, operation: &'static str, collection: &str, key: String) -> Result<(), StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((operation, collection.to_string(), key));

        let query_failing =
            operation == "query_by_field" && self.failing_queries.iter().any(|c| c == collection);

        if query_failing || self.failing_collections.iter().any(|c| c == collection) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Lookup, StoreError> {
        self.record("get_by_id", collection, id.to_string())?;

        Ok(self
            .by_id
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
            .map(Lookup::Found)
            .unwrap_or(Lookup::NotFound))
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Lookup, StoreError> {
        self.record("query_by_field", collection, format!("{}={}", field, value))?;

        Ok(self
            .by_field
            .get(&(collection.to_string(), field.to_string(), value.to_string()))
            .cloned()
            .map(Lookup::Found)
            .unwrap_or(Lookup::NotFound))
    }
}

/// Transport that records what it was asked to send.
#[derive(Default)]
pub struct FakeTransport {
    fail: bool,
    sent: Mutex<Vec<(NotificationContent, Vec<String>)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(NotificationContent, Vec<String>)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DispatchTransport for FakeTransport {
    async fn send(
        &self,
        content: &NotificationContent,
        recipients: &[String],
    ) -> Result<DispatchReceipt, DispatchError> {
        self.sent
            .lock()
            .unwrap()
            .push((content.clone(), recipients.to_vec()));

        if self.fail {
            return Err(DispatchError::Failed("535 authentication rejected".to_string()));
        }

        Ok(DispatchReceipt {
            message_id: format!("fake-{}", self.send_count()),
        })
    }
}

pub fn collection_settings() -> CollectionSettings {
    CollectionSettings {
        patient_collection: PATIENT_COL.to_string(),
        doctor_collection: DOCTOR_COL.to_string(),
        patient_user_field: "userId".to_string(),
        doctor_external_field: "doctorId".to_string(),
    }
}

pub fn recipients() -> Vec<String> {
    vec!["front-desk@example.com".to_string(), "ops@example.com".to_string()]
}

pub fn pipeline(store: Arc<FakeStore>, transport: Arc<FakeTransport>) -> IntakePipeline {
    IntakePipeline::new(
        RecordResolver::new(store, collection_settings()),
        transport,
        recipients(),
    )
}
