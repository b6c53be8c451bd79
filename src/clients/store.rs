use async_trait::async_trait;

use crate::{error::StoreError, models::document::Document};

/// Result of a successful round trip to the store. A missing record is a
/// normal answer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Document),
    NotFound,
}

impl Lookup {
    pub fn into_found(self) -> Option<Document> {
        match self {
            Lookup::Found(document) => Some(document),
            Lookup::NotFound => None,
        }
    }
}

/// Read-only access to the document store.
///
/// Implementations return `StoreError::Unavailable` only when the store could
/// not answer (unreachable, rejected request, undecodable response).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches a record by the store's own document identifier.
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Lookup, StoreError>;

    /// Returns the first record whose `field` equals `value`. Which record is
    /// first among duplicates is up to the store.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Lookup, StoreError>;
}
