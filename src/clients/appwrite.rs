use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    clients::store::{Lookup, RecordStore},
    config::Config,
    error::StoreError,
    models::document::Document,
};

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

/// Record store backed by the Appwrite databases REST API.
pub struct AppwriteClient {
    http_client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
}

impl AppwriteClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(
            endpoint = %config.appwrite_endpoint,
            project_id = %config.appwrite_project,
            database_id = %config.db_id,
            "Record store client initialized"
        );

        Ok(Self {
            http_client,
            endpoint: config.appwrite_endpoint.trim_end_matches('/').to_string(),
            project_id: config.appwrite_project.clone(),
            api_key: config.appwrite_key.clone(),
            database_id: config.db_id.clone(),
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, collection
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.documents_url(collection))
            .map_err(|e| StoreError::Unavailable(format!("Invalid store endpoint: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("Invalid store endpoint".to_string()))?
            .push(id);

        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }
}

#[async_trait]
impl RecordStore for AppwriteClient {
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Lookup, StoreError> {
        let url = self.document_url(collection, id)?;

        debug!(collection, document_id = id, "Fetching document by id");

        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "Store returned status {}: {}",
                status, error_text
            )));
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to parse document: {}", e)))?;

        Ok(Lookup::Found(document))
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Lookup, StoreError> {
        let equal = json!({"method": "equal", "attribute": field, "values": [value]});
        let limit = json!({"method": "limit", "values": [1]});

        debug!(collection, field, value, "Querying documents by field");

        let response = self
            .authorized(self.http_client.get(self.documents_url(collection)))
            .query(&[("queries[]", equal.to_string()), ("queries[]", limit.to_string())])
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "Store returned status {}: {}",
                status, error_text
            )));
        }

        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to parse document list: {}", e)))?;

        Ok(list
            .documents
            .into_iter()
            .next()
            .map(Lookup::Found)
            .unwrap_or(Lookup::NotFound))
    }
}
