use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid webhook payload")]
    MalformedPayload,

    #[error("Invalid webhook payload")]
    MissingId,

    #[error("Missing required fields: userId or doctorId")]
    MissingReferences,
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Dispatch failed: {0}")]
    Failed(String),
}
