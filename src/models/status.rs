use std::fmt::{Display, Formatter, Result};

use crate::{
    error::{DispatchError, ValidationError},
    models::notification::DispatchReceipt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Validated,
    DedupeChecked,
    Resolved,
    Rendered,
    Dispatched,
    Rejected,
    Ignored,
    Failed,
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            PipelineState::Received => write!(f, "received"),
            PipelineState::Validated => write!(f, "validated"),
            PipelineState::DedupeChecked => write!(f, "dedupe_checked"),
            PipelineState::Resolved => write!(f, "resolved"),
            PipelineState::Rendered => write!(f, "rendered"),
            PipelineState::Dispatched => write!(f, "dispatched"),
            PipelineState::Rejected => write!(f, "rejected"),
            PipelineState::Ignored => write!(f, "ignored"),
            PipelineState::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal result of one pipeline invocation.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Rejected(ValidationError),
    Ignored,
    Dispatched(DispatchReceipt),
    Failed(DispatchError),
}

impl PipelineOutcome {
    pub fn state(&self) -> PipelineState {
        match self {
            PipelineOutcome::Rejected(_) => PipelineState::Rejected,
            PipelineOutcome::Ignored => PipelineState::Ignored,
            PipelineOutcome::Dispatched(_) => PipelineState::Dispatched,
            PipelineOutcome::Failed(_) => PipelineState::Failed,
        }
    }
}
