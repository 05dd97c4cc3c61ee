// Workflow error taxonomy

use thiserror::Error;

use crate::completion::CompletionError;
use crate::search::SearchError;

/// Errors that abort a run. Provider failures are surfaced as-is; a
/// structured-output schema violation during research is fatal and never
/// retried. Snapshots emitted before the failure stay valid.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Structured decoding failed: {0}")]
    Decoding(String),

    #[error("Completion provider error: {0}")]
    Completion(CompletionError),

    #[error("Search provider error: {0}")]
    Search(#[from] SearchError),
}

impl From<CompletionError> for WorkflowError {
    fn from(e: CompletionError) -> Self {
        match e {
            // Schema violations keep their identity through the wrapper
            CompletionError::Decoding(msg) => WorkflowError::Decoding(msg),
            other => WorkflowError::Completion(other),
        }
    }
}

impl WorkflowError {
    pub fn is_decoding(&self) -> bool {
        matches!(self, WorkflowError::Decoding(_))
    }
}
