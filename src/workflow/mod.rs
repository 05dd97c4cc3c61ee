// Iterative refinement workflow: research once, then generate and review
// until the reviewer approves or the revision budget runs out.

pub mod error;
pub mod extract;
pub mod prompts;
pub mod routing;
pub mod runner;
pub mod state;
pub mod steps;

pub use error::WorkflowError;
pub use extract::{extract_code_block, ExtractedCode, CODE_FENCE_LANGUAGE};
pub use routing::{is_approved, route_after_review, RouteDecision, Step, Termination, APPROVAL_MARKER};
pub use runner::{RunReport, RunRequest, WorkflowRunner};
pub use state::{Snapshot, StepUpdate, WorkflowState, DEFAULT_MAX_REVISIONS};
