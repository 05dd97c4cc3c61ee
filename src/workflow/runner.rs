// Workflow runner
//
// Drives the state machine strictly sequentially against one state:
// research once, then generate/review cycles until routing terminates.
// A snapshot is emitted after every completed step, before the next one
// starts; a step failure aborts the run but the snapshots emitted so far
// stay in the report.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::completion::CompletionClient;
use crate::search::SearchClient;

use super::error::WorkflowError;
use super::routing::{route_after_review, transition, RouteDecision, Step, Termination};
use super::state::{Snapshot, StepUpdate, WorkflowState, DEFAULT_MAX_REVISIONS};
use super::steps;

/// Parameters for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub task: String,
    pub max_revisions: u32,
}

impl RunRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            max_revisions: DEFAULT_MAX_REVISIONS,
        }
    }

    pub fn with_max_revisions(mut self, max_revisions: u32) -> Self {
        self.max_revisions = max_revisions;
        self
    }
}

/// Everything one run produced. `snapshots` holds every step that
/// completed, in order, whether or not the run finished cleanly.
#[derive(Debug)]
pub struct RunReport {
    /// Correlation token for logs; never drives behavior.
    pub run_id: Uuid,
    pub snapshots: Vec<Snapshot>,
    pub outcome: Result<Termination, WorkflowError>,
}

impl RunReport {
    /// The usable artifact: code from the most recent generate step.
    pub fn final_code(&self) -> Option<&str> {
        self.snapshots.iter().rev().find_map(|s| match &s.update {
            StepUpdate::Generate { code, .. } => Some(code.as_str()),
            _ => None,
        })
    }

    /// The most recent review verdict, if any review completed.
    pub fn final_critique(&self) -> Option<&str> {
        self.snapshots.iter().rev().find_map(|s| match &s.update {
            StepUpdate::Review { critique } => Some(critique.as_str()),
            _ => None,
        })
    }
}

pub struct WorkflowRunner {
    completion: Arc<dyn CompletionClient>,
    search: Arc<dyn SearchClient>,
}

impl WorkflowRunner {
    pub fn new(completion: Arc<dyn CompletionClient>, search: Arc<dyn SearchClient>) -> Self {
        Self { completion, search }
    }

    /// Run the workflow to completion.
    pub async fn run(&self, request: RunRequest) -> RunReport {
        self.run_with_progress(request, None).await
    }

    /// Run the workflow, sending each snapshot through `progress` as soon as
    /// its step completes. A dropped receiver does not fail the run.
    pub async fn run_with_progress(
        &self,
        request: RunRequest,
        progress: Option<mpsc::UnboundedSender<Snapshot>>,
    ) -> RunReport {
        let run_id = Uuid::new_v4();
        let max_revisions = request.max_revisions.max(1);
        let mut state = WorkflowState::new(request.task, max_revisions);
        let mut snapshots: Vec<Snapshot> = Vec::new();
        let mut step = Step::Research;

        tracing::info!(%run_id, max_revisions, "workflow run started");

        loop {
            let update = match self.execute_step(step, &state).await {
                Ok(update) => update,
                Err(err) => {
                    tracing::warn!(%run_id, step = ?step, error = %err, "workflow step failed");
                    return RunReport {
                        run_id,
                        snapshots,
                        outcome: Err(err),
                    };
                }
            };

            state.apply(&update);
            let snapshot = Snapshot::new(update, state.clone());
            if let Some(tx) = progress.as_ref() {
                let _ = tx.send(snapshot.clone());
            }
            snapshots.push(snapshot);

            tracing::info!(
                %run_id,
                step = ?step,
                revision = state.revision_number,
                "workflow step completed"
            );

            let decision = match step {
                Step::Review => Some(route_after_review(
                    state.revision_number,
                    state.max_revisions,
                    &state.critique,
                )),
                _ => None,
            };

            step = transition(step, decision);

            if let Some(RouteDecision::Terminate(reason)) = decision {
                tracing::info!(
                    %run_id,
                    reason = ?reason,
                    steps = snapshots.len(),
                    "workflow run terminated"
                );
                return RunReport {
                    run_id,
                    snapshots,
                    outcome: Ok(reason),
                };
            }
        }
    }

    async fn execute_step(
        &self,
        step: Step,
        state: &WorkflowState,
    ) -> Result<StepUpdate, WorkflowError> {
        match step {
            Step::Research => {
                steps::research(self.completion.as_ref(), self.search.as_ref(), state).await
            }
            Step::Generate => steps::generate(self.completion.as_ref(), state).await,
            Step::Review => steps::review(self.completion.as_ref(), state).await,
            // The run loop returns before transitioning here.
            Step::Terminated => unreachable!("terminated runs are not stepped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_defaults() {
        let request = RunRequest::new("Create an S3 bucket");
        assert_eq!(request.task, "Create an S3 bucket");
        assert_eq!(request.max_revisions, DEFAULT_MAX_REVISIONS);
    }

    #[test]
    fn test_run_request_override() {
        let request = RunRequest::new("task").with_max_revisions(5);
        assert_eq!(request.max_revisions, 5);
    }

    #[test]
    fn test_report_final_code_picks_last_generate() {
        let mut state = WorkflowState::new("task", 3);
        let mut snapshots = Vec::new();
        for (code, rev) in [("v1", 1), ("v2", 2)] {
            let update = StepUpdate::Generate {
                code: code.to_string(),
                revision_number: rev,
                fenced: true,
            };
            state.apply(&update);
            snapshots.push(Snapshot::new(update, state.clone()));
            let review = StepUpdate::Review {
                critique: "Add tags.".to_string(),
            };
            state.apply(&review);
            snapshots.push(Snapshot::new(review, state.clone()));
        }
        let report = RunReport {
            run_id: Uuid::new_v4(),
            snapshots,
            outcome: Ok(Termination::Approved),
        };
        assert_eq!(report.final_code(), Some("v2"));
        assert_eq!(report.final_critique(), Some("Add tags."));
    }

    #[test]
    fn test_report_without_generate_has_no_code() {
        let report = RunReport {
            run_id: Uuid::new_v4(),
            snapshots: vec![],
            outcome: Err(WorkflowError::Decoding("bad".to_string())),
        };
        assert!(report.final_code().is_none());
        assert!(report.final_critique().is_none());
    }
}
