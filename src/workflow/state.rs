// Workflow state, per-step deltas, and snapshots
//
// Steps never mutate state themselves: each returns a StepUpdate and the
// runner folds it in. That keeps concurrent runs free of shared mutation
// and makes every intermediate state reconstructible from the snapshots.

use serde::Serialize;

/// Default revision budget when the caller does not pick one.
pub const DEFAULT_MAX_REVISIONS: u32 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    /// The user's infrastructure request; fixed for the whole run.
    pub task: String,
    /// Research snippets, append-only.
    pub content: Vec<String>,
    /// Most recent generated configuration.
    pub code: String,
    /// Most recent review verdict; empty until the first review.
    pub critique: String,
    /// Number of completed generate passes.
    pub revision_number: u32,
    /// Revision budget, fixed at run start.
    pub max_revisions: u32,
}

impl WorkflowState {
    pub fn new(task: impl Into<String>, max_revisions: u32) -> Self {
        Self {
            task: task.into(),
            content: Vec::new(),
            code: String::new(),
            critique: String::new(),
            revision_number: 0,
            max_revisions,
        }
    }

    /// Research snippets joined into one prompt block.
    pub fn joined_content(&self) -> String {
        self.content.join("\n\n")
    }

    /// Fold a step's delta into the state.
    pub fn apply(&mut self, update: &StepUpdate) {
        match update {
            StepUpdate::Research { content } => {
                self.content.extend(content.iter().cloned());
            }
            StepUpdate::Generate {
                code,
                revision_number,
                ..
            } => {
                self.code = code.clone();
                self.revision_number = *revision_number;
            }
            StepUpdate::Review { critique } => {
                self.critique = critique.clone();
            }
        }
    }
}

/// The partial update a single step produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepUpdate {
    Research {
        /// Snippets to append, in query order then result order.
        content: Vec<String>,
    },
    Generate {
        code: String,
        revision_number: u32,
        /// Whether the code came from a tagged fence or the whole response.
        fenced: bool,
    },
    Review {
        critique: String,
    },
}

impl StepUpdate {
    pub fn step_name(&self) -> &'static str {
        match self {
            StepUpdate::Research { .. } => "research",
            StepUpdate::Generate { .. } => "generate",
            StepUpdate::Review { .. } => "review",
        }
    }
}

/// One completed step: its delta plus the cumulative state after folding.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub update: StepUpdate,
    pub state: WorkflowState,
}

impl Snapshot {
    pub fn new(update: StepUpdate, state: WorkflowState) -> Self {
        Self { update, state }
    }

    pub fn step_name(&self) -> &'static str {
        self.update.step_name()
    }
}
