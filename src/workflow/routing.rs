// Routing decision logic
//
// The approval check is an exact substring match on the review text; the
// review prompt is written to satisfy it. Keep the predicate isolated so a
// structured verdict could replace it without touching the state machine.

use serde::Serialize;

/// Marker the reviewer emits to accept the configuration. Case-sensitive.
pub const APPROVAL_MARKER: &str = "The code is valid";

/// Whether a critique accepts the current configuration.
pub fn is_approved(critique: &str) -> bool {
    critique.contains(APPROVAL_MARKER)
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Approved,
    RevisionBudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Loop back for another generate pass.
    Revise,
    Terminate(Termination),
}

/// Decide what follows a review.
///
/// The budget check is strictly-greater and runs after the increment, so
/// generate can run `max_revisions + 1` times before it fires. That boundary
/// is part of the termination contract; tests pin it.
pub fn route_after_review(
    revision_number: u32,
    max_revisions: u32,
    critique: &str,
) -> RouteDecision {
    if revision_number > max_revisions {
        return RouteDecision::Terminate(Termination::RevisionBudgetExhausted);
    }
    if is_approved(critique) {
        return RouteDecision::Terminate(Termination::Approved);
    }
    RouteDecision::Revise
}

/// Workflow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Research,
    Generate,
    Review,
    Terminated,
}

/// Pure transition function. Only Review branches; `route` is ignored (and
/// expected to be None) everywhere else.
pub fn transition(current: Step, route: Option<RouteDecision>) -> Step {
    match (current, route) {
        (Step::Research, _) => Step::Generate,
        (Step::Generate, _) => Step::Review,
        (Step::Review, Some(RouteDecision::Revise)) => Step::Generate,
        (Step::Review, _) => Step::Terminated,
        (Step::Terminated, _) => Step::Terminated,
    }
}
