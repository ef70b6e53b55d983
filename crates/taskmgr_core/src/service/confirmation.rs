//! Two-step confirmation for destructive task operations.
//!
//! A `ConfirmationRequest` is produced by `TaskService::request_*` and must be
//! handed back to `TaskService::confirm` or `TaskService::cancel`. The request
//! is consumed either way, so one proposal can never be applied twice.

use crate::model::task::TaskId;

/// Mutation awaiting user approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteOne(TaskId),
    /// `count` is the number of completed tasks when the request was made.
    ClearCompleted { count: usize },
    ClearAll { count: usize },
}

/// Proposal for a destructive operation.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a confirmation request does nothing until confirmed or cancelled"]
pub struct ConfirmationRequest {
    action: PendingAction,
    prompt: String,
}

impl ConfirmationRequest {
    pub(crate) fn new(action: PendingAction) -> Self {
        let prompt = match action {
            PendingAction::DeleteOne(_) => "Are you sure you want to delete this task?".to_string(),
            PendingAction::ClearCompleted { count } => {
                format!("Delete {count} completed task(s)?")
            }
            PendingAction::ClearAll { .. } => "WARNING: Delete ALL tasks?".to_string(),
        };
        Self { action, prompt }
    }

    pub fn action(&self) -> PendingAction {
        self.action
    }

    /// Question to show the user.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfirmationRequest, PendingAction};
    use crate::model::task::TaskId;

    #[test]
    fn clear_completed_prompt_names_count() {
        let request = ConfirmationRequest::new(PendingAction::ClearCompleted { count: 2 });
        assert_eq!(request.prompt(), "Delete 2 completed task(s)?");
    }

    #[test]
    fn action_is_reported_back() {
        let request = ConfirmationRequest::new(PendingAction::DeleteOne(TaskId::new(9)));
        assert_eq!(request.action(), PendingAction::DeleteOne(TaskId::new(9)));
    }
}
