//! Confirmation gate for destructive actions.
//!
//! A destructive action is first parked as pending with a prompt; it only
//! runs when the user confirms. Cancelling discards it with no effect.

use crate::model::id::{CourseId, RoutineId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteCourse(CourseId),
    DeleteRoutine(RoutineId),
    /// Replace the active routine's slots with the predefined periods.
    LoadPredefinedSlots,
    /// Wipe every persisted key and start over.
    ClearAllData,
}

impl ConfirmAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::DeleteCourse(_) => "Are you sure you want to delete this course?",
            Self::DeleteRoutine(_) => {
                "Are you sure you want to delete this routine? This action cannot be undone."
            }
            Self::LoadPredefinedSlots => {
                "Are you sure you want to load default slots? This will unassign all courses."
            }
            Self::ClearAllData => {
                "Are you sure you want to clear all local storage data? This will reset the site in this browser."
            }
        }
    }
}

/// Holds at most one pending action. A new request replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    pending: Option<ConfirmAction>,
}

impl ConfirmationGate {
    /// Parks `action` and returns the prompt to show.
    pub fn request(&mut self, action: ConfirmAction) -> &'static str {
        let prompt = action.prompt();
        self.pending = Some(action);
        prompt
    }

    pub fn pending(&self) -> Option<&ConfirmAction> {
        self.pending.as_ref()
    }

    /// Releases the pending action for execution.
    pub fn confirm(&mut self) -> Option<ConfirmAction> {
        self.pending.take()
    }

    /// Discards the pending action; returns it for logging.
    pub fn cancel(&mut self) -> Option<ConfirmAction> {
        self.pending.take()
    }
}
