//! Routine lifecycle operations.
//!
//! # Invariants
//! - The routine list never becomes empty.
//! - Whenever the active routine changes, the edit target and any drag
//!   gesture are dropped, since both refer to the previous routine.

use crate::model::id::RoutineId;
use crate::model::routine::Routine;
use crate::model::state::AppState;
use crate::service::error::{ServiceError, ServiceResult};

/// Appends an empty routine and makes it active.
///
/// # Errors
/// - `EmptyRoutineName` when `name` is blank after trim.
pub fn create_routine(state: &mut AppState, name: &str) -> ServiceResult<RoutineId> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::EmptyRoutineName);
    }

    let routine = Routine::new(name);
    let id = routine.id.clone();
    state.routines.push(routine);
    activate(state, id.clone());
    Ok(id)
}

/// Points the active routine at `routine_id`.
pub fn switch_routine(state: &mut AppState, routine_id: &str) -> ServiceResult<()> {
    if state.routine(routine_id).is_none() {
        return Err(ServiceError::RoutineNotFound(routine_id.to_string()));
    }
    if state.active_routine_id != routine_id {
        activate(state, routine_id.to_string());
    }
    Ok(())
}

/// Removes a routine; the first remaining one becomes active when the
/// deleted routine was active.
///
/// # Errors
/// - `LastRoutine` when only one routine exists, regardless of `routine_id`.
/// - `RoutineNotFound` when no routine has `routine_id`.
pub fn delete_routine(state: &mut AppState, routine_id: &str) -> ServiceResult<Routine> {
    if state.routines.len() <= 1 {
        return Err(ServiceError::LastRoutine);
    }
    let index = state
        .routines
        .iter()
        .position(|routine| routine.id == routine_id)
        .ok_or_else(|| ServiceError::RoutineNotFound(routine_id.to_string()))?;

    let removed = state.routines.remove(index);
    if state.active_routine_id == removed.id {
        let next = state.routines[0].id.clone();
        activate(state, next);
    }
    Ok(removed)
}

/// Sets the active routine's display name verbatim. Blank names are kept;
/// export falls back to a generic file name for them.
pub fn rename_active_routine(state: &mut AppState, name: &str) -> ServiceResult<()> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    routine.name = name.to_string();
    Ok(())
}

fn activate(state: &mut AppState, routine_id: RoutineId) {
    state.active_routine_id = routine_id;
    state.editing_course_id = None;
    state.drag = None;
}

#[cfg(test)]
mod tests {
    use super::{create_routine, delete_routine, rename_active_routine, switch_routine};
    use crate::model::routine::Routine;
    use crate::model::state::AppState;
    use crate::service::error::ServiceError;

    fn state() -> AppState {
        AppState::with_routine(Routine::new("First"))
    }

    #[test]
    fn create_appends_and_activates() {
        let mut state = state();
        let id = create_routine(&mut state, "  Second ").unwrap();
        assert_eq!(state.routines.len(), 2);
        assert_eq!(state.active_routine_id, id);
        assert_eq!(state.active_routine().unwrap().name, "Second");
    }

    #[test]
    fn create_rejects_blank_name_and_allows_duplicates() {
        let mut state = state();
        assert_eq!(
            create_routine(&mut state, "   "),
            Err(ServiceError::EmptyRoutineName)
        );
        create_routine(&mut state, "First").unwrap();
        assert_eq!(state.routines.len(), 2);
    }

    #[test]
    fn switch_to_unknown_id_changes_nothing() {
        let mut state = state();
        let before = state.clone();
        assert!(matches!(
            switch_routine(&mut state, "routine_missing"),
            Err(ServiceError::RoutineNotFound(_))
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn switch_clears_editor_target() {
        let mut state = state();
        let first = state.active_routine_id.clone();
        create_routine(&mut state, "Second").unwrap();
        state.editing_course_id = Some("course_x".to_string());
        switch_routine(&mut state, &first).unwrap();
        assert_eq!(state.active_routine_id, first);
        assert_eq!(state.editing_course_id, None);
    }

    #[test]
    fn deleting_last_routine_is_refused() {
        let mut state = state();
        let id = state.active_routine_id.clone();
        assert_eq!(
            delete_routine(&mut state, &id),
            Err(ServiceError::LastRoutine)
        );
        assert_eq!(state.routines.len(), 1);
    }

    #[test]
    fn deleting_active_routine_activates_first_remaining() {
        let mut state = state();
        let first = state.active_routine_id.clone();
        let second = create_routine(&mut state, "Second").unwrap();
        let third = create_routine(&mut state, "Third").unwrap();

        delete_routine(&mut state, &third).unwrap();
        assert_eq!(state.active_routine_id, first);

        switch_routine(&mut state, &second).unwrap();
        delete_routine(&mut state, &first).unwrap();
        assert_eq!(state.active_routine_id, second);
        assert_eq!(state.routines.len(), 1);
    }

    #[test]
    fn rename_keeps_raw_text() {
        let mut state = state();
        rename_active_routine(&mut state, "Spring 2026 ").unwrap();
        assert_eq!(state.active_routine().unwrap().name, "Spring 2026 ");
    }
}
