//! Slot operations on the active routine.
//!
//! # Invariants
//! - Removing or replacing slots never deletes courses; affected courses are
//!   unassigned (`slot_id = None`).
//! - Slots stay sorted by start time after every insertion.

use crate::model::id::SlotId;
use crate::model::slot::{predefined_slots, slot_label, sort_slots, validate_range, Slot};
use crate::model::state::AppState;
use crate::service::error::{ServiceError, ServiceResult};

/// Why the predefined slots are being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLoadMode {
    /// First-run seeding; the routine has no placed courses yet.
    Bootstrap,
    /// Explicit user action; every course is unassigned.
    UserAction,
}

/// Validates `start`/`end`, appends a `"<start>-<end>"` slot and re-sorts.
pub fn add_slot(state: &mut AppState, start: &str, end: &str) -> ServiceResult<SlotId> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    validate_range(start, end)?;

    let slot = Slot::new(slot_label(start, end));
    let id = slot.id.clone();
    routine.slots.push(slot);
    sort_slots(&mut routine.slots);
    Ok(id)
}

/// Removes a slot and unassigns its courses.
///
/// Returns how many courses were unassigned.
pub fn remove_slot(state: &mut AppState, slot_id: &str) -> ServiceResult<usize> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    let index = routine
        .slots
        .iter()
        .position(|slot| slot.id == slot_id)
        .ok_or_else(|| ServiceError::SlotNotFound(slot_id.to_string()))?;
    routine.slots.remove(index);

    let mut unassigned = 0;
    for course in routine
        .courses
        .iter_mut()
        .filter(|course| course.slot_id.as_deref() == Some(slot_id))
    {
        course.slot_id = None;
        unassigned += 1;
    }
    Ok(unassigned)
}

/// Replaces the active routine's slots with the predefined periods.
///
/// Returns how many courses were unassigned.
pub fn load_predefined_slots(state: &mut AppState, mode: SlotLoadMode) -> ServiceResult<usize> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    routine.slots = predefined_slots();

    if mode == SlotLoadMode::Bootstrap {
        return Ok(0);
    }
    let mut unassigned = 0;
    for course in routine.courses.iter_mut() {
        if course.slot_id.take().is_some() {
            unassigned += 1;
        }
    }
    Ok(unassigned)
}
