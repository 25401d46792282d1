//! Identifier generation for routines, slots and courses.

use uuid::Uuid;

/// Opaque routine identifier.
pub type RoutineId = String;
/// Opaque slot identifier, unique within one routine.
pub type SlotId = String;
/// Opaque course identifier, unique within one routine.
pub type CourseId = String;

pub const ROUTINE_ID_PREFIX: &str = "routine_";
pub const SLOT_ID_PREFIX: &str = "slot_";
pub const COURSE_ID_PREFIX: &str = "course_";

/// Generates a fresh id of the form `<prefix><32 hex chars>`.
///
/// Ids loaded from older snapshots keep whatever shape they had; callers
/// must treat ids as opaque.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

pub fn new_routine_id() -> RoutineId {
    new_id(ROUTINE_ID_PREFIX)
}

pub fn new_slot_id() -> SlotId {
    new_id(SLOT_ID_PREFIX)
}

pub fn new_course_id() -> CourseId {
    new_id(COURSE_ID_PREFIX)
}
