//! Course operations on the active routine.
//!
//! # Responsibility
//! - Add, edit, remove, copy and move courses.
//! - Recolor courses per distinct name from the active theme.
//!
//! # Invariants
//! - Text fields are normalized before any comparison or write.
//! - A course's `slot_id` always names a slot of its routine, or is `None`.
//! - Co-located courses are legal; only exact duplicates are refused on add.

use crate::model::course::{Course, CourseFields, CourseValidationError, DAYS_PER_WEEK};
use crate::model::id::CourseId;
use crate::model::routine::Routine;
use crate::model::state::AppState;
use crate::model::theme::Theme;
use crate::service::error::{ServiceError, ServiceResult};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Adds a course built from `fields`.
///
/// # Errors
/// - `InvalidCourse` for a blank name or a day outside `0..7`.
/// - `SlotNotFound` when `slot_id` is not a slot of the active routine.
/// - `DuplicateCourse` when an identical `(name, section, room, day, slot)`
///   already exists.
pub fn add_course(state: &mut AppState, fields: CourseFields) -> ServiceResult<CourseId> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    let fields = checked_fields(routine, fields)?;

    if routine
        .courses
        .iter()
        .any(|course| course.same_placement_as(&fields))
    {
        return Err(ServiceError::DuplicateCourse);
    }

    let course = Course::from_fields(fields);
    let id = course.id.clone();
    routine.courses.push(course);
    Ok(id)
}

/// Overwrites a course's fields in place. No duplicate check.
pub fn edit_course(
    state: &mut AppState,
    course_id: &str,
    fields: CourseFields,
) -> ServiceResult<()> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    if routine.course(course_id).is_none() {
        return Err(ServiceError::CourseNotFound(course_id.to_string()));
    }
    let fields = checked_fields(routine, fields)?;

    if let Some(course) = routine.course_mut(course_id) {
        course.apply_fields(fields);
    }
    Ok(())
}

/// Applies `fields` to the course open in the editor, then closes it.
pub fn save_edited_course(state: &mut AppState, fields: CourseFields) -> ServiceResult<CourseId> {
    let course_id = state
        .editing_course_id
        .clone()
        .ok_or(ServiceError::NoEditTarget)?;
    edit_course(state, &course_id, fields)?;
    state.editing_course_id = None;
    Ok(course_id)
}

/// Deletes a course. Clears the editor and drag if they pointed at it.
pub fn remove_course(state: &mut AppState, course_id: &str) -> ServiceResult<Course> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    let index = routine
        .courses
        .iter()
        .position(|course| course.id == course_id)
        .ok_or_else(|| ServiceError::CourseNotFound(course_id.to_string()))?;
    let removed = routine.courses.remove(index);

    if state.editing_course_id.as_deref() == Some(course_id) {
        state.editing_course_id = None;
    }
    if state
        .drag
        .as_ref()
        .is_some_and(|drag| drag.course_id == course_id)
    {
        state.drag = None;
    }
    Ok(removed)
}

/// Appends a copy of a course under a fresh id, same position and fields.
pub fn copy_course(state: &mut AppState, course_id: &str) -> ServiceResult<CourseId> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    let original = routine
        .course(course_id)
        .ok_or_else(|| ServiceError::CourseNotFound(course_id.to_string()))?;

    let mut copy = Course::from_fields(original.to_fields());
    copy.raised_at = original.raised_at;
    let id = copy.id.clone();
    routine.courses.push(copy);
    Ok(id)
}

/// Places a course at `(day, slot_id)` and brings it to the front of that
/// cell's stack. Occupied cells are fine.
///
/// # Errors
/// - `CourseNotFound` / `SlotNotFound` when either id is stale.
/// - `InvalidCourse` when `day` is outside `0..7`.
pub fn move_course(
    state: &mut AppState,
    course_id: &str,
    day: u8,
    slot_id: &str,
) -> ServiceResult<()> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;
    if day >= DAYS_PER_WEEK {
        return Err(CourseValidationError::InvalidDay(day).into());
    }
    if !routine.has_slot(slot_id) {
        return Err(ServiceError::SlotNotFound(slot_id.to_string()));
    }

    let stamp = routine.next_raise_stamp();
    let course = routine
        .course_mut(course_id)
        .ok_or_else(|| ServiceError::CourseNotFound(course_id.to_string()))?;
    course.day = day;
    course.slot_id = Some(slot_id.to_string());
    course.raised_at = Some(stamp);
    Ok(())
}

/// Gives every distinct course name one color from a seeded shuffle of the
/// theme palette, cycling when names outnumber colors.
///
/// Returns the number of distinct names recolored.
pub fn randomize_colors(state: &mut AppState, theme: Theme, seed: u64) -> ServiceResult<usize> {
    let routine = state
        .active_routine_mut()
        .ok_or(ServiceError::NoActiveRoutine)?;

    let mut palette = theme.palette().to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    palette.shuffle(&mut rng);

    let mut colors: HashMap<String, &str> = HashMap::new();
    for course in &routine.courses {
        let next = palette[colors.len() % palette.len()];
        colors.entry(course.name.clone()).or_insert(next);
    }
    for course in routine.courses.iter_mut() {
        if let Some(color) = colors.get(&course.name) {
            course.color = (*color).to_string();
        }
    }
    Ok(colors.len())
}

fn checked_fields(routine: &Routine, fields: CourseFields) -> ServiceResult<CourseFields> {
    let fields = fields.normalized();
    fields.validate()?;
    if let Some(slot_id) = fields.slot_id.as_deref() {
        if !routine.has_slot(slot_id) {
            return Err(ServiceError::SlotNotFound(slot_id.to_string()));
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::{
        add_course, copy_course, edit_course, move_course, randomize_colors, remove_course,
        save_edited_course,
    };
    use crate::model::course::{CourseFields, CourseValidationError};
    use crate::model::routine::Routine;
    use crate::model::slot::Slot;
    use crate::model::state::AppState;
    use crate::model::theme::Theme;
    use crate::service::error::ServiceError;
    use std::collections::HashMap;

    fn state_with_slot() -> (AppState, String) {
        let mut routine = Routine::new("Week");
        let slot = Slot::new("8:00-9:30");
        let slot_id = slot.id.clone();
        routine.slots.push(slot);
        (AppState::with_routine(routine), slot_id)
    }

    fn fields(name: &str, day: u8, slot_id: Option<&str>) -> CourseFields {
        CourseFields {
            name: name.to_string(),
            section: "a".to_string(),
            room: "r1".to_string(),
            day,
            slot_id: slot_id.map(str::to_string),
            color: "#123456".to_string(),
        }
    }

    #[test]
    fn add_normalizes_and_rejects_exact_duplicates() {
        let (mut state, slot) = state_with_slot();
        add_course(&mut state, fields(" cse101 ", 1, Some(&slot))).unwrap();
        assert_eq!(
            add_course(&mut state, fields("CSE101", 1, Some(&slot))),
            Err(ServiceError::DuplicateCourse)
        );
        let routine = state.active_routine().unwrap();
        assert_eq!(routine.courses.len(), 1);
        assert_eq!(routine.courses[0].name, "CSE101");
        assert_eq!(routine.courses[0].section, "A");
    }

    #[test]
    fn add_requires_name_and_known_slot() {
        let (mut state, _) = state_with_slot();
        assert_eq!(
            add_course(&mut state, fields("   ", 1, None)),
            Err(ServiceError::InvalidCourse(CourseValidationError::EmptyName))
        );
        assert!(matches!(
            add_course(&mut state, fields("MAT", 1, Some("slot_gone"))),
            Err(ServiceError::SlotNotFound(_))
        ));
        assert!(state.active_routine().unwrap().courses.is_empty());
    }

    #[test]
    fn edit_overwrites_in_place_and_rejects_blank_name() {
        let (mut state, slot) = state_with_slot();
        let id = add_course(&mut state, fields("PHY", 1, Some(&slot))).unwrap();

        assert!(edit_course(&mut state, &id, fields(" ", 2, None)).is_err());
        assert_eq!(state.active_routine().unwrap().courses[0].day, 1);

        edit_course(&mut state, &id, fields("chem", 3, None)).unwrap();
        let course = &state.active_routine().unwrap().courses[0];
        assert_eq!(course.id, id);
        assert_eq!(course.name, "CHEM");
        assert_eq!(course.day, 3);
        assert_eq!(course.slot_id, None);
    }

    #[test]
    fn save_edited_course_closes_editor() {
        let (mut state, slot) = state_with_slot();
        let id = add_course(&mut state, fields("PHY", 1, Some(&slot))).unwrap();
        assert_eq!(
            save_edited_course(&mut state, fields("PHY", 2, None)),
            Err(ServiceError::NoEditTarget)
        );

        state.editing_course_id = Some(id.clone());
        assert_eq!(save_edited_course(&mut state, fields("PHY", 2, None)), Ok(id));
        assert_eq!(state.editing_course_id, None);
    }

    #[test]
    fn copy_keeps_fields_with_new_id() {
        let (mut state, slot) = state_with_slot();
        let id = add_course(&mut state, fields("BIO", 4, Some(&slot))).unwrap();
        let copy_id = copy_course(&mut state, &id).unwrap();
        assert_ne!(copy_id, id);

        let routine = state.active_routine().unwrap();
        let (original, copy) = (&routine.courses[0], &routine.courses[1]);
        assert_eq!(original.to_fields(), copy.to_fields());
    }

    #[test]
    fn move_allows_colocation_and_raises_moved_course() {
        let (mut state, slot) = state_with_slot();
        let first = add_course(&mut state, fields("A", 1, Some(&slot))).unwrap();
        let second = add_course(&mut state, fields("B", 2, None)).unwrap();

        move_course(&mut state, &second, 1, &slot).unwrap();
        move_course(&mut state, &first, 1, &slot).unwrap();
        let routine = state.active_routine().unwrap();
        assert_eq!(routine.courses_at(1, &slot).count(), 2);
        let stamp = |id: &str| routine.course(id).unwrap().raised_at.unwrap();
        assert!(stamp(&first) > stamp(&second));
    }

    #[test]
    fn move_to_stale_slot_is_not_found() {
        let (mut state, _) = state_with_slot();
        let id = add_course(&mut state, fields("A", 1, None)).unwrap();
        assert!(matches!(
            move_course(&mut state, &id, 1, "slot_gone"),
            Err(ServiceError::SlotNotFound(_))
        ));
    }

    #[test]
    fn remove_clears_editor_target() {
        let (mut state, _) = state_with_slot();
        let id = add_course(&mut state, fields("A", 1, None)).unwrap();
        state.editing_course_id = Some(id.clone());
        remove_course(&mut state, &id).unwrap();
        assert!(state.active_routine().unwrap().courses.is_empty());
        assert_eq!(state.editing_course_id, None);
    }

    #[test]
    fn randomize_gives_one_color_per_name() {
        let (mut state, slot) = state_with_slot();
        add_course(&mut state, fields("A", 1, Some(&slot))).unwrap();
        add_course(&mut state, fields("A", 2, Some(&slot))).unwrap();
        add_course(&mut state, fields("B", 3, None)).unwrap();
        for index in 0..10 {
            add_course(&mut state, fields(&format!("X{index}"), 0, None)).unwrap();
        }

        assert_eq!(randomize_colors(&mut state, Theme::Ocean, 7).unwrap(), 12);
        let mut by_name: HashMap<&str, &str> = HashMap::new();
        for course in &state.active_routine().unwrap().courses {
            let color = by_name.entry(&course.name).or_insert(&course.color);
            assert_eq!(*color, course.color);
            assert!(Theme::Ocean.palette().contains(&course.color.as_str()));
        }
    }

    #[test]
    fn randomize_is_deterministic_for_a_seed() {
        let (mut left, slot) = state_with_slot();
        add_course(&mut left, fields("A", 1, Some(&slot))).unwrap();
        add_course(&mut left, fields("B", 1, Some(&slot))).unwrap();
        let mut right = left.clone();

        randomize_colors(&mut left, Theme::Lemon, 99).unwrap();
        randomize_colors(&mut right, Theme::Lemon, 99).unwrap();
        assert_eq!(left, right);
    }
}
