//! Presentation-state operations: zoom, menu, edit target, drag gesture.
//!
//! These never touch routine contents except `drop_dragged`, which moves the
//! dragged course.

use crate::model::course::Course;
use crate::model::state::{clamp_zoom, AppState, DragGesture, DEFAULT_ZOOM};
use crate::service::course_service::move_course;
use crate::service::error::{ServiceError, ServiceResult};

/// Stores `value` rounded and clamped; returns the stored zoom.
pub fn set_zoom(state: &mut AppState, value: f64) -> f64 {
    state.zoom = clamp_zoom(value);
    state.zoom
}

/// Adjusts zoom by `delta` (the zoom buttons use `±ZOOM_STEP`).
pub fn change_zoom(state: &mut AppState, delta: f64) -> f64 {
    set_zoom(state, state.zoom + delta)
}

pub fn reset_zoom(state: &mut AppState) -> f64 {
    set_zoom(state, DEFAULT_ZOOM)
}

/// Flips the side menu, or forces it to `force`. Returns the new flag.
pub fn toggle_menu(state: &mut AppState, force: Option<bool>) -> bool {
    state.is_menu_open = force.unwrap_or(!state.is_menu_open);
    state.is_menu_open
}

/// Marks a course of the active routine as the edit dialog target.
pub fn open_editor(state: &mut AppState, course_id: &str) -> ServiceResult<()> {
    let routine = state.active_routine().ok_or(ServiceError::NoActiveRoutine)?;
    if routine.course(course_id).is_none() {
        return Err(ServiceError::CourseNotFound(course_id.to_string()));
    }
    state.editing_course_id = Some(course_id.to_string());
    Ok(())
}

pub fn close_editor(state: &mut AppState) {
    state.editing_course_id = None;
}

/// Course currently open in the editor, if it still exists.
pub fn editing_course(state: &AppState) -> Option<&Course> {
    let course_id = state.editing_course_id.as_deref()?;
    state.active_routine()?.course(course_id)
}

/// Starts a pointer drag on a course. Replaces any unfinished gesture.
pub fn begin_drag(
    state: &mut AppState,
    course_id: &str,
    offset_x: f64,
    offset_y: f64,
) -> ServiceResult<()> {
    let routine = state.active_routine().ok_or(ServiceError::NoActiveRoutine)?;
    if routine.course(course_id).is_none() {
        return Err(ServiceError::CourseNotFound(course_id.to_string()));
    }
    state.drag = Some(DragGesture {
        course_id: course_id.to_string(),
        offset_x,
        offset_y,
    });
    Ok(())
}

/// Ends the gesture over a grid cell. The gesture is discarded whether or
/// not the move succeeds.
pub fn drop_dragged(state: &mut AppState, day: u8, slot_id: &str) -> ServiceResult<()> {
    let gesture = state.drag.take().ok_or(ServiceError::NoDragInProgress)?;
    move_course(state, &gesture.course_id, day, slot_id)
}

/// Ends the gesture without a drop target.
pub fn release_drag(state: &mut AppState) -> Option<DragGesture> {
    state.drag.take()
}
