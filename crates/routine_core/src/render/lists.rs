//! Side-panel projections: slot options, routine selector, course summary.

use crate::model::course::day_name;
use crate::model::id::{CourseId, RoutineId, SlotId};
use crate::model::state::AppState;
use serde::Serialize;
use std::collections::HashSet;

/// One entry of a slot `<select>` or the slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotOption {
    pub slot_id: SlotId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineOption {
    pub routine_id: RoutineId,
    pub name: String,
    pub active: bool,
}

/// Course list row. One row per distinct `name + section`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// First course with this name and section; target of "copy".
    pub course_id: CourseId,
    pub name: String,
    pub section: String,
    pub color: String,
    pub day_name: &'static str,
    /// `None` when the course is unassigned.
    pub slot_label: Option<String>,
}

impl CourseSummary {
    /// `"<day> · <slot>"`, with "no slot" for unassigned courses.
    pub fn placement(&self) -> String {
        format!(
            "{} · {}",
            self.day_name,
            self.slot_label.as_deref().unwrap_or("no slot")
        )
    }
}

/// Slots of the active routine in grid order.
pub fn slot_options(state: &AppState) -> Vec<SlotOption> {
    state
        .active_routine()
        .map(|routine| {
            routine
                .slots
                .iter()
                .map(|slot| SlotOption {
                    slot_id: slot.id.clone(),
                    label: slot.label.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// All routines in list order with the active one marked.
pub fn routine_options(state: &AppState) -> Vec<RoutineOption> {
    state
        .routines
        .iter()
        .map(|routine| RoutineOption {
            routine_id: routine.id.clone(),
            name: routine.name.clone(),
            active: routine.id == state.active_routine_id,
        })
        .collect()
}

/// Courses of the active routine, deduplicated by `name + section`.
///
/// This is the only place unassigned courses remain reachable.
pub fn course_summaries(state: &AppState) -> Vec<CourseSummary> {
    let Some(routine) = state.active_routine() else {
        return Vec::new();
    };

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    routine
        .courses
        .iter()
        .filter(|course| seen.insert((course.name.as_str(), course.section.as_str())))
        .map(|course| CourseSummary {
            course_id: course.id.clone(),
            name: course.name.clone(),
            section: course.section.clone(),
            color: course.color.clone(),
            day_name: day_name(course.day).unwrap_or("Unknown"),
            slot_label: routine.slot_label_for(course).map(str::to_string),
        })
        .collect()
}
