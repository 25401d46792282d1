//! Grid projection: the weekly table as a pure function of state.
//!
//! # Invariants
//! - Exactly seven day columns, Sunday first.
//! - One row per slot, in the routine's slot order.
//! - Unassigned courses never appear in the grid.
//! - Co-located courses share one cell as a stack; none is dropped.
//! - Stack order: raised courses first (newest stamp frontmost), then the
//!   rest in entry order. Index 0 is drawn on top.

use crate::model::course::{Course, DAYS_PER_WEEK, DAY_NAMES, DAY_SHORT_NAMES};
use crate::model::id::{CourseId, RoutineId, SlotId};
use crate::model::routine::Routine;
use crate::model::state::AppState;
use serde::Serialize;
use std::cmp::Reverse;

/// Per-layer offset of a stacked block, in CSS pixels.
pub const STACK_OFFSET_PX: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub routine_id: RoutineId,
    pub routine_name: String,
    /// Uniform presentation scale; does not affect the data.
    pub zoom: f64,
    pub days: Vec<DayHeader>,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHeader {
    pub day: u8,
    pub short_name: &'static str,
    pub full_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub slot_id: SlotId,
    pub label: String,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub day: u8,
    pub slot_id: SlotId,
    pub blocks: Vec<CourseBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBlock {
    pub course_id: CourseId,
    pub name: String,
    pub section: String,
    pub room: String,
    pub color: String,
    /// Position in the cell stack; 0 is frontmost.
    pub stack_index: usize,
    /// Top/left offset from the cell origin.
    pub offset_px: u32,
    pub z_index: usize,
    pub stacked: bool,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl GridView {
    /// Cell at `(day, slot_id)`, if that row exists.
    pub fn cell(&self, day: u8, slot_id: &str) -> Option<&GridCell> {
        self.rows
            .iter()
            .find(|row| row.slot_id == slot_id)?
            .cells
            .get(usize::from(day))
    }

    pub fn block_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .map(|cell| cell.blocks.len())
            .sum()
    }
}

/// Projects the active routine. `None` only if the active pointer dangles.
pub fn project_grid(state: &AppState) -> Option<GridView> {
    let routine = state.active_routine()?;
    Some(project_routine(routine, state.zoom))
}

/// Projects one routine at the given zoom.
pub fn project_routine(routine: &Routine, zoom: f64) -> GridView {
    let days = (0..DAYS_PER_WEEK)
        .map(|day| DayHeader {
            day,
            short_name: DAY_SHORT_NAMES[usize::from(day)],
            full_name: DAY_NAMES[usize::from(day)],
        })
        .collect();

    let rows = routine
        .slots
        .iter()
        .map(|slot| GridRow {
            slot_id: slot.id.clone(),
            label: slot.label.clone(),
            cells: (0..DAYS_PER_WEEK)
                .map(|day| GridCell {
                    day,
                    slot_id: slot.id.clone(),
                    blocks: stack_blocks(routine.courses_at(day, &slot.id).collect()),
                })
                .collect(),
        })
        .collect();

    GridView {
        routine_id: routine.id.clone(),
        routine_name: routine.name.clone(),
        zoom,
        days,
        rows,
    }
}

fn stack_blocks(mut courses: Vec<&Course>) -> Vec<CourseBlock> {
    // Stable: unraised courses keep entry order.
    courses.sort_by_key(|course| Reverse(course.raised_at));
    let depth = courses.len();
    let stacked = depth > 1;

    courses
        .into_iter()
        .enumerate()
        .map(|(index, course)| CourseBlock {
            course_id: course.id.clone(),
            name: course.name.clone(),
            section: course.section.clone(),
            room: course.room.clone(),
            color: course.color.clone(),
            stack_index: index,
            offset_px: if stacked {
                STACK_OFFSET_PX * index as u32
            } else {
                0
            },
            z_index: depth - index,
            stacked,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{project_grid, STACK_OFFSET_PX};
    use crate::model::course::{Course, CourseFields};
    use crate::model::routine::Routine;
    use crate::model::slot::Slot;
    use crate::model::state::AppState;

    fn course(name: &str, day: u8, slot_id: Option<&str>) -> Course {
        Course::from_fields(CourseFields {
            name: name.to_string(),
            day,
            slot_id: slot_id.map(str::to_string),
            ..CourseFields::default()
        })
    }

    #[test]
    fn grid_has_seven_columns_and_one_row_per_slot() {
        let mut routine = Routine::new("Week");
        routine.slots.push(Slot::new("8:00-9:30"));
        routine.slots.push(Slot::new("9:40-11:10"));
        let grid = project_grid(&AppState::with_routine(routine)).unwrap();

        assert_eq!(grid.days.len(), 7);
        assert_eq!(grid.days[0].full_name, "Sunday");
        assert_eq!(grid.rows.len(), 2);
        assert!(grid.rows.iter().all(|row| row.cells.len() == 7));
        assert_eq!(grid.rows[1].label, "9:40-11:10");
    }

    #[test]
    fn unassigned_courses_are_not_projected() {
        let mut routine = Routine::new("Week");
        let slot = Slot::new("8:00-9:30");
        let slot_id = slot.id.clone();
        routine.slots.push(slot);
        routine.courses.push(course("A", 1, None));
        routine.courses.push(course("B", 1, Some(&slot_id)));

        let grid = project_grid(&AppState::with_routine(routine)).unwrap();
        assert_eq!(grid.block_count(), 1);
    }

    #[test]
    fn colocated_courses_stack_with_offsets_and_raise_order() {
        let mut routine = Routine::new("Week");
        let slot = Slot::new("8:00-9:30");
        let slot_id = slot.id.clone();
        routine.slots.push(slot);
        let first = course("A", 2, Some(&slot_id));
        let second = course("B", 2, Some(&slot_id));
        let mut third = course("C", 2, Some(&slot_id));
        third.raised_at = Some(4);
        let ids = [first.id.clone(), second.id.clone(), third.id.clone()];
        routine.courses.extend([first, second, third]);

        let grid = project_grid(&AppState::with_routine(routine)).unwrap();
        let cell = grid.cell(2, &slot_id).unwrap();
        let order: Vec<_> = cell.blocks.iter().map(|b| b.course_id.clone()).collect();
        assert_eq!(order, [ids[2].clone(), ids[0].clone(), ids[1].clone()]);
        assert!(cell.blocks.iter().all(|b| b.stacked));
        assert_eq!(cell.blocks[0].z_index, 3);
        assert_eq!(cell.blocks[2].offset_px, 2 * STACK_OFFSET_PX);
    }

    #[test]
    fn single_course_is_not_stacked() {
        let mut routine = Routine::new("Week");
        let slot = Slot::new("8:00-9:30");
        let slot_id = slot.id.clone();
        routine.slots.push(slot);
        routine.courses.push(course("A", 0, Some(&slot_id)));

        let grid = project_grid(&AppState::with_routine(routine)).unwrap();
        let block = &grid.cell(0, &slot_id).unwrap().blocks[0];
        assert!(!block.stacked);
        assert_eq!(block.offset_px, 0);
    }
}
