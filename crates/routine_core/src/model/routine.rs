//! Routine aggregate: one independent timetable.
//!
//! # Invariants
//! - Slots and courses are owned exclusively by their routine.
//! - Slot order is the grid row order.

use crate::model::course::Course;
use crate::model::id::{new_routine_id, RoutineId};
use crate::model::slot::Slot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: RoutineId,
    pub name: String,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Routine {
    /// Creates an empty routine with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_routine_id(),
            name: name.into(),
            slots: Vec::new(),
            courses: Vec::new(),
        }
    }

    pub fn slot(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == slot_id)
    }

    pub fn has_slot(&self, slot_id: &str) -> bool {
        self.slot(slot_id).is_some()
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == course_id)
    }

    pub fn course_mut(&mut self, course_id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|course| course.id == course_id)
    }

    /// Courses at one grid cell, in entry order.
    pub fn courses_at<'a>(
        &'a self,
        day: u8,
        slot_id: &'a str,
    ) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses
            .iter()
            .filter(move |course| course.is_at(day, slot_id))
    }

    /// Label of the slot a course sits in, if any.
    pub fn slot_label_for(&self, course: &Course) -> Option<&str> {
        course
            .slot_id
            .as_deref()
            .and_then(|slot_id| self.slot(slot_id))
            .map(|slot| slot.label.as_str())
    }

    /// Next bring-to-front stamp: one above every stamp in use.
    pub fn next_raise_stamp(&self) -> u64 {
        self.courses
            .iter()
            .filter_map(|course| course.raised_at)
            .max()
            .map_or(1, |stamp| stamp.saturating_add(1))
    }
}
