//! Course model.
//!
//! # Responsibility
//! - Represent one class placed at a `(day, slot)` coordinate or unassigned.
//! - Normalize user-entered text fields before they reach the state tree.
//!
//! # Invariants
//! - `name`, `section` and `room` are stored trimmed and upper-cased.
//! - `day` is in `0..DAYS_PER_WEEK` with Sunday as `0`.
//! - `raised_at` only ever grows within one routine; higher draws in front.

use crate::model::id::{new_course_id, CourseId, SlotId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DAYS_PER_WEEK: u8 = 7;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const DAY_SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Fallback block color when none was picked.
pub const DEFAULT_COURSE_COLOR: &str = "#7c4dff";

/// Full day name for a `0..7` day index.
pub fn day_name(day: u8) -> Option<&'static str> {
    DAY_NAMES.get(usize::from(day)).copied()
}

/// A class or event in a routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub room: String,
    pub day: u8,
    /// `None` keeps the course out of the grid.
    #[serde(default)]
    pub slot_id: Option<SlotId>,
    #[serde(default = "default_color")]
    pub color: String,
    /// Bring-to-front stamp set by manual placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raised_at: Option<u64>,
}

fn default_color() -> String {
    DEFAULT_COURSE_COLOR.to_string()
}

/// User-entered course fields, as submitted by the add/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFields {
    pub name: String,
    pub section: String,
    pub room: String,
    pub day: u8,
    pub slot_id: Option<SlotId>,
    pub color: String,
}

/// Field-level rejection reasons for course input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    EmptyName,
    InvalidDay(u8),
}

impl Display for CourseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Course name required"),
            Self::InvalidDay(day) => write!(f, "Invalid day index {day}; expected 0..=6"),
        }
    }
}

impl Error for CourseValidationError {}

impl CourseFields {
    /// Trims and upper-cases the free-text fields; blank color falls back to
    /// the default block color.
    pub fn normalized(self) -> Self {
        let color = self.color.trim();
        Self {
            name: normalize_text(&self.name),
            section: normalize_text(&self.section),
            room: normalize_text(&self.room),
            day: self.day,
            slot_id: self.slot_id.filter(|id| !id.trim().is_empty()),
            color: if color.is_empty() {
                default_color()
            } else {
                color.to_string()
            },
        }
    }

    /// Presence and range checks only.
    pub fn validate(&self) -> Result<(), CourseValidationError> {
        if self.name.is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        if self.day >= DAYS_PER_WEEK {
            return Err(CourseValidationError::InvalidDay(self.day));
        }
        Ok(())
    }
}

impl Course {
    /// Creates a course with a fresh id from normalized fields.
    pub fn from_fields(fields: CourseFields) -> Self {
        Self {
            id: new_course_id(),
            name: fields.name,
            section: fields.section,
            room: fields.room,
            day: fields.day,
            slot_id: fields.slot_id,
            color: fields.color,
            raised_at: None,
        }
    }

    /// Overwrites user-editable fields; id and stacking stamp are kept.
    pub fn apply_fields(&mut self, fields: CourseFields) {
        self.name = fields.name;
        self.section = fields.section;
        self.room = fields.room;
        self.day = fields.day;
        self.slot_id = fields.slot_id;
        self.color = fields.color;
    }

    /// Same `(name, section, room, day, slot)` identity as `fields`.
    pub fn same_placement_as(&self, fields: &CourseFields) -> bool {
        self.name == fields.name
            && self.section == fields.section
            && self.room == fields.room
            && self.day == fields.day
            && self.slot_id == fields.slot_id
    }

    /// Whether this course sits at the given grid cell.
    pub fn is_at(&self, day: u8, slot_id: &str) -> bool {
        self.day == day && self.slot_id.as_deref() == Some(slot_id)
    }

    pub fn is_assigned(&self) -> bool {
        self.slot_id.is_some()
    }

    /// Current values as an editable form.
    pub fn to_fields(&self) -> CourseFields {
        CourseFields {
            name: self.name.clone(),
            section: self.section.clone(),
            room: self.room.clone(),
            day: self.day,
            slot_id: self.slot_id.clone(),
            color: self.color.clone(),
        }
    }
}

fn normalize_text(value: &str) -> String {
    value.trim().to_uppercase()
}
