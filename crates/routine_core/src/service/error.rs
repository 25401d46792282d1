//! Mutation error taxonomy.

use crate::model::course::CourseValidationError;
use crate::model::id::{CourseId, RoutineId, SlotId};
use crate::model::slot::SlotValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// How a failed mutation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User input was rejected; state unchanged, user is told.
    Validation,
    /// Target id no longer exists; silent no-op.
    NotFound,
}

/// Errors returned by mutation operations. State is unchanged on every
/// error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    EmptyRoutineName,
    LastRoutine,
    InvalidSlot(SlotValidationError),
    InvalidCourse(CourseValidationError),
    DuplicateCourse,
    NoActiveRoutine,
    RoutineNotFound(RoutineId),
    SlotNotFound(SlotId),
    CourseNotFound(CourseId),
    NoEditTarget,
    NoDragInProgress,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyRoutineName
            | Self::LastRoutine
            | Self::InvalidSlot(_)
            | Self::InvalidCourse(_)
            | Self::DuplicateCourse => ErrorKind::Validation,
            Self::NoActiveRoutine
            | Self::RoutineNotFound(_)
            | Self::SlotNotFound(_)
            | Self::CourseNotFound(_)
            | Self::NoEditTarget
            | Self::NoDragInProgress => ErrorKind::NotFound,
        }
    }

    /// Short tag for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyRoutineName => "empty_routine_name",
            Self::LastRoutine => "last_routine",
            Self::InvalidSlot(_) => "invalid_slot",
            Self::InvalidCourse(_) => "invalid_course",
            Self::DuplicateCourse => "duplicate_course",
            Self::NoActiveRoutine => "no_active_routine",
            Self::RoutineNotFound(_) => "routine_not_found",
            Self::SlotNotFound(_) => "slot_not_found",
            Self::CourseNotFound(_) => "course_not_found",
            Self::NoEditTarget => "no_edit_target",
            Self::NoDragInProgress => "no_drag",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoutineName => write!(f, "Routine name cannot be empty."),
            Self::LastRoutine => write!(f, "Cannot delete the last routine!"),
            Self::InvalidSlot(err) => write!(f, "{err}"),
            Self::InvalidCourse(err) => write!(f, "{err}"),
            Self::DuplicateCourse => write!(f, "This exact course already exists!"),
            Self::NoActiveRoutine => write!(f, "no active routine"),
            Self::RoutineNotFound(id) => write!(f, "routine not found: {id}"),
            Self::SlotNotFound(id) => write!(f, "slot not found: {id}"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::NoEditTarget => write!(f, "no course is open for editing"),
            Self::NoDragInProgress => write!(f, "no drag in progress"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSlot(err) => Some(err),
            Self::InvalidCourse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SlotValidationError> for ServiceError {
    fn from(value: SlotValidationError) -> Self {
        Self::InvalidSlot(value)
    }
}

impl From<CourseValidationError> for ServiceError {
    fn from(value: CourseValidationError) -> Self {
        Self::InvalidCourse(value)
    }
}
