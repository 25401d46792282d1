//! Application state tree.
//!
//! # Responsibility
//! - Own every routine plus the UI-transient fields (active routine, zoom,
//!   edit target, menu flag, drag gesture).
//! - Define the persisted snapshot shape and its tolerant decoding.
//!
//! # Invariants
//! - `routines` is never empty once constructed.
//! - `active_routine_id` names a routine in `routines`.
//! - `zoom` stays within `[MIN_ZOOM, MAX_ZOOM]`.
//! - `drag` is never persisted.

use crate::model::id::{CourseId, RoutineId};
use crate::model::routine::Routine;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.6;
pub const MAX_ZOOM: f64 = 1.6;
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Name given to the routine created on first run.
pub const DEFAULT_ROUTINE_NAME: &str = "My Routine";

/// Pointer-drag gesture in progress. Lives only between press and release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub course_id: CourseId,
    /// Pointer offset inside the dragged block, in CSS pixels.
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub routines: Vec<Routine>,
    pub active_routine_id: RoutineId,
    pub zoom: f64,
    pub editing_course_id: Option<CourseId>,
    pub is_menu_open: bool,
    #[serde(skip)]
    pub drag: Option<DragGesture>,
}

/// Wire shape of a stored snapshot. Every field is optional so partially
/// written or older snapshots still decode.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    routines: Vec<Routine>,
    #[serde(default)]
    active_routine_id: Option<RoutineId>,
    #[serde(default)]
    zoom: Option<f64>,
    #[serde(default)]
    editing_course_id: Option<CourseId>,
    #[serde(default)]
    is_menu_open: Option<bool>,
}

impl AppState {
    /// Fresh state holding one empty routine, which is active.
    pub fn with_routine(routine: Routine) -> Self {
        Self {
            active_routine_id: routine.id.clone(),
            routines: vec![routine],
            zoom: DEFAULT_ZOOM,
            editing_course_id: None,
            is_menu_open: true,
            drag: None,
        }
    }

    /// Decodes a stored JSON snapshot.
    ///
    /// Returns `None` for unparsable JSON or a snapshot with zero routines;
    /// callers treat both as "no snapshot".
    pub fn from_json(json: &str) -> Option<Self> {
        let persisted: PersistedState = serde_json::from_str(json).ok()?;
        if persisted.routines.is_empty() {
            return None;
        }

        let active_routine_id = persisted
            .active_routine_id
            .filter(|id| persisted.routines.iter().any(|routine| &routine.id == id))
            .unwrap_or_else(|| persisted.routines[0].id.clone());
        let zoom = match persisted.zoom {
            Some(zoom) if zoom != 0.0 => clamp_zoom(zoom),
            _ => DEFAULT_ZOOM,
        };

        Some(Self {
            routines: persisted.routines,
            active_routine_id,
            zoom,
            editing_course_id: persisted.editing_course_id,
            is_menu_open: persisted.is_menu_open.unwrap_or(true),
            drag: None,
        })
    }

    /// Encodes the full snapshot, drag state excluded.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn routine(&self, routine_id: &str) -> Option<&Routine> {
        self.routines.iter().find(|routine| routine.id == routine_id)
    }

    pub fn active_routine(&self) -> Option<&Routine> {
        self.routine(&self.active_routine_id)
    }

    pub fn active_routine_mut(&mut self) -> Option<&mut Routine> {
        let active = self.active_routine_id.as_str();
        self.routines.iter_mut().find(|routine| routine.id == active)
    }
}

/// Rounds to two decimals and clamps into `[MIN_ZOOM, MAX_ZOOM]`.
///
/// Non-finite input resets to `DEFAULT_ZOOM`.
pub fn clamp_zoom(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_ZOOM;
    }
    let rounded = (value * 100.0).round() / 100.0;
    rounded.clamp(MIN_ZOOM, MAX_ZOOM)
}
