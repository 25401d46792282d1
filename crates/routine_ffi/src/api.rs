//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose use-case level timetable functions to Dart via FRB.
//! - Open the store, run one session operation and persist, per call.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Destructive calls are invoked after the UI has confirmed with the user;
//!   they still pass through the session's confirmation gate.
//! - Projections are returned as JSON strings with camelCase keys.

use routine_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_db,
    ping as ping_inner, write_artifact, AppConfig, ConfirmOutcome, CourseFields, ExportFormat,
    ResvgBackend, ServiceResult, SqliteKeyValueStore, Theme, TimetableSession,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const STORE_FILE_NAME: &str = "routine_planner.sqlite3";
const STORE_PATH_ENV: &str = "ROUTINE_STORE_PATH";
static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();

type Session<'a> = TimetableSession<&'a SqliteKeyValueStore<'a>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// `log_dir` must be absolute. Returns an empty string on success and the
/// error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), Some(log_dir.as_str())) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for mutation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineActionResponse {
    pub ok: bool,
    /// Id of the created entity, when the call creates one.
    pub entity_id: Option<String>,
    /// Notification text to show; empty for silent outcomes.
    pub message: String,
}

impl RoutineActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entity_id: None,
            message: message.into(),
        }
    }
}

/// Course input as entered in the course dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInput {
    pub name: String,
    pub section: String,
    pub room: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day: u8,
    pub slot_id: Option<String>,
    pub color: String,
}

impl From<CourseInput> for CourseFields {
    fn from(value: CourseInput) -> Self {
        Self {
            name: value.name,
            section: value.section,
            room: value.room,
            day: value.day,
            slot_id: value.slot_id,
            color: value.color,
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn routine_create(name: String) -> RoutineActionResponse {
    run_action(|session| session.create_routine(&name).map(Some))
}

#[flutter_rust_bridge::frb(sync)]
pub fn routine_switch(routine_id: String) -> RoutineActionResponse {
    run_action(|session| session.switch_routine(&routine_id).map(|()| None))
}

#[flutter_rust_bridge::frb(sync)]
pub fn routine_rename(name: String) -> RoutineActionResponse {
    run_action(|session| session.rename_active_routine(&name).map(|()| None))
}

/// Deletes a routine. Call after the user confirmed the prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_delete(routine_id: String) -> RoutineActionResponse {
    run_confirmed(|session| {
        session.request_delete_routine(&routine_id);
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn slot_add(start: String, end: String) -> RoutineActionResponse {
    run_action(|session| session.add_slot(&start, &end).map(Some))
}

#[flutter_rust_bridge::frb(sync)]
pub fn slot_remove(slot_id: String) -> RoutineActionResponse {
    run_action(|session| session.remove_slot(&slot_id).map(|_| None))
}

/// Replaces slots with the predefined periods. Call after confirmation.
#[flutter_rust_bridge::frb(sync)]
pub fn slots_load_predefined() -> RoutineActionResponse {
    run_confirmed(|session| {
        session.request_load_predefined_slots();
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_add(input: CourseInput) -> RoutineActionResponse {
    run_action(|session| session.add_course(input.into()).map(Some))
}

/// Overwrites a course with the edit dialog's values.
#[flutter_rust_bridge::frb(sync)]
pub fn course_update(course_id: String, input: CourseInput) -> RoutineActionResponse {
    run_action(|session| {
        session
            .edit_course(&course_id, input.into())
            .map(|()| Some(course_id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_copy(course_id: String) -> RoutineActionResponse {
    run_action(|session| session.copy_course(&course_id).map(Some))
}

/// Deletes a course. Call after the user confirmed the prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn course_delete(course_id: String) -> RoutineActionResponse {
    run_confirmed(|session| {
        session.request_delete_course(&course_id);
    })
}

/// Completes a drag of `course_id` onto `(day, slot_id)`.
#[flutter_rust_bridge::frb(sync)]
pub fn course_move(course_id: String, day: u8, slot_id: String) -> RoutineActionResponse {
    run_action(|session| {
        session.begin_drag(&course_id, 0.0, 0.0)?;
        session.drop_on(day, &slot_id).map(|()| None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn colors_randomize() -> RoutineActionResponse {
    run_action(|session| session.randomize_colors().map(|_| None))
}

/// Stores a new zoom; returns the stored (clamped) value, or 1.0 when the
/// store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn zoom_set(value: f64) -> f64 {
    with_session(|session| session.set_zoom(value)).unwrap_or(1.0)
}

#[flutter_rust_bridge::frb(sync)]
pub fn menu_toggle(force: Option<bool>) -> bool {
    with_session(|session| session.toggle_menu(force)).unwrap_or(true)
}

/// Selects a palette by name. Unknown names fall back to the default.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(name: String) -> String {
    let theme = Theme::parse(&name).unwrap_or_default();
    match with_session(|session| session.set_theme(theme)) {
        Ok(()) => theme.as_str().to_string(),
        Err(err) => err,
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn theme_get() -> String {
    with_session(|session| session.theme().as_str().to_string())
        .unwrap_or_else(|_| Theme::default().as_str().to_string())
}

/// Wipes all stored data and returns to the first-run routine.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_all_data() -> RoutineActionResponse {
    run_confirmed(|session| {
        session.request_clear_all();
    })
}

/// Full snapshot as persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn state_json() -> String {
    projection_json(|session| session.state().to_json())
}

/// Weekly grid of the active routine.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_json() -> String {
    projection_json(|session| serde_json::to_string(&session.grid()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn routine_options_json() -> String {
    projection_json(|session| serde_json::to_string(&session.routine_options()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn slot_options_json() -> String {
    projection_json(|session| serde_json::to_string(&session.slot_options()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_summaries_json() -> String {
    projection_json(|session| serde_json::to_string(&session.course_summaries()))
}

/// Writes an SVG capture of the active routine into `out_dir`.
///
/// Returns the written path as `entity_id` on success.
#[flutter_rust_bridge::frb(sync)]
pub fn export_svg(out_dir: String) -> RoutineActionResponse {
    export_to(ExportFormat::Svg, &out_dir)
}

/// Writes a PNG capture at the configured scale into `out_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn export_png(out_dir: String) -> RoutineActionResponse {
    export_to(ExportFormat::Png, &out_dir)
}

/// Writes a one-page PDF capture into `out_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn export_pdf(out_dir: String) -> RoutineActionResponse {
    export_to(ExportFormat::Pdf, &out_dir)
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_FILE_NAME)
        })
        .clone()
}

fn with_session<T>(f: impl FnOnce(&mut Session<'_>) -> T) -> Result<T, String> {
    let conn =
        open_db(resolve_store_path()).map_err(|err| format!("store open failed: {err}"))?;
    let store = SqliteKeyValueStore::new(&conn);
    let mut session = TimetableSession::open(&store, &AppConfig::default());
    Ok(f(&mut session))
}

fn run_action(
    f: impl FnOnce(&mut Session<'_>) -> ServiceResult<Option<String>>,
) -> RoutineActionResponse {
    let outcome = with_session(|session| {
        let result = f(session);
        (result, latest_message(session))
    });
    match outcome {
        Ok((Ok(entity_id), message)) => RoutineActionResponse {
            ok: true,
            entity_id,
            message,
        },
        // Not-found outcomes queue no notification and stay silent.
        Ok((Err(_), message)) => RoutineActionResponse::failure(message),
        Err(err) => RoutineActionResponse::failure(err),
    }
}

fn run_confirmed(request: impl FnOnce(&mut Session<'_>)) -> RoutineActionResponse {
    let outcome = with_session(|session| {
        request(session);
        let outcome = session.confirm();
        (outcome, latest_message(session))
    });
    match outcome {
        Ok((ConfirmOutcome::Applied(_), message)) => RoutineActionResponse {
            ok: true,
            entity_id: None,
            message,
        },
        Ok((ConfirmOutcome::Rejected(..), message)) => RoutineActionResponse::failure(message),
        Ok((ConfirmOutcome::Idle, _)) => RoutineActionResponse::failure(""),
        Err(err) => RoutineActionResponse::failure(err),
    }
}

fn export_to(format: ExportFormat, out_dir: &str) -> RoutineActionResponse {
    let backend = ResvgBackend::new();
    let outcome = with_session(|session| {
        let artifact = session.export(format, Some(&backend));
        let message = latest_message(session);
        (artifact, message)
    });
    match outcome {
        Ok((Some(artifact), message)) => match write_artifact(Path::new(out_dir), &artifact) {
            Ok(path) => RoutineActionResponse {
                ok: true,
                entity_id: Some(path.display().to_string()),
                message,
            },
            Err(err) => {
                log::error!(
                    "event=export_write module=ffi status=error format={} error={err}",
                    format.extension()
                );
                RoutineActionResponse::failure(format!("Failed to export {}.", format.label()))
            }
        },
        Ok((None, message)) => RoutineActionResponse::failure(message),
        Err(err) => RoutineActionResponse::failure(err),
    }
}

fn projection_json(f: impl FnOnce(&Session<'_>) -> serde_json::Result<String>) -> String {
    match with_session(|session| f(&*session)) {
        Ok(Ok(json)) => json,
        Ok(Err(err)) => {
            log::error!("event=projection module=ffi status=error error={err}");
            "null".to_string()
        }
        Err(err) => {
            log::error!("event=projection module=ffi status=error error={err}");
            "null".to_string()
        }
    }
}

/// Message of the newest notification from this call, or empty.
fn latest_message(session: &Session<'_>) -> String {
    session
        .notices()
        .latest()
        .map(|notice| notice.message.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, course_add, course_delete, course_update, export_pdf, export_png,
        grid_json, init_logging, ping, routine_delete, slot_add, state_json, zoom_set,
        CourseInput,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn slot_validation_message_reaches_caller() {
        let response = slot_add("11:00".to_string(), "10:00".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "End time must be after start time.");
    }

    // One test drives every stored mutation; calls share the store file.
    #[test]
    fn course_lifecycle_through_store() {
        let slot = slot_add("6:00".to_string(), "6:45".to_string());
        assert!(slot.ok, "{}", slot.message);
        assert_eq!(slot.message, "New slot added!");
        let slot_id = slot.entity_id.unwrap();

        let added = course_add(CourseInput {
            name: "ffi lab".to_string(),
            section: "z".to_string(),
            room: String::new(),
            day: 6,
            slot_id: Some(slot_id.clone()),
            color: String::new(),
        });
        assert!(added.ok, "{}", added.message);
        let course_id = added.entity_id.unwrap();
        assert!(grid_json().contains(&course_id));

        let before = state_json();
        let rejected = course_update(
            course_id.clone(),
            CourseInput {
                name: " ".to_string(),
                section: "z".to_string(),
                room: String::new(),
                day: 6,
                slot_id: Some(slot_id.clone()),
                color: String::new(),
            },
        );
        assert!(!rejected.ok);
        assert_eq!(state_json(), before);
        assert!(before.contains("\"editingCourseId\":null"));

        let updated = course_update(
            course_id.clone(),
            CourseInput {
                name: "ffi lab".to_string(),
                section: "z".to_string(),
                room: "b12".to_string(),
                day: 6,
                slot_id: Some(slot_id.clone()),
                color: String::new(),
            },
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.entity_id.as_deref(), Some(course_id.as_str()));
        assert!(state_json().contains("B12"));

        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().display().to_string();
        let png = export_png(out.clone());
        assert!(png.ok, "{}", png.message);
        let png_bytes = std::fs::read(png.entity_id.unwrap()).unwrap();
        assert!(png_bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        let pdf = export_pdf(out);
        assert!(pdf.ok, "{}", pdf.message);
        assert!(std::fs::read(pdf.entity_id.unwrap()).unwrap().starts_with(b"%PDF"));

        let deleted = course_delete(course_id.clone());
        assert!(deleted.ok);
        assert_eq!(deleted.message, "Course deleted!");
        assert!(!grid_json().contains(&course_id));

        assert_eq!(zoom_set(9.0), 1.6);
        assert!(!routine_delete("routine_missing".to_string()).ok);
    }
}
