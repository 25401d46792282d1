//! Interactive session: one owned state, persisted after every change.
//!
//! # Responsibility
//! - Own the application state and theme for one local profile.
//! - Persist the full snapshot after every successful mutation.
//! - Turn outcomes into notifications: success and validation messages are
//!   shown, not-found targets are silent.
//! - Route destructive actions through the confirmation gate.
//!
//! # Invariants
//! - A failed mutation is neither persisted nor announced as success.
//! - Save failures are logged and never surfaced to the user.
//! - Export never mutates state.

use crate::config::AppConfig;
use crate::confirm::{ConfirmAction, ConfirmationGate};
use crate::export::{export_active, ExportArtifact, ExportFormat, ExportOptions, RasterBackend};
use crate::model::course::{Course, CourseFields};
use crate::model::id::{CourseId, RoutineId, SlotId};
use crate::model::state::AppState;
use crate::model::theme::Theme;
use crate::notify::{NoticeLevel, NotificationQueue};
use crate::render::grid::{project_grid, GridView};
use crate::render::lists::{
    course_summaries, routine_options, slot_options, CourseSummary, RoutineOption, SlotOption,
};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::snapshot::{load_state, load_theme, save_state, save_theme};
use crate::service::bootstrap::BootstrapOptions;
use crate::service::error::{ErrorKind, ServiceError, ServiceResult};
use crate::service::{course_service, routine_service, slot_service, view_service};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// What `confirm` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Nothing was pending.
    Idle,
    Applied(ConfirmAction),
    /// The action ran but its target was gone or it was refused.
    Rejected(ConfirmAction, ServiceError),
}

pub struct TimetableSession<S: KeyValueStore> {
    store: S,
    state: AppState,
    theme: Theme,
    notices: NotificationQueue,
    gate: ConfirmationGate,
    bootstrap: BootstrapOptions,
    export_options: ExportOptions,
    color_rng: ChaCha8Rng,
}

impl<S: KeyValueStore> TimetableSession<S> {
    /// Loads state and theme from `store` using the settings in `config`.
    pub fn open(store: S, config: &AppConfig) -> Self {
        Self::with_options(
            store,
            config.bootstrap_options(),
            config.notification_ttl(),
            config.export.clone(),
        )
    }

    pub fn with_options(
        store: S,
        bootstrap: BootstrapOptions,
        notification_ttl: Duration,
        export_options: ExportOptions,
    ) -> Self {
        let state = load_state(&store, || bootstrap.first_run_state());
        let theme = load_theme(&store);
        info!(
            "event=session_open module=session status=ok routines={} theme={}",
            state.routines.len(),
            theme
        );
        Self {
            store,
            state,
            theme,
            notices: NotificationQueue::new(notification_ttl),
            gate: ConfirmationGate::default(),
            bootstrap,
            export_options,
            color_rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Makes color randomization reproducible.
    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn notices(&self) -> &NotificationQueue {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notices
    }

    pub fn pending_confirmation(&self) -> Option<&ConfirmAction> {
        self.gate.pending()
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.export_options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Routines

    pub fn create_routine(&mut self, name: &str) -> ServiceResult<RoutineId> {
        let result = routine_service::create_routine(&mut self.state, name);
        self.commit("create_routine", result, |_| {
            Some("New routine created!".to_string())
        })
    }

    pub fn switch_routine(&mut self, routine_id: &str) -> ServiceResult<()> {
        let result = routine_service::switch_routine(&mut self.state, routine_id);
        let name = self.state.routine(routine_id).map(|r| r.name.clone());
        self.commit("switch_routine", result, |_| {
            name.map(|name| format!("Switched to routine: {name}"))
        })
    }

    pub fn rename_active_routine(&mut self, name: &str) -> ServiceResult<()> {
        let result = routine_service::rename_active_routine(&mut self.state, name);
        self.commit("rename_routine", result, |_| None)
    }

    pub fn request_delete_routine(&mut self, routine_id: &str) -> &'static str {
        self.gate
            .request(ConfirmAction::DeleteRoutine(routine_id.to_string()))
    }

    // Slots

    pub fn add_slot(&mut self, start: &str, end: &str) -> ServiceResult<SlotId> {
        let result = slot_service::add_slot(&mut self.state, start, end);
        self.commit("add_slot", result, |_| Some("New slot added!".to_string()))
    }

    pub fn remove_slot(&mut self, slot_id: &str) -> ServiceResult<usize> {
        let result = slot_service::remove_slot(&mut self.state, slot_id);
        self.commit("remove_slot", result, |_| Some("Slot removed.".to_string()))
    }

    pub fn request_load_predefined_slots(&mut self) -> &'static str {
        self.gate.request(ConfirmAction::LoadPredefinedSlots)
    }

    // Courses

    pub fn add_course(&mut self, fields: CourseFields) -> ServiceResult<CourseId> {
        let result = course_service::add_course(&mut self.state, fields);
        self.commit("add_course", result, |_| {
            Some("Course added to timetable!".to_string())
        })
    }

    pub fn open_editor(&mut self, course_id: &str) -> ServiceResult<()> {
        let result = view_service::open_editor(&mut self.state, course_id);
        self.commit("open_editor", result, |_| None)
    }

    pub fn close_editor(&mut self) {
        view_service::close_editor(&mut self.state);
        self.persist("close_editor");
    }

    pub fn editing_course(&self) -> Option<&Course> {
        view_service::editing_course(&self.state)
    }

    pub fn save_edited_course(&mut self, fields: CourseFields) -> ServiceResult<CourseId> {
        let result = course_service::save_edited_course(&mut self.state, fields);
        self.commit("edit_course", result, |_| Some("Course updated!".to_string()))
    }

    /// Edits `course_id` in place without going through the editor, so a
    /// rejected edit leaves no editor state behind.
    pub fn edit_course(&mut self, course_id: &str, fields: CourseFields) -> ServiceResult<()> {
        let result = course_service::edit_course(&mut self.state, course_id, fields);
        self.commit("edit_course", result, |_| Some("Course updated!".to_string()))
    }

    pub fn copy_course(&mut self, course_id: &str) -> ServiceResult<CourseId> {
        let result = course_service::copy_course(&mut self.state, course_id);
        self.commit("copy_course", result, |_| {
            Some("Course copied to timetable!".to_string())
        })
    }

    pub fn request_delete_course(&mut self, course_id: &str) -> &'static str {
        self.gate
            .request(ConfirmAction::DeleteCourse(course_id.to_string()))
    }

    /// Recolors courses per distinct name from the current theme.
    pub fn randomize_colors(&mut self) -> ServiceResult<usize> {
        let seed = self.color_rng.gen::<u64>();
        let result = course_service::randomize_colors(&mut self.state, self.theme, seed);
        self.commit("randomize_colors", result, |_| {
            Some("Course colors randomized!".to_string())
        })
    }

    // Drag

    pub fn begin_drag(
        &mut self,
        course_id: &str,
        offset_x: f64,
        offset_y: f64,
    ) -> ServiceResult<()> {
        let result = view_service::begin_drag(&mut self.state, course_id, offset_x, offset_y);
        self.report("begin_drag", result)
    }

    /// Drops the dragged course on `(day, slot_id)`.
    pub fn drop_on(&mut self, day: u8, slot_id: &str) -> ServiceResult<()> {
        let result = view_service::drop_dragged(&mut self.state, day, slot_id);
        self.commit("drop_course", result, |_| None)
    }

    pub fn release_drag(&mut self) {
        view_service::release_drag(&mut self.state);
    }

    // View

    pub fn set_zoom(&mut self, value: f64) -> f64 {
        let zoom = view_service::set_zoom(&mut self.state, value);
        self.persist("set_zoom");
        zoom
    }

    pub fn change_zoom(&mut self, delta: f64) -> f64 {
        let zoom = view_service::change_zoom(&mut self.state, delta);
        self.persist("change_zoom");
        zoom
    }

    pub fn reset_zoom(&mut self) -> f64 {
        let zoom = view_service::reset_zoom(&mut self.state);
        self.persist("reset_zoom");
        zoom
    }

    pub fn toggle_menu(&mut self, force: Option<bool>) -> bool {
        let open = view_service::toggle_menu(&mut self.state, force);
        self.persist("toggle_menu");
        open
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(err) = save_theme(&self.store, theme) {
            warn!("event=theme_save module=session status=error error={err}");
        }
    }

    pub fn request_clear_all(&mut self) -> &'static str {
        self.gate.request(ConfirmAction::ClearAllData)
    }

    // Confirmation

    /// Runs the pending destructive action, if any.
    pub fn confirm(&mut self) -> ConfirmOutcome {
        let Some(action) = self.gate.confirm() else {
            return ConfirmOutcome::Idle;
        };
        let result = match &action {
            ConfirmAction::DeleteCourse(course_id) => {
                let result = course_service::remove_course(&mut self.state, course_id);
                self.commit("delete_course", result, |_| {
                    Some("Course deleted!".to_string())
                })
                .map(drop)
            }
            ConfirmAction::DeleteRoutine(routine_id) => {
                let result = routine_service::delete_routine(&mut self.state, routine_id);
                self.commit("delete_routine", result, |_| {
                    Some("Routine deleted!".to_string())
                })
                .map(drop)
            }
            ConfirmAction::LoadPredefinedSlots => {
                let result = slot_service::load_predefined_slots(
                    &mut self.state,
                    slot_service::SlotLoadMode::UserAction,
                );
                self.commit("load_predefined_slots", result, |_| {
                    Some("Default slots loaded. Courses were unassigned.".to_string())
                })
                .map(drop)
            }
            ConfirmAction::ClearAllData => {
                self.clear_all();
                Ok(())
            }
        };
        match result {
            Ok(()) => ConfirmOutcome::Applied(action),
            Err(err) => ConfirmOutcome::Rejected(action, err),
        }
    }

    /// Drops the pending action without running it.
    pub fn cancel(&mut self) -> Option<ConfirmAction> {
        let cancelled = self.gate.cancel();
        if cancelled.is_some() {
            debug!("event=confirm_cancel module=session status=ok");
        }
        cancelled
    }

    // Export

    /// Exports the active routine. Failures become an error notification.
    pub fn export(
        &mut self,
        format: ExportFormat,
        backend: Option<&dyn RasterBackend>,
    ) -> Option<ExportArtifact> {
        match export_active(&self.state, format, &self.export_options, backend) {
            Ok(artifact) => {
                self.notices
                    .push(format!("Exported as {}!", format.label()), NoticeLevel::Info);
                Some(artifact)
            }
            Err(_) => {
                self.notices.push(
                    format!("Failed to export {}.", format.label()),
                    NoticeLevel::Error,
                );
                None
            }
        }
    }

    // Projections

    pub fn grid(&self) -> Option<GridView> {
        project_grid(&self.state)
    }

    pub fn slot_options(&self) -> Vec<SlotOption> {
        slot_options(&self.state)
    }

    pub fn routine_options(&self) -> Vec<RoutineOption> {
        routine_options(&self.state)
    }

    pub fn course_summaries(&self) -> Vec<CourseSummary> {
        course_summaries(&self.state)
    }

    fn clear_all(&mut self) {
        if let Err(err) = self.store.clear_all() {
            warn!("event=clear_all module=session status=error error={err}");
        }
        self.state = load_state(&self.store, || self.bootstrap.first_run_state());
        self.theme = load_theme(&self.store);
        self.persist("clear_all");
        info!("event=clear_all module=session status=ok");
    }

    /// Persists and announces a successful mutation; reports a failed one.
    fn commit<T, F>(
        &mut self,
        op: &'static str,
        result: ServiceResult<T>,
        message: F,
    ) -> ServiceResult<T>
    where
        F: FnOnce(&T) -> Option<String>,
    {
        if let Ok(value) = &result {
            self.persist(op);
            if let Some(message) = message(value) {
                self.notices.push(message, NoticeLevel::Info);
            }
            return result;
        }
        self.report(op, result)
    }

    fn report<T>(&mut self, op: &'static str, result: ServiceResult<T>) -> ServiceResult<T> {
        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::Validation => {
                    info!(
                        "event={op} module=session status=rejected error_code={}",
                        err.code()
                    );
                    self.notices.push(err.to_string(), NoticeLevel::Error);
                }
                ErrorKind::NotFound => {
                    debug!(
                        "event={op} module=session status=skipped error_code={}",
                        err.code()
                    );
                }
            }
        }
        result
    }

    fn persist(&self, op: &'static str) {
        if let Err(err) = save_state(&self.store, &self.state) {
            warn!("event=state_save module=session status=error op={op} error={err}");
        }
    }
}
