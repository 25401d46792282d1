//! First-run state construction.

use crate::model::routine::Routine;
use crate::model::state::{AppState, DEFAULT_ROUTINE_NAME};
use crate::service::slot_service::{load_predefined_slots, SlotLoadMode};
use log::warn;

/// How the first-run routine is built when no snapshot is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    pub default_routine_name: String,
    /// Seed the first-run routine with the predefined slots.
    pub seed_default_slots: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            default_routine_name: DEFAULT_ROUTINE_NAME.to_string(),
            seed_default_slots: false,
        }
    }
}

impl BootstrapOptions {
    /// State holding exactly one fresh routine, active.
    pub fn first_run_state(&self) -> AppState {
        let name = self.default_routine_name.trim();
        let name = if name.is_empty() {
            DEFAULT_ROUTINE_NAME
        } else {
            name
        };
        let mut state = AppState::with_routine(Routine::new(name));
        if self.seed_default_slots {
            if let Err(err) = load_predefined_slots(&mut state, SlotLoadMode::Bootstrap) {
                warn!("event=bootstrap module=service status=error error_code={}", err.code());
            }
        }
        state
    }
}
