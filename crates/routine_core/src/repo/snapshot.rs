//! Whole-state persistence over a key-value store.
//!
//! # Responsibility
//! - Load the application state once at startup, falling back to a
//!   first-run routine on absent or corrupt data.
//! - Save the complete state after every mutation.
//! - Read and write the theme preference under its own key.
//!
//! # Invariants
//! - `load_state` never fails; corruption is logged and treated as absence.
//! - `save_state(load_state(x))` reproduces `x` for any well-formed snapshot.

use crate::model::state::AppState;
use crate::model::theme::Theme;
use crate::repo::kv_store::{KeyValueStore, StoreResult};
use log::{info, warn};

/// Key holding the JSON application snapshot.
pub const STATE_KEY: &str = "routineAppState";
/// Key holding the theme name.
pub const THEME_KEY: &str = "theme";

/// Restores state from `store`, or builds the first-run state with
/// `first_run`.
pub fn load_state<F>(store: &impl KeyValueStore, first_run: F) -> AppState
where
    F: FnOnce() -> AppState,
{
    let reason = match store.get(STATE_KEY) {
        Ok(Some(json)) => match AppState::from_json(&json) {
            Some(state) => {
                info!(
                    "event=state_load module=repo status=ok routines={} bytes={}",
                    state.routines.len(),
                    json.len()
                );
                return state;
            }
            None => "corrupt_or_empty",
        },
        Ok(None) => "missing",
        Err(err) => {
            warn!("event=state_load module=repo status=error error={err}");
            "read_failed"
        }
    };

    info!("event=state_load module=repo status=fallback reason={reason}");
    first_run()
}

/// Writes the full snapshot under `STATE_KEY`.
pub fn save_state(store: &impl KeyValueStore, state: &AppState) -> StoreResult<()> {
    let json = state.to_json()?;
    store.set(STATE_KEY, &json)
}

/// Stored theme, defaulting on missing, unknown or unreadable values.
pub fn load_theme(store: &impl KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(value) => Theme::from_stored(value.as_deref()),
        Err(err) => {
            warn!("event=theme_load module=repo status=error error={err}");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &impl KeyValueStore, theme: Theme) -> StoreResult<()> {
    store.set(THEME_KEY, theme.as_str())
}
