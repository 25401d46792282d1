//! Core timetable logic for the weekly class routine planner.
//! This crate is the single source of truth for timetable invariants.

pub mod config;
pub mod confirm;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod notify;
pub mod raster;
pub mod render;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{load_config, AppConfig, ConfigError};
pub use confirm::{ConfirmAction, ConfirmationGate};
pub use db::{open_db, open_db_in_memory};
pub use export::{
    export_active, write_artifact, ExportArtifact, ExportError, ExportFormat, ExportOptions,
    RasterBackend, RasterRequest,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::course::{Course, CourseFields, CourseValidationError};
pub use model::id::{CourseId, RoutineId, SlotId};
pub use model::routine::Routine;
pub use model::slot::{Slot, SlotValidationError};
pub use model::state::AppState;
pub use model::theme::Theme;
pub use notify::{NoticeLevel, Notification, NotificationQueue};
pub use raster::ResvgBackend;
pub use render::grid::{project_grid, GridView};
pub use render::text::render_text;
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use service::bootstrap::BootstrapOptions;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use session::{ConfirmOutcome, TimetableSession};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
