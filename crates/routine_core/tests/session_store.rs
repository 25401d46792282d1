use routine_core::repo::snapshot::{STATE_KEY, THEME_KEY};
use routine_core::{
    open_db, write_artifact, AppConfig, ConfirmAction, ConfirmOutcome, CourseFields,
    ExportFormat, KeyValueStore, MemoryKeyValueStore, NoticeLevel, RasterBackend, RasterRequest,
    ResvgBackend, ServiceError, SqliteKeyValueStore, Theme, TimetableSession,
};
use std::time::{Duration, Instant};

fn open_session(store: MemoryKeyValueStore) -> TimetableSession<MemoryKeyValueStore> {
    TimetableSession::open(store, &AppConfig::default()).with_color_seed(11)
}

fn math(slot_id: Option<&str>) -> CourseFields {
    CourseFields {
        name: "math".to_string(),
        section: "b".to_string(),
        room: "r2".to_string(),
        day: 2,
        slot_id: slot_id.map(str::to_string),
        ..CourseFields::default()
    }
}

struct StubBackend;

impl RasterBackend for StubBackend {
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Vec<u8>, String> {
        Ok(request.document.markup.as_bytes().to_vec())
    }
}

#[test]
fn first_run_creates_default_routine() {
    let session = open_session(MemoryKeyValueStore::new());
    let state = session.state();
    assert_eq!(state.routines.len(), 1);
    assert_eq!(state.active_routine().unwrap().name, "My Routine");
    assert_eq!(session.theme(), Theme::Grass);
}

#[test]
fn corrupt_snapshot_falls_back_to_first_run() {
    let store = MemoryKeyValueStore::new();
    store.set(STATE_KEY, "{\"routines\": 12").unwrap();
    store.set(THEME_KEY, "neon").unwrap();

    let session = open_session(store);
    assert_eq!(session.state().routines.len(), 1);
    assert_eq!(session.theme(), Theme::Grass);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routine.sqlite3");

    let (routine_id, course_id) = {
        let conn = open_db(&path).unwrap();
        let store = SqliteKeyValueStore::new(&conn);
        let mut session = TimetableSession::open(&store, &AppConfig::default());
        let slot = session.add_slot("8:00", "9:30").unwrap();
        let course = session.add_course(math(Some(&slot))).unwrap();
        session.set_theme(Theme::Cherry);
        session.change_zoom(0.2);
        (session.state().active_routine_id.clone(), course)
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    let session = TimetableSession::open(&store, &AppConfig::default());
    assert_eq!(session.state().active_routine_id, routine_id);
    assert_eq!(session.state().zoom, 1.2);
    assert_eq!(session.theme(), Theme::Cherry);
    let course = session
        .state()
        .active_routine()
        .unwrap()
        .course(&course_id)
        .unwrap()
        .clone();
    assert_eq!(course.name, "MATH");
    assert_eq!(course.section, "B");
}

#[test]
fn drag_gesture_is_not_persisted() {
    let store = MemoryKeyValueStore::new();
    let mut session = open_session(store);
    let course = session.add_course(math(None)).unwrap();
    session.begin_drag(&course, 4.0, 2.0).unwrap();
    session.toggle_menu(Some(false));

    let saved = session.store().get(STATE_KEY).unwrap().unwrap();
    assert!(!saved.contains("drag"));
    assert!(saved.contains("\"isMenuOpen\":false"));
}

#[test]
fn drop_moves_and_raises_course() {
    let mut session = open_session(MemoryKeyValueStore::new());
    let slot = session.add_slot("8:00", "9:30").unwrap();
    let resident = session.add_course(math(Some(&slot))).unwrap();
    let mover = session
        .add_course(CourseFields {
            name: "chem".to_string(),
            day: 5,
            ..CourseFields::default()
        })
        .unwrap();

    session.begin_drag(&mover, 1.0, 1.0).unwrap();
    session.drop_on(2, &slot).unwrap();

    let grid = session.grid().unwrap();
    let cell = grid.cell(2, &slot).unwrap();
    assert_eq!(cell.blocks.len(), 2);
    assert_eq!(cell.blocks[0].course_id, mover);
    assert_eq!(cell.blocks[1].course_id, resident);
    assert!(session.state().drag.is_none());
}

#[test]
fn editor_round_trip_updates_course_and_closes() {
    let mut session = open_session(MemoryKeyValueStore::new());
    let course = session.add_course(math(None)).unwrap();

    assert_eq!(
        session.save_edited_course(math(None)),
        Err(ServiceError::NoEditTarget)
    );
    session.open_editor(&course).unwrap();
    let mut fields = session.editing_course().unwrap().to_fields();
    fields.room = "lab 3".to_string();
    session.save_edited_course(fields).unwrap();

    assert!(session.state().editing_course_id.is_none());
    let edited = session.state().active_routine().unwrap().course(&course).unwrap();
    assert_eq!(edited.room, "LAB 3");
    assert_eq!(session.notices().latest().unwrap().message, "Course updated!");
}

#[test]
fn rejected_direct_edit_leaves_stored_snapshot_untouched() {
    let mut session = open_session(MemoryKeyValueStore::new());
    let course = session.add_course(math(None)).unwrap();
    let before = session.store().get(STATE_KEY).unwrap().unwrap();

    let blank = CourseFields {
        name: "  ".to_string(),
        ..math(None)
    };
    assert!(matches!(
        session.edit_course(&course, blank),
        Err(ServiceError::InvalidCourse(_))
    ));

    let after = session.store().get(STATE_KEY).unwrap().unwrap();
    assert_eq!(after, before);
    assert!(after.contains("\"editingCourseId\":null"));
    assert!(session.state().editing_course_id.is_none());
    assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Error);

    let mut fields = math(None);
    fields.room = "lab 1".to_string();
    session.edit_course(&course, fields).unwrap();
    let edited = session.state().active_routine().unwrap().course(&course).unwrap();
    assert_eq!(edited.room, "LAB 1");
    assert_eq!(session.notices().latest().unwrap().message, "Course updated!");
}

#[test]
fn deleting_last_routine_through_gate_is_rejected_with_notice() {
    let mut session = open_session(MemoryKeyValueStore::new());
    let only = session.state().active_routine_id.clone();

    let prompt = session.request_delete_routine(&only);
    assert!(prompt.contains("cannot be undone"));
    assert_eq!(
        session.confirm(),
        ConfirmOutcome::Rejected(ConfirmAction::DeleteRoutine(only), ServiceError::LastRoutine)
    );
    assert_eq!(session.state().routines.len(), 1);
    let notice = session.notices().latest().unwrap();
    assert_eq!(notice.message, "Cannot delete the last routine!");
    assert_eq!(notice.level, NoticeLevel::Error);
}

#[test]
fn loading_predefined_slots_unassigns_courses() {
    let mut session = open_session(MemoryKeyValueStore::new());
    let slot = session.add_slot("7:00", "7:50").unwrap();
    session.add_course(math(Some(&slot))).unwrap();

    session.request_load_predefined_slots();
    assert!(matches!(session.confirm(), ConfirmOutcome::Applied(_)));

    let routine = session.state().active_routine().unwrap();
    assert_eq!(routine.slots.len(), 7);
    assert_eq!(routine.slots[0].label, "8:00-9:30");
    assert!(routine.courses.iter().all(|course| course.slot_id.is_none()));
    assert_eq!(routine.courses.len(), 1);
}

#[test]
fn clear_all_resets_to_first_run() {
    let mut session = open_session(MemoryKeyValueStore::new());
    session.create_routine("Spring").unwrap();
    session.set_theme(Theme::Lemon);

    session.request_clear_all();
    assert_eq!(
        session.confirm(),
        ConfirmOutcome::Applied(ConfirmAction::ClearAllData)
    );
    assert_eq!(session.state().routines.len(), 1);
    assert_eq!(session.state().active_routine().unwrap().name, "My Routine");
    assert_eq!(session.theme(), Theme::Grass);
    assert!(session.store().get(THEME_KEY).unwrap().is_none());
}

#[test]
fn randomize_is_reproducible_for_a_seed() {
    let colors = |seed: u64| {
        let mut session = TimetableSession::open(MemoryKeyValueStore::new(), &AppConfig::default())
            .with_color_seed(seed);
        session.add_course(math(None)).unwrap();
        session.randomize_colors().unwrap();
        session.state().active_routine().unwrap().courses[0].color.clone()
    };
    assert_eq!(colors(3), colors(3));
}

#[test]
fn export_reports_outcome_without_touching_state() {
    let mut session = open_session(MemoryKeyValueStore::new());
    session.rename_active_routine("  Fall ").unwrap();
    let before = session.state().clone();

    let artifact = session
        .export(ExportFormat::Pdf, Some(&StubBackend))
        .unwrap();
    assert_eq!(artifact.file_name, "Fall.pdf");
    assert_eq!(session.notices().latest().unwrap().message, "Exported as PDF!");

    assert!(session.export(ExportFormat::Png, None).is_none());
    assert_eq!(
        session.notices().latest().unwrap().message,
        "Failed to export PNG."
    );
    assert_eq!(session.state(), &before);
}

#[test]
fn builtin_backend_writes_png_and_pdf_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(MemoryKeyValueStore::new());
    session.add_slot("8:00", "9:30").unwrap();
    session.add_course(math(None)).unwrap();
    let backend = ResvgBackend::new();

    let png = session.export(ExportFormat::Png, Some(&backend)).unwrap();
    assert!(png.bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    let path = write_artifact(dir.path(), &png).unwrap();
    assert_eq!(path.file_name().unwrap(), "My Routine.png");

    let pdf = session.export(ExportFormat::Pdf, Some(&backend)).unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(session.notices().latest().unwrap().message, "Exported as PDF!");
}

#[test]
fn notices_expire_after_ttl() {
    let mut config = AppConfig::default();
    config.notification_ttl_ms = 50;
    let mut session = TimetableSession::open(MemoryKeyValueStore::new(), &config);
    session.add_slot("8:00", "9:30").unwrap();

    let later = Instant::now() + Duration::from_millis(60);
    assert_eq!(session.notices().active(later).count(), 0);
    assert_eq!(session.notices_mut().prune(later), 1);
}
