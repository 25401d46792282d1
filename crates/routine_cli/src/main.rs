//! Command-line host for the routine planner.
//!
//! # Responsibility
//! - Drive one session against a SQLite store file per invocation.
//! - Print the grid as text and surface notifications on stdout.
//!
//! Destructive commands print their prompt and only run with `--yes`.
//! Global flags go before the command; `--` ends flag parsing.

use clap::{Args, Parser, Subcommand};
use routine_core::model::course::DAY_SHORT_NAMES;
use routine_core::model::state::ZOOM_STEP;
use routine_core::{
    init_logging, load_config, open_db, render_text, write_artifact, AppConfig, ConfirmOutcome,
    CourseFields, ExportFormat, KeyValueStore, ResvgBackend, ServiceResult, SqliteKeyValueStore,
    Theme, TimetableSession,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Weekly class routine planner.
#[derive(Debug, Parser)]
#[command(name = "routine_cli", version)]
struct Cli {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store file; overrides `store_path` from the config.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Run destructive commands without stopping at the prompt.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Defaults to `show`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the active routine grid.
    Show,
    /// List routines.
    Routines,
    /// Create and activate a routine.
    RoutineNew { name: String },
    /// Switch the active routine.
    RoutineUse { id: String },
    /// Rename the active routine.
    RoutineRename { name: String },
    /// Delete a routine (needs --yes).
    RoutineDelete { id: String },
    /// List slots of the active routine.
    Slots,
    /// Add a slot, e.g. `slot-add 8:00 9:30`.
    SlotAdd { start: String, end: String },
    /// Remove a slot, unassigning its courses.
    SlotRemove { id: String },
    /// Load the predefined slots (needs --yes).
    SlotsDefault,
    /// List distinct courses.
    Courses,
    /// Add a course.
    CourseAdd(CourseArgs),
    /// Overwrite a course.
    CourseEdit {
        id: String,
        #[command(flatten)]
        fields: CourseArgs,
    },
    /// Duplicate a course.
    CourseCopy { id: String },
    /// Place a course in a cell.
    CourseMove {
        id: String,
        #[arg(value_parser = parse_day)]
        day: u8,
        slot_id: String,
    },
    /// Delete a course (needs --yes).
    CourseDelete { id: String },
    /// Randomize course colors from the theme.
    Colors,
    /// Set the zoom factor: a number, `in`, `out` or `reset`.
    Zoom {
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// Show or set the palette.
    Theme { name: Option<String> },
    /// Write the active routine as SVG into DIR.
    ExportSvg { dir: PathBuf },
    /// Write the active routine as PNG into DIR.
    ExportPng { dir: PathBuf },
    /// Write the active routine as a one-page PDF into DIR.
    ExportPdf { dir: PathBuf },
    /// Wipe all stored data (needs --yes).
    Clear,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Routines => "routines",
            Self::RoutineNew { .. } => "routine-new",
            Self::RoutineUse { .. } => "routine-use",
            Self::RoutineRename { .. } => "routine-rename",
            Self::RoutineDelete { .. } => "routine-delete",
            Self::Slots => "slots",
            Self::SlotAdd { .. } => "slot-add",
            Self::SlotRemove { .. } => "slot-remove",
            Self::SlotsDefault => "slots-default",
            Self::Courses => "courses",
            Self::CourseAdd(_) => "course-add",
            Self::CourseEdit { .. } => "course-edit",
            Self::CourseCopy { .. } => "course-copy",
            Self::CourseMove { .. } => "course-move",
            Self::CourseDelete { .. } => "course-delete",
            Self::Colors => "colors",
            Self::Zoom { .. } => "zoom",
            Self::Theme { .. } => "theme",
            Self::ExportSvg { .. } => "export-svg",
            Self::ExportPng { .. } => "export-png",
            Self::ExportPdf { .. } => "export-pdf",
            Self::Clear => "clear",
        }
    }
}

/// Course dialog fields, in dialog order.
#[derive(Debug, Clone, Args)]
struct CourseArgs {
    name: String,
    section: String,
    room: String,
    /// `0..=6` or a day name such as `mon`.
    #[arg(value_parser = parse_day)]
    day: u8,
    slot_id: Option<String>,
    color: Option<String>,
}

impl From<CourseArgs> for CourseFields {
    fn from(value: CourseArgs) -> Self {
        Self {
            name: value.name,
            section: value.section,
            room: value.room,
            day: value.day,
            slot_id: value.slot_id,
            color: value.color.unwrap_or_default(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::from(2);
            }
        },
        None => AppConfig::default(),
    };
    let log_level = if config.log_dir.is_some() {
        config.log_level.as_str()
    } else {
        "warn"
    };
    if let Err(err) = init_logging(log_level, config.log_dir.as_deref()) {
        eprintln!("logging disabled: {err}");
    }

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.store_path.clone());
    let conn = match open_db(&store_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open store `{}`: {err}", store_path.display());
            return ExitCode::FAILURE;
        }
    };
    let store = SqliteKeyValueStore::new(&conn);
    let mut session = TimetableSession::open(&store, &config);

    let command = cli.command.unwrap_or(Command::Show);
    let name = command.name();
    let result = run(&mut session, command, cli.yes);
    for notice in session.notices_mut().drain() {
        println!("> {}", notice.message);
    }
    match result {
        Ok(()) => {
            log::info!("event=cli_command module=cli status=ok command={name}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            log::warn!("event=cli_command module=cli status=error command={name}");
            if !message.is_empty() {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run<S: KeyValueStore>(
    session: &mut TimetableSession<S>,
    command: Command,
    assume_yes: bool,
) -> Result<(), String> {
    match command {
        Command::Show => print_grid(session),
        Command::Routines => {
            for option in session.routine_options() {
                let marker = if option.active { "*" } else { " " };
                println!("{marker} {}  {}", option.routine_id, option.name);
            }
            Ok(())
        }
        Command::RoutineNew { name } => outcome(session.create_routine(&name)),
        Command::RoutineUse { id } => {
            outcome(session.switch_routine(&id))?;
            print_grid(session)
        }
        Command::RoutineRename { name } => outcome(session.rename_active_routine(&name)),
        Command::RoutineDelete { id } => {
            let prompt = session.request_delete_routine(&id);
            confirm(session, prompt, assume_yes)
        }
        Command::Slots => {
            for slot in session.slot_options() {
                println!("{}  {}", slot.slot_id, slot.label);
            }
            Ok(())
        }
        Command::SlotAdd { start, end } => outcome(session.add_slot(&start, &end)),
        Command::SlotRemove { id } => outcome(session.remove_slot(&id)),
        Command::SlotsDefault => {
            let prompt = session.request_load_predefined_slots();
            confirm(session, prompt, assume_yes)
        }
        Command::Courses => {
            for course in session.course_summaries() {
                println!(
                    "{}  {} ({})  {}  {}",
                    course.course_id,
                    course.name,
                    course.section,
                    course.placement(),
                    course.color
                );
            }
            Ok(())
        }
        Command::CourseAdd(fields) => outcome(session.add_course(fields.into())),
        Command::CourseEdit { id, fields } => outcome(session.edit_course(&id, fields.into())),
        Command::CourseCopy { id } => outcome(session.copy_course(&id)),
        Command::CourseMove { id, day, slot_id } => {
            outcome(session.begin_drag(&id, 0.0, 0.0))?;
            outcome(session.drop_on(day, &slot_id))?;
            print_grid(session)
        }
        Command::CourseDelete { id } => {
            let prompt = session.request_delete_course(&id);
            confirm(session, prompt, assume_yes)
        }
        Command::Colors => outcome(session.randomize_colors()),
        Command::Zoom { value } => {
            let zoom = match value.as_str() {
                "in" => session.change_zoom(ZOOM_STEP),
                "out" => session.change_zoom(-ZOOM_STEP),
                "reset" => session.reset_zoom(),
                raw => {
                    let value = raw
                        .parse::<f64>()
                        .map_err(|_| format!("invalid zoom `{raw}`"))?;
                    session.set_zoom(value)
                }
            };
            println!("zoom {zoom:.2}");
            Ok(())
        }
        Command::Theme { name: None } => {
            println!("{}", session.theme());
            Ok(())
        }
        Command::Theme { name: Some(name) } => {
            let theme = Theme::parse(&name).ok_or_else(|| {
                let known: Vec<_> = Theme::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown theme `{name}`; expected one of {}", known.join("|"))
            })?;
            session.set_theme(theme);
            println!("{theme}");
            Ok(())
        }
        Command::ExportSvg { dir } => export(session, ExportFormat::Svg, &dir),
        Command::ExportPng { dir } => export(session, ExportFormat::Png, &dir),
        Command::ExportPdf { dir } => export(session, ExportFormat::Pdf, &dir),
        Command::Clear => {
            let prompt = session.request_clear_all();
            confirm(session, prompt, assume_yes)
        }
    }
}

fn export<S: KeyValueStore>(
    session: &mut TimetableSession<S>,
    format: ExportFormat,
    dir: &Path,
) -> Result<(), String> {
    let backend = ResvgBackend::new();
    let artifact = session
        .export(format, Some(&backend))
        .ok_or_else(String::new)?;
    let path = write_artifact(dir, &artifact).map_err(|err| err.to_string())?;
    println!("{}", path.display());
    Ok(())
}

fn print_grid<S: KeyValueStore>(session: &TimetableSession<S>) -> Result<(), String> {
    let grid = session
        .grid()
        .ok_or_else(|| "no active routine".to_string())?;
    print!("{}", render_text(&grid));
    Ok(())
}

/// Maps a session result to the exit status. Messages already went to the
/// notification queue, so errors carry none.
fn outcome<T>(result: ServiceResult<T>) -> Result<(), String> {
    result.map(drop).map_err(|_| String::new())
}

fn confirm<S: KeyValueStore>(
    session: &mut TimetableSession<S>,
    prompt: &str,
    assume_yes: bool,
) -> Result<(), String> {
    if !assume_yes {
        session.cancel();
        return Err(format!("{prompt}\nre-run with --yes to proceed"));
    }
    match session.confirm() {
        ConfirmOutcome::Applied(_) => Ok(()),
        ConfirmOutcome::Rejected(..) | ConfirmOutcome::Idle => Err(String::new()),
    }
}

/// Accepts `0..=6` or a day name such as `mon` / `Monday`.
fn parse_day(value: &str) -> Result<u8, String> {
    if let Ok(day) = value.parse::<u8>() {
        return Ok(day);
    }
    let lowered = value.trim().to_ascii_lowercase();
    DAY_SHORT_NAMES
        .iter()
        .position(|short| lowered.starts_with(&short.to_ascii_lowercase()))
        .map(|index| index as u8)
        .ok_or_else(|| format!("invalid day `{value}`"))
}
