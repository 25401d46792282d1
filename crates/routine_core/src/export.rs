//! Timetable export.
//!
//! # Responsibility
//! - Capture a detached snapshot of the active grid at zoom 1.0.
//! - Produce PNG/PDF bytes through a raster backend, or SVG natively.
//! - Name artifacts after the active routine.
//!
//! # Invariants
//! - Export never mutates application state.
//! - One parameterized code path serves every format; resolution and
//!   background are options, not separate routines.

use crate::model::state::AppState;
use crate::render::grid::project_routine;
use crate::render::svg::{render_svg, SvgDocument, SvgLayout};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File stem used when the routine name is blank.
pub const FALLBACK_FILE_STEM: &str = "routine";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Pdf,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Pdf => "PDF",
            Self::Svg => "SVG",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

/// Capture settings shared by every format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Resolution multiplier applied by the raster backend.
    pub scale: f64,
    /// Layout width of the capture at scale 1.0.
    pub width_px: u32,
    /// PNG background; `None` keeps it transparent.
    pub png_background: Option<String>,
    pub pdf_background: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            width_px: 1400,
            png_background: None,
            pdf_background: Some("#ffffff".to_string()),
        }
    }
}

impl ExportOptions {
    fn background_for(&self, format: ExportFormat) -> Option<String> {
        match format {
            ExportFormat::Png | ExportFormat::Svg => self.png_background.clone(),
            ExportFormat::Pdf => self.pdf_background.clone(),
        }
    }
}

/// What a raster backend receives: the capture and the requested output.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRequest<'a> {
    pub document: &'a SvgDocument,
    pub format: ExportFormat,
    pub scale: f64,
}

/// Capture-to-image/PDF service. `raster::ResvgBackend` is the built-in one;
/// hosts may supply their own.
pub trait RasterBackend {
    /// Returns encoded file bytes for `request.format` (PNG or PDF).
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Vec<u8>, String>;
}

/// A finished export ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ExportError {
    NoActiveRoutine,
    /// PNG/PDF requested without a raster backend.
    BackendUnavailable(ExportFormat),
    Backend(String),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveRoutine => write!(f, "no active routine to export"),
            Self::BackendUnavailable(format) => {
                write!(f, "{} export needs a raster backend", format.label())
            }
            Self::Backend(message) => write!(f, "raster backend failed: {message}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// `<trimmed routine name>.<ext>`, or the fallback stem when blank.
pub fn export_file_name(routine_name: &str, format: ExportFormat) -> String {
    let stem = routine_name.trim();
    let stem = if stem.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        stem
    };
    format!("{stem}.{}", format.extension())
}

/// Renders the active routine for capture, independent of view zoom.
pub fn capture_active(
    state: &AppState,
    options: &ExportOptions,
    format: ExportFormat,
) -> Option<SvgDocument> {
    let routine = state.active_routine()?;
    let grid = project_routine(routine, 1.0);
    let title = if routine.name.trim().is_empty() {
        FALLBACK_FILE_STEM
    } else {
        routine.name.trim()
    };
    let layout = SvgLayout {
        width_px: options.width_px,
        background: options.background_for(format),
    };
    Some(render_svg(&grid, title, &layout))
}

/// Exports the active routine in `format`.
///
/// `backend` is only consulted for PNG and PDF.
pub fn export_active(
    state: &AppState,
    format: ExportFormat,
    options: &ExportOptions,
    backend: Option<&dyn RasterBackend>,
) -> Result<ExportArtifact, ExportError> {
    let started_at = Instant::now();
    let result = export_inner(state, format, options, backend);
    match &result {
        Ok(artifact) => info!(
            "event=export module=export status=ok format={} bytes={} duration_ms={}",
            format.extension(),
            artifact.bytes.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=export module=export status=error format={} duration_ms={} error={}",
            format.extension(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn export_inner(
    state: &AppState,
    format: ExportFormat,
    options: &ExportOptions,
    backend: Option<&dyn RasterBackend>,
) -> Result<ExportArtifact, ExportError> {
    let routine = state.active_routine().ok_or(ExportError::NoActiveRoutine)?;
    let document =
        capture_active(state, options, format).ok_or(ExportError::NoActiveRoutine)?;

    let bytes = match format {
        ExportFormat::Svg => document.markup.into_bytes(),
        ExportFormat::Png | ExportFormat::Pdf => {
            let backend = backend.ok_or(ExportError::BackendUnavailable(format))?;
            let request = RasterRequest {
                document: &document,
                format,
                scale: options.scale,
            };
            backend.rasterize(&request).map_err(ExportError::Backend)?
        }
    };

    Ok(ExportArtifact {
        file_name: export_file_name(&routine.name, format),
        format,
        bytes,
    })
}

/// Writes an artifact into `dir` under its file name.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;
    Ok(path)
}
