//! SVG rendering of a grid; the capture source for image export.
//!
//! Output is laid out at scale 1.0 regardless of the view zoom, so exported
//! dimensions do not depend on presentation state.

use crate::render::grid::GridView;
use std::fmt::Write;

const TITLE_HEIGHT: u32 = 56;
const HEADER_HEIGHT: u32 = 40;
const ROW_HEIGHT: u32 = 76;
const TIME_COLUMN_WIDTH: u32 = 120;
const BLOCK_INSET: u32 = 4;
const GRID_LINE_COLOR: &str = "#d0d0d0";
const TEXT_COLOR: &str = "#333333";

/// Layout inputs for one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgLayout {
    pub width_px: u32,
    /// `None` leaves the background transparent.
    pub background: Option<String>,
}

/// A rendered capture with its pixel size at scale 1.0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub markup: String,
    pub width: u32,
    pub height: u32,
}

/// Renders `grid` as a standalone SVG document. `title` replaces the
/// editable name field with static text.
pub fn render_svg(grid: &GridView, title: &str, layout: &SvgLayout) -> SvgDocument {
    let width = layout.width_px.max(TIME_COLUMN_WIDTH + 7 * 40);
    let day_width = (width - TIME_COLUMN_WIDTH) / 7;
    let rows = u32::try_from(grid.rows.len()).unwrap_or(u32::MAX);
    let height = TITLE_HEIGHT + HEADER_HEIGHT + rows.saturating_mul(ROW_HEIGHT);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );
    if let Some(background) = &layout.background {
        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
            escape_xml(background)
        );
    }
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="24" fill="{TEXT_COLOR}">{}</text>"#,
        width / 2,
        TITLE_HEIGHT - 18,
        escape_xml(title)
    );

    let header_y = TITLE_HEIGHT;
    for (index, day) in grid.days.iter().enumerate() {
        let x = TIME_COLUMN_WIDTH + day_width * index as u32;
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14" fill="{TEXT_COLOR}">{}</text>"#,
            x + day_width / 2,
            header_y + 26,
            day.short_name
        );
    }

    for (row_index, row) in grid.rows.iter().enumerate() {
        let y = TITLE_HEIGHT + HEADER_HEIGHT + ROW_HEIGHT * row_index as u32;
        let _ = write!(
            svg,
            r#"<line x1="0" y1="{y}" x2="{width}" y2="{y}" stroke="{GRID_LINE_COLOR}"/><text x="{}" y="{}" font-size="13" fill="{TEXT_COLOR}">{}</text>"#,
            BLOCK_INSET * 2,
            y + ROW_HEIGHT / 2 + 4,
            escape_xml(&row.label)
        );

        for cell in &row.cells {
            let cell_x = TIME_COLUMN_WIDTH + day_width * u32::from(cell.day);
            // Back to front so the frontmost block is painted last.
            for block in cell.blocks.iter().rev() {
                let x = cell_x + BLOCK_INSET + block.offset_px;
                let top = y + BLOCK_INSET + block.offset_px;
                let block_width = day_width.saturating_sub(BLOCK_INSET * 2 + block.offset_px);
                let block_height = ROW_HEIGHT.saturating_sub(BLOCK_INSET * 2 + block.offset_px);
                let detail = if block.room.is_empty() {
                    block.section.clone()
                } else {
                    format!("{} · {}", block.section, block.room)
                };
                let _ = write!(
                    svg,
                    r##"<g data-course-id="{}"><rect x="{x}" y="{top}" width="{block_width}" height="{block_height}" rx="6" fill="{}"/><text x="{}" y="{}" font-size="13" font-weight="bold" fill="#ffffff">{}</text><text x="{}" y="{}" font-size="11" fill="#ffffff">{}</text></g>"##,
                    escape_xml(&block.course_id),
                    escape_xml(&block.color),
                    x + 6,
                    top + 20,
                    escape_xml(&block.name),
                    x + 6,
                    top + 38,
                    escape_xml(&detail)
                );
            }
        }
    }
    svg.push_str("</svg>");

    SvgDocument {
        markup: svg,
        width,
        height,
    }
}

/// Escapes the five XML special characters.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
