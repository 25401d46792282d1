//! Plain-text rendering of a grid, for terminals and logs.

use crate::render::grid::GridView;

const TIME_COLUMN_WIDTH: usize = 13;
const DAY_COLUMN_WIDTH: usize = 14;

/// Renders the grid as a fixed-width table. Stacked cells list every
/// course, frontmost first.
pub fn render_text(grid: &GridView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} (zoom {:.2})\n", grid.routine_name, grid.zoom));

    out.push_str(&pad("", TIME_COLUMN_WIDTH));
    for day in &grid.days {
        out.push_str(&pad(day.short_name, DAY_COLUMN_WIDTH));
    }
    out.push('\n');

    if grid.rows.is_empty() {
        out.push_str("No slots yet.\n");
        return out;
    }

    for row in &grid.rows {
        let height = row
            .cells
            .iter()
            .map(|cell| cell.blocks.len())
            .max()
            .unwrap_or(0)
            .max(1);
        for line in 0..height {
            let label = if line == 0 { row.label.as_str() } else { "" };
            out.push_str(&pad(label, TIME_COLUMN_WIDTH));
            for cell in &row.cells {
                let text = cell
                    .blocks
                    .get(line)
                    .map(|block| {
                        if block.section.is_empty() {
                            block.name.clone()
                        } else {
                            format!("{} {}", block.name, block.section)
                        }
                    })
                    .unwrap_or_else(|| if line == 0 { "-".to_string() } else { String::new() });
                out.push_str(&pad(&text, DAY_COLUMN_WIDTH));
            }
            out.push('\n');
        }
    }
    out
}

fn pad(value: &str, width: usize) -> String {
    let mut cell: String = value.chars().take(width - 1).collect();
    let used = cell.chars().count();
    cell.extend(std::iter::repeat(' ').take(width - used));
    cell
}

#[cfg(test)]
mod tests {
    use super::render_text;
    use crate::model::course::{Course, CourseFields};
    use crate::model::routine::Routine;
    use crate::model::slot::Slot;
    use crate::render::grid::project_routine;

    #[test]
    fn text_lists_every_stacked_course() {
        let mut routine = Routine::new("Week");
        let slot = Slot::new("8:00-9:30");
        let slot_id = slot.id.clone();
        routine.slots.push(slot);
        for name in ["ALPHA", "BETA"] {
            routine.courses.push(Course::from_fields(CourseFields {
                name: name.to_string(),
                day: 1,
                slot_id: Some(slot_id.clone()),
                ..CourseFields::default()
            }));
        }

        let text = render_text(&project_routine(&routine, 1.0));
        assert!(text.contains("ALPHA"));
        assert!(text.contains("BETA"));
        assert!(text.contains("8:00-9:30"));
        assert!(text.lines().next().unwrap().starts_with("Week"));
    }

    #[test]
    fn empty_routine_says_so() {
        let text = render_text(&project_routine(&Routine::new("Empty"), 1.0));
        assert!(text.contains("No slots yet."));
    }
}
