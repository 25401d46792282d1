//! Time slot model.
//!
//! # Responsibility
//! - Represent one grid row as a `"<start>-<end>"` label.
//! - Parse wall-clock times and validate slot ranges.
//! - Keep a routine's slots in start-time order.
//!
//! # Invariants
//! - A slot created through validation always has `end > start` within one
//!   nominal day.
//! - Ordering is stable: slots with equal start keys keep insertion order.

use crate::model::id::{new_slot_id, SlotId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Seven standard class periods used by "load default slots".
pub const PREDEFINED_SLOT_LABELS: [&str; 7] = [
    "8:00-9:30",
    "9:40-11:10",
    "11:20-12:50",
    "13:00-14:30",
    "14:40-16:10",
    "16:20-17:50",
    "18:00-19:30",
];

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?\s*([AaPp][Mm])?$").expect("valid time regex")
});

/// One time-range row of a routine's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    /// Free-form `"<start>-<end>"`, not zero padded.
    pub label: String,
}

/// Reasons a requested slot range is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValidationError {
    /// Start or end was blank.
    MissingBounds,
    /// A bound could not be read as a time of day.
    UnparsableTime(String),
    /// End is equal to or earlier than start.
    EndNotAfterStart,
}

impl Display for SlotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBounds => write!(f, "Select both start and end times."),
            Self::UnparsableTime(value) => write!(f, "Invalid time `{value}`."),
            Self::EndNotAfterStart => write!(f, "End time must be after start time."),
        }
    }
}

impl Error for SlotValidationError {}

impl Slot {
    /// Creates a slot with a fresh id and the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: new_slot_id(),
            label: label.into(),
        }
    }

    /// Portion of the label before the first `-`.
    pub fn start_label(&self) -> &str {
        match self.label.split_once('-') {
            Some((start, _)) => start.trim(),
            None => self.label.trim(),
        }
    }

    /// Start time in seconds since midnight, when the label parses.
    pub fn start_seconds(&self) -> Option<u32> {
        parse_time_of_day(self.start_label())
    }
}

/// Builds a label from already validated bounds.
pub fn slot_label(start: &str, end: &str) -> String {
    format!("{}-{}", start.trim(), end.trim())
}

/// Parses `H:MM`, `HH:MM`, optional `:SS`, optional `AM`/`PM` suffix.
///
/// Returns seconds since midnight.
pub fn parse_time_of_day(value: &str) -> Option<u32> {
    let captures = TIME_OF_DAY_RE.captures(value.trim())?;
    let mut hours: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = captures.get(2)?.as_str().parse().ok()?;
    let seconds: u32 = match captures.get(3) {
        Some(value) => value.as_str().parse().ok()?,
        None => 0,
    };
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    match captures.get(4).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(meridiem) => {
            if hours == 0 || hours > 12 {
                return None;
            }
            hours %= 12;
            if meridiem == "pm" {
                hours += 12;
            }
        }
        None if hours >= 24 => return None,
        None => {}
    }

    let total = hours * 3600 + minutes * 60 + seconds;
    (total < SECONDS_PER_DAY).then_some(total)
}

/// Validates a requested range and returns `(start, end)` in seconds.
///
/// # Errors
/// - `MissingBounds` when either side is blank.
/// - `UnparsableTime` when either side is not a time of day.
/// - `EndNotAfterStart` when `end <= start`.
pub fn validate_range(start: &str, end: &str) -> Result<(u32, u32), SlotValidationError> {
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err(SlotValidationError::MissingBounds);
    }
    let start_secs = parse_time_of_day(start)
        .ok_or_else(|| SlotValidationError::UnparsableTime(start.to_string()))?;
    let end_secs = parse_time_of_day(end)
        .ok_or_else(|| SlotValidationError::UnparsableTime(end.to_string()))?;
    if end_secs <= start_secs {
        return Err(SlotValidationError::EndNotAfterStart);
    }
    Ok((start_secs, end_secs))
}

/// Orders slots by parsed start time.
///
/// Starts that do not parse go after all parsed ones, compared as strings.
pub fn compare_slots(a: &Slot, b: &Slot) -> Ordering {
    match (a.start_seconds(), b.start_seconds()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.start_label().cmp(b.start_label()),
    }
}

/// Stable in-place sort of a routine's slots.
pub fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(compare_slots);
}

/// Fresh slots for the predefined periods, in order.
pub fn predefined_slots() -> Vec<Slot> {
    PREDEFINED_SLOT_LABELS.iter().copied().map(Slot::new).collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_time_of_day, sort_slots, validate_range, Slot, SlotValidationError};

    #[test]
    fn parses_common_time_shapes() {
        assert_eq!(parse_time_of_day("8:00"), Some(8 * 3600));
        assert_eq!(parse_time_of_day("08:05"), Some(8 * 3600 + 300));
        assert_eq!(parse_time_of_day("13:30:15"), Some(13 * 3600 + 1800 + 15));
        assert_eq!(parse_time_of_day("12:00 AM"), Some(0));
        assert_eq!(parse_time_of_day("1:15pm"), Some(13 * 3600 + 900));
    }

    #[test]
    fn rejects_out_of_range_times() {
        assert_eq!(parse_time_of_day("24:00"), None);
        assert_eq!(parse_time_of_day("9:60"), None);
        assert_eq!(parse_time_of_day("13:00 PM"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn validate_range_requires_end_after_start() {
        assert_eq!(
            validate_range("", "9:00"),
            Err(SlotValidationError::MissingBounds)
        );
        assert_eq!(
            validate_range("9:00", "9:00"),
            Err(SlotValidationError::EndNotAfterStart)
        );
        assert_eq!(
            validate_range("10:00", "9:00"),
            Err(SlotValidationError::EndNotAfterStart)
        );
        assert!(validate_range("9:00", "9:01").is_ok());
    }

    #[test]
    fn sort_uses_time_of_day_not_string_order() {
        let mut slots = vec![
            Slot::new("9:40-11:10"),
            Slot::new("11:20-12:50"),
            Slot::new("8:00-9:30"),
        ];
        sort_slots(&mut slots);
        let labels: Vec<_> = slots.iter().map(|slot| slot.label.as_str()).collect();
        assert_eq!(labels, ["8:00-9:30", "9:40-11:10", "11:20-12:50"]);
    }

    #[test]
    fn sort_is_stable_for_equal_starts_and_puts_unparsed_last() {
        let first = Slot::new("9:00-10:00");
        let second = Slot::new("9:00-9:30");
        let odd = Slot::new("lunch-break");
        let mut slots = vec![odd.clone(), first.clone(), second.clone()];
        sort_slots(&mut slots);
        assert_eq!(slots[0].id, first.id);
        assert_eq!(slots[1].id, second.id);
        assert_eq!(slots[2].id, odd.id);
    }
}
