//! Timetable domain model.
//!
//! # Responsibility
//! - Define routines, slots, courses and the application state tree.
//! - Keep field-level normalization and validation next to the data.
//!
//! # Invariants
//! - Entities are referenced by opaque string ids, never by position.
//! - A course's `slot_id` is either `None` or the id of a slot in the same
//!   routine.

pub mod course;
pub mod id;
pub mod routine;
pub mod slot;
pub mod state;
pub mod theme;
